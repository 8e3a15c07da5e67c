//! Ticket detail, form, status and delete handlers.

use actix_multipart::form::MultipartForm;
use actix_session::Session as CookieSession;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::ticket::{TicketCategory, TicketStatus};
use crate::dto::tickets::TicketFormPageData;
use crate::forms::tickets::{TicketForm, TicketFormValues, TicketSubmission, read_attachment};
use crate::repository::ApiRepository;
use crate::routes::{base_context, expire_session, redirect, render_template};
use crate::services::ticket_form::{self as ticket_form_service, SAVE_FAILED};
use crate::services::{ServiceError, tickets as tickets_service};
use crate::session::AuthenticatedSession;

#[derive(Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

fn ticket_url(id: i64) -> String {
    format!("/tickets/{id}")
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    auth: &AuthenticatedSession,
    data: &TicketFormPageData,
    ticket_id: Option<i64>,
    error: Option<&str>,
) -> HttpResponse {
    let (current_page, action) = match ticket_id {
        Some(id) => ("edit", format!("{}/edit", ticket_url(id))),
        None => ("new", "/tickets/new".to_string()),
    };
    let mut context = base_context(flash_messages, Some(&auth.session), current_page);
    context.insert("action", &action);
    context.insert("ticket_id", &ticket_id);
    context.insert("ticket", &data.ticket);
    context.insert("form", &data.values);
    context.insert("status_editable", &data.status_editable);
    context.insert("categories", &TicketCategory::ALL);
    context.insert("statuses", &TicketStatus::ALL);
    context.insert("error", &error);
    render_template(tera, "tickets/form.html", &context)
}

fn render_error(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    auth: &AuthenticatedSession,
    status: StatusCode,
    message: &str,
) -> HttpResponse {
    let mut context = base_context(flash_messages, Some(&auth.session), "ticket");
    context.insert("message", message);
    let mut response = render_template(tera, "tickets/error.html", &context);
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}

/// Reads the uploaded file; on failure the form is shown again with the message.
async fn into_submission(
    form: TicketForm,
) -> Result<TicketSubmission, (TicketFormValues, String)> {
    let (values, file) = form.into_parts();
    match read_attachment(file).await {
        Ok(attachment) => Ok(TicketSubmission { values, attachment }),
        Err(err) => Err((values, err.to_string())),
    }
}

#[get("/tickets/new")]
pub async fn new_ticket(
    auth: AuthenticatedSession,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = ticket_form_service::new_ticket_form();
    render_form(&tera, &flash_messages, &auth, &data, None, None)
}

#[post("/tickets/new")]
pub async fn create_ticket(
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<TicketForm>,
) -> impl Responder {
    let submission = match into_submission(form).await {
        Ok(submission) => submission,
        Err((values, message)) => {
            let data = TicketFormPageData {
                values,
                ..ticket_form_service::new_ticket_form()
            };
            return render_form(&tera, &flash_messages, &auth, &data, None, Some(&message));
        }
    };
    let values = submission.values.clone();

    match ticket_form_service::create_ticket(repo.get_ref(), &auth, submission).await {
        Ok(ticket) => {
            FlashMessage::success("Ticket created successfully!").send();
            redirect(&ticket_url(ticket.id.get()))
        }
        Err(ServiceError::SessionExpired) => expire_session(session),
        Err(err) => {
            let data = TicketFormPageData {
                values,
                ..ticket_form_service::new_ticket_form()
            };
            let message = err.message_or(SAVE_FAILED);
            render_form(&tera, &flash_messages, &auth, &data, None, Some(&message))
        }
    }
}

#[get("/tickets/{id}")]
pub async fn show_ticket(
    id: web::Path<i64>,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match tickets_service::load_ticket(repo.get_ref(), &auth, id.into_inner()).await {
        Ok(data) => data,
        Err(ServiceError::SessionExpired) => return expire_session(session),
        Err(ServiceError::NotFound) => {
            return render_error(
                &tera,
                &flash_messages,
                &auth,
                StatusCode::NOT_FOUND,
                "Ticket not found",
            );
        }
        Err(err) => {
            let message = err.message_or("Failed to load ticket");
            return render_error(
                &tera,
                &flash_messages,
                &auth,
                StatusCode::BAD_GATEWAY,
                &message,
            );
        }
    };

    let mut context = base_context(&flash_messages, Some(&auth.session), "ticket");
    context.insert("ticket", &data.ticket);
    context.insert("history", &data.history);
    context.insert("attachment", &data.attachment);
    context.insert("transitions", &data.transitions);
    context.insert("statuses", &TicketStatus::ALL);

    render_template(&tera, "tickets/detail.html", &context)
}

#[post("/tickets/{id}/status")]
pub async fn change_status(
    id: web::Path<i64>,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<StatusForm>,
) -> impl Responder {
    let id = id.into_inner();

    match tickets_service::change_status(repo.get_ref(), &auth, id, &form.status).await {
        Ok(_) => FlashMessage::success("Status updated successfully!").send(),
        Err(ServiceError::SessionExpired) => return expire_session(session),
        Err(ServiceError::Forbidden(message)) => FlashMessage::warning(message).send(),
        Err(err) => FlashMessage::error(err.message_or("Failed to update status")).send(),
    }

    redirect(&ticket_url(id))
}

#[get("/tickets/{id}/edit")]
pub async fn edit_ticket(
    id: web::Path<i64>,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = id.into_inner();

    match ticket_form_service::load_edit_form(repo.get_ref(), &auth, id).await {
        Ok(data) => render_form(&tera, &flash_messages, &auth, &data, Some(id), None),
        Err(ServiceError::SessionExpired) => expire_session(session),
        Err(ServiceError::Forbidden(message)) => {
            FlashMessage::warning(message).send();
            redirect("/")
        }
        Err(err) => {
            FlashMessage::error(err.message_or("Failed to fetch ticket details")).send();
            redirect("/")
        }
    }
}

#[post("/tickets/{id}/edit")]
pub async fn update_ticket(
    id: web::Path<i64>,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<TicketForm>,
) -> impl Responder {
    let id = id.into_inner();
    let edit_form = |values: TicketFormValues| TicketFormPageData {
        ticket: None,
        values,
        status_editable: true,
    };

    let submission = match into_submission(form).await {
        Ok(submission) => submission,
        Err((values, message)) => {
            return render_form(
                &tera,
                &flash_messages,
                &auth,
                &edit_form(values),
                Some(id),
                Some(&message),
            );
        }
    };
    let values = submission.values.clone();

    match ticket_form_service::update_ticket(repo.get_ref(), &auth, id, submission).await {
        Ok(_) => {
            FlashMessage::success("Ticket updated successfully!").send();
            redirect(&ticket_url(id))
        }
        Err(ServiceError::SessionExpired) => expire_session(session),
        Err(ServiceError::Forbidden(message)) => {
            FlashMessage::warning(message).send();
            redirect("/")
        }
        Err(err) => {
            let message = err.message_or(SAVE_FAILED);
            render_form(
                &tera,
                &flash_messages,
                &auth,
                &edit_form(values),
                Some(id),
                Some(&message),
            )
        }
    }
}

#[post("/tickets/{id}/delete")]
pub async fn delete_ticket(
    id: web::Path<i64>,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
) -> impl Responder {
    let id = id.into_inner();

    match tickets_service::delete_ticket(repo.get_ref(), &auth, id).await {
        Ok(()) => {
            FlashMessage::success("Ticket deleted.").send();
            redirect("/")
        }
        Err(ServiceError::SessionExpired) => expire_session(session),
        Err(ServiceError::Forbidden(message)) => {
            FlashMessage::warning(message).send();
            redirect("/")
        }
        Err(err) => {
            FlashMessage::error(err.message_or("Failed to delete ticket")).send();
            redirect("/")
        }
    }
}
