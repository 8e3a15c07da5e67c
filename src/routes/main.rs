use actix_session::Session as CookieSession;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::ticket::{TicketCategory, TicketStatus};
use crate::dto::main::{IndexQuery, filter_query_string};
use crate::models::config::ServerConfig;
use crate::repository::ApiRepository;
use crate::routes::{base_context, expire_session, render_template};
use crate::services::{ServiceError, tickets as tickets_service};
use crate::session::AuthenticatedSession;

#[get("/")]
pub async fn show_index(
    req: HttpRequest,
    auth: AuthenticatedSession,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query: IndexQuery = serde_html_form::from_str(req.query_string()).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed list query: {err}");
        IndexQuery::default()
    });

    let data = match tickets_service::load_index_page(
        repo.get_ref(),
        &auth,
        &query,
        server_config.tickets_per_page.get(),
    )
    .await
    {
        Ok(data) => data,
        Err(ServiceError::SessionExpired) => return expire_session(session),
        Err(err) => {
            log::error!("Failed to load tickets: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, Some(&auth.session), "index");
    context.insert("tickets", &data.tickets);
    context.insert("total_unfiltered", &data.total_unfiltered);
    context.insert("search_query", data.filter.search_query());
    context.insert(
        "category_filter",
        &data.filter.category().map(TicketCategory::as_str),
    );
    context.insert(
        "status_filter",
        &data.filter.status().map(TicketStatus::as_str),
    );
    context.insert("filters_active", &data.filter.is_active());
    context.insert("filter_query", &filter_query_string(&data.filter));
    context.insert("categories", &TicketCategory::ALL);
    context.insert("statuses", &TicketStatus::ALL);

    render_template(&tera, "main/index.html", &context)
}
