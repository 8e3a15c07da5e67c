//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::session::Session;
use crate::middleware::SIGNIN_PATH;
use crate::services::auth as auth_service;
use crate::session::SessionStore;

pub mod auth;
pub mod main;
pub mod tickets;

/// Maps a flash level onto the CSS alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the signed-in user and the active nav item.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_user: Option<&Session>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &current_user);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Drops a session the API no longer accepts and sends the user to sign in.
pub fn expire_session(session: actix_session::Session) -> HttpResponse {
    auth_service::logout(&SessionStore::new(session.clone()));
    session.purge();
    FlashMessage::warning("Your session has expired. Please sign in again.").send();
    redirect(SIGNIN_PATH)
}
