//! Helpdesk web front-end: server-rendered pages over the helpdesk REST API.

pub mod domain;
pub mod filter;
pub mod pagination;

#[cfg(feature = "server")]
pub mod api_client;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: models::config::ServerConfig) -> std::io::Result<()> {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware as actix_middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::api_client::ApiClientOptions;
    use crate::middleware::RedirectUnauthorized;
    use crate::repository::ApiRepository;
    use crate::routes::auth::{logout, show_signin, show_signup, signin, signup};
    use crate::routes::main::show_index;
    use crate::routes::tickets::{
        change_status, create_ticket, delete_ticket, edit_ticket, new_ticket, show_ticket,
        update_ticket,
    };

    // Shared, connection-pooled client for the helpdesk REST API.
    let repo = ApiRepository::from_options(
        ApiClientOptions::new(&server_config.api_base_url)
            .timeout(Duration::from_secs(server_config.api_timeout_secs)),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid session secret: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(
                        (!server_config.domain.is_empty()).then(|| server_config.domain.clone()),
                    )
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_signin)
            .service(signin)
            .service(show_signup)
            .service(signup)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(new_ticket)
                    .service(create_ticket)
                    .service(show_ticket)
                    .service(change_status)
                    .service(edit_ticket)
                    .service(update_ticket)
                    .service(delete_ticket)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
