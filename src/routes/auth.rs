//! Sign-in, sign-up and sign-out pages.

use actix_identity::Identity;
use actix_session::Session as CookieSession;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{LoginForm, RegisterForm};
use crate::middleware::SIGNIN_PATH;
use crate::repository::ApiRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};
use crate::session::SessionStore;

#[get("/auth/signin")]
pub async fn show_signin(
    session: CookieSession,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if SessionStore::new(session).is_authenticated() {
        return redirect("/");
    }

    let context = base_context(&flash_messages, None, "signin");
    render_template(&tera, "auth/signin.html", &context)
}

#[post("/auth/signin")]
pub async fn signin(
    req: HttpRequest,
    session: CookieSession,
    repo: web::Data<ApiRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let store = SessionStore::new(session);

    match auth_service::login(repo.get_ref(), &store, form).await {
        Ok(user) => {
            if let Err(err) = Identity::login(&req.extensions(), user.username.to_string()) {
                log::error!("Failed to attach identity: {err}");
            }
            log::info!("{} signed in", user.username);
            redirect("/")
        }
        Err(err) => {
            FlashMessage::error(err.message_or(auth_service::LOGIN_FAILED)).send();
            redirect(SIGNIN_PATH)
        }
    }
}

#[get("/auth/signup")]
pub async fn show_signup(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "signup");
    context.insert("form", &RegisterForm::default());
    render_template(&tera, "auth/signup.html", &context)
}

#[post("/auth/signup")]
pub async fn signup(
    repo: web::Data<ApiRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let echoed = form.without_passwords();

    match auth_service::register(repo.get_ref(), form).await {
        Ok(()) => {
            FlashMessage::success("Registration successful! Please sign in.").send();
            redirect(SIGNIN_PATH)
        }
        Err(err) => {
            let message = match &err {
                ServiceError::Form(message) => message.clone(),
                other => {
                    log::error!("Registration failed: {other}");
                    auth_service::REGISTRATION_FAILED.to_string()
                }
            };
            let mut context = base_context(&flash_messages, None, "signup");
            context.insert("form", &echoed);
            context.insert("error", &message);
            render_template(&tera, "auth/signup.html", &context)
        }
    }
}

#[post("/logout")]
pub async fn logout(session: CookieSession, identity: Option<Identity>) -> impl Responder {
    auth_service::logout(&SessionStore::new(session));
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect(SIGNIN_PATH)
}
