//! Signup, login, logout and welcome pages.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::{empty, redirect, status_of, AppState, RequestContext};
use crate::error::AppError;
use crate::identity::RegisterRequest;

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn signup_form(ctx: RequestContext) -> Response {
    ctx.render(StatusCode::OK, "signup.html", json!({ "title": "Signup" }))
}

pub async fn signup(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(rej) => return ctx.form_rejected(rej),
    };
    let req = RegisterRequest {
        username: form.username.clone(),
        password: form.password,
        verify: Some(form.verify),
        email: Some(form.email.clone()),
    };
    match state.accounts.register(&req) {
        Ok(resp) => redirect("/welcome", &resp.cookies),
        Err(e @ (AppError::Validation { .. } | AppError::DuplicateUser { .. })) => ctx.render(
            status_of(&e),
            "signup.html",
            json!({ "title": "Signup", "username": form.username, "email": form.email, "errors": e.field_messages() }),
        ),
        Err(e) => ctx.error_page(&e),
    }
}

pub async fn login_form(ctx: RequestContext) -> Response {
    ctx.render(StatusCode::OK, "login.html", json!({ "title": "Login" }))
}

pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(rej) => return ctx.form_rejected(rej),
    };
    match state.accounts.login(&form.username, &form.password) {
        Ok(resp) => redirect("/welcome", &resp.cookies),
        Err(e @ AppError::InvalidCredentials) => ctx.render(
            status_of(&e),
            "login.html",
            json!({ "title": "Login", "username": form.username, "error": e.message() }),
        ),
        Err(e) => ctx.error_page(&e),
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    redirect("/signup", &state.accounts.logout())
}

pub async fn welcome(ctx: RequestContext) -> Response {
    if ctx.user_name().is_none() {
        return redirect("/signup", &[]);
    }
    ctx.render(StatusCode::OK, "welcome.html", empty())
}
