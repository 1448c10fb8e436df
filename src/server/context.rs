use axum::extract::rejection::FormRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::AppState;
use crate::error::AppError;
use crate::identity::{SessionState, SetCookie};
use crate::render::SharedRenderer;

/// Per-request view of who is calling plus the page-rendering capability.
///
/// Handlers take this instead of reading cookies themselves. `session` is the verified
/// state; `unverified_name` is the raw `user_name` payload and exists only for the legacy
/// edit check.
#[derive(Clone)]
pub struct RequestContext {
    pub session: SessionState,
    pub unverified_name: Option<String>,
    pub path: String,
    renderer: SharedRenderer,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sessions = state.accounts.sessions();
        Ok(Self {
            session: sessions.state(&parts.headers),
            unverified_name: sessions.current_user_name_unverified(&parts.headers),
            path: parts.uri.path().to_string(),
            renderer: state.renderer.clone(),
        })
    }
}

impl RequestContext {
    pub fn new(session: SessionState, unverified_name: Option<String>, renderer: SharedRenderer) -> Self {
        Self { session, unverified_name, path: String::new(), renderer }
    }

    pub fn user_name(&self) -> Option<&str> { self.session.user_name() }

    pub fn unverified_user_name(&self) -> Option<&str> { self.unverified_name.as_deref() }

    /// Render `template` with `values` plus the verified `user`.
    pub fn render(&self, status: StatusCode, template: &str, values: Value) -> Response {
        let mut values = match values {
            Value::Object(m) => Value::Object(m),
            Value::Null => json!({}),
            other => json!({ "value": other }),
        };
        if let (Some(obj), Some(user)) = (values.as_object_mut(), self.user_name()) {
            obj.entry("user").or_insert_with(|| Value::String(user.to_string()));
        }
        match self.renderer.render(template, &values) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!(target: "quill::http", "render failed path={} template={}: {}", self.path, template, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }

    /// Rendered page for any error that is not a form re-render.
    pub fn error_page(&self, err: &AppError) -> Response {
        let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let heading = match err {
            AppError::NotFound { .. } => "Not found",
            AppError::Forbidden { .. } => "Not allowed",
            AppError::InvalidCredentials => "Login required",
            AppError::Validation { .. } | AppError::DuplicateUser { .. } => "Invalid request",
            AppError::Storage { .. } | AppError::Render { .. } | AppError::Internal { .. } => "Something went wrong",
        };
        if status.is_server_error() {
            error!(target: "quill::http", "path={} error={}", self.path, err);
        } else {
            warn!(target: "quill::http", "path={} status={} code={}", self.path, status.as_u16(), err.code_str());
        }
        // Internal details stay in the log
        let message = if status.is_server_error() { "Please try again later.".to_string() } else { err.message() };
        self.status_page(status, heading, &message)
    }

    /// Page for a body the form extractor refused; keeps the extractor's status.
    pub fn form_rejected(&self, rejection: FormRejection) -> Response {
        let status = rejection.status();
        warn!(target: "quill::http", "path={} status={} form rejected: {}", self.path, status.as_u16(), rejection.body_text());
        self.status_page(status, "Invalid request", "The submitted form could not be read.")
    }

    pub fn status_page(&self, status: StatusCode, heading: &str, message: &str) -> Response {
        self.render(status, "message.html", json!({ "title": heading, "heading": heading, "message": message }))
    }
}

/// 302 to `location`, attaching session cookie directives.
pub fn redirect(location: &str, cookies: &[SetCookie]) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, v);
    }
    for c in cookies {
        match c.to_header() {
            Some(v) => { headers.append(header::SET_COOKIE, v); }
            None => warn!(target: "quill::http", "dropping unencodable cookie {}", c.name),
        }
    }
    (StatusCode::FOUND, headers).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::render::TemplateRenderer;

    fn ctx(session: SessionState) -> RequestContext {
        RequestContext::new(session, None, Arc::new(TemplateRenderer::new().unwrap()))
    }

    #[test]
    fn redirect_sets_location_and_cookies() {
        let cookies = vec![
            SetCookie { name: "user_id", value: "1|ab".into() },
            SetCookie { name: "user_name", value: "alice|cd".into() },
        ];
        let resp = redirect("/welcome", &cookies);
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/welcome");
        let set: Vec<_> = resp.headers().get_all(header::SET_COOKIE).iter().map(|v| v.to_str().unwrap().to_string()).collect();
        assert_eq!(set, vec!["user_id=1|ab; Path=/", "user_name=alice|cd; Path=/"]);
    }

    #[test]
    fn error_pages_use_error_status() {
        let c = ctx(SessionState::Anonymous);
        assert_eq!(c.error_page(&AppError::not_found("post_not_found", "x")).status(), StatusCode::NOT_FOUND);
        assert_eq!(c.error_page(&AppError::forbidden("forbidden", "x")).status(), StatusCode::FORBIDDEN);
        assert_eq!(c.error_page(&AppError::storage("io", "disk")).status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn status_page_renders_with_given_status() {
        let c = ctx(SessionState::Anonymous);
        let resp = c.status_page(StatusCode::METHOD_NOT_ALLOWED, "Not allowed", "wrong method");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/html; charset=utf-8");
    }

    #[test]
    fn render_failure_degrades_to_500() {
        let c = ctx(SessionState::Authenticated("alice".into()));
        assert_eq!(c.render(StatusCode::OK, "missing.html", json!({})).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(c.render(StatusCode::OK, "welcome.html", json!({})).status(), StatusCode::OK);
    }
}
