//! Session cookie middleware and the login-required guard

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};

use crate::api::server::SharedState;
use crate::auth::session::new_session_id;

pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to login first.";

/// ID of the session attached to the current request
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read the session ID from the request's Cookie header
pub fn session_id_from_request(req: &Request, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);
    for cookie_header in req.headers().get_all(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(value) = cookie.trim().strip_prefix(prefix.as_str()) {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Format the session cookie for a `Set-Cookie` header
pub fn session_cookie(cookie_name: &str, session_id: &str) -> Option<HeaderValue> {
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, session_id);
    match HeaderValue::from_str(&cookie) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Could not encode session cookie: {}", e);
            None
        }
    }
}

/// Attach a session ID to every request.
///
/// Requests without a live session get a fresh ID that is only stored if a
/// handler writes to it, in which case the cookie is set on the response.
/// Handlers that re-issue the session (login) put the new [`SessionId`] in
/// the response extensions and the cookie follows it.
pub async fn load_session(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.clone();

    let existing = match session_id_from_request(&req, &cookie_name) {
        Some(id) if state.sessions.get_session(&id).await.is_some() => Some(id),
        _ => None,
    };
    let known = existing.is_some();
    let session_id = existing.unwrap_or_else(new_session_id);

    req.extensions_mut().insert(SessionId(session_id.clone()));
    let mut response = next.run(req).await;

    let issued = match response.extensions_mut().remove::<SessionId>() {
        Some(reissued) => Some(reissued.0),
        None if !known && state.sessions.contains(&session_id).await => Some(session_id),
        None => None,
    };

    if let Some(value) = issued.and_then(|id| session_cookie(&cookie_name, &id)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    response
}

/// Middleware for requiring an authenticated session.
/// Anonymous requests are redirected to the login page with a flash message.
pub async fn require_login(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionId>,
    req: Request,
    next: Next,
) -> Response {
    let authenticated = state
        .sessions
        .get_session(session.as_str())
        .await
        .is_some_and(|s| s.is_authenticated());
    if authenticated {
        return next.run(req).await;
    }

    tracing::debug!("Anonymous request to {} redirected to login", req.uri().path());
    state.sessions.flash(session.as_str(), LOGIN_REQUIRED_MESSAGE).await;
    Redirect::to("/").into_response()
}
