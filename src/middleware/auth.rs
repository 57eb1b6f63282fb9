use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::{Request, State},
    body::Body,
};
use tower_sessions::Session;

use crate::state::AppState;
use crate::ui::{flash, ToastKind};

fn is_public(path: &str) -> bool {
    matches!(path, "/login" | "/register" | "/logout") || path.starts_with("/static/")
}

/// Pages other than login/signup need a stored token and a readable user.
pub async fn require_session(
    State(state): State<AppState>,
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    if is_public(req.uri().path()) || state.session().is_logged_in().await {
        return next.run(req).await;
    }

    tracing::info!("No session for {}, redirecting to login", req.uri().path());
    if let Err(e) = flash(&session, ToastKind::Error, "Please log in to access your profile").await {
        tracing::warn!("Could not flash login notice: {}", e);
    }
    Redirect::to("/login").into_response()
}
