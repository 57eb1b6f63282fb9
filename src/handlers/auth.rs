use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::errors::{AppResult, AuthClientError};
use crate::models::{LoginForm, RegisterForm};
use crate::services::auth_client::AuthSuccess;
use crate::state::AppState;
use crate::ui::{fill_template, flash, load_template, render_page, take_flashed, NavLink, ToastKind};

const NETWORK_ERROR: &str = "Network error. Please try again.";

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub tab: Option<String>,
    pub error: Option<String>,
}

pub async fn serve_login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> AppResult<Response> {
    let signup = query.tab.as_deref() == Some("signup");

    let mut notifier = state.notifier();
    notifier.extend(take_flashed(&session).await?);
    if let Some(error) = query.error.as_deref().filter(|e| !e.is_empty()) {
        notifier.show_toast(ToastKind::Error, error);
    }

    let dir = &state.config.ui.templates_dir;
    let content = fill_template(
        &load_template(dir, "login.html")?,
        &[
            ("login_active", if signup { "" } else { "active" }),
            ("signup_active", if signup { "active" } else { "" }),
            ("login_display", if signup { "none" } else { "block" }),
            ("signup_display", if signup { "block" } else { "none" }),
        ],
    );

    let html = render_page(dir, "Login", NavLink::Login, &content, &notifier.render())?;
    Ok(Html(html).into_response())
}

/// Stores the session from a successful auth reply.
async fn sign_in(state: &AppState, success: &AuthSuccess) -> AppResult<()> {
    state.session().sign_in(&success.token, &success.user).await?;
    Ok(())
}

async fn report_failure(session: &Session, err: AuthClientError) -> AppResult<()> {
    let message = match err {
        AuthClientError::Rejected(message) => message,
        AuthClientError::Network(e) => {
            tracing::error!("Auth API unreachable: {}", e);
            NETWORK_ERROR.to_string()
        }
    };
    flash(session, ToastKind::Error, message).await?;
    Ok(())
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(login_form): Form<LoginForm>,
) -> AppResult<Response> {
    let request = match login_form.validate() {
        Ok(request) => request,
        Err(e) => {
            flash(&session, ToastKind::Error, e.to_string()).await?;
            return Ok(Redirect::to("/login").into_response());
        }
    };

    tracing::info!("Login attempt for {}", request.email);
    match state.auth.login(&request).await {
        Ok(success) => {
            sign_in(&state, &success).await?;
            flash(&session, ToastKind::Success, "Welcome back! Redirecting...").await?;
            Ok(Redirect::to("/profile").into_response())
        }
        Err(e) => {
            report_failure(&session, e).await?;
            Ok(Redirect::to("/login").into_response())
        }
    }
}

pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Form(register_form): Form<RegisterForm>,
) -> AppResult<Response> {
    let request = match register_form.validate() {
        Ok(request) => request,
        Err(e) => {
            flash(&session, ToastKind::Error, e.to_string()).await?;
            return Ok(Redirect::to("/login?tab=signup").into_response());
        }
    };

    tracing::info!("Signup attempt for {} as {:?}", request.email, request.role);
    match state.auth.register(&request).await {
        Ok(success) => {
            sign_in(&state, &success).await?;
            flash(&session, ToastKind::Success, "Account created! Redirecting...").await?;
            Ok(Redirect::to("/profile").into_response())
        }
        Err(e) => {
            report_failure(&session, e).await?;
            Ok(Redirect::to("/login?tab=signup").into_response())
        }
    }
}

pub async fn handle_logout(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    state.session().sign_out().await?;
    flash(&session, ToastKind::Success, "Logged out successfully").await?;
    tracing::info!("Signed out");
    Ok(Redirect::to("/login").into_response())
}
