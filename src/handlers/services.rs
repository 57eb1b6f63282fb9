use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response, Redirect},
};
use tower_sessions::Session;

use crate::errors::{AppResult, StoreError};
use crate::models::{DeleteForm, ServiceForm};
use crate::services::DeleteOutcome;
use crate::state::AppState;
use crate::ui::{flash, SubmitError, ToastKind};
use super::dashboard::{current_user, render_dashboard, DashboardOverlays};

const SELLERS_ONLY: &str = "Only service providers can manage services";

/// Turns buyers away before any write to the service list.
async fn refuse_non_seller(state: &AppState, session: &Session) -> AppResult<Option<Response>> {
    let user = current_user(state).await?;
    if user.is_seller() {
        return Ok(None);
    }
    tracing::warn!("Service change refused for non-seller {:?}", user.email);
    flash(session, ToastKind::Error, SELLERS_ONLY).await?;
    Ok(Some(Redirect::to("/profile").into_response()))
}

/// Re-renders the dashboard with the editor still open after a rejected save.
async fn reject(
    state: &AppState,
    overlays: &DashboardOverlays,
    err: SubmitError<StoreError>,
) -> AppResult<Response> {
    let user = current_user(state).await?;
    let mut notifier = state.notifier();
    match err {
        SubmitError::Rejected(StoreError::Validation(e)) => {
            tracing::debug!("Service form rejected: {}", e);
            notifier.show_toast(ToastKind::Error, &e.to_string());
        }
        SubmitError::Rejected(e) => {
            tracing::error!("Failed to save service: {}", e);
            notifier.show_toast(ToastKind::Error, "Failed to save service. Please try again.");
        }
        SubmitError::NotOpen => {}
    }
    render_dashboard(state, &user, overlays, notifier).await
}

pub async fn create_service(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ServiceForm>,
) -> AppResult<Response> {
    if let Some(refused) = refuse_non_seller(&state, &session).await? {
        return Ok(refused);
    }

    let catalog = state.catalog();
    let mut overlays = DashboardOverlays::default();
    overlays.service_editor.open_create(form);

    let result = overlays
        .service_editor
        .submit(|_, draft| async move { catalog.create(&draft).await })
        .await;
    match result {
        Ok(service) => {
            tracing::info!("Service {} listed", service.id);
            flash(&session, ToastKind::Success, "Service added successfully!").await?;
            Ok(Redirect::to("/profile").into_response())
        }
        Err(e) => reject(&state, &overlays, e).await,
    }
}

pub async fn update_service(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ServiceForm>,
) -> AppResult<Response> {
    if let Some(refused) = refuse_non_seller(&state, &session).await? {
        return Ok(refused);
    }

    let catalog = state.catalog();
    let mut overlays = DashboardOverlays::default();
    overlays.service_editor.open_edit(id, form);

    let result = overlays
        .service_editor
        .submit(|key, draft| async move { catalog.update(key.unwrap_or(id), &draft).await })
        .await;

    match result {
        Ok(Some(_)) => {
            flash(&session, ToastKind::Success, "Service updated successfully!").await?;
            Ok(Redirect::to("/profile").into_response())
        }
        Ok(None) => Ok(Redirect::to("/profile").into_response()),
        Err(e) => reject(&state, &overlays, e).await,
    }
}

pub async fn delete_service(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    if let Some(refused) = refuse_non_seller(&state, &session).await? {
        return Ok(refused);
    }

    let mut answer = |_: &str| form.confirmed();
    match state.catalog().delete(id, &mut answer).await {
        Ok(DeleteOutcome::Removed) => {
            flash(&session, ToastKind::Success, "Service deleted successfully").await?;
        }
        Ok(DeleteOutcome::NotFound) => tracing::debug!("Delete of unknown service {}", id),
        Ok(DeleteOutcome::Declined) => tracing::debug!("Delete of service {} not confirmed", id),
        Err(e) => {
            tracing::error!("Failed to delete service {}: {}", id, e);
            flash(&session, ToastKind::Error, "Failed to delete service").await?;
        }
    }
    Ok(Redirect::to("/profile").into_response())
}
