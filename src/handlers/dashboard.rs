use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Response, Redirect},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::errors::{AppError, AppResult, StoreError, ValidationError};
use crate::models::{ProfileForm, ServiceForm, User};
use crate::state::AppState;
use crate::ui::modal::{render_delete_confirm, render_profile_modal, render_service_modal};
use crate::ui::profile::{render_buyer_section, render_profile, render_seller_section, ProfileView};
use crate::ui::{
    flash, load_template, render_page, take_flashed, ModalEvent, NavLink, ProfileEditor,
    ServiceEditor, SubmitError, ToastKind, ToastNotifier,
};

#[derive(Debug, Deserialize, Default)]
pub struct ProfileQuery {
    pub modal: Option<String>,
    pub edit: Option<i64>,
    pub confirm_delete: Option<i64>,
}

/// What the dashboard shows on top of the profile for one request.
pub struct DashboardOverlays {
    pub service_editor: ServiceEditor,
    pub profile_editor: ProfileEditor,
    pub profile_errors: Vec<ValidationError>,
    pub confirm_delete: Option<i64>,
}

impl Default for DashboardOverlays {
    fn default() -> Self {
        Self {
            service_editor: ServiceEditor::new(),
            profile_editor: ProfileEditor::new(),
            profile_errors: Vec::new(),
            confirm_delete: None,
        }
    }
}

pub(crate) async fn current_user(state: &AppState) -> AppResult<User> {
    state
        .session()
        .get_current_user()
        .await
        .ok_or_else(|| AppError::Auth("Please log in to access your profile".into()))
}

/// Renders the full profile page for `user` with the given overlays.
pub(crate) async fn render_dashboard(
    state: &AppState,
    user: &User,
    overlays: &DashboardOverlays,
    mut notifier: ToastNotifier,
) -> AppResult<Response> {
    let view = ProfileView::from_user(user);

    let section = if view.seller {
        let services = state.catalog().load().await;
        tracing::debug!("Rendering {} services", services.len());
        render_seller_section(&services)
    } else {
        let orders = state.orders().load().await;
        tracing::debug!("Rendering {} orders", orders.len());
        render_buyer_section(&orders)
    };

    let mut modals = render_service_modal(&overlays.service_editor);
    modals.push_str(&render_profile_modal(&overlays.profile_editor, &overlays.profile_errors));
    if let Some(id) = overlays.confirm_delete {
        match state.catalog().find(id).await {
            Some(service) => modals.push_str(&render_delete_confirm(&service)),
            None => notifier.show_toast(ToastKind::Error, "Service not found"),
        }
    }

    let dir = &state.config.ui.templates_dir;
    let template = load_template(dir, "profile.html")?;
    let content = render_profile(&template, &view, &section, &modals);
    let html = render_page(dir, "Profile", NavLink::Profile, &content, &notifier.render())?;
    Ok(Html(html).into_response())
}

pub async fn serve_user_dashboard(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProfileQuery>,
) -> AppResult<Response> {
    let user = current_user(&state).await?;
    tracing::info!("Rendering profile for {}", user.name.as_deref().unwrap_or("unnamed user"));

    let mut notifier = state.notifier();
    notifier.extend(take_flashed(&session).await?);

    let mut overlays = DashboardOverlays::default();
    match query.modal.as_deref() {
        Some("service") => match query.edit {
            Some(id) => match state.catalog().find(id).await {
                Some(service) => overlays.service_editor.handle(ModalEvent::Edit {
                    key: id,
                    draft: ServiceForm::from_service(&service),
                }),
                None => notifier.show_toast(ToastKind::Error, "Service not found"),
            },
            None => overlays.service_editor.handle(ModalEvent::Trigger),
        },
        Some("profile") => {
            notifier.show_toast(ToastKind::Info, "Opening edit profile form...");
            overlays.profile_editor.handle(ModalEvent::Edit {
                key: (),
                draft: ProfileForm::from_user(&user),
            });
        }
        Some(other) => tracing::warn!("Unknown modal requested: {}", other),
        None => {}
    }
    overlays.confirm_delete = query.confirm_delete;

    render_dashboard(&state, &user, &overlays, notifier).await
}

enum ProfileRejection {
    Invalid(Vec<ValidationError>),
    Save(StoreError),
}

pub async fn submit_profile(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let user = current_user(&state).await?;
    let accessor = state.session();

    let mut overlays = DashboardOverlays::default();
    overlays.profile_editor.open_edit((), form);

    let current = &user;
    let result = overlays
        .profile_editor
        .submit(|_, draft| async move {
            let updated = draft.apply(current, Utc::now()).map_err(ProfileRejection::Invalid)?;
            accessor.save_user(&updated).await.map_err(ProfileRejection::Save)?;
            Ok::<_, ProfileRejection>(updated)
        })
        .await;

    let mut notifier = state.notifier();
    match result {
        Ok(_) => {
            tracing::info!("Profile updated");
            flash(&session, ToastKind::Success, "Profile updated successfully!").await?;
            return Ok(Redirect::to("/profile").into_response());
        }
        Err(SubmitError::Rejected(ProfileRejection::Invalid(errors))) => {
            tracing::debug!("Profile form rejected: {:?}", errors);
            overlays.profile_errors = errors;
        }
        Err(SubmitError::Rejected(ProfileRejection::Save(e))) => {
            tracing::error!("Failed to save profile: {}", e);
            notifier.show_toast(ToastKind::Error, "Failed to update profile. Please try again.");
        }
        Err(SubmitError::NotOpen) => {}
    }

    render_dashboard(&state, &user, &overlays, notifier).await
}
