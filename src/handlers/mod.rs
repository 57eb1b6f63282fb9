mod auth;
mod dashboard;
mod services;

use axum::response::Redirect;

pub use auth::{serve_login_page, handle_login, handle_register, handle_logout};
pub use dashboard::{serve_user_dashboard, submit_profile};
pub use services::{create_service, update_service, delete_service};

pub async fn home() -> Redirect {
    Redirect::to("/profile")
}
