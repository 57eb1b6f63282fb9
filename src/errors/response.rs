use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use crate::errors::{AppError, StoreError};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Missing sessions send the visitor back to the login page
            AppError::Auth(msg) => {
                tracing::debug!("Redirecting to login: {}", msg);
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", e)
            ).into_response(),

            AppError::Store(err) => convert_store_error(err),

            AppError::Template(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e)
            ).into_response(),

            AppError::Session(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Session error: {}", e)
            ).into_response(),
        }
    }
}

fn convert_store_error(err: StoreError) -> Response {
    match err {
        StoreError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            e.to_string()
        ).into_response(),

        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Store error: {}", err)
        ).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use crate::errors::ValidationError;

    #[test]
    fn auth_errors_redirect_to_login() {
        let response = AppError::Auth("Not authenticated".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?error=Not%20authenticated"
        );
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = AppError::Store(StoreError::Validation(ValidationError::InvalidPrice));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
