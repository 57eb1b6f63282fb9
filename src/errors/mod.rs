// Error types for the dashboard, one enum per concern plus the top-level AppError.
use thiserror::Error;

pub mod remote;
pub mod response;
pub mod store;
pub mod validation;

pub use remote::AuthClientError;
pub use store::{StorageError, StoreError, StoreResult};
pub use validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

pub type AppResult<T> = Result<T, AppError>;
