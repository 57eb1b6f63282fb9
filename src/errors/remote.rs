use thiserror::Error;

/// Outcome of a failed call to the remote authentication API.
#[derive(Error, Debug)]
pub enum AuthClientError {
    /// The API answered with a non-success status.
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
