use reqwest::Client;
use serde::Deserialize;

use crate::errors::AuthClientError;
use crate::models::{LoginRequest, RegisterRequest, User};

/// Successful register/login reply.
#[derive(Debug, Deserialize)]
pub struct AuthSuccess {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct AuthFailure {
    message: Option<String>,
}

/// Client for the remote authentication API. One attempt per call: no
/// retries and no timeout.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSuccess, AuthClientError> {
        self.post("register", request, "Signup failed").await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSuccess, AuthClientError> {
        self.post("login", request, "Login failed").await
    }

    async fn post<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        fallback: &str,
    ) -> Result<AuthSuccess, AuthClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<AuthFailure>()
                .await
                .ok()
                .and_then(|f| f.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            tracing::warn!("{} rejected with {}: {}", endpoint, status, message);
            return Err(AuthClientError::Rejected(message));
        }

        Ok(response.json::<AuthSuccess>().await?)
    }
}
