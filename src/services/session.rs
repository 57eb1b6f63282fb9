use crate::errors::StoreResult;
use crate::models::User;
use super::storage::{SharedStorage, SERVICES_KEY, TOKEN_KEY, USER_KEY};

/// Reads and writes the signed-in user and token.
#[derive(Clone)]
pub struct SessionAccessor {
    storage: SharedStorage,
}

impl SessionAccessor {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::error!("Failed to read {} from storage: {}", key, e);
                None
            }
        }
    }

    /// The stored user, or `None` when the token or a parsable user is missing.
    pub async fn get_current_user(&self) -> Option<User> {
        let user = self.read(USER_KEY).await?;
        self.read(TOKEN_KEY).await?;
        match serde_json::from_str::<User>(&user) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Failed to parse user data: {}", e);
                None
            }
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.read(TOKEN_KEY).await.is_some() && self.get_current_user().await.is_some()
    }

    pub async fn sign_in(&self, token: &str, user: &User) -> StoreResult<()> {
        self.storage.set_item(TOKEN_KEY, token).await?;
        self.save_user(user).await
    }

    pub async fn save_user(&self, user: &User) -> StoreResult<()> {
        let data = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &data).await?;
        Ok(())
    }

    /// Forgets the session and the seller's local catalog.
    pub async fn sign_out(&self) -> StoreResult<()> {
        for key in [TOKEN_KEY, USER_KEY, SERVICES_KEY] {
            self.storage.remove_item(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{MemoryStorage, Storage};
    use std::sync::Arc;

    fn accessor() -> (Arc<MemoryStorage>, SessionAccessor) {
        let storage = Arc::new(MemoryStorage::new());
        let accessor = SessionAccessor::new(storage.clone());
        (storage, accessor)
    }

    #[tokio::test]
    async fn malformed_user_values_are_absent() {
        let (storage, session) = accessor();
        storage.set_item(TOKEN_KEY, "tok").await.unwrap();
        for raw in ["", "{", "not json", "null", "42", "\"Asha\"", "{\"name\":"] {
            storage.set_item(USER_KEY, raw).await.unwrap();
            assert!(session.get_current_user().await.is_none(), "{raw:?} should not parse");
            assert!(!session.is_logged_in().await);
        }
    }

    #[tokio::test]
    async fn token_is_required() {
        let (storage, session) = accessor();
        storage.set_item(USER_KEY, r#"{"name":"Asha"}"#).await.unwrap();
        assert!(session.get_current_user().await.is_none());

        storage.set_item(TOKEN_KEY, "").await.unwrap();
        assert!(!session.is_logged_in().await);

        storage.set_item(TOKEN_KEY, "tok").await.unwrap();
        assert!(session.is_logged_in().await);
        let user = session.get_current_user().await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn sign_out_clears_session_and_services() {
        let (storage, session) = accessor();
        let user = User { name: Some("Asha".into()), ..Default::default() };
        session.sign_in("tok", &user).await.unwrap();
        storage.set_item(SERVICES_KEY, "[]").await.unwrap();
        storage.set_item("userOrders", "[]").await.unwrap();
        assert!(session.is_logged_in().await);

        session.sign_out().await.unwrap();
        assert!(!session.is_logged_in().await);
        assert_eq!(storage.get_item(SERVICES_KEY).await.unwrap(), None);
        assert!(storage.get_item("userOrders").await.unwrap().is_some());
    }
}
