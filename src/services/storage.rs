use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::StorageError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const SERVICES_KEY: &str = "userServices";
pub const ORDERS_KEY: &str = "userOrders";

/// String key-value storage with the shape of the browser's `localStorage`.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Arc<dyn Storage>;

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Redis-backed storage; every key lives under `<namespace>:`.
pub struct RedisStorage {
    client: Arc<Client>,
    namespace: String,
}

impl RedisStorage {
    pub fn new(client: Arc<Client>, namespace: impl Into<String>) -> Self {
        Self { client, namespace: namespace.into() }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(self.key(key), value).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_async_connection().await?;
        conn.del::<_, ()>(self.key(key)).await?;
        Ok(())
    }
}

impl Clone for RedisStorage {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            namespace: self.namespace.clone(),
        }
    }
}
