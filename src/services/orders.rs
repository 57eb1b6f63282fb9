use crate::models::Order;
use super::storage::{SharedStorage, ORDERS_KEY};

/// Read-only view of the buyer's orders.
#[derive(Clone)]
pub struct OrderList {
    storage: SharedStorage,
}

impl OrderList {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Vec<Order> {
        let raw = match self.storage.get_item(ORDERS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read orders: {}", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding unparsable order list: {}", e);
            Vec::new()
        })
    }
}
