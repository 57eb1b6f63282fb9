use serde::{Deserialize, Serialize};

use super::lenient;

/// A buyer's order as stored under `userOrders`. Nothing here writes orders.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub seller_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl Order {
    /// Status used for the badge, `pending` when none was recorded.
    pub fn status_or_pending(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => "pending",
        }
    }
}
