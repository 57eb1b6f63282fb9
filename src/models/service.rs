use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A service listed by the current seller, stored in the `userServices` list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,  // creation time in milliseconds
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: i64,
    pub delivery: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
