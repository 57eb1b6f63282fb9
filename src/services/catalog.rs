use chrono::{DateTime, Utc};
use std::collections::HashSet;
use serde_json::{Map, Value};

use crate::errors::{StoreResult, ValidationError};
use crate::models::{Service, ServiceForm};
use super::storage::{SharedStorage, SERVICES_KEY};

pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this service? This action cannot be undone.";

/// Source of the yes/no answer a delete needs.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Removed,
    NotFound,
}

fn record_id(record: &Value) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// The seller's services, stored as one JSON list that is rewritten whole on
/// every change.
///
/// Records are kept as raw JSON between reads and writes so that entries this
/// build cannot decode are written back untouched.
#[derive(Clone)]
pub struct ServiceCatalog {
    storage: SharedStorage,
}

impl ServiceCatalog {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    async fn load_records(&self) -> Vec<Value> {
        let raw = match self.storage.get_item(SERVICES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read services: {}", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding unparsable service list: {}", e);
            Vec::new()
        })
    }

    /// Every stored service that decodes; odd records are skipped, not dropped.
    pub async fn load(&self) -> Vec<Service> {
        decode_all(&self.load_records().await)
    }

    pub async fn find(&self, id: i64) -> Option<Service> {
        self.load().await.into_iter().find(|s| s.id == id)
    }

    async fn persist(&self, records: &[Value]) -> StoreResult<()> {
        let data = serde_json::to_string(records)?;
        self.storage.set_item(SERVICES_KEY, &data).await?;
        Ok(())
    }

    pub async fn create(&self, form: &ServiceForm) -> StoreResult<Service> {
        let fields = form.validate()?;
        let mut records = self.load_records().await;

        let services = decode_all(&records);
        if services.iter().any(|s| s.title == fields.title && s.price == fields.price) {
            return Err(ValidationError::DuplicateService.into());
        }

        let now = Utc::now();
        // Two creates inside one millisecond must still get distinct ids
        let taken: HashSet<i64> = records.iter().filter_map(record_id).collect();
        let millis = now.timestamp_millis();
        let id = match taken.iter().max().copied().unwrap_or(0).checked_add(1) {
            Some(next) => millis.max(next),
            None => (millis..i64::MAX).find(|c| !taken.contains(c)).unwrap_or(millis),
        };

        let service = Service {
            id,
            title: fields.title,
            category: fields.category,
            description: fields.description,
            price: fields.price,
            delivery: fields.delivery,
            image: fields.image,
            created_at: Some(now),
            updated_at: Some(now),
        };
        records.push(serde_json::to_value(&service)?);
        self.persist(&records).await?;

        tracing::info!("Created service {} ({})", service.id, service.title);
        Ok(service)
    }

    /// Returns `Ok(None)` without writing when no service has `id`.
    pub async fn update(&self, id: i64, form: &ServiceForm) -> StoreResult<Option<Service>> {
        let fields = form.validate()?;
        let mut records = self.load_records().await;

        let Some(record) = records.iter_mut().find(|r| record_id(r) == Some(id)) else {
            tracing::debug!("Service {} not found, nothing updated", id);
            return Ok(None);
        };
        let created_at = record
            .get("createdAt")
            .cloned()
            .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v).ok());
        let updated = Service {
            id,
            title: fields.title,
            category: fields.category,
            description: fields.description,
            price: fields.price,
            delivery: fields.delivery,
            image: fields.image,
            created_at,
            updated_at: Some(Utc::now()),
        };

        // Keys this build does not know about stay on the record
        let mut merged = match record.take() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Value::Object(fresh) = serde_json::to_value(&updated)? {
            merged.extend(fresh);
        }
        if created_at.is_none() {
            merged.remove("createdAt");
        }
        *record = Value::Object(merged);

        self.persist(&records).await?;
        tracing::info!("Updated service {}", id);
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i64, confirm: &mut impl Confirm) -> StoreResult<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        let mut records = self.load_records().await;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            tracing::debug!("Service {} not found, nothing deleted", id);
            return Ok(DeleteOutcome::NotFound);
        }

        self.persist(&records).await?;
        tracing::info!("Deleted service {}", id);
        Ok(DeleteOutcome::Removed)
    }
}

fn decode_all(records: &[Value]) -> Vec<Service> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_value::<Service>(record.clone()) {
            Ok(service) => Some(service),
            Err(e) => {
                tracing::warn!("Skipping service record {:?}: {}", record_id(record), e);
                None
            }
        })
        .collect()
}
