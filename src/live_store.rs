//! In-memory store for pushed live updates (matches, players).
//!
//! Records arrive out-of-band through the push endpoints and are upserted by
//! their external `id`: a known id is replaced in place, a new id is
//! appended. Listing returns records in first-seen order. The store is
//! unbounded unless built with a capacity, in which case the oldest record is
//! evicted to make room.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Thread-safe keyed store of pushed JSON records.
#[derive(Clone)]
pub struct LiveStore {
    label: &'static str,
    capacity: Option<usize>,
    inner: Arc<RwLock<Vec<LiveRecord>>>,
}

struct LiveRecord {
    key: String,
    payload: Value,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

impl LiveStore {
    /// `capacity == 0` means unbounded.
    pub fn new(label: &'static str, capacity: usize) -> Self {
        LiveStore {
            label,
            capacity: (capacity > 0).then_some(capacity),
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Insert or replace `payload` under `key`.
    pub async fn upsert(&self, key: String, payload: Value) -> Upsert {
        let mut records = self.inner.write().await;
        let now = Utc::now();

        if let Some(existing) = records.iter_mut().find(|r| r.key == key) {
            existing.payload = payload;
            existing.updated_at = now;
            debug!("{} store: replaced {}", self.label, key);
            return Upsert::Replaced;
        }

        if let Some(cap) = self.capacity {
            if records.len() >= cap {
                let evicted = records.remove(0);
                debug!(
                    "{} store full ({}), evicted {} (last update {})",
                    self.label, cap, evicted.key, evicted.updated_at
                );
            }
        }
        records.push(LiveRecord {
            key,
            payload,
            updated_at: now,
        });
        Upsert::Inserted
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let records = self.inner.read().await;
        records.iter().find(|r| r.key == key).map(|r| r.payload.clone())
    }

    pub async fn list(&self) -> Vec<Value> {
        let records = self.inner.read().await;
        records.iter().map(|r| r.payload.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// External identifier of a pushed record: its `id` field, string or number.
pub fn record_key(payload: &Value) -> Option<String> {
    match &payload["id"] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_appends_new_keys_in_order() {
        let store = LiveStore::new("match", 0);
        assert_eq!(store.upsert("1".into(), json!({ "id": 1 })).await, Upsert::Inserted);
        assert_eq!(store.upsert("2".into(), json!({ "id": 2 })).await, Upsert::Inserted);
        let ids: Vec<_> = store.list().await.iter().map(|v| v["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = LiveStore::new("match", 0);
        store.upsert("1".into(), json!({ "id": 1, "score": "0-0" })).await;
        store.upsert("2".into(), json!({ "id": 2 })).await;
        let r = store.upsert("1".into(), json!({ "id": 1, "score": "1-0" })).await;
        assert_eq!(r, Upsert::Replaced);
        assert_eq!(store.len().await, 2);

        let list = store.list().await;
        assert_eq!(list[0]["score"], "1-0");
        assert_eq!(store.get("1").await.unwrap()["score"], "1-0");
        assert!(store.get("3").await.is_none());
    }

    #[tokio::test]
    async fn test_bounded_store_evicts_oldest() {
        let store = LiveStore::new("player", 2);
        store.upsert("a".into(), json!({ "id": "a" })).await;
        store.upsert("b".into(), json!({ "id": "b" })).await;
        store.upsert("c".into(), json!({ "id": "c" })).await;
        assert_eq!(store.len().await, 2);
        assert!(store.get("a").await.is_none());
        assert!(store.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = LiveStore::new("match", 0);
        let other = store.clone();
        other.upsert("9".into(), json!({ "id": 9 })).await;
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_record_key() {
        assert_eq!(record_key(&json!({ "id": 42 })), Some("42".into()));
        assert_eq!(record_key(&json!({ "id": " m-1 " })), Some("m-1".into()));
        assert_eq!(record_key(&json!({ "id": "" })), None);
        assert_eq!(record_key(&json!({ "name": "x" })), None);
    }
}
