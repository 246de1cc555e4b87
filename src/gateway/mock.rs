//! In-memory gateway for unit tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::provider::{DataGateway, Entity, FixtureWindow};
use crate::error::GatewayError;
use crate::models::{EntityId, SearchHit};

#[derive(Default)]
pub struct MockGateway {
    hits: HashMap<String, Vec<EntityId>>,
    details: HashMap<EntityId, Value>,
    failing_names: HashSet<String>,
    delays: HashMap<String, Duration>,
    fixtures: Vec<Value>,
    fixtures_down: bool,
    lookup_down: bool,
    detail_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a search hit for `name` (appended after earlier hits).
    pub fn with_team(mut self, name: &str, id: i64, detail: Value) -> Self {
        let id = EntityId::Int(id);
        self.hits.entry(name.to_string()).or_default().push(id.clone());
        self.details.insert(id, detail);
        self
    }

    pub fn failing_search(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    /// Hold every search for `name` for `delay` before answering.
    pub fn slow_search(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn with_fixtures(mut self, fixtures: Vec<Value>) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn fixtures_down(mut self) -> Self {
        self.fixtures_down = true;
        self
    }

    pub fn lookup_down(mut self) -> Self {
        self.lookup_down = true;
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, entity: Entity, name: &str) -> Result<Vec<SearchHit>, GatewayError> {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        let endpoint = format!("{}/search", entity.path());
        if self.failing_names.contains(name) {
            return Err(GatewayError::unavailable(&endpoint, "connection refused"));
        }
        Ok(self
            .hits
            .get(name)
            .map(|ids| {
                ids.iter()
                    .map(|id| SearchHit {
                        id: id.clone(),
                        attributes: json!({ "id": id, "name": name }),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn detail(
        &self,
        entity: Entity,
        id: &EntityId,
        _include: &[&str],
    ) -> Result<Value, GatewayError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::malformed(&format!("{}/{}", entity.path(), id), "no data"))
    }

    async fn fixtures(&self, window: FixtureWindow) -> Result<Vec<Value>, GatewayError> {
        if self.fixtures_down {
            return Err(GatewayError::unavailable(
                &window.endpoint(),
                "503 Service Unavailable",
            ));
        }
        Ok(self.fixtures.clone())
    }

    async fn lookup(&self, endpoint: &str, include: &[&str]) -> Result<Value, GatewayError> {
        if self.lookup_down {
            return Err(GatewayError::unavailable(endpoint, "timed out"));
        }
        Ok(json!({ "data": { "endpoint": endpoint, "include": include.join(",") } }))
    }
}
