use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::provider::{DataGateway, Entity, FixtureWindow, FIXTURE_INCLUDES};
use crate::error::GatewayError;
use crate::models::{EntityId, SearchHit};

/// Gateway backed by the SportMonks football API.
/// Docs: <https://docs.sportmonks.com/football>
#[derive(Clone)]
pub struct SportmonksClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl SportmonksClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid SportMonks base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("SportMonks base URL cannot carry a path: {}", base_url);
        }
        Ok(SportmonksClient {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Full request URL with the credential appended. Never log the result.
    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(endpoint.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("api_token", &self.api_key);
        url
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, GatewayError> {
        let url = self.endpoint_url(endpoint, params);
        debug!("SportMonks GET {}", endpoint);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::unavailable(endpoint, e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::unavailable(endpoint, status));
        }

        resp.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::unavailable(endpoint, e.without_url())
            } else {
                GatewayError::malformed(endpoint, e.without_url())
            }
        })
    }
}

#[async_trait]
impl DataGateway for SportmonksClient {
    fn name(&self) -> &str {
        "SportMonks"
    }

    async fn search(&self, entity: Entity, name: &str) -> Result<Vec<SearchHit>, GatewayError> {
        let endpoint = format!("{}/search", entity.path());
        let body = self.get(&endpoint, &[("name", name)]).await?;
        parse_search(&endpoint, &body)
    }

    async fn detail(
        &self,
        entity: Entity,
        id: &EntityId,
        include: &[&str],
    ) -> Result<Value, GatewayError> {
        let endpoint = format!("{}/{}", entity.path(), id);
        let body = self.lookup(&endpoint, include).await?;
        match &body["data"] {
            Value::Object(_) => Ok(body["data"].clone()),
            _ => Err(GatewayError::malformed(&endpoint, "`data` object missing")),
        }
    }

    async fn fixtures(&self, window: FixtureWindow) -> Result<Vec<Value>, GatewayError> {
        let endpoint = window.endpoint();
        let body = self.lookup(&endpoint, FIXTURE_INCLUDES).await?;
        data_list(&endpoint, &body)
    }

    async fn lookup(&self, endpoint: &str, include: &[&str]) -> Result<Value, GatewayError> {
        if include.is_empty() {
            self.get(endpoint, &[]).await
        } else {
            let include = include.join(",");
            self.get(endpoint, &[("include", include.as_str())]).await
        }
    }
}

// ── Parsing helpers ────────────────────────────────────────────────────────────

/// The `data` list of a collection response. SportMonks omits `data` when a
/// query has no results, so absence reads as empty.
fn data_list(endpoint: &str, body: &Value) -> Result<Vec<Value>, GatewayError> {
    if !body.is_object() {
        return Err(GatewayError::malformed(endpoint, "expected a JSON object"));
    }
    match &body["data"] {
        Value::Null => Ok(vec![]),
        Value::Array(items) => Ok(items.clone()),
        _ => Err(GatewayError::malformed(endpoint, "`data` is not a list")),
    }
}

fn parse_search(endpoint: &str, body: &Value) -> Result<Vec<SearchHit>, GatewayError> {
    data_list(endpoint, body)?
        .into_iter()
        .map(|item| {
            let id = EntityId::from_value(&item["id"])
                .ok_or_else(|| GatewayError::malformed(endpoint, "search hit without `id`"))?;
            Ok(SearchHit {
                id,
                attributes: item,
            })
        })
        .collect()
}
