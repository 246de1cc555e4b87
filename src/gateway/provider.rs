use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::GatewayError;
use crate::models::{EntityId, SearchHit};

/// Entity collections exposed by the upstream sports-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Team,
    Player,
    League,
    Fixture,
}

impl Entity {
    pub fn path(self) -> &'static str {
        match self {
            Entity::Team => "teams",
            Entity::Player => "players",
            Entity::League => "leagues",
            Entity::Fixture => "fixtures",
        }
    }
}

/// Includes requested alongside every fixture list.
pub const FIXTURE_INCLUDES: &[&str] = &["localTeam", "visitorTeam", "league"];

/// Which fixture list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureWindow {
    Date(NaiveDate),
    Live,
}

impl FixtureWindow {
    pub fn endpoint(self) -> String {
        match self {
            FixtureWindow::Date(day) => {
                format!("{}/date/{}", Entity::Fixture.path(), day.format("%Y-%m-%d"))
            }
            FixtureWindow::Live => format!("{}/live", Entity::Fixture.path()),
        }
    }
}

/// Trait that every upstream sports-data gateway must implement.
///
/// Every method is a single attempt; implementations must bound each call
/// with a timeout and report failures as [`GatewayError`] instead of
/// panicking.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Name search, results in the gateway's own order.
    async fn search(&self, entity: Entity, name: &str) -> Result<Vec<SearchHit>, GatewayError>;

    /// Extended attributes for one entity, with the requested includes.
    async fn detail(
        &self,
        entity: Entity,
        id: &EntityId,
        include: &[&str],
    ) -> Result<Value, GatewayError>;

    /// Raw fixture objects for a day or for the live window.
    async fn fixtures(&self, window: FixtureWindow) -> Result<Vec<Value>, GatewayError>;

    /// Untouched response body for a pass-through lookup.
    async fn lookup(&self, endpoint: &str, include: &[&str]) -> Result<Value, GatewayError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
