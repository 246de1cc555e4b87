use tracing::debug;

use crate::error::ResolveError;
use crate::gateway::{DataGateway, Entity};
use crate::models::TeamRecord;

/// Sub-resources requested with a resolved team's detail.
pub const TEAM_DETAIL_INCLUDES: &[&str] = &["stats", "form", "injuries"];

/// Resolve a free-text team name into a [`TeamRecord`].
///
/// The gateway's first search hit wins; there is no disambiguation, so an
/// ambiguous name resolves to whatever the gateway ranks first.
pub async fn resolve(gateway: &dyn DataGateway, name: &str) -> Result<TeamRecord, ResolveError> {
    let hits = gateway.search(Entity::Team, name).await?;
    let Some(first) = hits.into_iter().next() else {
        return Err(ResolveError::NotFound(name.to_string()));
    };

    debug!(
        "Resolved '{}' to team {} ({}) via {}",
        name,
        first.id,
        first.attributes["name"].as_str().unwrap_or("?"),
        gateway.name()
    );
    let detail = gateway
        .detail(Entity::Team, &first.id, TEAM_DETAIL_INCLUDES)
        .await?;

    Ok(TeamRecord::from_detail(first.id, name, &detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::models::{EntityId, TeamStats};
    use crate::gateway::mock::MockGateway;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_empty_search_is_not_found() {
        let gw = MockGateway::new();
        let err = resolve(&gw, "Atlantis FC").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(ref n) if n == "Atlantis FC"));
        assert_eq!(gw.detail_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_takes_first_hit() {
        let gw = MockGateway::new()
            .with_team("Arsenal", 1, json!({ "stats": { "goals_scored": 2.1, "goals_conceded": 0.8 }, "form": ["W", "W"] }))
            .with_team("Arsenal", 2, json!({ "stats": { "goals_scored": 0.1 } }));

        let rec = resolve(&gw, "Arsenal").await.unwrap();
        assert_eq!(rec.id, EntityId::Int(1));
        assert_eq!(rec.name, "Arsenal");
        assert_eq!(rec.stats, TeamStats::new(2.1, 0.8));
        assert_eq!(rec.form, vec!["W", "W"]);
        assert_eq!(gw.detail_calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_defaults_missing_fields() {
        let gw = MockGateway::new().with_team("Chelsea", 8, json!({}));
        let rec = resolve(&gw, "Chelsea").await.unwrap();
        assert_eq!(rec.stats, TeamStats::default());
        assert!(rec.form.is_empty());
        assert!(rec.injuries.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_propagates_gateway_failure() {
        let gw = MockGateway::new().failing_search("Leeds");
        let err = resolve(&gw, "Leeds").await.unwrap_err();
        assert!(matches!(err, ResolveError::Gateway(GatewayError::Unavailable { .. })));
    }
}
