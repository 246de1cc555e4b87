use futures_util::future::join;
use std::sync::Arc;
use tracing::info;

use super::estimator::estimate;
use super::resolver::resolve;
use crate::error::ResolveError;
use crate::gateway::DataGateway;
use crate::models::{match_label, Prediction, TeamRecord};

/// Entry point for pairwise and batch estimation over a shared gateway.
#[derive(Clone)]
pub struct Predictor {
    pub(super) gateway: Arc<dyn DataGateway>,
    /// Fixtures resolved at once in batch mode.
    pub(super) concurrency: usize,
}

impl Predictor {
    pub fn new(gateway: Arc<dyn DataGateway>, concurrency: usize) -> Self {
        Predictor {
            gateway,
            concurrency: concurrency.max(1),
        }
    }

    pub fn gateway(&self) -> &dyn DataGateway {
        self.gateway.as_ref()
    }

    pub async fn resolve(&self, name: &str) -> Result<TeamRecord, ResolveError> {
        resolve(self.gateway.as_ref(), name).await
    }

    /// Resolve both teams (concurrently) and estimate the match.
    ///
    /// Both lookups always run to completion. A side that is not found wins
    /// over an upstream failure on the other side.
    pub async fn predict(&self, team_a: &str, team_b: &str) -> Result<Prediction, ResolveError> {
        let (a, b) = match join(self.resolve(team_a), self.resolve(team_b)).await {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e @ ResolveError::NotFound(_)), _) | (_, Err(e @ ResolveError::NotFound(_))) => {
                return Err(e)
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };
        let estimate = estimate(&a.stats, &b.stats);

        info!(
            "UFP {} vs {}: 1={:.2} X={:.2} 2={:.2} score={}",
            team_a,
            team_b,
            estimate.home_win,
            estimate.draw,
            estimate.away_win,
            estimate.predicted_score
        );

        Ok(Prediction {
            match_label: match_label(team_a, team_b),
            team_a: a,
            team_b: b,
            estimate,
        })
    }
}
