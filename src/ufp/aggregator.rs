//! Batch estimation over a day's (or the live) fixture list.
//!
//! One fixture failing to resolve never blocks the rest: its error is
//! embedded in that fixture's entry. Entries come back in the order the
//! gateway listed the fixtures, even when several resolve concurrently.

use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::predictor::Predictor;
use crate::error::{GatewayError, ResolveError};
use crate::gateway::FixtureWindow;
use crate::models::{Fixture, Prediction};

/// One fixture's slot in a batch result.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionEntry {
    pub league: Option<String>,
    #[serde(rename = "match")]
    pub match_label: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    Prediction(Prediction),
    Error { kind: String, message: String },
}

impl PredictionEntry {
    fn new(fixture: &Fixture, outcome: Result<Prediction, ResolveError>) -> Self {
        let outcome = match outcome {
            Ok(p) => EntryOutcome::Prediction(p),
            Err(e) => EntryOutcome::Error {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        };
        PredictionEntry {
            league: fixture.league.clone(),
            match_label: fixture.label(),
            outcome,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Error { .. })
    }
}

impl Predictor {
    /// Lazily estimate each fixture, up to `concurrency` at a time.
    pub fn predict_fixtures(
        &self,
        fixtures: Vec<Fixture>,
    ) -> impl Stream<Item = PredictionEntry> + '_ {
        stream::iter(fixtures)
            .map(move |fixture| async move {
                let outcome = self.predict(&fixture.home, &fixture.away).await;
                if let Err(e) = &outcome {
                    warn!("Skipping estimate for {}: {}", fixture.label(), e);
                }
                PredictionEntry::new(&fixture, outcome)
            })
            .buffered(self.concurrency)
    }

    /// Fetch the fixture list for `window` and estimate every listed match.
    ///
    /// Only a failure to fetch the list itself is an error.
    pub async fn aggregate(&self, window: FixtureWindow) -> Result<Vec<PredictionEntry>, GatewayError> {
        let raw = self.gateway.fixtures(window).await?;
        let fixtures: Vec<Fixture> = raw.iter().filter_map(parse_fixture).collect();
        info!(
            "Estimating {} of {} fixtures ({:?})",
            fixtures.len(),
            raw.len(),
            window
        );

        let entries: Vec<PredictionEntry> = self.predict_fixtures(fixtures).collect().await;
        let failed = entries.iter().filter(|e| e.is_error()).count();
        if failed > 0 {
            warn!("{} of {} fixture estimates failed", failed, entries.len());
        }
        Ok(entries)
    }
}

// ── Parsing helpers ────────────────────────────────────────────────────────────

/// Read team names and league out of a raw fixture object.
///
/// Accepts the `localTeam` / `visitorTeam` includes (optionally wrapped in
/// `data`) as well as a `participants` list tagged with `meta.location`.
/// Returns `None` when either team name is missing, empty or only
/// whitespace; a whitespace-only name can never resolve, so it is skipped
/// along with the empty ones.
pub fn parse_fixture(raw: &Value) -> Option<Fixture> {
    let (home, away) = local_visitor(raw).or_else(|| participants(raw))?;
    let league = name_of(&raw["league"]).map(str::to_string);
    Some(Fixture { home, away, league })
}

fn name_of(v: &Value) -> Option<&str> {
    v["name"]
        .as_str()
        .or_else(|| v["data"]["name"].as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn local_visitor(raw: &Value) -> Option<(String, String)> {
    let home = name_of(&raw["localTeam"])?;
    let away = name_of(&raw["visitorTeam"])?;
    Some((home.to_string(), away.to_string()))
}

fn participants(raw: &Value) -> Option<(String, String)> {
    let list = raw["participants"].as_array()?;
    let side = |location: &str| {
        list.iter()
            .find(|p| p["meta"]["location"].as_str() == Some(location))
            .and_then(name_of)
    };
    Some((side("home")?.to_string(), side("away")?.to_string()))
}
