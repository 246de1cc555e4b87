use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default attack/defence figure used when the upstream detail omits one.
pub const DEFAULT_GOALS: f64 = 1.0;

/// Opaque upstream identifier. SportMonks hands out integers, but nothing in
/// the estimation flow depends on that, so strings are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl EntityId {
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Number(n) => n.as_i64().map(EntityId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(EntityId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of a name search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: EntityId,
    pub attributes: Value,
}

/// Attack/defence snapshot for a single team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub goals_scored: f64,
    pub goals_conceded: f64,
}

impl Default for TeamStats {
    fn default() -> Self {
        TeamStats {
            goals_scored: DEFAULT_GOALS,
            goals_conceded: DEFAULT_GOALS,
        }
    }
}

impl TeamStats {
    pub fn new(goals_scored: f64, goals_conceded: f64) -> Self {
        TeamStats {
            goals_scored,
            goals_conceded,
        }
    }

    /// Read goal figures out of a team detail's `stats` field.
    ///
    /// SportMonks v3 returns a list of per-season rows; the first object is
    /// used. Anything missing, negative or non-numeric falls back to
    /// [`DEFAULT_GOALS`].
    pub fn from_value(stats: &Value) -> Self {
        let row = match stats {
            Value::Array(rows) => rows.iter().find(|r| r.is_object()),
            Value::Object(_) => Some(stats),
            _ => None,
        };
        let Some(row) = row else {
            return TeamStats::default();
        };

        TeamStats::new(
            goal_figure(row, &["goals_scored", "goalsScored", "goals_for"]),
            goal_figure(row, &["goals_conceded", "goalsConceded", "goals_against"]),
        )
    }
}

fn goal_figure(row: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|k| {
            let v = &row[*k];
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .filter(|g: &f64| g.is_finite() && *g >= 0.0)
        .unwrap_or(DEFAULT_GOALS)
}

/// A team resolved from a free-text name.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRecord {
    pub id: EntityId,
    /// Name as the caller typed it, not the upstream canonical name.
    pub name: String,
    pub stats: TeamStats,
    #[serde(rename = "recent_form")]
    pub form: Vec<String>,
    pub injuries: Vec<Value>,
}

impl TeamRecord {
    /// Combine a search hit's id with the extended detail payload.
    pub fn from_detail(id: EntityId, name: &str, detail: &Value) -> Self {
        let form = detail["form"]
            .as_array()
            .map(|entries| entries.iter().filter_map(form_code).collect())
            .unwrap_or_default();
        let injuries = detail["injuries"].as_array().cloned().unwrap_or_default();

        TeamRecord {
            id,
            name: name.to_string(),
            stats: TeamStats::from_value(&detail["stats"]),
            form,
            injuries,
        }
    }
}

fn form_code(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => entry["form"]
            .as_str()
            .or_else(|| entry["result"].as_str())
            .map(str::to_string),
        _ => None,
    }
}

/// Home/away pair of whole goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

/// Outcome bundle for one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEstimate {
    pub home_win: f64,
    /// `1 - home_win - away_win` after rounding, floored at zero. When the two
    /// rounded win figures reach 1.01 the floor wins over the subtraction.
    pub draw: f64,
    pub away_win: f64,
    pub both_teams_to_score: bool,
    pub over_2_5: bool,
    pub predicted_score: Scoreline,
    pub expected_goals: ExpectedGoals,
}

/// Response record for a single pairwise estimation.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    #[serde(rename = "match")]
    pub match_label: String,
    pub team_a: TeamRecord,
    pub team_b: TeamRecord,
    pub estimate: MatchEstimate,
}

/// A scheduled or in-play match as listed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub league: Option<String>,
}

impl Fixture {
    pub fn label(&self) -> String {
        match_label(&self.home, &self.away)
    }
}

pub fn match_label(home: &str, away: &str) -> String {
    format!("{} vs {}", home, away)
}
