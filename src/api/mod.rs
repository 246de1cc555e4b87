use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::error::{GatewayError, ResolveError};
use crate::gateway::{Entity, FixtureWindow, FIXTURE_INCLUDES};
use crate::live_store::{record_key, LiveStore, Upsert};
use crate::models::Prediction;
use crate::ufp::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub live_matches: LiveStore,
    pub live_players: LiveStore,
}

/// Every route served, as reported by `GET /routes`.
const ROUTES: &[&str] = &[
    "GET /",
    "GET /routes",
    "GET /fixtures/today",
    "GET /fixtures/live",
    "GET /fixtures/date/:date",
    "GET /team/:team_id",
    "GET /player/:player_id",
    "GET /league/:league_id",
    "GET /standings/:season_id",
    "GET /ufp/:team_a/:team_b",
    "GET /predictions/today",
    "GET /predictions/live",
    "GET /predictions/date/:date",
    "POST /push/match",
    "POST /push/player",
    "GET /live/matches",
    "GET /live/matches/:id",
    "GET /live/players",
    "GET /live/players/:id",
];

/// Build the Axum router for the public API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/routes", get(routes_handler))
        .route("/fixtures/today", get(fixtures_today_handler))
        .route("/fixtures/live", get(fixtures_live_handler))
        .route("/fixtures/date/:date", get(fixtures_by_date_handler))
        .route("/team/:team_id", get(team_handler))
        .route("/player/:player_id", get(player_handler))
        .route("/league/:league_id", get(league_handler))
        .route("/standings/:season_id", get(standings_handler))
        .route("/ufp/:team_a/:team_b", get(ufp_handler))
        .route("/predictions/today", get(predictions_today_handler))
        .route("/predictions/live", get(predictions_live_handler))
        .route("/predictions/date/:date", get(predictions_by_date_handler))
        .route("/push/match", post(push_match_handler))
        .route("/push/player", post(push_player_handler))
        .route("/live/matches", get(live_matches_handler))
        .route("/live/matches/:id", get(live_match_handler))
        .route("/live/players", get(live_players_handler))
        .route("/live/players/:id", get(live_player_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

// ── Errors ────────────────────────────────────────────────────────────────────

pub enum ApiError {
    Gateway(GatewayError),
    TeamsNotFound { team_a: String, team_b: String },
    Missing(String),
    BadRequest(String),
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        ApiError::Gateway(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Gateway(e) => {
                warn!("Upstream call failed: {}", e);
                let body = json!({ "error": e.to_string(), "endpoint": e.endpoint() });
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            ApiError::TeamsNotFound { team_a, team_b } => {
                let body = json!({
                    "error": "One or both teams not found",
                    "team_a": team_a,
                    "team_b": team_b,
                });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::Missing(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

// ── Info ──────────────────────────────────────────────────────────────────────

/// GET /
async fn index_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "SportMonks Connector + UFP Live",
        "gateway": state.predictor.gateway().name(),
    }))
}

/// GET /routes
async fn routes_handler() -> Json<Value> {
    Json(json!({ "available_routes": ROUTES }))
}

// ── Pass-through lookups ──────────────────────────────────────────────────────

async fn fixtures_for(state: &AppState, window: FixtureWindow) -> ApiResult<Value> {
    Ok(state
        .predictor
        .gateway()
        .lookup(&window.endpoint(), FIXTURE_INCLUDES)
        .await?)
}

/// GET /fixtures/today
async fn fixtures_today_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let day = today();
    let fixtures = fixtures_for(&state, FixtureWindow::Date(day)).await?;
    Ok(Json(json!({ "date": day.to_string(), "fixtures": fixtures })))
}

/// GET /fixtures/live
async fn fixtures_live_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let fixtures = fixtures_for(&state, FixtureWindow::Live).await?;
    Ok(Json(json!({ "fixtures_live": fixtures })))
}

/// GET /fixtures/date/:date
async fn fixtures_by_date_handler(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<Value>> {
    let day = parse_date(&date)?;
    let fixtures = fixtures_for(&state, FixtureWindow::Date(day)).await?;
    Ok(Json(json!({ "date": day.to_string(), "fixtures": fixtures })))
}

/// GET /team/:team_id
async fn team_handler(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let data = state
        .predictor
        .gateway()
        .lookup(&format!("{}/{}", Entity::Team.path(), team_id), &["squad", "stats", "form"])
        .await?;
    Ok(Json(json!({ "team_id": team_id, "data": data })))
}

/// GET /player/:player_id
async fn player_handler(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let data = state
        .predictor
        .gateway()
        .lookup(&format!("{}/{}", Entity::Player.path(), player_id), &["stats", "team"])
        .await?;
    Ok(Json(json!({ "player_id": player_id, "data": data })))
}

/// GET /league/:league_id
async fn league_handler(
    State(state): State<Arc<AppState>>,
    Path(league_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let data = state
        .predictor
        .gateway()
        .lookup(
            &format!("{}/{}", Entity::League.path(), league_id),
            &["seasons", "currentSeason"],
        )
        .await?;
    Ok(Json(json!({ "league_id": league_id, "data": data })))
}

/// GET /standings/:season_id
async fn standings_handler(
    State(state): State<Arc<AppState>>,
    Path(season_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let standings = state
        .predictor
        .gateway()
        .lookup(
            &format!("standings/seasons/{}", season_id),
            &["standings.participants"],
        )
        .await?;
    // `league_id` is what existing clients of this route read.
    Ok(Json(json!({
        "season_id": season_id,
        "league_id": season_id,
        "standings": standings,
    })))
}

// ── Estimates ─────────────────────────────────────────────────────────────────

/// GET /ufp/:team_a/:team_b
async fn ufp_handler(
    State(state): State<Arc<AppState>>,
    Path((team_a, team_b)): Path<(String, String)>,
) -> ApiResult<Json<Prediction>> {
    match state.predictor.predict(&team_a, &team_b).await {
        Ok(p) => Ok(Json(p)),
        Err(ResolveError::NotFound(_)) => Err(ApiError::TeamsNotFound { team_a, team_b }),
        Err(ResolveError::Gateway(e)) => Err(e.into()),
    }
}

/// GET /predictions/today
async fn predictions_today_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let day = today();
    let predictions = state.predictor.aggregate(FixtureWindow::Date(day)).await?;
    Ok(Json(json!({ "date": day.to_string(), "predictions": predictions })))
}

/// GET /predictions/live
async fn predictions_live_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let predictions = state.predictor.aggregate(FixtureWindow::Live).await?;
    Ok(Json(json!({ "predictions_live": predictions })))
}

/// GET /predictions/date/:date
async fn predictions_by_date_handler(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<Value>> {
    let day = parse_date(&date)?;
    let predictions = state.predictor.aggregate(FixtureWindow::Date(day)).await?;
    Ok(Json(json!({ "date": day.to_string(), "predictions": predictions })))
}

// ── Pushed live data ──────────────────────────────────────────────────────────

async fn push_into(store: &LiveStore, payload: Value) -> ApiResult<Json<Value>> {
    let key = record_key(&payload)
        .ok_or_else(|| ApiError::BadRequest("payload needs a string or numeric `id`".into()))?;
    let status = match store.upsert(key.clone(), payload).await {
        Upsert::Inserted => "inserted",
        Upsert::Replaced => "replaced",
    };
    debug!("Pushed {} record {} ({} stored)", status, key, store.len().await);
    Ok(Json(json!({ "status": status, "id": key })))
}

async fn stored(store: &LiveStore, id: &str) -> ApiResult<Json<Value>> {
    store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::Missing(format!("no pushed record with id '{}'", id)))
}

/// POST /push/match
async fn push_match_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    push_into(&state.live_matches, payload).await
}

/// POST /push/player
async fn push_player_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    push_into(&state.live_players, payload).await
}

/// GET /live/matches
async fn live_matches_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "matches": state.live_matches.list().await }))
}

/// GET /live/matches/:id
async fn live_match_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    stored(&state.live_matches, &id).await
}

/// GET /live/players
async fn live_players_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "players": state.live_players.list().await }))
}

/// GET /live/players/:id
async fn live_player_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    stored(&state.live_players, &id).await
}
