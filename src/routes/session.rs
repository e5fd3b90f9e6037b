use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::tracking::format::display_metrics;
use crate::tracking::session::SampleOutcome;
use crate::types::geo::{GeoPoint, LocationSample};
use crate::types::route::{RouteDetails, StoredRoute};
use crate::types::session::{DisplayMetrics, FrozenMetrics, SessionSnapshot};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(current))
        .route("/api/session/track", get(track))
        .route("/api/session/start-point", post(set_start_point))
        .route("/api/session/end-point", post(set_end_point))
        .route("/api/session/start", post(start))
        .route("/api/session/stop", post(stop))
        .route("/api/session/reset", post(reset))
        .route("/api/session/discard", post(discard))
        .route("/api/session/samples", post(sample))
        .route("/api/session/save", post(save))
}

#[derive(Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub display: DisplayMetrics,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        let display = display_metrics(&FrozenMetrics {
            elapsed_millis: snapshot.elapsed_millis,
            distance_meters: snapshot.distance_meters,
            average_speed_kmh: snapshot.average_speed_kmh,
        });
        Self { snapshot, display }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PointRequest {
    lat: f64,
    lon: f64,
}

impl PointRequest {
    fn into_point(self) -> Result<GeoPoint, AppError> {
        let point = GeoPoint::new(self.lat, self.lon);
        if !point.is_valid() {
            return Err(AppError::BadRequest(format!(
                "Invalid coordinate: {}, {}",
                self.lat, self.lon
            )));
        }
        Ok(point)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SampleRequest {
    lat: f64,
    lon: f64,
    timestamp_millis: i64,
    accuracy_meters: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct SampleResponse {
    recorded: bool,
    warning: Option<String>,
    session: SessionView,
}

async fn current(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.snapshot().into())
}

async fn track(State(state): State<AppState>) -> Json<Vec<LocationSample>> {
    Json(state.track())
}

async fn set_start_point(
    State(state): State<AppState>,
    Json(request): Json<PointRequest>,
) -> Result<Json<SessionView>, AppError> {
    state.set_start_point(request.into_point()?)?;
    Ok(Json(state.snapshot().into()))
}

async fn set_end_point(
    State(state): State<AppState>,
    Json(request): Json<PointRequest>,
) -> Result<Json<SessionView>, AppError> {
    state.set_end_point(request.into_point()?)?;
    Ok(Json(state.snapshot().into()))
}

async fn start(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    state.start()?;
    Ok(Json(state.snapshot().into()))
}

async fn stop(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    state.stop()?;
    Ok(Json(state.snapshot().into()))
}

async fn reset(State(state): State<AppState>) -> Json<SessionView> {
    state.reset();
    Json(state.snapshot().into())
}

async fn discard(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    state.discard()?;
    Ok(Json(state.snapshot().into()))
}

async fn sample(
    State(state): State<AppState>,
    Json(request): Json<SampleRequest>,
) -> Result<Json<SampleResponse>, AppError> {
    let point = PointRequest {
        lat: request.lat,
        lon: request.lon,
    }
    .into_point()?;
    let sample = LocationSample {
        point,
        timestamp_millis: request.timestamp_millis,
        accuracy_meters: request.accuracy_meters,
    };

    // A regressing timestamp is a warning for the provider, not a failure.
    let (recorded, warning) = match state.record_sample(sample) {
        Ok(outcome) => (outcome == SampleOutcome::Recorded, None),
        Err(err) => {
            tracing::warn!("Dropped location sample: {}", err);
            (false, Some(err.to_string()))
        }
    };

    Ok(Json(SampleResponse {
        recorded,
        warning,
        session: state.snapshot().into(),
    }))
}

async fn save(
    State(state): State<AppState>,
    Json(details): Json<RouteDetails>,
) -> Result<Json<StoredRoute>, AppError> {
    let stored = state.save(details).await?;
    Ok(Json(stored))
}
