use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::tracking::format::{display_metrics, format_date};
use crate::types::route::{RouteDetails, RouteId, StoredRoute};
use crate::types::session::{DisplayMetrics, FrozenMetrics};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/routes", get(list))
        .route(
            "/api/routes/:id",
            get(fetch).patch(update_details).delete(remove),
        )
}

#[derive(Serialize, Deserialize)]
pub struct RouteView {
    #[serde(flatten)]
    pub route: StoredRoute,
    pub display: RouteDisplay,
}

#[derive(Serialize, Deserialize)]
pub struct RouteDisplay {
    pub date: String,
    #[serde(flatten)]
    pub metrics: DisplayMetrics,
}

impl From<StoredRoute> for RouteView {
    fn from(route: StoredRoute) -> Self {
        let metrics = display_metrics(&FrozenMetrics {
            elapsed_millis: route.record.elapsed_millis,
            distance_meters: route.record.distance_meters,
            average_speed_kmh: route.record.average_speed_kmh,
        });
        let display = RouteDisplay {
            date: format_date(&route.record.start_time),
            metrics,
        };
        Self { route, display }
    }
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<RouteView>>, AppError> {
    let routes = state.store().list_all().await?;
    Ok(Json(routes.into_iter().map(RouteView::from).collect()))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<Json<RouteView>, AppError> {
    let route = state
        .store()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("route {}", id)))?;
    Ok(Json(route.into()))
}

async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
    Json(details): Json<RouteDetails>,
) -> Result<Json<RouteView>, AppError> {
    let route = state
        .store()
        .update_details(id, details)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("route {}", id)))?;
    Ok(Json(route.into()))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<RouteId>,
) -> Result<StatusCode, AppError> {
    if !state.store().delete_by_id(id).await? {
        return Err(AppError::NotFound(format!("route {}", id)));
    }
    tracing::info!("Deleted route {}", id);
    Ok(StatusCode::NO_CONTENT)
}
