use chrono::{DateTime, Duration, Utc};

use crate::error::SessionError;
use crate::tracking::session::TrackSession;
use crate::types::route::{RouteDetails, RouteRecord};
use crate::types::session::SessionState;

/// Builds the record for a stopped session. The session itself is not
/// touched; it moves on only once the store has accepted the record.
pub fn build_route_record(
    session: &TrackSession,
    details: RouteDetails,
) -> Result<RouteRecord, SessionError> {
    if session.state() != SessionState::Stopped {
        return Err(SessionError::InvalidTransition {
            action: "save",
            state: session.state(),
        });
    }

    let start_point = session
        .start_point()
        .ok_or(SessionError::InvalidRecord("start point is not set"))?;
    let end_point = session
        .end_point()
        .ok_or(SessionError::InvalidRecord("end point is not set"))?;
    let metrics = session
        .frozen_metrics()
        .ok_or(SessionError::InvalidRecord("session has no frozen metrics"))?;

    if metrics.elapsed_millis <= 0 {
        return Err(SessionError::InvalidRecord("elapsed time must be positive"));
    }

    let start_time = session
        .start_time_millis()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or(SessionError::InvalidRecord("start time is out of range"))?;
    let end_time = start_time + Duration::milliseconds(metrics.elapsed_millis);

    Ok(RouteRecord {
        start_point,
        end_point,
        start_time,
        end_time,
        elapsed_millis: metrics.elapsed_millis,
        distance_meters: metrics.distance_meters.max(0.0),
        average_speed_kmh: metrics.average_speed_kmh.max(0.0),
        name: details.name,
        notes: details.notes,
    })
}
