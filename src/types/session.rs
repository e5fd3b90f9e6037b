use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::geo::{GeoPoint, LocationSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    PointsSelected,
    Tracking,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::PointsSelected => "points_selected",
            SessionState::Tracking => "tracking",
            SessionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Metrics captured at the instant tracking stopped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrozenMetrics {
    pub elapsed_millis: i64,
    pub distance_meters: f64,
    pub average_speed_kmh: f64,
}

/// Consistent read-only copy of the session, taken under the session lock.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub start_point: Option<GeoPoint>,
    pub end_point: Option<GeoPoint>,
    pub current_location: Option<LocationSample>,
    pub start_time_millis: Option<i64>,
    pub sample_count: usize,
    pub elapsed_millis: i64,
    pub distance_meters: f64,
    pub average_speed_kmh: f64,
}

impl SessionSnapshot {
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Tracking
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub elapsed: String,
    pub distance: String,
    pub speed: String,
}
