use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::geo::GeoPoint;

pub type RouteId = i64;

/// Summary of a completed tracking session as it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub start_point: GeoPoint,
    pub end_point: GeoPoint,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub elapsed_millis: i64,
    pub distance_meters: f64,
    pub average_speed_kmh: f64,
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl RouteRecord {
    pub fn apply_details(&mut self, details: RouteDetails) {
        self.name = details.name;
        self.notes = details.notes;
    }
}

/// A record together with the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRoute {
    pub id: RouteId,
    #[serde(flatten)]
    pub record: RouteRecord,
}

/// The user-editable part of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
