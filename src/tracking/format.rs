//! Display strings for metrics. Never feed these back into stored values.

use chrono::{DateTime, Utc};

use crate::types::session::{DisplayMetrics, FrozenMetrics};

pub fn format_elapsed(elapsed_millis: i64) -> String {
    let total_seconds = elapsed_millis.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn format_distance(distance_meters: f64) -> String {
    if distance_meters < 1000.0 {
        format!("{:.0} m", distance_meters)
    } else {
        format!("{:.2} km", distance_meters / 1000.0)
    }
}

pub fn format_speed(speed_kmh: f64) -> String {
    format!("{:.1} km/h", speed_kmh)
}

pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format("%b %d, %Y %H:%M").to_string()
}

pub fn display_metrics(metrics: &FrozenMetrics) -> DisplayMetrics {
    DisplayMetrics {
        elapsed: format_elapsed(metrics.elapsed_millis),
        distance: format_distance(metrics.distance_meters),
        speed: format_speed(metrics.average_speed_kmh),
    }
}
