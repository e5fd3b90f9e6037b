use crate::error::SessionError;
use crate::tracking::accumulator::TrackAccumulator;
use crate::types::geo::{GeoPoint, LocationSample};
use crate::types::session::{FrozenMetrics, SessionSnapshot, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Appended to the track.
    Recorded,
    /// Only updated the current location; the session is not tracking.
    Observed,
}

/// The tracking session aggregate.
///
/// Not synchronized on its own: callers that share it between a location
/// producer and readers must hold it behind a single lock (see
/// [`crate::state::AppState`]).
#[derive(Debug, Default)]
pub struct TrackSession {
    state: SessionState,
    start_point: Option<GeoPoint>,
    end_point: Option<GeoPoint>,
    current_location: Option<LocationSample>,
    start_time_millis: Option<i64>,
    track: TrackAccumulator,
    frozen: Option<FrozenMetrics>,
    generation: u64,
}

impl TrackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn start_point(&self) -> Option<GeoPoint> {
        self.start_point
    }

    pub fn end_point(&self) -> Option<GeoPoint> {
        self.end_point
    }

    pub fn start_time_millis(&self) -> Option<i64> {
        self.start_time_millis
    }

    pub fn frozen_metrics(&self) -> Option<FrozenMetrics> {
        self.frozen
    }

    pub fn track(&self) -> &TrackAccumulator {
        &self.track
    }

    /// Bumped on every start and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_start_point(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.ensure_selectable("set start point")?;
        ensure_valid(&point)?;
        self.start_point = Some(point);
        self.state = SessionState::PointsSelected;
        Ok(())
    }

    pub fn set_end_point(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        self.ensure_selectable("set end point")?;
        ensure_valid(&point)?;
        self.end_point = Some(point);
        self.state = SessionState::PointsSelected;
        Ok(())
    }

    fn ensure_selectable(&self, action: &'static str) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle | SessionState::PointsSelected => Ok(()),
            state => Err(SessionError::InvalidTransition { action, state }),
        }
    }

    pub fn start(&mut self, now_millis: i64) -> Result<(), SessionError> {
        match self.state {
            SessionState::Tracking => return Ok(()),
            SessionState::Stopped => {
                return Err(SessionError::InvalidTransition {
                    action: "start",
                    state: self.state,
                })
            }
            SessionState::Idle | SessionState::PointsSelected => {}
        }

        if self.start_point.is_none() || self.end_point.is_none() {
            return Err(SessionError::MissingEndpoints);
        }

        self.track.clear();
        self.frozen = None;
        self.start_time_millis = Some(now_millis);
        self.generation += 1;
        self.state = SessionState::Tracking;
        tracing::info!(generation = self.generation, "Tracking started");
        Ok(())
    }

    /// Feeds one location reading. While tracking it is appended to the
    /// track. An out-of-order reading or one with an impossible coordinate
    /// is rejected and leaves everything, including the current location,
    /// as it was.
    pub fn on_sample(&mut self, sample: LocationSample) -> Result<SampleOutcome, SessionError> {
        ensure_valid(&sample.point)?;

        if self.state != SessionState::Tracking {
            self.current_location = Some(sample);
            return Ok(SampleOutcome::Observed);
        }

        self.track.append(sample)?;
        self.current_location = Some(sample);
        Ok(SampleOutcome::Recorded)
    }

    /// Ends data collection and freezes the metrics. Stopping an already
    /// stopped session returns the metrics frozen the first time.
    pub fn stop(&mut self, now_millis: i64) -> Result<FrozenMetrics, SessionError> {
        match self.state {
            SessionState::Tracking => {}
            SessionState::Stopped => return Ok(self.frozen.unwrap_or_default()),
            state => {
                return Err(SessionError::InvalidTransition {
                    action: "stop",
                    state,
                })
            }
        }

        let elapsed_millis = self.elapsed_since_start(now_millis);
        let metrics = FrozenMetrics {
            elapsed_millis,
            distance_meters: self.track.total_distance_meters(),
            average_speed_kmh: self.track.average_speed_kmh(elapsed_millis),
        };

        self.frozen = Some(metrics);
        self.state = SessionState::Stopped;
        tracing::info!(
            elapsed_ms = metrics.elapsed_millis,
            distance_m = metrics.distance_meters,
            samples = self.track.len(),
            "Tracking stopped"
        );
        Ok(metrics)
    }

    pub fn discard(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Stopped {
            return Err(SessionError::InvalidTransition {
                action: "discard",
                state: self.state,
            });
        }
        self.reset();
        Ok(())
    }

    /// Completes a save started from `generation`. Returns false when the
    /// session moved on in the meantime (reset, discarded or restarted), in
    /// which case nothing changes.
    pub fn finish_save(&mut self, generation: u64) -> bool {
        if self.state != SessionState::Stopped || self.generation != generation {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.start_point = None;
        self.end_point = None;
        self.start_time_millis = None;
        self.track.clear();
        self.frozen = None;
        self.generation += 1;
    }

    /// Live metrics while tracking, frozen ones once stopped, zeros otherwise.
    pub fn metrics(&self, now_millis: i64) -> FrozenMetrics {
        match self.state {
            SessionState::Tracking => {
                let elapsed_millis = self.elapsed_since_start(now_millis);
                FrozenMetrics {
                    elapsed_millis,
                    distance_meters: self.track.total_distance_meters(),
                    average_speed_kmh: self.track.average_speed_kmh(elapsed_millis),
                }
            }
            SessionState::Stopped => self.frozen.unwrap_or_default(),
            SessionState::Idle | SessionState::PointsSelected => FrozenMetrics::default(),
        }
    }

    pub fn snapshot(&self, now_millis: i64) -> SessionSnapshot {
        let metrics = self.metrics(now_millis);
        SessionSnapshot {
            state: self.state,
            start_point: self.start_point,
            end_point: self.end_point,
            current_location: self.current_location,
            start_time_millis: self.start_time_millis,
            sample_count: self.track.len(),
            elapsed_millis: metrics.elapsed_millis,
            distance_meters: metrics.distance_meters,
            average_speed_kmh: metrics.average_speed_kmh,
        }
    }

    fn elapsed_since_start(&self, now_millis: i64) -> i64 {
        self.start_time_millis
            .map(|start| now_millis.saturating_sub(start).max(0))
            .unwrap_or(0)
    }
}

fn ensure_valid(point: &GeoPoint) -> Result<(), SessionError> {
    if !point.is_valid() {
        return Err(SessionError::InvalidCoordinate {
            lat: point.lat,
            lon: point.lon,
        });
    }
    Ok(())
}
