use crate::error::SessionError;
use crate::tracking::distance::distance_meters;
use crate::types::geo::LocationSample;

/// Ordered sample log with a running path length.
#[derive(Debug, Clone, Default)]
pub struct TrackAccumulator {
    samples: Vec<LocationSample>,
    total_distance_m: f64,
}

impl TrackAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample, extending the running total by the segment from the
    /// previous sample. A sample older than the last one is rejected and the
    /// accumulator is left untouched.
    pub fn append(&mut self, sample: LocationSample) -> Result<(), SessionError> {
        if let Some(last) = self.samples.last() {
            if sample.timestamp_millis < last.timestamp_millis {
                return Err(SessionError::OutOfOrderSample {
                    last: last.timestamp_millis,
                    got: sample.timestamp_millis,
                });
            }
            self.total_distance_m += distance_meters(&last.point, &sample.point);
        }

        self.samples.push(sample);
        Ok(())
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_m
    }

    pub fn average_speed_kmh(&self, elapsed_millis: i64) -> f64 {
        if elapsed_millis <= 0 {
            return 0.0;
        }
        let hours = elapsed_millis as f64 / 3_600_000.0;
        (self.total_distance_m / 1000.0) / hours
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.total_distance_m = 0.0;
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&LocationSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
