use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::AppState;
use crate::types::geo::LocationSample;

/// Spawns the task that moves samples from a location provider into the
/// session. Providers push into the returned sender from any thread; the
/// task ends once every sender has been dropped.
///
/// A silent provider is not an error. When samples resume after more than
/// `gap_threshold_ms`, the gap is logged.
pub fn spawn_location_feed(
    state: AppState,
    capacity: usize,
    gap_threshold_ms: i64,
) -> (mpsc::Sender<LocationSample>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<LocationSample>(capacity.max(1));

    let handle = tokio::spawn(async move {
        let mut last_timestamp: Option<i64> = None;

        while let Some(sample) = rx.recv().await {
            if let Some(last) = last_timestamp {
                let gap = sample.timestamp_millis.saturating_sub(last);
                if gap > gap_threshold_ms {
                    tracing::info!("Location stream resumed after {} ms", gap);
                }
            }

            match state.record_sample(sample) {
                Ok(_) => {
                    last_timestamp = Some(sample.timestamp_millis);
                }
                Err(err) => {
                    tracing::warn!("Dropped location sample: {}", err);
                }
            }
        }

        tracing::debug!("Location feed closed");
    });

    (tx, handle)
}
