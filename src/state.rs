use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::clock::{Clock, SystemClock};
use crate::error::{AppError, SessionError};
use crate::store::RouteStore;
use crate::tracking::record::build_route_record;
use crate::tracking::session::{SampleOutcome, TrackSession};
use crate::types::geo::{GeoPoint, LocationSample};
use crate::types::route::{RouteDetails, StoredRoute};
use crate::types::session::{FrozenMetrics, SessionSnapshot};

/// Owner of the one live tracking session plus the route store.
///
/// Every mutation of the session happens under `session`; each one
/// publishes a fresh snapshot to watchers afterwards.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<TrackSession>>,
    store: Arc<dyn RouteStore>,
    clock: Arc<dyn Clock>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
    save_gate: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RouteStore>, clock: Arc<dyn Clock>) -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());
        Self {
            session: Arc::new(Mutex::new(TrackSession::new())),
            store,
            clock,
            snapshots: Arc::new(snapshots),
            save_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn RouteStore> {
        &self.store
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// No code path panics while holding the lock, so a poisoned lock still
    /// guards a consistent session.
    fn session(&self) -> MutexGuard<'_, TrackSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the session under the lock, then publishes the
    /// resulting snapshot whatever `f` returned.
    fn mutate<T>(&self, f: impl FnOnce(&mut TrackSession, i64) -> T) -> T {
        let now = self.now_millis();
        let (result, snapshot) = {
            let mut session = self.session();
            let result = f(&mut session, now);
            (result, session.snapshot(now))
        };
        self.snapshots.send_replace(snapshot);
        result
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let now = self.now_millis();
        self.session().snapshot(now)
    }

    pub fn track(&self) -> Vec<LocationSample> {
        self.session().track().samples().to_vec()
    }

    /// Watch channel carrying the snapshot taken after the latest mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn set_start_point(&self, point: GeoPoint) -> Result<(), SessionError> {
        self.mutate(|session, _| session.set_start_point(point))
    }

    pub fn set_end_point(&self, point: GeoPoint) -> Result<(), SessionError> {
        self.mutate(|session, _| session.set_end_point(point))
    }

    pub fn start(&self) -> Result<(), SessionError> {
        self.mutate(|session, now| session.start(now))
    }

    pub fn record_sample(&self, sample: LocationSample) -> Result<SampleOutcome, SessionError> {
        self.mutate(|session, _| session.on_sample(sample))
    }

    pub fn stop(&self) -> Result<FrozenMetrics, SessionError> {
        self.mutate(|session, now| session.stop(now))
    }

    pub fn discard(&self) -> Result<(), SessionError> {
        self.mutate(|session, _| session.discard())
    }

    pub fn reset(&self) {
        self.mutate(|session, _| session.reset());
        tracing::info!("Session reset");
    }

    /// Persists the stopped session and returns it to idle. On a store
    /// failure the session stays stopped so the save can be retried or the
    /// session discarded.
    pub async fn save(&self, details: RouteDetails) -> Result<StoredRoute, AppError> {
        let _gate = self.save_gate.lock().await;

        let (record, generation) = {
            let session = self.session();
            (build_route_record(&session, details)?, session.generation())
        };

        let id = self.store.insert(record.clone()).await.map_err(|err| {
            tracing::error!("Failed to save route: {}", err);
            err
        })?;

        let finished = self.mutate(|session, _| session.finish_save(generation));
        if !finished {
            tracing::warn!("Route {} saved after the session had already moved on", id);
        }
        tracing::info!(
            "Saved route {} ({:.2} km in {} ms)",
            id,
            record.distance_meters / 1000.0,
            record.elapsed_millis
        );

        Ok(StoredRoute { id, record })
    }
}
