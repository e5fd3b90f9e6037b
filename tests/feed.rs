use std::sync::Arc;

use tracktimer::clock::ManualClock;
use tracktimer::state::AppState;
use tracktimer::store::MemoryRouteStore;
use tracktimer::tracking::feed::spawn_location_feed;
use tracktimer::types::geo::{GeoPoint, LocationSample};
use tracktimer::types::route::RouteDetails;
use tracktimer::types::session::SessionState;

const T0: i64 = 1_700_000_000_000;

fn tracking_state(clock: Arc<ManualClock>) -> AppState {
    let state = AppState::with_clock(Arc::new(MemoryRouteStore::new()), clock);
    state.set_start_point(GeoPoint::new(0.0, 0.0)).expect("start point");
    state.set_end_point(GeoPoint::new(0.0, 1.0)).expect("end point");
    state.start().expect("start");
    state
}

#[tokio::test]
async fn feed_applies_samples_in_order_and_drops_regressions() {
    let clock = Arc::new(ManualClock::new(T0));
    let state = tracking_state(clock.clone());
    let (tx, handle) = spawn_location_feed(state.clone(), 16, 10_000);

    for (lon, t) in [(0.0, T0), (0.5, T0 + 1000), (0.25, T0 + 500), (1.0, T0 + 2000)] {
        tx.send(LocationSample::new(GeoPoint::new(0.0, lon), t))
            .await
            .expect("send");
    }
    drop(tx);
    handle.await.expect("feed task");

    clock.set(T0 + 2000);
    let snapshot = state.snapshot();
    assert_eq!(snapshot.state, SessionState::Tracking);
    assert_eq!(snapshot.sample_count, 3);
    assert!((snapshot.distance_meters - 111_194.93).abs() < 1.0);
}

#[tokio::test]
async fn long_silence_is_not_an_error() {
    let clock = Arc::new(ManualClock::new(T0));
    let state = tracking_state(clock.clone());
    let (tx, handle) = spawn_location_feed(state.clone(), 4, 1_000);

    tx.send(LocationSample::new(GeoPoint::new(0.0, 0.0), T0))
        .await
        .expect("send");
    tx.send(LocationSample::new(GeoPoint::new(0.0, 0.1), T0 + 600_000))
        .await
        .expect("send after gap");
    drop(tx);
    handle.await.expect("feed task");

    assert_eq!(state.snapshot().sample_count, 2);
    assert_eq!(state.snapshot().state, SessionState::Tracking);
}

#[tokio::test]
async fn extreme_timestamp_does_not_stop_the_feed() {
    let clock = Arc::new(ManualClock::new(T0));
    let state = tracking_state(clock.clone());
    let (tx, handle) = spawn_location_feed(state.clone(), 8, 10_000);

    for (lon, t) in [(0.0, T0), (0.5, i64::MIN), (1.0, T0 + 2000)] {
        tx.send(LocationSample::new(GeoPoint::new(0.0, lon), t))
            .await
            .expect("send");
    }
    drop(tx);
    handle.await.expect("feed task survives");

    let snapshot = state.snapshot();
    assert_eq!(snapshot.sample_count, 2);
    assert!((snapshot.distance_meters - 111_194.93).abs() < 1.0);
}

#[tokio::test]
async fn invalid_points_from_the_feed_are_dropped() {
    let clock = Arc::new(ManualClock::new(T0));
    let store = MemoryRouteStore::new();
    let state = AppState::with_clock(Arc::new(store.clone()), clock.clone());
    state.set_start_point(GeoPoint::new(0.0, 0.0)).expect("start point");
    state.set_end_point(GeoPoint::new(0.0, 1.0)).expect("end point");
    state.start().expect("start");
    let (tx, handle) = spawn_location_feed(state.clone(), 8, 10_000);

    for (lat, lon, t) in [(0.0, 0.0, T0), (f64::NAN, 0.0, T0 + 1000), (0.0, 1.0, T0 + 2000)] {
        tx.send(LocationSample::new(GeoPoint::new(lat, lon), t))
            .await
            .expect("send");
    }
    drop(tx);
    handle.await.expect("feed task");

    let snapshot = state.snapshot();
    assert_eq!(snapshot.sample_count, 2);
    assert!(snapshot.distance_meters.is_finite());
    assert!((snapshot.distance_meters - 111_194.93).abs() < 1.0);

    clock.set(T0 + 2000);
    state.stop().expect("stop");
    let saved = state.save(RouteDetails::default()).await.expect("save");
    assert!((saved.record.distance_meters - 111_194.93).abs() < 1.0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn watchers_see_every_transition() {
    let clock = Arc::new(ManualClock::new(T0));
    let state = AppState::with_clock(Arc::new(MemoryRouteStore::new()), clock.clone());
    let mut rx = state.subscribe();
    assert_eq!(rx.borrow_and_update().state, SessionState::Idle);

    state.set_start_point(GeoPoint::new(0.0, 0.0)).expect("start point");
    rx.changed().await.expect("changed");
    assert_eq!(rx.borrow_and_update().state, SessionState::PointsSelected);

    state.set_end_point(GeoPoint::new(0.0, 1.0)).expect("end point");
    state.start().expect("start");
    rx.changed().await.expect("changed");
    let snapshot = rx.borrow_and_update().clone();
    assert!(snapshot.is_active());
    assert_eq!(snapshot.start_time_millis, Some(T0));

    clock.advance(5000);
    state.stop().expect("stop");
    rx.changed().await.expect("changed");
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.state, SessionState::Stopped);
    assert_eq!(snapshot.elapsed_millis, 5000);
}

#[tokio::test]
async fn watchers_see_reset() {
    let clock = Arc::new(ManualClock::new(T0));
    let state = tracking_state(clock.clone());
    let mut rx = state.subscribe();
    assert!(rx.borrow_and_update().is_active());

    state.reset();
    rx.changed().await.expect("changed");
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.state, SessionState::Idle);
    assert_eq!(snapshot.start_point, None);
    assert_eq!(snapshot.sample_count, 0);
}
