use chrono::{DateTime, Duration, Utc};
use tracktimer::store::{MemoryRouteStore, RouteStore, SqliteRouteStore};
use tracktimer::types::geo::GeoPoint;
use tracktimer::types::route::{RouteDetails, RouteRecord};

fn record(start_millis: i64, elapsed_millis: i64, name: Option<&str>) -> RouteRecord {
    let start_time = DateTime::<Utc>::from_timestamp_millis(start_millis).expect("timestamp");
    RouteRecord {
        start_point: GeoPoint::new(52.520008, 13.404954),
        end_point: GeoPoint::new(52.516275, 13.377704),
        start_time,
        end_time: start_time + Duration::milliseconds(elapsed_millis),
        elapsed_millis,
        distance_meters: 1_912.347_182_5,
        average_speed_kmh: 1_912.347_182_5 / 1000.0 / (elapsed_millis as f64 / 3_600_000.0),
        name: name.map(str::to_string),
        notes: None,
    }
}

async fn insert_and_read_back(store: &dyn RouteStore) {
    let original = record(1_700_000_000_123, 754_321, Some("Unter den Linden"));
    let id = store.insert(original.clone()).await.expect("insert");

    let stored = store.get_by_id(id).await.expect("get").expect("present");
    assert_eq!(stored.id, id);
    assert_eq!(stored.record.start_point, original.start_point);
    assert_eq!(stored.record.end_point, original.end_point);
    assert_eq!(stored.record.elapsed_millis, original.elapsed_millis);
    assert_eq!(stored.record.start_time, original.start_time);
    assert_eq!(stored.record.end_time, original.end_time);
    assert!((stored.record.distance_meters - original.distance_meters).abs() < 1e-9);
    assert!((stored.record.average_speed_kmh - original.average_speed_kmh).abs() < 1e-9);
    assert_eq!(stored.record.name.as_deref(), Some("Unter den Linden"));
}

async fn lists_most_recent_first(store: &dyn RouteStore) {
    let older = store.insert(record(1_000_000, 60_000, Some("older"))).await.expect("insert");
    let newest = store.insert(record(9_000_000, 60_000, Some("newest"))).await.expect("insert");
    let middle = store.insert(record(5_000_000, 60_000, Some("middle"))).await.expect("insert");

    let ids: Vec<i64> = store
        .list_all()
        .await
        .expect("list")
        .into_iter()
        .map(|route| route.id)
        .collect();
    assert_eq!(ids, vec![newest, middle, older]);
}

async fn delete_and_update(store: &dyn RouteStore) {
    let id = store.insert(record(1_000_000, 60_000, None)).await.expect("insert");

    let updated = store
        .update_details(
            id,
            RouteDetails {
                name: Some("Commute".to_string()),
                notes: Some("Headwind".to_string()),
            },
        )
        .await
        .expect("update")
        .expect("present");
    assert_eq!(updated.record.name.as_deref(), Some("Commute"));
    assert_eq!(updated.record.notes.as_deref(), Some("Headwind"));
    assert_eq!(updated.record.elapsed_millis, 60_000);

    assert!(store.delete_by_id(id).await.expect("delete"));
    assert!(store.get_by_id(id).await.expect("get").is_none());
    assert!(!store.delete_by_id(id).await.expect("second delete"));
    assert!(store
        .update_details(id, RouteDetails::default())
        .await
        .expect("update missing")
        .is_none());
}

#[tokio::test]
async fn memory_store_round_trip() {
    insert_and_read_back(&MemoryRouteStore::new()).await;
}

#[tokio::test]
async fn memory_store_ordering() {
    lists_most_recent_first(&MemoryRouteStore::new()).await;
}

#[tokio::test]
async fn memory_store_delete_and_update() {
    let store = MemoryRouteStore::new();
    delete_and_update(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn memory_store_ids_are_never_reused() {
    let store = MemoryRouteStore::new();
    let first = store.insert(record(1_000, 1_000, None)).await.expect("insert");
    store.delete_by_id(first).await.expect("delete");
    let second = store.insert(record(2_000, 1_000, None)).await.expect("insert");
    assert!(second > first);
}

#[tokio::test]
async fn sqlite_store_round_trip() {
    let store = SqliteRouteStore::connect_in_memory().await.expect("connect");
    insert_and_read_back(&store).await;
}

#[tokio::test]
async fn sqlite_store_ordering() {
    let store = SqliteRouteStore::connect_in_memory().await.expect("connect");
    lists_most_recent_first(&store).await;
}

#[tokio::test]
async fn sqlite_store_delete_and_update() {
    let store = SqliteRouteStore::connect_in_memory().await.expect("connect");
    delete_and_update(&store).await;
}
