use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::store::RouteStore;
use crate::types::route::{RouteDetails, RouteId, RouteRecord, StoredRoute};

#[derive(Clone, Default)]
pub struct MemoryRouteStore {
    records: Arc<DashMap<RouteId, RouteRecord>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn insert(&self, record: RouteRecord) -> Result<RouteId, StoreError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.records.insert(id, record);
        Ok(id)
    }

    async fn get_by_id(&self, id: RouteId) -> Result<Option<StoredRoute>, StoreError> {
        Ok(self.records.get(&id).map(|entry| StoredRoute {
            id,
            record: entry.value().clone(),
        }))
    }

    async fn delete_by_id(&self, id: RouteId) -> Result<bool, StoreError> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<StoredRoute>, StoreError> {
        let mut routes: Vec<StoredRoute> = self
            .records
            .iter()
            .map(|entry| StoredRoute {
                id: *entry.key(),
                record: entry.value().clone(),
            })
            .collect();
        routes.sort_by(|a, b| {
            b.record
                .start_time
                .cmp(&a.record.start_time)
                .then(b.id.cmp(&a.id))
        });
        Ok(routes)
    }

    async fn update_details(
        &self,
        id: RouteId,
        details: RouteDetails,
    ) -> Result<Option<StoredRoute>, StoreError> {
        Ok(self.records.get_mut(&id).map(|mut entry| {
            entry.apply_details(details);
            StoredRoute {
                id,
                record: entry.value().clone(),
            }
        }))
    }
}
