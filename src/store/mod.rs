mod memory;
mod sqlite;

pub use memory::MemoryRouteStore;
pub use sqlite::SqliteRouteStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::route::{RouteDetails, RouteId, RouteRecord, StoredRoute};

/// Persistent storage for completed routes.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Stores a record and returns its newly assigned id.
    async fn insert(&self, record: RouteRecord) -> Result<RouteId, StoreError>;

    async fn get_by_id(&self, id: RouteId) -> Result<Option<StoredRoute>, StoreError>;

    /// Returns whether a record with this id existed.
    async fn delete_by_id(&self, id: RouteId) -> Result<bool, StoreError>;

    /// All records, most recent start time first.
    async fn list_all(&self) -> Result<Vec<StoredRoute>, StoreError>;

    /// Replaces name and notes, the only fields editable after insert.
    async fn update_details(
        &self,
        id: RouteId,
        details: RouteDetails,
    ) -> Result<Option<StoredRoute>, StoreError>;
}
