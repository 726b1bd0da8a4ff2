use async_trait::async_trait;

use crate::core::Result;

/// Base repository trait for CRUD operations
/// Entity-specific repositories extend this with their own finders
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Count all stored entities
    async fn count_all(&self) -> Result<i64>;

    /// List all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>>;

    /// Insert the entity when it has no ID yet, otherwise update it in place.
    /// Returns the stored entity.
    async fn save(&self, entity: T) -> Result<T>;

    /// Physically delete an entity by ID. `false` when no row had that ID.
    async fn delete_by_id(&self, id: ID) -> Result<bool>;
}
