use async_trait::async_trait;

use crate::Result;

/// CRUD access to values of one aggregate type, keyed by its identifier.
///
/// Each operation is atomic for a single key. There is no transaction
/// spanning several keys or several repositories.
#[async_trait]
pub trait Repository<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    /// Stores a new value. Fails with `AlreadyExists` if the key is taken.
    async fn create(&self, id: &K, value: V) -> Result<()>;

    /// Reads the value for a key. Fails with `NotFound` if missing.
    async fn read(&self, id: &K) -> Result<V>;

    /// Replaces the value for a key. Fails with `NotFound` if missing.
    async fn update(&self, id: &K, value: V) -> Result<()>;

    /// Removes the value for a key. Fails with `NotFound` if missing.
    async fn delete(&self, id: &K) -> Result<()>;

    /// Returns every stored value.
    async fn read_all(&self) -> Result<Vec<V>>;
}
