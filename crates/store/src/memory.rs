use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{RepositoryError, Result, repository::Repository};

/// In-memory repository implementation for tests and demos.
///
/// Cloning shares the underlying storage. Failure toggles let tests simulate
/// a storage outage on writes.
pub struct InMemoryRepository<K, V> {
    entity: &'static str,
    values: Arc<RwLock<HashMap<K, V>>>,
    fail_on_create: Arc<AtomicBool>,
    fail_on_update: Arc<AtomicBool>,
}

impl<K, V> Clone for InMemoryRepository<K, V> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            values: Arc::clone(&self.values),
            fail_on_create: Arc::clone(&self.fail_on_create),
            fail_on_update: Arc::clone(&self.fail_on_update),
        }
    }
}

impl<K, V> InMemoryRepository<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty repository for the named entity type.
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            values: Arc::new(RwLock::new(HashMap::new())),
            fail_on_create: Arc::new(AtomicBool::new(false)),
            fail_on_update: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Configures `create` calls to fail.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.fail_on_create.store(fail, Ordering::SeqCst);
    }

    /// Configures `update` calls to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.fail_on_update.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored values.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    /// Removes every stored value.
    pub async fn clear(&self) {
        self.values.write().await.clear();
    }
}

#[async_trait]
impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Eq + Hash + Clone + Display + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn create(&self, id: &K, value: V) -> Result<()> {
        if self.fail_on_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(format!(
                "{} storage unavailable",
                self.entity
            )));
        }

        let mut values = self.values.write().await;
        if values.contains_key(id) {
            return Err(RepositoryError::AlreadyExists {
                entity: self.entity,
                id: id.to_string(),
            });
        }
        values.insert(id.clone(), value);
        tracing::debug!(entity = self.entity, %id, "created");
        Ok(())
    }

    async fn read(&self, id: &K) -> Result<V> {
        let values = self.values.read().await;
        values
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity: self.entity,
                id: id.to_string(),
            })
    }

    async fn update(&self, id: &K, value: V) -> Result<()> {
        if self.fail_on_update.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(format!(
                "{} storage unavailable",
                self.entity
            )));
        }

        let mut values = self.values.write().await;
        match values.get_mut(id) {
            Some(existing) => {
                *existing = value;
                tracing::debug!(entity = self.entity, %id, "updated");
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity: self.entity,
                id: id.to_string(),
            }),
        }
    }

    async fn delete(&self, id: &K) -> Result<()> {
        let mut values = self.values.write().await;
        values
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: self.entity,
                id: id.to_string(),
            })
    }

    async fn read_all(&self) -> Result<Vec<V>> {
        let values = self.values.read().await;
        Ok(values.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> InMemoryRepository<String, u32> {
        InMemoryRepository::new("Counter")
    }

    #[tokio::test]
    async fn create_and_read() {
        let repo = repo();
        repo.create(&"a".to_string(), 1).await.unwrap();

        assert_eq!(repo.read(&"a".to_string()).await.unwrap(), 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn create_existing_fails() {
        let repo = repo();
        repo.create(&"a".to_string(), 1).await.unwrap();

        let result = repo.create(&"a".to_string(), 2).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
        assert_eq!(repo.read(&"a".to_string()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn read_missing_fails() {
        let repo = repo();
        let result = repo.read(&"missing".to_string()).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity: "Counter",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn update_replaces_value() {
        let repo = repo();
        repo.create(&"a".to_string(), 1).await.unwrap();
        repo.update(&"a".to_string(), 5).await.unwrap();

        assert_eq!(repo.read(&"a".to_string()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn update_missing_fails() {
        let repo = repo();
        let result = repo.update(&"a".to_string(), 5).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_value() {
        let repo = repo();
        repo.create(&"a".to_string(), 1).await.unwrap();
        repo.delete(&"a".to_string()).await.unwrap();

        assert!(repo.is_empty().await);
        assert!(repo.delete(&"a".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn read_all_returns_every_value() {
        let repo = repo();
        repo.create(&"a".to_string(), 1).await.unwrap();
        repo.create(&"b".to_string(), 2).await.unwrap();

        let mut all = repo.read_all().await.unwrap();
        all.sort();
        assert_eq!(all, vec![1, 2]);
    }

    #[tokio::test]
    async fn failure_toggles() {
        let repo = repo();
        repo.set_fail_on_create(true);
        assert!(matches!(
            repo.create(&"a".to_string(), 1).await,
            Err(RepositoryError::Storage(_))
        ));

        repo.set_fail_on_create(false);
        repo.create(&"a".to_string(), 1).await.unwrap();

        repo.set_fail_on_update(true);
        assert!(repo.update(&"a".to_string(), 2).await.is_err());
        assert_eq!(repo.read(&"a".to_string()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = repo();
        let other = repo.clone();
        repo.create(&"a".to_string(), 1).await.unwrap();

        assert_eq!(other.read(&"a".to_string()).await.unwrap(), 1);

        other.clear().await;
        assert!(repo.is_empty().await);
    }
}
