use std::sync::{Arc, Mutex};
use std::collections::HashMap;
use chrono::{DateTime, Utc};

use crate::models::assessment::StoredAssessment;
use super::errors::RepositoryError;

/// In-memory storage for assessment sessions
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Records keyed by session id
    records: Arc<Mutex<HashMap<String, StoredAssessment>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert or replace a record
    pub async fn store(&self, record: &StoredAssessment) -> Result<StoredAssessment, RepositoryError> {
        let mut store = self.records.lock()?;
        store.insert(record.id.clone(), record.clone());
        Ok(record.clone())
    }

    /// Replace a record only if its session is still live; `None` otherwise
    pub async fn save_if_present(
        &self,
        record: &StoredAssessment,
    ) -> Result<Option<StoredAssessment>, RepositoryError> {
        let mut store = self.records.lock()?;
        match store.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    /// Get a record by session id
    pub async fn get_by_id(&self, id: &str) -> Result<Option<StoredAssessment>, RepositoryError> {
        let store = self.records.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Remove a record, returning whether it existed
    pub async fn remove(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.records.lock()?;
        Ok(store.remove(id).is_some())
    }

    /// Number of live sessions
    pub async fn count(&self) -> Result<usize, RepositoryError> {
        let store = self.records.lock()?;
        Ok(store.len())
    }

    /// Drop every record last written before `cutoff`, returning how many were dropped
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut store = self.records.lock()?;
        let before = store.len();
        store.retain(|_, record| record.updated_at >= cutoff);
        Ok(before - store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_store_and_fetch() {
        let storage = InMemoryStorage::new();
        let record = StoredAssessment::new("s1".to_string(), "en".to_string());

        storage.store(&record).await.unwrap();

        let fetched = storage.get_by_id("s1").await.unwrap();
        assert_eq!(fetched, Some(record));
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();

        clone
            .store(&StoredAssessment::new("s1".to_string(), "en".to_string()))
            .await
            .unwrap();

        assert!(storage.get_by_id("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let storage = InMemoryStorage::new();
        storage
            .store(&StoredAssessment::new("s1".to_string(), "en".to_string()))
            .await
            .unwrap();

        assert!(storage.remove("s1").await.unwrap());
        assert!(!storage.remove("s1").await.unwrap());
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_if_present_after_remove() {
        let storage = InMemoryStorage::new();
        let mut record = StoredAssessment::new("s1".to_string(), "en".to_string());
        storage.store(&record).await.unwrap();

        record.height_cm = Some(170.0);
        let saved = storage.save_if_present(&record).await.unwrap();
        assert_eq!(saved.and_then(|r| r.height_cm), Some(170.0));

        storage.remove("s1").await.unwrap();
        assert!(storage.save_if_present(&record).await.unwrap().is_none());
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_older_than() {
        let storage = InMemoryStorage::new();

        let mut stale = StoredAssessment::new("old".to_string(), "en".to_string());
        stale.updated_at = Utc::now() - Duration::hours(3);
        storage.store(&stale).await.unwrap();
        storage
            .store(&StoredAssessment::new("fresh".to_string(), "en".to_string()))
            .await
            .unwrap();

        let purged = storage
            .purge_older_than(Utc::now() - Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert!(storage.get_by_id("old").await.unwrap().is_none());
        assert!(storage.get_by_id("fresh").await.unwrap().is_some());
    }
}
