use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;
use async_trait::async_trait;

use crate::models::assessment::StoredAssessment;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for assessment session records
#[async_trait]
pub trait AssessmentRepositoryTrait {
    /// Create an empty record for a new session
    async fn create(&self, locale: String) -> Result<StoredAssessment, RepositoryError>;

    /// Get a record by session id
    async fn get_by_id(&self, id: Uuid) -> Result<Option<StoredAssessment>, RepositoryError>;

    /// Replace an existing record, stamping `updated_at`
    async fn save(&self, record: StoredAssessment) -> Result<StoredAssessment, RepositoryError>;

    /// Discard a record, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, RepositoryError>;

    /// Discard records untouched for longer than `max_age`
    async fn purge_expired(&self, max_age: Duration) -> Result<usize, RepositoryError>;
}

/// Session-scoped repository for assessment records.
/// Nothing outlives the process.
#[derive(Debug, Clone, Default)]
pub struct AssessmentRepository {
    storage: InMemoryStorage,
}

impl AssessmentRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl AssessmentRepositoryTrait for AssessmentRepository {
    async fn create(&self, locale: String) -> Result<StoredAssessment, RepositoryError> {
        let record = StoredAssessment::new(Uuid::new_v4().to_string(), locale);
        debug!("Starting assessment session {}", record.id);
        self.storage.store(&record).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<StoredAssessment>, RepositoryError> {
        self.storage.get_by_id(&id.to_string()).await
    }

    async fn save(&self, mut record: StoredAssessment) -> Result<StoredAssessment, RepositoryError> {
        record.updated_at = Utc::now();
        self.storage
            .save_if_present(&record)
            .await?
            .ok_or(RepositoryError::NotFound(record.id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        debug!("Discarding assessment session {}", id);
        self.storage.remove(&id.to_string()).await
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.storage.count().await
    }

    async fn purge_expired(&self, max_age: Duration) -> Result<usize, RepositoryError> {
        let purged = self.storage.purge_older_than(Utc::now() - max_age).await?;
        if purged > 0 {
            debug!("Purged {} expired assessment sessions", purged);
        }
        Ok(purged)
    }
}

/// Mock assessment repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Mock implementation of AssessmentRepository for testing
    pub struct MockAssessmentRepository {
        records: RwLock<HashMap<String, StoredAssessment>>,
        should_fail: bool,
    }

    impl Default for MockAssessmentRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockAssessmentRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self {
                records: RwLock::new(HashMap::new()),
                should_fail: false,
            }
        }

        /// Create a mock repository with predefined records
        pub fn with_records(records: Vec<StoredAssessment>) -> Self {
            let records = records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect();
            Self {
                records: RwLock::new(records),
                should_fail: false,
            }
        }

        /// Configure every call to fail with a lock error
        pub fn with_failure(mut self) -> Self {
            self.should_fail = true;
            self
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.should_fail {
                Err(RepositoryError::Lock("mock is configured to fail".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl AssessmentRepositoryTrait for MockAssessmentRepository {
        async fn create(&self, locale: String) -> Result<StoredAssessment, RepositoryError> {
            self.check()?;
            let record = StoredAssessment::new(Uuid::new_v4().to_string(), locale);
            self.records.write()?.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<StoredAssessment>, RepositoryError> {
            self.check()?;
            Ok(self.records.read()?.get(&id.to_string()).cloned())
        }

        async fn save(&self, record: StoredAssessment) -> Result<StoredAssessment, RepositoryError> {
            self.check()?;
            let mut records = self.records.write()?;
            if !records.contains_key(&record.id) {
                return Err(RepositoryError::NotFound(record.id));
            }
            records.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
            self.check()?;
            Ok(self.records.write()?.remove(&id.to_string()).is_some())
        }

        async fn count(&self) -> Result<usize, RepositoryError> {
            self.check()?;
            Ok(self.records.read()?.len())
        }

        async fn purge_expired(&self, max_age: Duration) -> Result<usize, RepositoryError> {
            self.check()?;
            let cutoff = Utc::now() - max_age;
            let mut records = self.records.write()?;
            let before = records.len();
            records.retain(|_, record| record.updated_at >= cutoff);
            Ok(before - records.len())
        }
    }
}
