use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use healthy_life_data::repository::{AssessmentRepositoryTrait, RepositoryError};

use crate::entities::assessment::{AssessmentRecord, AssessmentUpdate};
use crate::entities::category::CategoryResult;
use crate::entities::conversions;
use crate::i18n::Locale;
use crate::services::classifier;
use crate::services::wizard::{FieldErrors, MeasurementStep, MeasurementsForm, StepRoute};

/// Assessment service errors
#[derive(Debug, Error)]
pub enum AssessmentServiceError {
    /// Malformed input outside the form, e.g. a bad session id
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Form validation failed
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Session not found or already ended
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Result of a successful measurement submission
#[derive(Debug, Clone)]
pub struct MeasurementOutcome {
    pub route: StepRoute,
    pub record: AssessmentRecord,
}

/// Trait for assessment session operations
#[async_trait]
pub trait AssessmentServiceTrait {
    /// Start a session with an empty record
    async fn start_session(&self, locale: Locale) -> Result<AssessmentRecord, AssessmentServiceError>;

    /// Current record of a session
    async fn get_record(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError>;

    /// Shallow-merge a partial record into the session
    async fn update_data(
        &self,
        id: &str,
        update: AssessmentUpdate,
    ) -> Result<AssessmentRecord, AssessmentServiceError>;

    /// Validate the measurement step and store its answers
    async fn submit_measurements(
        &self,
        id: &str,
        form: MeasurementsForm,
    ) -> Result<MeasurementOutcome, AssessmentServiceError>;

    /// Discard a session record
    async fn end_session(&self, id: &str) -> Result<(), AssessmentServiceError>;

    /// BMI category lookup
    fn get_bmi_category(&self, bmi: f64) -> Option<CategoryResult>;

    /// Discard sessions idle for longer than `max_age`
    async fn purge_expired(&self, max_age: Duration) -> Result<usize, AssessmentServiceError>;

    /// Number of live sessions
    async fn session_count(&self) -> Result<usize, AssessmentServiceError>;
}

/// Assessment service over a session repository
pub struct AssessmentService<R: AssessmentRepositoryTrait> {
    repository: R,
    /// Held across load-modify-store so concurrent writes to a session are not lost
    write_lock: Mutex<()>,
}

impl<R: AssessmentRepositoryTrait> AssessmentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    fn map_repo_error(&self, err: RepositoryError) -> AssessmentServiceError {
        match err {
            RepositoryError::NotFound(msg) => AssessmentServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => AssessmentServiceError::InvalidInput(msg),
            _ => AssessmentServiceError::RepositoryError(err.to_string()),
        }
    }

    async fn load(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        let uuid = conversions::parse_string_to_uuid(id)
            .map_err(AssessmentServiceError::InvalidInput)?;

        let stored = self
            .repository
            .get_by_id(uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| AssessmentServiceError::NotFound(id.to_string()))?;

        conversions::convert_to_domain_assessment(stored).map_err(|e| {
            warn!("Stored session {} could not be decoded: {}", id, e);
            AssessmentServiceError::RepositoryError(e)
        })
    }

    async fn store(&self, record: &AssessmentRecord) -> Result<AssessmentRecord, AssessmentServiceError> {
        let stored = self
            .repository
            .save(conversions::convert_to_data_assessment(record))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        conversions::convert_to_domain_assessment(stored).map_err(AssessmentServiceError::RepositoryError)
    }
}

#[async_trait]
impl<R: AssessmentRepositoryTrait + Send + Sync> AssessmentServiceTrait for AssessmentService<R> {
    async fn start_session(&self, locale: Locale) -> Result<AssessmentRecord, AssessmentServiceError> {
        let stored = self
            .repository
            .create(locale.code().to_string())
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Assessment session {} started ({})", stored.id, locale);
        conversions::convert_to_domain_assessment(stored).map_err(AssessmentServiceError::RepositoryError)
    }

    async fn get_record(&self, id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        self.load(id).await
    }

    async fn update_data(
        &self,
        id: &str,
        update: AssessmentUpdate,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load(id).await?;
        record.update_data(update);
        self.store(&record).await
    }

    async fn submit_measurements(
        &self,
        id: &str,
        form: MeasurementsForm,
    ) -> Result<MeasurementOutcome, AssessmentServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load(id).await?;
        let mut step = MeasurementStep::with_form(form);

        let route = step
            .submit(&mut record)
            .map_err(AssessmentServiceError::Validation)?;
        let record = self.store(&record).await?;

        debug!("Session {} measurements stored, next: {}", id, route.as_str());
        Ok(MeasurementOutcome { route, record })
    }

    async fn end_session(&self, id: &str) -> Result<(), AssessmentServiceError> {
        let uuid = conversions::parse_string_to_uuid(id)
            .map_err(AssessmentServiceError::InvalidInput)?;

        let _guard = self.write_lock.lock().await;
        let existed = self
            .repository
            .delete(uuid)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if existed {
            info!("Assessment session {} ended", id);
            Ok(())
        } else {
            Err(AssessmentServiceError::NotFound(id.to_string()))
        }
    }

    fn get_bmi_category(&self, bmi: f64) -> Option<CategoryResult> {
        classifier::classify_bmi(bmi)
    }

    async fn purge_expired(&self, max_age: Duration) -> Result<usize, AssessmentServiceError> {
        self.repository
            .purge_expired(max_age)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn session_count(&self) -> Result<usize, AssessmentServiceError> {
        self.repository.count().await.map_err(|e| self.map_repo_error(e))
    }
}

/// Create a default assessment service using the in-memory session store
pub fn create_default_assessment_service() -> impl AssessmentServiceTrait + Send + Sync {
    let repository = healthy_life_data::repository::AssessmentRepository::new();
    AssessmentService::new(repository)
}

/// Create an assessment service over the mock repository
#[cfg(feature = "mock")]
pub fn create_mock_assessment_service() -> impl AssessmentServiceTrait + Send + Sync {
    crate::testing::create_mock_assessment_service()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::assessment::{ReadingEntry, SugarTestType};
    use crate::services::wizard::{BloodPressureFields, FormField, SectionInput, SugarFields};
    use healthy_life_data::models::assessment::StoredAssessment;
    use healthy_life_data::repository::tests::MockAssessmentRepository;

    fn service() -> AssessmentService<MockAssessmentRepository> {
        AssessmentService::new(MockAssessmentRepository::new())
    }

    fn form(height: &str, weight: &str) -> MeasurementsForm {
        MeasurementsForm {
            height: height.to_string(),
            weight: weight.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let service = service();

        let record = service.start_session(Locale::Ml).await.unwrap();
        assert_eq!(record.locale, Locale::Ml);
        assert_eq!(service.session_count().await.unwrap(), 1);

        let fetched = service.get_record(&record.id).await.unwrap();
        assert_eq!(fetched.id, record.id);

        service.end_session(&record.id).await.unwrap();
        assert!(matches!(
            service.get_record(&record.id).await,
            Err(AssessmentServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.end_session(&record.id).await,
            Err(AssessmentServiceError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_all_kept() {
        let service = std::sync::Arc::new(service());

        for _ in 0..50 {
            let record = service.start_session(Locale::En).await.unwrap();

            let height = {
                let service = service.clone();
                let id = record.id.clone();
                tokio::spawn(async move {
                    service
                        .update_data(&id, AssessmentUpdate { height_cm: Some(170.0), ..Default::default() })
                        .await
                })
            };
            let weight = {
                let service = service.clone();
                let id = record.id.clone();
                tokio::spawn(async move {
                    service
                        .update_data(&id, AssessmentUpdate { weight_kg: Some(70.0), ..Default::default() })
                        .await
                })
            };
            height.await.unwrap().unwrap();
            weight.await.unwrap().unwrap();

            let merged = service.get_record(&record.id).await.unwrap();
            assert_eq!(merged.height_cm, Some(170.0));
            assert_eq!(merged.weight_kg, Some(70.0));
            assert_eq!(merged.derived.bmi, Some(24.2));
        }
    }

    #[tokio::test]
    async fn test_update_after_end_session_is_not_found() {
        let service = service();
        let record = service.start_session(Locale::En).await.unwrap();
        service.end_session(&record.id).await.unwrap();

        let result = service
            .update_data(&record.id, AssessmentUpdate { height_cm: Some(170.0), ..Default::default() })
            .await;

        assert!(matches!(result, Err(AssessmentServiceError::NotFound(_))));
        assert_eq!(service.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_data_merges() {
        let service = service();
        let record = service.start_session(Locale::En).await.unwrap();

        service
            .update_data(&record.id, AssessmentUpdate { height_cm: Some(170.0), ..Default::default() })
            .await
            .unwrap();
        let updated = service
            .update_data(&record.id, AssessmentUpdate { weight_kg: Some(70.0), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(updated.height_cm, Some(170.0));
        assert_eq!(updated.derived.bmi, Some(24.2));
    }

    #[tokio::test]
    async fn test_submit_routes_on_elevated_sugar() {
        let service = service();
        let record = service.start_session(Locale::En).await.unwrap();

        let mut measurements = form("170", "70");
        measurements.blood_pressure = SectionInput::Skipped;
        measurements.sugar = SectionInput::Open(SugarFields {
            test_type: Some(SugarTestType::Fbs),
            value: "130".to_string(),
        });

        let outcome = service.submit_measurements(&record.id, measurements).await.unwrap();
        assert_eq!(outcome.route, StepRoute::Advisory);
        assert!(outcome.record.blood_pressure.is_skipped());

        let stored = service.get_record(&record.id).await.unwrap();
        assert!(stored.derived.sugar_elevated);
        assert!(matches!(stored.sugar, ReadingEntry::Entered(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_pair() {
        let service = service();
        let record = service.start_session(Locale::En).await.unwrap();

        let mut measurements = form("170", "70");
        measurements.blood_pressure = SectionInput::Open(BloodPressureFields {
            systolic: String::new(),
            diastolic: "85".to_string(),
        });

        match service.submit_measurements(&record.id, measurements).await {
            Err(AssessmentServiceError::Validation(errors)) => {
                assert!(errors.get(FormField::Systolic).is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // nothing stored
        let stored = service.get_record(&record.id).await.unwrap();
        assert_eq!(stored.height_cm, None);
    }

    #[tokio::test]
    async fn test_invalid_session_id() {
        let result = service().get_record("not-a-session").await;
        assert!(matches!(result, Err(AssessmentServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_repository_failure_is_mapped() {
        let service = AssessmentService::new(MockAssessmentRepository::new().with_failure());
        let result = service.start_session(Locale::En).await;
        assert!(matches!(result, Err(AssessmentServiceError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let mut stale = StoredAssessment::new(uuid::Uuid::new_v4().to_string(), "en".to_string());
        stale.updated_at = chrono::Utc::now() - Duration::hours(3);
        let service = AssessmentService::new(MockAssessmentRepository::with_records(vec![stale]));
        service.start_session(Locale::En).await.unwrap();

        assert_eq!(service.purge_expired(Duration::hours(1)).await.unwrap(), 1);
        assert_eq!(service.session_count().await.unwrap(), 1);
    }

    #[test]
    fn test_get_bmi_category() {
        let service = service();
        assert_eq!(
            service.get_bmi_category(42.0).map(|c| c.label_key),
            Some("bmi_category_obese_3".to_string())
        );
        assert!(service.get_bmi_category(f64::NAN).is_none());
    }
}
