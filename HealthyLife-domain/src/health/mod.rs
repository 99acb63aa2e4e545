//! Health checks for the session store and the reference data

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::services::assessment::AssessmentServiceTrait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// A health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to its health
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Worst component status decides the system status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Number of live sessions, or why the session store could not be read
    async fn check_session_store_status(&self) -> Result<usize, String>;
}

/// Health service backed by the live assessment service
pub struct HealthService {
    assessments: Arc<dyn AssessmentServiceTrait + Send + Sync>,
    jak_entries: usize,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("jak_entries", &self.jak_entries)
            .finish_non_exhaustive()
    }
}

impl HealthService {
    pub fn new(assessments: Arc<dyn AssessmentServiceTrait + Send + Sync>, jak_entries: usize) -> Self {
        Self {
            assessments,
            jak_entries,
        }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let session_store = match self.check_session_store_status().await {
            Ok(count) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} active sessions", count)),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        // The directory is optional; without it only the JAK lookup is affected
        let jak_directory = if self.jak_entries > 0 {
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(format!("{} entries", self.jak_entries)),
            }
        } else {
            HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("JAK directory not loaded".to_string()),
            }
        };

        SystemHealth::from_components(
            vec![
                ("session_store".to_string(), session_store),
                ("jak_directory".to_string(), jak_directory),
            ]
            .into_iter()
            .collect(),
        )
    }

    async fn check_session_store_status(&self) -> Result<usize, String> {
        self.assessments
            .session_count()
            .await
            .map_err(|e| format!("Session store unavailable: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assessment::AssessmentService;
    use healthy_life_data::repository::tests::MockAssessmentRepository;

    #[tokio::test]
    async fn test_healthy_with_directory() {
        let assessments = Arc::new(AssessmentService::new(MockAssessmentRepository::new()));
        let health = HealthService::new(assessments, 12).get_system_health().await;

        assert_eq!(health.status, SystemStatus::Healthy);
        assert!(health.components.contains_key("session_store"));
        assert!(health.components.contains_key("jak_directory"));
    }

    #[test]
    fn test_missing_directory_degrades() {
        let assessments = Arc::new(AssessmentService::new(MockAssessmentRepository::new()));
        let health = tokio_test::block_on(HealthService::new(assessments, 0).get_system_health());

        assert_eq!(health.status, SystemStatus::Degraded);
    }

    #[tokio::test]
    async fn test_failing_store_is_unhealthy() {
        let assessments = Arc::new(AssessmentService::new(MockAssessmentRepository::new().with_failure()));
        let service = HealthService::new(assessments, 12);

        assert!(service.check_session_store_status().await.is_err());
        assert_eq!(service.get_system_health().await.status, SystemStatus::Unhealthy);
    }
}
