// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use healthy_life_data::repository::tests::MockAssessmentRepository;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::assessment::{AssessmentService, AssessmentServiceTrait};

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    session_store_status: ComponentStatus,
    session_count: usize,
    /// Additional components
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            session_store_status: ComponentStatus::Healthy,
            session_count: 0,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with an unreachable session store
    pub fn with_unhealthy_session_store(mut self) -> Self {
        self.session_store_status = ComponentStatus::Unhealthy;
        self
    }

    /// Report this many live sessions
    pub fn with_session_count(mut self, count: usize) -> Self {
        self.session_count = count;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        components.insert(
            "session_store".to_string(),
            HealthComponent {
                status: self.session_store_status.clone(),
                details: match self.session_store_status {
                    ComponentStatus::Unhealthy => Some("Session store unavailable".to_string()),
                    _ => Some(format!("{} active sessions", self.session_count)),
                },
            },
        );

        SystemHealth::from_components(components)
    }

    async fn check_session_store_status(&self) -> Result<usize, String> {
        match self.session_store_status {
            ComponentStatus::Unhealthy => Err("Session store unavailable".to_string()),
            _ => Ok(self.session_count),
        }
    }
}

/// Factory function to create an assessment service over the mock repository
pub fn create_mock_assessment_service() -> AssessmentService<MockAssessmentRepository> {
    AssessmentService::new(MockAssessmentRepository::new())
}

/// Factory function to create an assessment service whose repository always fails
pub fn create_failing_assessment_service() -> impl AssessmentServiceTrait + Send + Sync {
    AssessmentService::new(MockAssessmentRepository::new().with_failure())
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> impl HealthServiceTrait {
    MockHealthService::new()
}
