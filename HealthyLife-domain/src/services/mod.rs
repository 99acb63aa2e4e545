pub mod assessment;
pub mod classifier;
pub mod jak;
pub mod thresholds;
pub mod wizard;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use assessment::{
    create_default_assessment_service, AssessmentService, AssessmentServiceError,
    AssessmentServiceTrait, MeasurementOutcome,
};
pub use jak::JakDirectory;
pub use wizard::{MeasurementStep, MeasurementsForm, StepRoute};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use assessment::create_mock_assessment_service;
