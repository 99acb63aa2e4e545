use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Classification endpoints
        crate::api::handlers::classify::classify_bmi,
        crate::api::handlers::classify::classify_blood_pressure,
        crate::api::handlers::classify::classify_sugar,

        // Assessment endpoints
        crate::api::handlers::assessment::start_assessment,
        crate::api::handlers::assessment::get_assessment,
        crate::api::handlers::assessment::update_assessment,
        crate::api::handlers::assessment::end_assessment,
        crate::api::handlers::assessment::submit_measurements,
        crate::api::handlers::assessment::preview_measurements,

        // JAK directory endpoints
        crate::api::handlers::jak::list_jak,
        crate::api::handlers::jak::nearby_jak
    ),
    components(
        schemas(
            // Common
            crate::entities::common::ErrorResponse,
            crate::entities::common::LangQuery,

            // Classification
            crate::entities::classify::BmiRequest,
            crate::entities::classify::BloodPressureRequest,
            crate::entities::classify::SugarRequest,
            crate::entities::classify::CategoryView,
            crate::entities::classify::BmiClassification,
            crate::entities::classify::BloodPressureClassification,
            crate::entities::classify::SugarClassification,

            // Assessment
            crate::entities::assessment::ReadingStatus,
            crate::entities::assessment::StartAssessmentRequest,
            crate::entities::assessment::UpdateAssessmentRequest,
            crate::entities::assessment::AssessmentResponse,
            crate::entities::assessment::MeasurementsRequest,
            crate::entities::assessment::MeasurementsResponse,
            crate::entities::assessment::PreviewResponse,

            // JAK directory
            crate::entities::jak::JakQuery,
            crate::entities::jak::NearbyQuery,
            crate::entities::jak::JakView,
            crate::entities::jak::JakListResponse,
            crate::entities::jak::NearbyJakView,
            crate::entities::jak::NearbyJakResponse,

            // Health
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain types
            healthy_life_domain::entities::Tier,
            healthy_life_domain::entities::Color,
            healthy_life_domain::entities::SugarTestType,
            healthy_life_domain::i18n::Locale,
            healthy_life_domain::services::wizard::StepRoute
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "classification", description = "Stateless BMI, blood pressure and sugar classification"),
        (name = "assessment", description = "Self-assessment sessions and the measurement step"),
        (name = "jak", description = "Jan Arogya Kendra directory")
    ),
    info(
        title = "HealthyLife API",
        version = "0.1.0",
        description = "Health self-assessment: classification, wizard state and nearby health centres",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "HealthyLife API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "classification"));
        assert!(tags.iter().any(|tag| tag.name == "assessment"));

        for path in [
            "/health",
            "/api/v1/classify/bmi",
            "/api/v1/classify/blood-pressure",
            "/api/v1/classify/sugar",
            "/api/v1/assessments",
            "/api/v1/assessments/{id}",
            "/api/v1/assessments/{id}/measurements",
            "/api/v1/assessments/{id}/preview",
            "/api/v1/jak",
            "/api/v1/jak/nearby",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }
}
