use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use healthy_life_data::repository::JakRepository;
use healthy_life_domain::i18n::Locale;
use healthy_life_domain::services::{create_default_assessment_service, AssessmentServiceTrait, JakDirectory};

use crate::analytics::{self, EventRecorder};
use crate::api::handlers::{assessment, classify, health, jak};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct AppState {
    pub assessments: Arc<dyn AssessmentServiceTrait + Send + Sync>,
    pub jak: Arc<JakDirectory>,
    pub analytics: Arc<dyn EventRecorder>,
    /// Locale for requests that name none
    pub default_locale: Locale,
    /// Reported by the health check
    pub environment: String,
}

/// Build the shared state: session store, JAK directory and analytics
pub fn create_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jak_repository = match &config.jak_data_path {
        Some(path) => JakRepository::from_path(path)
            .with_context(|| format!("Failed to load JAK directory from {}", path.display()))?,
        None => {
            warn!("JAK_DATA_PATH is not set; the JAK directory will be empty");
            JakRepository::empty()
        }
    };

    Ok(AppState {
        assessments: Arc::new(create_default_assessment_service()),
        jak: Arc::new(JakDirectory::new(&jak_repository)),
        analytics: analytics::create_recorder(config),
        default_locale: config.default_locale,
        environment: config.environment.clone(),
    })
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let health_service = health::create_health_service(&state);

    // Specific routes before parametrized ones
    let api_routes = Router::new()
        .route("/classify/bmi", post(classify::classify_bmi))
        .route("/classify/blood-pressure", post(classify::classify_blood_pressure))
        .route("/classify/sugar", post(classify::classify_sugar))
        .route("/assessments", post(assessment::start_assessment))
        .route(
            "/assessments/:id",
            get(assessment::get_assessment)
                .patch(assessment::update_assessment)
                .delete(assessment::end_assessment),
        )
        .route("/assessments/:id/measurements", post(assessment::submit_measurements))
        .route("/assessments/:id/preview", post(assessment::preview_measurements))
        .route("/jak", get(jak::list_jak))
        .route("/jak/nearby", get(jak::nearby_jak));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state);

    let app = add_swagger_ui(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    health::initialize_server_start_time();
    info!("Application router ready");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
