use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Once};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument};
use utoipa::ToSchema;

use healthy_life_domain::health::{
    ComponentStatus as DomainComponentStatus, HealthService, HealthServiceTrait, SystemStatus,
};

use crate::api::routes::AppState;

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// In-memory session store
    pub session_store: ComponentHealthStatus,
    /// JAK reference directory
    pub jak_directory: ComponentHealthStatus,
    /// Additional components (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the health endpoint needs from the application
#[derive(Clone)]
pub struct HealthState {
    pub service: Arc<dyn HealthServiceTrait + Send + Sync>,
    pub environment: String,
}

impl std::fmt::Debug for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthState")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Initialize the server start time
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

const NAMED_COMPONENTS: [&str; 2] = ["session_store", "jak_directory"];

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Session store is unavailable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health))]
pub async fn health_check(Extension(health): Extension<HealthState>) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health.service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Degraded => "degraded",
        SystemStatus::Unhealthy => "error",
    };

    let component = |name: &str| {
        let found = system_health.components.get(name);
        ComponentHealthStatus {
            status: map_component_status(
                &found.map(|c| c.status.clone()).unwrap_or(DomainComponentStatus::Healthy),
            ),
            message: found.and_then(|c| c.details.clone()),
        }
    };

    let additional: serde_json::Map<String, serde_json::Value> = system_health
        .components
        .iter()
        .filter(|(name, _)| !NAMED_COMPONENTS.contains(&name.as_str()))
        .map(|(name, component)| {
            (
                name.clone(),
                serde_json::json!({
                    "status": map_component_status(&component.status),
                    "message": component.details,
                }),
            )
        })
        .collect();

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            session_store: component("session_store"),
            jak_directory: component("jak_directory"),
            additional: (!additional.is_empty()).then(|| additional.into()),
        },
        environment: health.environment.clone(),
    };

    // A missing directory only degrades the JAK lookup; the service keeps answering
    let status = match system_health.status {
        SystemStatus::Healthy | SystemStatus::Degraded => StatusCode::OK,
        SystemStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

/// Factory function to create the health state for the router
pub fn create_health_service(state: &AppState) -> HealthState {
    HealthState {
        service: Arc::new(HealthService::new(state.assessments.clone(), state.jak.len())),
        environment: state.environment.clone(),
    }
}
