// HealthyLife-api lib.rs
//
// HTTP surface for the self-assessment: classification, session state,
// the measurement step and the JAK directory.

// Public modules
pub mod analytics;
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;

use axum::Router;

use crate::config::AppConfig;

/// Create the application router and its shared state from configuration
pub fn create_application(config: &AppConfig) -> anyhow::Result<(Router, api::routes::AppState)> {
    let state = api::routes::create_state(config)?;
    let app = api::routes::create_app(state.clone());
    Ok((app, state))
}
