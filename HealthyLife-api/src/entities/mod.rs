// Public entities for the HealthyLife API
// Request and response bodies exposed at the HTTP boundary

// Classification requests and localized category views
pub mod classify;

// Assessment sessions and the measurement step
pub mod assessment;

// JAK directory listings
pub mod jak;

// Common entities for error handling
pub mod common;
