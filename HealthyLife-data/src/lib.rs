// HealthyLife Data
// This crate handles session-scoped storage and reference datasets

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
