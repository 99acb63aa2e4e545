// HealthyLife Domain
// Classification rules, assessment state and the measurement step of the wizard

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Localized message catalogs
pub mod i18n;

// Health checks and system status
pub mod health;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
