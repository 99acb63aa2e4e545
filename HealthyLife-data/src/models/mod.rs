// Storage models
pub mod assessment;
pub mod jak;
