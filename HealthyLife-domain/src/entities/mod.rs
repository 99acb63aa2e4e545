pub mod assessment;
pub mod category;
pub mod conversions;
pub mod jak;

// Re-export common types for easier imports
pub use assessment::{
    AssessmentRecord, AssessmentUpdate, BiometricInput, BloodPressureReading, DerivedFlags,
    ReadingEntry, SugarReading, SugarTestType,
};
pub use category::{CategoryResult, Color, Tier};
pub use jak::{JakEntry, JakWithDistance};
