use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Entry status value for a reading that was never filled in
pub const STATUS_NOT_ENTERED: &str = "not_entered";

/// Entry status value for a reading the user chose to skip
pub const STATUS_SKIPPED: &str = "skipped";

/// Entry status value for a reading with all required fields present
pub const STATUS_ENTERED: &str = "entered";

/// Storage model for one in-progress self-assessment
///
/// Derived values (BMI, elevated flags) are not stored; they are
/// recomputed by the domain layer whenever a record is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredAssessment {
    /// Session identifier
    pub id: String,

    /// Locale code chosen for the session (e.g., "en", "ml")
    pub locale: String,

    /// When the session was started
    pub created_at: DateTime<Utc>,

    /// When the record was last written
    pub updated_at: DateTime<Utc>,

    /// Height in centimetres
    pub height_cm: Option<f64>,

    /// Weight in kilograms
    pub weight_kg: Option<f64>,

    /// One of the `STATUS_*` values
    pub bp_status: String,

    /// Systolic pressure, present only when `bp_status` is entered
    pub systolic: Option<f64>,

    /// Diastolic pressure, present only when `bp_status` is entered
    pub diastolic: Option<f64>,

    /// One of the `STATUS_*` values
    pub sugar_status: String,

    /// Sugar test type code (rbs, fbs, ppbs, hba1c)
    pub sugar_type: Option<String>,

    /// Sugar value in the unit of the test type
    pub sugar_value: Option<f64>,
}

impl StoredAssessment {
    /// Create an empty record for a new session
    pub fn new(id: String, locale: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            locale,
            created_at: now,
            updated_at: now,
            height_cm: None,
            weight_kg: None,
            bp_status: STATUS_NOT_ENTERED.to_string(),
            systolic: None,
            diastolic: None,
            sugar_status: STATUS_NOT_ENTERED.to_string(),
            sugar_type: None,
            sugar_value: None,
        }
    }
}
