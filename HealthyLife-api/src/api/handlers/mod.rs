pub mod assessment;
pub mod classify;
pub mod health;
pub mod jak;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use assessment::{
    end_assessment, get_assessment, preview_measurements, start_assessment, submit_measurements,
    update_assessment,
};
pub use classify::{classify_blood_pressure, classify_bmi, classify_sugar};
pub use health::health_check;
pub use jak::{list_jak, nearby_jak};
