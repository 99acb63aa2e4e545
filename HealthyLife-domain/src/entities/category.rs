use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Ordered severity level shared by every classification.
///
/// The derived ordering is the severity ordering, so `tier >= Tier::High`
/// reads as "at least high".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Normal,
    Caution,
    Elevated,
    High,
    Critical,
}

impl Tier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Caution => "caution",
            Tier::Elevated => "elevated",
            Tier::High => "high",
            Tier::Critical => "critical",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color of a category badge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Sky,
    Emerald,
    Amber,
    Orange,
    Rose,
    Red,
}

/// Result of classifying one measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CategoryResult {
    /// Localization key of the category label (e.g., "bmi_category_normal")
    pub label_key: String,

    /// Localization key of a longer description, when the category has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,

    /// Badge color
    pub color: Color,

    /// Severity tier
    pub tier: Tier,
}
