use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use healthy_life_domain::entities::{CategoryResult, Color, SugarTestType, Tier};
use healthy_life_domain::i18n::Translator;

/// Height and weight to classify
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BmiRequest {
    /// Height in centimetres (50-300)
    pub height_cm: f64,
    /// Weight in kilograms (10-500)
    pub weight_kg: f64,
}

/// Blood pressure reading to classify, in mmHg
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BloodPressureRequest {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Blood sugar reading to classify
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SugarRequest {
    pub test_type: SugarTestType,
    /// mg/dL, or % for hba1c
    pub value: f64,
}

/// A category with its labels resolved for the request locale
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryView {
    pub label_key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: Color,
    pub tier: Tier,
}

impl CategoryView {
    pub fn localized(result: &CategoryResult, translator: &Translator) -> Self {
        Self {
            label: translator.t(&result.label_key),
            label_key: result.label_key.clone(),
            description: result.description_key.as_deref().map(|key| translator.t(key)),
            description_key: result.description_key.clone(),
            color: result.color,
            tier: result.tier,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BmiClassification {
    pub bmi: f64,
    /// e.g. "Your BMI is 24.2 (Normal)"
    pub summary: String,
    pub category: CategoryView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BloodPressureClassification {
    pub systolic: f64,
    pub diastolic: f64,
    /// Whether this reading routes to the advisory screen
    pub elevated: bool,
    pub category: CategoryView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SugarClassification {
    pub test_type: SugarTestType,
    pub value: f64,
    pub unit: String,
    /// Whether this reading routes to the advisory screen
    pub elevated: bool,
    pub category: CategoryView,
}
