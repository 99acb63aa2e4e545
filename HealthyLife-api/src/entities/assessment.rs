use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use healthy_life_domain::entities::{
    AssessmentRecord, AssessmentUpdate, BloodPressureReading, CategoryResult, ReadingEntry,
    SugarReading, SugarTestType,
};
use healthy_life_domain::i18n::{Locale, Translator};
use healthy_life_domain::services::wizard::{
    BloodPressureFields, LivePreview, MeasurementsForm, SectionInput, StepRoute, SugarFields,
};

use super::classify::CategoryView;

/// Status of an optional reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    NotEntered,
    Skipped,
    Entered,
}

impl<T> From<&ReadingEntry<T>> for ReadingStatus {
    fn from(entry: &ReadingEntry<T>) -> Self {
        match entry {
            ReadingEntry::NotEntered => ReadingStatus::NotEntered,
            ReadingEntry::Skipped => ReadingStatus::Skipped,
            ReadingEntry::Entered(_) => ReadingStatus::Entered,
        }
    }
}

/// Body of `POST /api/v1/assessments`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StartAssessmentRequest {
    /// Session locale; defaults to the request locale
    pub locale: Option<Locale>,
}

/// Partial update of a session; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAssessmentRequest {
    pub locale: Option<Locale>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bp_status: Option<ReadingStatus>,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub sugar_status: Option<ReadingStatus>,
    pub sugar_type: Option<SugarTestType>,
    pub sugar_value: Option<f64>,
}

impl UpdateAssessmentRequest {
    /// Domain update; an `entered` status needs every value of its reading
    pub fn into_update(self) -> Result<AssessmentUpdate, String> {
        let blood_pressure = match self.bp_status {
            None => None,
            Some(ReadingStatus::NotEntered) => Some(ReadingEntry::NotEntered),
            Some(ReadingStatus::Skipped) => Some(ReadingEntry::Skipped),
            Some(ReadingStatus::Entered) => match (self.systolic, self.diastolic) {
                (Some(systolic), Some(diastolic)) => {
                    Some(ReadingEntry::Entered(BloodPressureReading { systolic, diastolic }))
                }
                _ => return Err("systolic and diastolic are required when bp_status is entered".to_string()),
            },
        };

        let sugar = match self.sugar_status {
            None => None,
            Some(ReadingStatus::NotEntered) => Some(ReadingEntry::NotEntered),
            Some(ReadingStatus::Skipped) => Some(ReadingEntry::Skipped),
            Some(ReadingStatus::Entered) => match (self.sugar_type, self.sugar_value) {
                (Some(test_type), Some(value)) => Some(ReadingEntry::Entered(SugarReading { test_type, value })),
                _ => return Err("sugar_type and sugar_value are required when sugar_status is entered".to_string()),
            },
        };

        Ok(AssessmentUpdate {
            locale: self.locale,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            blood_pressure,
            sugar,
        })
    }
}

/// A session record with derived values and localized categories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    pub id: String,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bp_status: ReadingStatus,
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub sugar_status: ReadingStatus,
    pub sugar_type: Option<SugarTestType>,
    pub sugar_value: Option<f64>,
    pub bmi: Option<f64>,
    pub bmi_category: Option<CategoryView>,
    pub bp_category: Option<CategoryView>,
    pub sugar_category: Option<CategoryView>,
    pub bp_elevated: bool,
    pub sugar_elevated: bool,
    /// Whether the answers route to the advisory screen
    pub should_block: bool,
}

impl AssessmentResponse {
    pub fn from_record(record: &AssessmentRecord) -> Self {
        let translator = Translator::new(record.locale);
        let bp = record.blood_pressure.entered();
        let sugar = record.sugar.entered();

        Self {
            id: record.id.clone(),
            locale: record.locale,
            created_at: record.created_at,
            updated_at: record.updated_at,
            height_cm: record.height_cm,
            weight_kg: record.weight_kg,
            bp_status: ReadingStatus::from(&record.blood_pressure),
            systolic: bp.map(|r| r.systolic),
            diastolic: bp.map(|r| r.diastolic),
            sugar_status: ReadingStatus::from(&record.sugar),
            sugar_type: sugar.map(|r| r.test_type),
            sugar_value: sugar.map(|r| r.value),
            bmi: record.derived.bmi,
            bmi_category: record.bmi_category().map(|c| CategoryView::localized(&c, &translator)),
            bp_category: record.bp_category().map(|c| CategoryView::localized(&c, &translator)),
            sugar_category: record.sugar_category().map(|c| CategoryView::localized(&c, &translator)),
            bp_elevated: record.derived.bp_elevated,
            sugar_elevated: record.derived.sugar_elevated,
            should_block: record.derived.should_block(),
        }
    }
}

/// Raw measurement step input, as typed into the form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MeasurementsRequest {
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub skip_blood_pressure: bool,
    #[serde(default)]
    pub systolic: String,
    #[serde(default)]
    pub diastolic: String,
    #[serde(default)]
    pub skip_sugar: bool,
    pub sugar_type: Option<SugarTestType>,
    #[serde(default)]
    pub sugar_value: String,
}

impl MeasurementsRequest {
    /// Skipped sections drop whatever values came with them
    pub fn into_form(self) -> MeasurementsForm {
        let blood_pressure = if self.skip_blood_pressure {
            SectionInput::Skipped
        } else {
            SectionInput::Open(BloodPressureFields {
                systolic: self.systolic,
                diastolic: self.diastolic,
            })
        };
        let sugar = if self.skip_sugar {
            SectionInput::Skipped
        } else {
            SectionInput::Open(SugarFields {
                test_type: self.sugar_type,
                value: self.sugar_value,
            })
        };

        MeasurementsForm {
            height: self.height,
            weight: self.weight,
            blood_pressure,
            sugar,
        }
    }
}

/// Result of a successful measurement submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeasurementsResponse {
    /// "advisory" or "next-step"
    pub route: StepRoute,
    /// Path of the next screen
    pub redirect_to: String,
    pub assessment: AssessmentResponse,
}

/// Live categories for a form that has not been submitted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub bmi: Option<f64>,
    pub bmi_category: Option<CategoryView>,
    pub bp_status: Option<CategoryView>,
    pub sugar_status: Option<CategoryView>,
    pub should_block: bool,
    /// Whether the form has enough input to be submitted
    pub can_submit: bool,
}

impl PreviewResponse {
    pub fn localized(preview: &LivePreview, can_submit: bool, translator: &Translator) -> Self {
        let view = |c: &Option<CategoryResult>| c.as_ref().map(|c| CategoryView::localized(c, translator));
        Self {
            bmi: preview.bmi,
            bmi_category: view(&preview.bmi_category),
            bp_status: view(&preview.bp_status),
            sugar_status: view(&preview.sugar_status),
            should_block: preview.should_block,
            can_submit,
        }
    }
}
