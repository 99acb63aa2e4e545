//! Measurement step of the self-assessment wizard.
//!
//! The step moves `Editing -> Validating -> Submitted(route)`. A failed
//! validation returns to `Editing` with per-field errors; any edit after a
//! submission also returns to `Editing`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::assessment::{
    AssessmentRecord, AssessmentUpdate, BloodPressureReading, ReadingEntry, SugarReading,
    SugarTestType,
};
use crate::entities::category::CategoryResult;
use crate::i18n::Translator;
use crate::services::classifier::{
    classify_bmi, classify_bp, classify_sugar, compute_bmi, is_bp_elevated, is_sugar_elevated,
    parse_measurement,
};

/// Form fields that can carry a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Height,
    Weight,
    Systolic,
    Diastolic,
    SugarValue,
}

impl FormField {
    pub const fn as_str(self) -> &'static str {
        match self {
            FormField::Height => "height",
            FormField::Weight => "weight",
            FormField::Systolic => "systolic",
            FormField::Diastolic => "diastolic",
            FormField::SugarValue => "sugar_value",
        }
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required field left empty
    Missing,
    /// Not a number, or outside the plausible physiological range
    OutOfRange,
    /// One half of a required pair given without the other
    IncompletePair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ValidationErrorKind,
    /// Localization key of the message shown under the field
    pub message_key: &'static str,
}

/// Field-level validation errors, ordered by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    fn insert(&mut self, field: FormField, kind: ValidationErrorKind, message_key: &'static str) {
        self.0.insert(field, FieldError { kind, message_key });
    }

    /// Field name to translated message
    pub fn localize(&self, translator: &Translator) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, error)| (field.as_str().to_string(), translator.t(error.message_key)))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, error)| format!("{}: {}", field.as_str(), error.message_key))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// An optional form section: open for input, or explicitly skipped.
/// Skipping drops whatever was typed into the section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionInput<T> {
    Open(T),
    Skipped,
}

impl<T: Default> Default for SectionInput<T> {
    fn default() -> Self {
        SectionInput::Open(T::default())
    }
}

impl<T> SectionInput<T> {
    pub fn open(&self) -> Option<&T> {
        match self {
            SectionInput::Open(fields) => Some(fields),
            SectionInput::Skipped => None,
        }
    }

    fn open_mut(&mut self) -> Option<&mut T> {
        match self {
            SectionInput::Open(fields) => Some(fields),
            SectionInput::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SectionInput::Skipped)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BloodPressureFields {
    pub systolic: String,
    pub diastolic: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SugarFields {
    pub test_type: Option<SugarTestType>,
    pub value: String,
}

/// Raw input of the measurement step, as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementsForm {
    pub height: String,
    pub weight: String,
    pub blood_pressure: SectionInput<BloodPressureFields>,
    pub sugar: SectionInput<SugarFields>,
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl MeasurementsForm {
    /// Form pre-filled from earlier answers
    pub fn from_record(record: &AssessmentRecord) -> Self {
        let blood_pressure = match record.blood_pressure {
            ReadingEntry::Skipped => SectionInput::Skipped,
            ReadingEntry::Entered(reading) => SectionInput::Open(BloodPressureFields {
                systolic: reading.systolic.to_string(),
                diastolic: reading.diastolic.to_string(),
            }),
            ReadingEntry::NotEntered => SectionInput::default(),
        };
        let sugar = match record.sugar {
            ReadingEntry::Skipped => SectionInput::Skipped,
            ReadingEntry::Entered(reading) => SectionInput::Open(SugarFields {
                test_type: Some(reading.test_type),
                value: reading.value.to_string(),
            }),
            ReadingEntry::NotEntered => SectionInput::default(),
        };

        Self {
            height: format_number(record.height_cm),
            weight: format_number(record.weight_kg),
            blood_pressure,
            sugar,
        }
    }

    fn bp_values(&self) -> (Option<f64>, Option<f64>) {
        match self.blood_pressure.open() {
            Some(fields) => (parse_measurement(&fields.systolic), parse_measurement(&fields.diastolic)),
            None => (None, None),
        }
    }

    fn sugar_values(&self) -> (Option<SugarTestType>, Option<f64>) {
        match self.sugar.open() {
            Some(fields) => (fields.test_type, parse_measurement(&fields.value)),
            None => (None, None),
        }
    }

    fn bp_entry(&self) -> ReadingEntry<BloodPressureReading> {
        if self.blood_pressure.is_skipped() {
            return ReadingEntry::Skipped;
        }
        match self.bp_values() {
            (Some(systolic), Some(diastolic)) => {
                ReadingEntry::Entered(BloodPressureReading { systolic, diastolic })
            }
            _ => ReadingEntry::NotEntered,
        }
    }

    fn sugar_entry(&self) -> ReadingEntry<SugarReading> {
        if self.sugar.is_skipped() {
            return ReadingEntry::Skipped;
        }
        match self.sugar_values() {
            (Some(test_type), Some(value)) => ReadingEntry::Entered(SugarReading { test_type, value }),
            _ => ReadingEntry::NotEntered,
        }
    }
}

/// Range checks on the numbers that parsed
#[derive(Debug, Validate)]
struct BodyMeasurements {
    #[validate(range(min = 50.0, max = 300.0))]
    height_cm: Option<f64>,

    #[validate(range(min = 10.0, max = 500.0))]
    weight_kg: Option<f64>,
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Categories computed while the user types
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LivePreview {
    pub bmi: Option<f64>,
    pub bmi_category: Option<CategoryResult>,
    pub bp_status: Option<CategoryResult>,
    pub sugar_status: Option<CategoryResult>,
    pub should_block: bool,
}

/// Where the wizard goes after a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum StepRoute {
    /// Blocking advisory screen
    Advisory,
    /// Next wizard step
    NextStep,
}

impl StepRoute {
    pub const fn as_str(self) -> &'static str {
        match self {
            StepRoute::Advisory => "advisory",
            StepRoute::NextStep => "next-step",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            StepRoute::Advisory => "/assessment/step-2/advisory",
            StepRoute::NextStep => "/assessment/step-3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Editing,
    Validating,
    Submitted(StepRoute),
}

/// Controller for the measurement step
#[derive(Debug, Clone)]
pub struct MeasurementStep {
    form: MeasurementsForm,
    state: StepState,
    errors: FieldErrors,
}

impl Default for MeasurementStep {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementStep {
    pub fn new() -> Self {
        Self::with_form(MeasurementsForm::default())
    }

    pub fn with_form(form: MeasurementsForm) -> Self {
        Self {
            form,
            state: StepState::Editing,
            errors: FieldErrors::default(),
        }
    }

    /// Step pre-filled from earlier answers
    pub fn from_record(record: &AssessmentRecord) -> Self {
        Self::with_form(MeasurementsForm::from_record(record))
    }

    pub fn form(&self) -> &MeasurementsForm {
        &self.form
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// Errors from the last failed submission
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn edit(&mut self, apply: impl FnOnce(&mut MeasurementsForm)) {
        apply(&mut self.form);
        self.state = StepState::Editing;
    }

    pub fn set_height(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit(|form| form.height = raw);
    }

    pub fn set_weight(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit(|form| form.weight = raw);
    }

    /// Ignored while the blood pressure section is skipped
    pub fn set_systolic(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit(|form| {
            if let Some(fields) = form.blood_pressure.open_mut() {
                fields.systolic = raw;
            }
        });
    }

    /// Ignored while the blood pressure section is skipped
    pub fn set_diastolic(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit(|form| {
            if let Some(fields) = form.blood_pressure.open_mut() {
                fields.diastolic = raw;
            }
        });
    }

    /// Ignored while the sugar section is skipped
    pub fn set_sugar_type(&mut self, test_type: Option<SugarTestType>) {
        self.edit(|form| {
            if let Some(fields) = form.sugar.open_mut() {
                fields.test_type = test_type;
            }
        });
    }

    /// Ignored while the sugar section is skipped
    pub fn set_sugar_value(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit(|form| {
            if let Some(fields) = form.sugar.open_mut() {
                fields.value = raw;
            }
        });
    }

    /// Skip blood pressure, discarding typed values
    pub fn skip_blood_pressure(&mut self) {
        debug!("Blood pressure section skipped");
        self.edit(|form| form.blood_pressure = SectionInput::Skipped);
    }

    /// Re-open a skipped blood pressure section with empty fields
    pub fn enable_blood_pressure(&mut self) {
        self.edit(|form| {
            if form.blood_pressure.is_skipped() {
                form.blood_pressure = SectionInput::default();
            }
        });
    }

    /// Skip blood sugar, discarding the selected test and value
    pub fn skip_sugar(&mut self) {
        debug!("Blood sugar section skipped");
        self.edit(|form| form.sugar = SectionInput::Skipped);
    }

    /// Re-open a skipped sugar section with nothing selected
    pub fn enable_sugar(&mut self) {
        self.edit(|form| {
            if form.sugar.is_skipped() {
                form.sugar = SectionInput::default();
            }
        });
    }

    /// Submission is offered only once height and weight have text
    pub fn can_submit(&self) -> bool {
        !self.form.height.is_empty() && !self.form.weight.is_empty()
    }

    /// Categories for whatever has been typed so far
    pub fn preview(&self) -> LivePreview {
        let bmi = match (parse_measurement(&self.form.height), parse_measurement(&self.form.weight)) {
            (Some(height), Some(weight)) => compute_bmi(height, weight),
            _ => None,
        };
        let (systolic, diastolic) = self.form.bp_values();
        let (test_type, sugar_value) = self.form.sugar_values();

        LivePreview {
            bmi,
            bmi_category: bmi.and_then(classify_bmi),
            bp_status: systolic.zip(diastolic).and_then(|(s, d)| classify_bp(s, d)),
            sugar_status: test_type.zip(sugar_value).and_then(|(t, v)| classify_sugar(t, v)),
            should_block: is_bp_elevated(systolic, diastolic)
                || is_sugar_elevated(test_type, sugar_value),
        }
    }

    /// Check the form without changing state
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        let form = &self.form;

        let height = required_number(&mut errors, &form.height, FormField::Height, "step2_height_error", "step2_height_error_invalid");
        let weight = required_number(&mut errors, &form.weight, FormField::Weight, "step2_weight_error", "step2_weight_error_invalid");

        let body = BodyMeasurements {
            height_cm: height,
            weight_kg: weight,
        };
        if let Err(range_errors) = body.validate() {
            for field in range_errors.field_errors().keys() {
                match *field {
                    "height_cm" => errors.insert(FormField::Height, ValidationErrorKind::OutOfRange, "step2_height_error_invalid"),
                    "weight_kg" => errors.insert(FormField::Weight, ValidationErrorKind::OutOfRange, "step2_weight_error_invalid"),
                    _ => {}
                }
            }
        }

        if let Some(bp) = form.blood_pressure.open() {
            let has_systolic = !bp.systolic.is_empty();
            let has_diastolic = !bp.diastolic.is_empty();
            if has_systolic && !has_diastolic {
                errors.insert(FormField::Diastolic, ValidationErrorKind::IncompletePair, "step2_bp_diastolic_error");
            }
            if has_diastolic && !has_systolic {
                errors.insert(FormField::Systolic, ValidationErrorKind::IncompletePair, "step2_bp_systolic_error");
            }
        }

        if let Some(sugar) = form.sugar.open() {
            if sugar.test_type.is_some() && sugar.value.is_empty() {
                errors.insert(FormField::SugarValue, ValidationErrorKind::Missing, "step2_sugar_value_error");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, write the answers into `record`, and decide where to go next
    pub fn submit(&mut self, record: &mut AssessmentRecord) -> Result<StepRoute, FieldErrors> {
        self.state = StepState::Validating;

        if let Err(errors) = self.validate() {
            debug!("Measurement step rejected: {}", errors);
            self.errors = errors.clone();
            self.state = StepState::Editing;
            return Err(errors);
        }

        let preview = self.preview();
        record.update_data(AssessmentUpdate {
            locale: None,
            height_cm: parse_measurement(&self.form.height),
            weight_kg: parse_measurement(&self.form.weight),
            blood_pressure: Some(self.form.bp_entry()),
            sugar: Some(self.form.sugar_entry()),
        });

        let route = if preview.should_block {
            StepRoute::Advisory
        } else {
            StepRoute::NextStep
        };
        debug!("Measurement step submitted, routing to {}", route.as_str());

        self.errors = FieldErrors::default();
        self.state = StepState::Submitted(route);
        Ok(route)
    }
}

/// Parse a required numeric field, recording a missing or invalid error
fn required_number(
    errors: &mut FieldErrors,
    raw: &str,
    field: FormField,
    missing_key: &'static str,
    invalid_key: &'static str,
) -> Option<f64> {
    // only an empty field is missing; blanks are an unreadable value
    if raw.is_empty() {
        errors.insert(field, ValidationErrorKind::Missing, missing_key);
        return None;
    }
    let value = parse_number(raw);
    if value.is_none() {
        errors.insert(field, ValidationErrorKind::OutOfRange, invalid_key);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category::Tier;
    use crate::i18n::Locale;

    fn step_with_body(height: &str, weight: &str) -> MeasurementStep {
        let mut step = MeasurementStep::new();
        step.set_height(height);
        step.set_weight(weight);
        step
    }

    #[test]
    fn test_valid_submission_advances() {
        let mut step = step_with_body("170", "70");
        let mut record = AssessmentRecord::new("s1", Locale::En);

        let route = step.submit(&mut record).unwrap();

        assert_eq!(route, StepRoute::NextStep);
        assert_eq!(step.state(), StepState::Submitted(StepRoute::NextStep));
        assert_eq!(record.derived.bmi, Some(24.2));
        assert_eq!(record.blood_pressure, ReadingEntry::NotEntered);
        assert!(!record.derived.bp_entered);
    }

    #[test]
    fn test_missing_and_invalid_body_fields() {
        let step = step_with_body("", "abc");
        let errors = step.validate().unwrap_err();

        let height = errors.get(FormField::Height).unwrap();
        assert_eq!(height.kind, ValidationErrorKind::Missing);
        assert_eq!(height.message_key, "step2_height_error");

        let weight = errors.get(FormField::Weight).unwrap();
        assert_eq!(weight.kind, ValidationErrorKind::OutOfRange);
        assert_eq!(weight.message_key, "step2_weight_error_invalid");
    }

    #[test]
    fn test_blank_body_fields_are_unreadable_not_missing() {
        let step = step_with_body("  ", " ");
        assert!(step.can_submit());

        let errors = step.validate().unwrap_err();
        let height = errors.get(FormField::Height).unwrap();
        assert_eq!(height.kind, ValidationErrorKind::OutOfRange);
        assert_eq!(height.message_key, "step2_height_error_invalid");
        assert_eq!(
            errors.get(FormField::Weight).unwrap().message_key,
            "step2_weight_error_invalid"
        );
    }

    #[test]
    fn test_body_ranges_are_inclusive() {
        assert!(step_with_body("50", "10").validate().is_ok());
        assert!(step_with_body("300", "500").validate().is_ok());

        let errors = step_with_body("49.9", "500.1").validate().unwrap_err();
        assert_eq!(errors.get(FormField::Height).unwrap().kind, ValidationErrorKind::OutOfRange);
        assert_eq!(errors.get(FormField::Weight).unwrap().kind, ValidationErrorKind::OutOfRange);

        let errors = step_with_body("0", "-4").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_systolic_without_diastolic_is_rejected() {
        let mut step = step_with_body("170", "70");
        step.set_systolic("120");
        let mut record = AssessmentRecord::new("s1", Locale::En);

        let errors = step.submit(&mut record).unwrap_err();

        let diastolic = errors.get(FormField::Diastolic).unwrap();
        assert_eq!(diastolic.kind, ValidationErrorKind::IncompletePair);
        assert_eq!(diastolic.message_key, "step2_bp_diastolic_error");
        assert!(errors.get(FormField::Systolic).is_none());
        assert_eq!(step.state(), StepState::Editing);
        assert_eq!(step.errors(), &errors);
        // nothing was written
        assert_eq!(record.height_cm, None);
    }

    #[test]
    fn test_sugar_type_requires_value() {
        let mut step = step_with_body("170", "70");
        step.set_sugar_type(Some(SugarTestType::Fbs));

        let errors = step.validate().unwrap_err();
        assert_eq!(errors.get(FormField::SugarValue).unwrap().kind, ValidationErrorKind::Missing);

        // a value with no test type is simply ignored
        let mut step = step_with_body("170", "70");
        step.set_sugar_value("180");
        assert!(step.validate().is_ok());
    }

    #[test]
    fn test_elevated_bp_routes_to_advisory() {
        let mut step = step_with_body("170", "70");
        step.set_systolic("150");
        step.set_diastolic("95");
        let mut record = AssessmentRecord::new("s1", Locale::En);

        assert!(step.preview().should_block);
        let route = step.submit(&mut record).unwrap();

        assert_eq!(route, StepRoute::Advisory);
        assert_eq!(route.path(), "/assessment/step-2/advisory");
        assert!(record.derived.bp_entered);
        assert!(record.derived.bp_elevated);
    }

    #[test]
    fn test_elevated_hba1c_routes_to_advisory() {
        let mut step = step_with_body("170", "70");
        step.set_sugar_type(Some(SugarTestType::Hba1c));
        step.set_sugar_value("5.0");
        assert_eq!(step.preview().sugar_status.map(|c| c.tier), Some(Tier::Normal));
        assert!(!step.preview().should_block);

        step.set_sugar_value("7.0");
        let mut record = AssessmentRecord::new("s1", Locale::En);
        assert_eq!(step.submit(&mut record).unwrap(), StepRoute::Advisory);
        assert!(record.derived.sugar_elevated);
    }

    #[test]
    fn test_skip_discards_values_and_reenable_starts_empty() {
        let mut step = step_with_body("170", "70");
        step.set_systolic("150");
        step.set_diastolic("95");

        step.skip_blood_pressure();
        assert!(step.form().blood_pressure.is_skipped());
        assert!(!step.preview().should_block);

        // typing into a skipped section does nothing
        step.set_systolic("200");
        assert!(step.form().blood_pressure.is_skipped());

        step.enable_blood_pressure();
        assert_eq!(step.form().blood_pressure, SectionInput::Open(BloodPressureFields::default()));
    }

    #[test]
    fn test_skipped_sections_are_recorded_as_skipped() {
        let mut step = step_with_body("170", "70");
        step.skip_blood_pressure();
        step.skip_sugar();
        let mut record = AssessmentRecord::new("s1", Locale::En);

        step.submit(&mut record).unwrap();

        assert!(record.blood_pressure.is_skipped());
        assert!(record.sugar.is_skipped());
        assert!(!record.derived.bp_entered);
        assert!(!record.derived.sugar_entered);
    }

    #[test]
    fn test_edit_after_submit_returns_to_editing() {
        let mut step = step_with_body("170", "70");
        let mut record = AssessmentRecord::new("s1", Locale::En);
        step.submit(&mut record).unwrap();

        step.set_weight("90");
        assert_eq!(step.state(), StepState::Editing);
        assert_eq!(step.preview().bmi, Some(31.1));
        assert_eq!(
            step.preview().bmi_category.map(|c| c.label_key),
            Some("bmi_category_obese_1".to_string())
        );
    }

    #[test]
    fn test_from_record_prefills_form() {
        let mut record = AssessmentRecord::new("s1", Locale::En);
        let mut step = step_with_body("165", "60");
        step.set_sugar_type(Some(SugarTestType::Rbs));
        step.set_sugar_value("110");
        step.skip_blood_pressure();
        step.submit(&mut record).unwrap();

        let restored = MeasurementStep::from_record(&record);
        assert_eq!(restored.form().height, "165");
        assert_eq!(restored.form().weight, "60");
        assert!(restored.form().blood_pressure.is_skipped());
        assert_eq!(
            restored.form().sugar.open().and_then(|s| s.test_type),
            Some(SugarTestType::Rbs)
        );
        assert!(restored.can_submit());
        assert!(!MeasurementStep::new().can_submit());
    }

    #[test]
    fn test_errors_localize() {
        let errors = step_with_body("", "").validate().unwrap_err();
        let messages = errors.localize(&Translator::new(Locale::En));

        assert_eq!(messages.get("height").map(String::as_str), Some("Please enter your height"));
        assert_eq!(messages.get("weight").map(String::as_str), Some("Please enter your weight"));
        assert_eq!(errors.to_string(), "height: step2_height_error; weight: step2_weight_error");
    }
}
