use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::category::CategoryResult;
use crate::i18n::Locale;
use crate::services::classifier;

/// Blood sugar test type. Each type has its own unit and bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SugarTestType {
    /// Random blood sugar
    Rbs,
    /// Fasting blood sugar
    Fbs,
    /// Post-prandial blood sugar
    Ppbs,
    /// Glycated hemoglobin
    Hba1c,
}

impl SugarTestType {
    pub const ALL: [SugarTestType; 4] = [
        SugarTestType::Rbs,
        SugarTestType::Fbs,
        SugarTestType::Ppbs,
        SugarTestType::Hba1c,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SugarTestType::Rbs => "rbs",
            SugarTestType::Fbs => "fbs",
            SugarTestType::Ppbs => "ppbs",
            SugarTestType::Hba1c => "hba1c",
        }
    }

    /// Unit the value is entered in
    pub const fn unit(self) -> &'static str {
        match self {
            SugarTestType::Hba1c => "%",
            _ => "mg/dL",
        }
    }

    /// Localization key of the test name
    pub const fn label_key(self) -> &'static str {
        match self {
            SugarTestType::Rbs => "step2_sugar_rbs",
            SugarTestType::Fbs => "step2_sugar_fbs",
            SugarTestType::Ppbs => "step2_sugar_ppbs",
            SugarTestType::Hba1c => "step2_sugar_hba1c",
        }
    }
}

impl fmt::Display for SugarTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SugarTestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rbs" => Ok(SugarTestType::Rbs),
            "fbs" => Ok(SugarTestType::Fbs),
            "ppbs" => Ok(SugarTestType::Ppbs),
            "hba1c" => Ok(SugarTestType::Hba1c),
            other => Err(format!("Unknown sugar test type: {}", other)),
        }
    }
}

/// Height and weight as submitted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BiometricInput {
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl BiometricInput {
    /// BMI rounded to one decimal; `None` outside the plausible ranges
    pub fn bmi(&self) -> Option<f64> {
        classifier::compute_bmi(self.height_cm, self.weight_kg)
    }
}

/// A complete blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BloodPressureReading {
    pub systolic: f64,
    pub diastolic: f64,
}

/// A complete blood sugar reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SugarReading {
    pub test_type: SugarTestType,
    pub value: f64,
}

/// State of an optional reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ReadingEntry<T> {
    /// Nothing typed yet
    NotEntered,
    /// The user explicitly skipped this reading
    Skipped,
    /// All required fields present
    Entered(T),
}

impl<T> ReadingEntry<T> {
    pub fn entered(&self) -> Option<&T> {
        match self {
            ReadingEntry::Entered(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ReadingEntry::Skipped)
    }
}

/// Values derived from the raw answers; recomputed on every update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DerivedFlags {
    pub bmi: Option<f64>,
    pub bp_entered: bool,
    pub sugar_entered: bool,
    pub bp_elevated: bool,
    pub sugar_elevated: bool,
}

impl DerivedFlags {
    /// Whether any reading should route the user to the advisory screen
    pub fn should_block(&self) -> bool {
        self.bp_elevated || self.sugar_elevated
    }
}

/// All answers collected during one wizard session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentRecord {
    pub id: String,
    pub locale: Locale,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub blood_pressure: ReadingEntry<BloodPressureReading>,
    pub sugar: ReadingEntry<SugarReading>,
    pub derived: DerivedFlags,
}

/// Partial record; every present field replaces the current one
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssessmentUpdate {
    pub locale: Option<Locale>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub blood_pressure: Option<ReadingEntry<BloodPressureReading>>,
    pub sugar: Option<ReadingEntry<SugarReading>>,
}

impl AssessmentRecord {
    /// Empty record for a session starting now
    pub fn new(id: impl Into<String>, locale: Locale) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            locale,
            created_at: now,
            updated_at: now,
            height_cm: None,
            weight_kg: None,
            blood_pressure: ReadingEntry::NotEntered,
            sugar: ReadingEntry::NotEntered,
            derived: DerivedFlags::default(),
        }
    }

    /// Shallow-merge `update` into the record and recompute derived flags.
    /// No validation happens here.
    pub fn update_data(&mut self, update: AssessmentUpdate) {
        if let Some(locale) = update.locale {
            self.locale = locale;
        }
        if let Some(height) = update.height_cm {
            self.height_cm = Some(height);
        }
        if let Some(weight) = update.weight_kg {
            self.weight_kg = Some(weight);
        }
        if let Some(bp) = update.blood_pressure {
            self.blood_pressure = bp;
        }
        if let Some(sugar) = update.sugar {
            self.sugar = sugar;
        }
        self.updated_at = Utc::now();
        self.refresh_derived();
    }

    /// Recompute `derived` from the raw answers
    pub fn refresh_derived(&mut self) {
        let bmi = self.biometrics().and_then(|input| input.bmi());

        let bp = self.blood_pressure.entered().copied();
        let sugar = self.sugar.entered().copied();

        self.derived = DerivedFlags {
            bmi,
            bp_entered: bp
                .map(|r| classifier::classify_bp(r.systolic, r.diastolic).is_some())
                .unwrap_or(false),
            sugar_entered: sugar
                .map(|r| classifier::classify_sugar(r.test_type, r.value).is_some())
                .unwrap_or(false),
            bp_elevated: classifier::is_bp_elevated(
                bp.map(|r| r.systolic),
                bp.map(|r| r.diastolic),
            ),
            sugar_elevated: classifier::is_sugar_elevated(
                sugar.map(|r| r.test_type),
                sugar.map(|r| r.value),
            ),
        };
    }

    /// Height and weight, once both are answered
    pub fn biometrics(&self) -> Option<BiometricInput> {
        Some(BiometricInput {
            height_cm: self.height_cm?,
            weight_kg: self.weight_kg?,
        })
    }

    /// BMI category for the current height and weight, if both are usable
    pub fn bmi_category(&self) -> Option<CategoryResult> {
        self.derived.bmi.and_then(classifier::classify_bmi)
    }

    pub fn bp_category(&self) -> Option<CategoryResult> {
        self.blood_pressure
            .entered()
            .and_then(|r| classifier::classify_bp(r.systolic, r.diastolic))
    }

    pub fn sugar_category(&self) -> Option<CategoryResult> {
        self.sugar
            .entered()
            .and_then(|r| classifier::classify_sugar(r.test_type, r.value))
    }
}
