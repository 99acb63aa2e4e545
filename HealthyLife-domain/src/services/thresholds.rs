//! Reference bands for every classification.
//!
//! A table is a slice of bands ordered by ascending `max`; a value belongs to
//! the first band whose `max` it is strictly below, and the last band of every
//! table is unbounded.

use crate::entities::assessment::SugarTestType;
use crate::entities::category::{CategoryResult, Color, Tier};

/// One row of a threshold table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive upper bound
    pub max: f64,
    pub label_key: &'static str,
    pub description_key: Option<&'static str>,
    pub color: Color,
    pub tier: Tier,
}

impl Band {
    const fn new(max: f64, label_key: &'static str, color: Color, tier: Tier) -> Self {
        Self {
            max,
            label_key,
            description_key: None,
            color,
            tier,
        }
    }

    const fn described(mut self, description_key: &'static str) -> Self {
        self.description_key = Some(description_key);
        self
    }

    pub fn to_result(&self) -> CategoryResult {
        CategoryResult {
            label_key: self.label_key.to_string(),
            description_key: self.description_key.map(str::to_string),
            color: self.color,
            tier: self.tier,
        }
    }
}

/// First band with `value < band.max`
pub fn find_band(bands: &[Band], value: f64) -> Option<&Band> {
    bands.iter().find(|band| value < band.max).or_else(|| bands.last())
}

/// Body mass index bands (kg/m²)
pub static BMI_BANDS: [Band; 6] = [
    Band::new(18.5, "bmi_category_underweight", Color::Sky, Tier::Normal)
        .described("bmi_category_underweight_desc"),
    Band::new(25.0, "bmi_category_normal", Color::Emerald, Tier::Normal)
        .described("bmi_category_normal_desc"),
    Band::new(30.0, "bmi_category_overweight", Color::Amber, Tier::Caution)
        .described("bmi_category_overweight_desc"),
    Band::new(35.0, "bmi_category_obese_1", Color::Orange, Tier::Elevated)
        .described("bmi_category_obese_1_desc"),
    Band::new(40.0, "bmi_category_obese_2", Color::Rose, Tier::High)
        .described("bmi_category_obese_2_desc"),
    Band::new(f64::INFINITY, "bmi_category_obese_3", Color::Red, Tier::Critical)
        .described("bmi_category_obese_3_desc"),
];

/// Systolic pressure bands (mmHg)
pub static SYSTOLIC_BANDS: [Band; 5] = [
    Band::new(120.0, "bp_status_normal", Color::Emerald, Tier::Normal),
    Band::new(130.0, "bp_status_elevated", Color::Amber, Tier::Caution),
    Band::new(140.0, "bp_status_stage_1", Color::Orange, Tier::Elevated),
    Band::new(180.0, "bp_status_stage_2", Color::Rose, Tier::High),
    Band::new(f64::INFINITY, "bp_status_crisis", Color::Red, Tier::Critical),
];

/// Diastolic pressure bands (mmHg). Diastolic has no "elevated" band.
pub static DIASTOLIC_BANDS: [Band; 4] = [
    Band::new(80.0, "bp_status_normal", Color::Emerald, Tier::Normal),
    Band::new(90.0, "bp_status_stage_1", Color::Orange, Tier::Elevated),
    Band::new(120.0, "bp_status_stage_2", Color::Rose, Tier::High),
    Band::new(f64::INFINITY, "bp_status_crisis", Color::Red, Tier::Critical),
];

/// A blood pressure reading blocks the wizard from this tier upwards
pub const BP_ELEVATED_FROM: Tier = Tier::High;

/// Bands and blocking threshold for one sugar test type
#[derive(Debug)]
pub struct SugarTable {
    pub bands: &'static [Band],
    pub elevated_from: Tier,
}

const SUGAR_LOW: Band = Band::new(70.0, "sugar_status_low", Color::Amber, Tier::Caution);
const SUGAR_DIABETES: Band =
    Band::new(f64::INFINITY, "sugar_status_diabetes", Color::Rose, Tier::High);

static RBS_BANDS: [Band; 4] = [
    SUGAR_LOW,
    Band::new(140.0, "sugar_status_normal", Color::Emerald, Tier::Normal),
    Band::new(200.0, "sugar_status_prediabetes", Color::Orange, Tier::Elevated),
    SUGAR_DIABETES,
];

static FBS_BANDS: [Band; 4] = [
    SUGAR_LOW,
    Band::new(100.0, "sugar_status_normal", Color::Emerald, Tier::Normal),
    Band::new(126.0, "sugar_status_prediabetes", Color::Orange, Tier::Elevated),
    SUGAR_DIABETES,
];

static PPBS_BANDS: [Band; 4] = [
    SUGAR_LOW,
    Band::new(140.0, "sugar_status_normal", Color::Emerald, Tier::Normal),
    Band::new(200.0, "sugar_status_prediabetes", Color::Orange, Tier::Elevated),
    SUGAR_DIABETES,
];

static HBA1C_BANDS: [Band; 3] = [
    Band::new(5.7, "sugar_status_normal", Color::Emerald, Tier::Normal),
    Band::new(6.5, "sugar_status_prediabetes", Color::Orange, Tier::Elevated),
    SUGAR_DIABETES,
];

static RBS: SugarTable = SugarTable { bands: &RBS_BANDS, elevated_from: Tier::High };
static FBS: SugarTable = SugarTable { bands: &FBS_BANDS, elevated_from: Tier::High };
static PPBS: SugarTable = SugarTable { bands: &PPBS_BANDS, elevated_from: Tier::High };
static HBA1C: SugarTable = SugarTable { bands: &HBA1C_BANDS, elevated_from: Tier::High };

/// Threshold table for a sugar test type
pub fn sugar_table(test_type: SugarTestType) -> &'static SugarTable {
    match test_type {
        SugarTestType::Rbs => &RBS,
        SugarTestType::Fbs => &FBS,
        SugarTestType::Ppbs => &PPBS,
        SugarTestType::Hba1c => &HBA1C,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(name: &str, bands: &[Band]) {
        assert!(!bands.is_empty(), "{} has no bands", name);
        for pair in bands.windows(2) {
            assert!(pair[0].max < pair[1].max, "{} bands are not ascending", name);
        }
        assert_eq!(bands.last().map(|b| b.max), Some(f64::INFINITY), "{} is bounded", name);
    }

    #[test]
    fn test_tables_are_well_formed() {
        assert_well_formed("bmi", &BMI_BANDS);
        assert_well_formed("systolic", &SYSTOLIC_BANDS);
        assert_well_formed("diastolic", &DIASTOLIC_BANDS);
        for test_type in SugarTestType::ALL {
            assert_well_formed(test_type.as_str(), sugar_table(test_type).bands);
        }
    }

    #[test]
    fn test_bmi_tiers_never_decrease() {
        for pair in BMI_BANDS.windows(2) {
            assert!(pair[0].tier <= pair[1].tier);
        }
    }

    #[test]
    fn test_find_band_boundary_belongs_to_next_band() {
        assert_eq!(find_band(&BMI_BANDS, 18.4).map(|b| b.label_key), Some("bmi_category_underweight"));
        assert_eq!(find_band(&BMI_BANDS, 18.5).map(|b| b.label_key), Some("bmi_category_normal"));
        assert_eq!(find_band(&BMI_BANDS, 40.0).map(|b| b.label_key), Some("bmi_category_obese_3"));
        assert!(find_band(&[], 1.0).is_none());
    }

    #[test]
    fn test_band_to_result_keeps_description() {
        let result = BMI_BANDS[2].to_result();
        assert_eq!(result.label_key, "bmi_category_overweight");
        assert_eq!(result.description_key.as_deref(), Some("bmi_category_overweight_desc"));
        assert_eq!(result.tier, Tier::Caution);

        assert!(SYSTOLIC_BANDS[0].to_result().description_key.is_none());
    }
}
