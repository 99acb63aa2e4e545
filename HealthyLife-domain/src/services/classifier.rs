//! Pure classification of biometric inputs.
//!
//! Every function is total: non-finite, zero or negative inputs are treated
//! as "not entered" and produce `None` (or `false` for the elevated checks)
//! instead of an error.

use crate::entities::assessment::SugarTestType;
use crate::entities::category::CategoryResult;
use crate::services::thresholds::{
    find_band, sugar_table, BMI_BANDS, BP_ELEVATED_FROM, DIASTOLIC_BANDS, SYSTOLIC_BANDS,
};

/// Plausible human height range in centimetres (inclusive)
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 300.0);

/// Plausible human weight range in kilograms (inclusive)
pub const WEIGHT_RANGE_KG: (f64, f64) = (10.0, 500.0);

/// Whether a number can be classified at all
#[inline]
pub fn is_usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

/// Parse a raw form field. Empty, non-numeric, non-finite, zero and
/// negative inputs all read as "not entered".
pub fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| is_usable(*value))
}

/// BMI rounded to one decimal, or `None` when height or weight is missing
/// or outside the plausible range
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !is_usable(height_cm) || !is_usable(weight_kg) {
        return None;
    }
    if !within(height_cm, HEIGHT_RANGE_CM) || !within(weight_kg, WEIGHT_RANGE_KG) {
        return None;
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// Category for a BMI value
pub fn classify_bmi(bmi: f64) -> Option<CategoryResult> {
    if !is_usable(bmi) {
        return None;
    }
    find_band(&BMI_BANDS, bmi).map(|band| band.to_result())
}

/// Category for a blood pressure reading.
///
/// Systolic and diastolic are banded independently and the more severe band
/// wins. On equal tiers the systolic band is reported.
pub fn classify_bp(systolic: f64, diastolic: f64) -> Option<CategoryResult> {
    if !is_usable(systolic) || !is_usable(diastolic) {
        return None;
    }

    let systolic_band = find_band(&SYSTOLIC_BANDS, systolic)?;
    let diastolic_band = find_band(&DIASTOLIC_BANDS, diastolic)?;

    let band = if diastolic_band.tier > systolic_band.tier {
        diastolic_band
    } else {
        systolic_band
    };
    Some(band.to_result())
}

/// Category for a blood sugar value in the unit of its test type
pub fn classify_sugar(test_type: SugarTestType, value: f64) -> Option<CategoryResult> {
    if !is_usable(value) {
        return None;
    }
    find_band(sugar_table(test_type).bands, value).map(|band| band.to_result())
}

/// True only when both values are present and the reading reaches the
/// blocking tier
pub fn is_bp_elevated(systolic: Option<f64>, diastolic: Option<f64>) -> bool {
    match (systolic, diastolic) {
        (Some(systolic), Some(diastolic)) => classify_bp(systolic, diastolic)
            .map(|category| category.tier >= BP_ELEVATED_FROM)
            .unwrap_or(false),
        _ => false,
    }
}

/// True only when a test type and value are present and the value reaches
/// that type's blocking tier
pub fn is_sugar_elevated(test_type: Option<SugarTestType>, value: Option<f64>) -> bool {
    match (test_type, value) {
        (Some(test_type), Some(value)) => classify_sugar(test_type, value)
            .map(|category| category.tier >= sugar_table(test_type).elevated_from)
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category::Tier;

    fn bmi_label(bmi: f64) -> String {
        classify_bmi(bmi).map(|c| c.label_key).unwrap_or_default()
    }

    #[test]
    fn test_compute_bmi_examples() {
        assert_eq!(compute_bmi(170.0, 70.0), Some(24.2));
        assert_eq!(bmi_label(24.2), "bmi_category_normal");

        assert_eq!(compute_bmi(170.0, 90.0), Some(31.1));
        assert_eq!(bmi_label(31.1), "bmi_category_obese_1");
    }

    #[test]
    fn test_compute_bmi_rejects_implausible_input() {
        assert_eq!(compute_bmi(49.9, 70.0), None);
        assert_eq!(compute_bmi(300.1, 70.0), None);
        assert_eq!(compute_bmi(170.0, 9.9), None);
        assert_eq!(compute_bmi(170.0, 500.5), None);
        assert_eq!(compute_bmi(0.0, 70.0), None);
        assert_eq!(compute_bmi(f64::NAN, 70.0), None);
        assert!(compute_bmi(50.0, 10.0).is_some());
        assert!(compute_bmi(300.0, 500.0).is_some());
    }

    #[test]
    fn test_bmi_band_boundaries() {
        assert_eq!(bmi_label(18.4), "bmi_category_underweight");
        assert_eq!(bmi_label(18.5), "bmi_category_normal");
        assert_eq!(bmi_label(24.9), "bmi_category_normal");
        assert_eq!(bmi_label(25.0), "bmi_category_overweight");
        assert_eq!(bmi_label(30.0), "bmi_category_obese_1");
        assert_eq!(bmi_label(35.0), "bmi_category_obese_2");
        assert_eq!(bmi_label(40.0), "bmi_category_obese_3");
        assert_eq!(bmi_label(95.0), "bmi_category_obese_3");
    }

    #[test]
    fn test_bmi_covers_plausible_inputs_monotonically() {
        let mut previous = Tier::Normal;
        let mut bmi = 0.1;
        while bmi < 250.0 {
            let category = classify_bmi(bmi).expect("every positive BMI has a category");
            assert!(category.tier >= previous, "tier decreased at BMI {}", bmi);
            previous = category.tier;
            bmi += 0.1;
        }

        for height in (50..=300).step_by(25) {
            for weight in (10..=500).step_by(35) {
                let bmi = compute_bmi(height as f64, weight as f64).expect("inputs in range");
                assert!(classify_bmi(bmi).is_some());
            }
        }
    }

    #[test]
    fn test_classify_bmi_rejects_unusable_input() {
        assert!(classify_bmi(0.0).is_none());
        assert!(classify_bmi(-3.0).is_none());
        assert!(classify_bmi(f64::INFINITY).is_none());
    }

    #[test]
    fn test_bp_categories() {
        let label = |s, d| classify_bp(s, d).map(|c| c.label_key).unwrap_or_default();

        assert_eq!(label(110.0, 75.0), "bp_status_normal");
        assert_eq!(label(125.0, 75.0), "bp_status_elevated");
        assert_eq!(label(135.0, 75.0), "bp_status_stage_1");
        assert_eq!(label(120.0, 85.0), "bp_status_stage_1");
        assert_eq!(label(145.0, 75.0), "bp_status_stage_2");
        assert_eq!(label(120.0, 95.0), "bp_status_stage_2");
        assert_eq!(label(185.0, 75.0), "bp_status_crisis");
        assert_eq!(label(120.0, 125.0), "bp_status_crisis");
    }

    #[test]
    fn test_bp_takes_more_severe_component() {
        // systolic alone is "elevated", diastolic alone is stage 1
        let category = classify_bp(125.0, 85.0).unwrap();
        assert_eq!(category.label_key, "bp_status_stage_1");
        assert_eq!(category.tier, Tier::Elevated);

        // systolic crisis beats a normal diastolic
        assert_eq!(classify_bp(190.0, 70.0).unwrap().tier, Tier::Critical);
    }

    #[test]
    fn test_bp_elevated() {
        assert!(is_bp_elevated(Some(150.0), Some(95.0)));
        assert_eq!(classify_bp(150.0, 95.0).unwrap().label_key, "bp_status_stage_2");
        assert!(is_bp_elevated(Some(140.0), Some(70.0)));
        assert!(is_bp_elevated(Some(110.0), Some(90.0)));
        assert!(!is_bp_elevated(Some(139.0), Some(89.0)));
        assert!(!is_bp_elevated(Some(120.0), Some(80.0)));
    }

    #[test]
    fn test_bp_elevated_requires_both_values() {
        for x in [0.0, 90.0, 150.0, 250.0] {
            assert!(!is_bp_elevated(None, Some(x)));
            assert!(!is_bp_elevated(Some(x), None));
        }
        assert!(!is_bp_elevated(None, None));
        assert!(!is_bp_elevated(Some(-150.0), Some(95.0)));
    }

    #[test]
    fn test_sugar_categories_per_type() {
        let label = |t, v| classify_sugar(t, v).map(|c| c.label_key).unwrap_or_default();

        assert_eq!(label(SugarTestType::Hba1c, 5.0), "sugar_status_normal");
        assert_eq!(label(SugarTestType::Hba1c, 6.0), "sugar_status_prediabetes");
        assert_eq!(label(SugarTestType::Hba1c, 7.0), "sugar_status_diabetes");

        assert_eq!(label(SugarTestType::Fbs, 65.0), "sugar_status_low");
        assert_eq!(label(SugarTestType::Fbs, 99.0), "sugar_status_normal");
        assert_eq!(label(SugarTestType::Fbs, 110.0), "sugar_status_prediabetes");
        assert_eq!(label(SugarTestType::Fbs, 126.0), "sugar_status_diabetes");

        // the same number means different things for different tests
        assert_eq!(label(SugarTestType::Rbs, 110.0), "sugar_status_normal");
        assert_eq!(label(SugarTestType::Ppbs, 210.0), "sugar_status_diabetes");
    }

    #[test]
    fn test_sugar_elevated() {
        assert!(!is_sugar_elevated(Some(SugarTestType::Hba1c), Some(5.0)));
        assert!(is_sugar_elevated(Some(SugarTestType::Hba1c), Some(7.0)));
        assert!(is_sugar_elevated(Some(SugarTestType::Rbs), Some(250.0)));
        assert!(!is_sugar_elevated(Some(SugarTestType::Rbs), Some(150.0)));
        assert!(!is_sugar_elevated(Some(SugarTestType::Fbs), Some(60.0)));
    }

    #[test]
    fn test_sugar_elevated_requires_type_and_value() {
        for value in [5.0, 7.0, 300.0] {
            assert!(!is_sugar_elevated(None, Some(value)));
        }
        for test_type in SugarTestType::ALL {
            assert!(!is_sugar_elevated(Some(test_type), None));
            assert!(!is_sugar_elevated(Some(test_type), Some(f64::NAN)));
        }
    }

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement(" 170 "), Some(170.0));
        assert_eq!(parse_measurement("72.5"), Some(72.5));
        assert_eq!(parse_measurement(""), None);
        assert_eq!(parse_measurement("abc"), None);
        assert_eq!(parse_measurement("0"), None);
        assert_eq!(parse_measurement("-5"), None);
        assert_eq!(parse_measurement("inf"), None);
        assert_eq!(parse_measurement("NaN"), None);
    }
}
