use healthy_life_data::models::assessment::{
    StoredAssessment, STATUS_ENTERED, STATUS_NOT_ENTERED, STATUS_SKIPPED,
};
use healthy_life_data::models::jak::JakRecord;
use uuid::Uuid;

use crate::entities::assessment::{
    AssessmentRecord, BloodPressureReading, DerivedFlags, ReadingEntry, SugarReading,
    SugarTestType,
};
use crate::entities::jak::JakEntry;
use crate::i18n::Locale;

/// Conversion functions between domain entities and data models,
/// named convert_to_[target_layer]_[model_name]

/// Parse a session id, with a descriptive message on failure
pub fn parse_string_to_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| format!("Invalid session id: {}", id))
}

fn entry_status<T>(entry: &ReadingEntry<T>) -> &'static str {
    match entry {
        ReadingEntry::NotEntered => STATUS_NOT_ENTERED,
        ReadingEntry::Skipped => STATUS_SKIPPED,
        ReadingEntry::Entered(_) => STATUS_ENTERED,
    }
}

/// Convert a domain record into its storage model. Derived flags are dropped.
pub fn convert_to_data_assessment(record: &AssessmentRecord) -> StoredAssessment {
    let bp = record.blood_pressure.entered();
    let sugar = record.sugar.entered();

    StoredAssessment {
        id: record.id.clone(),
        locale: record.locale.code().to_string(),
        created_at: record.created_at,
        updated_at: record.updated_at,
        height_cm: record.height_cm,
        weight_kg: record.weight_kg,
        bp_status: entry_status(&record.blood_pressure).to_string(),
        systolic: bp.map(|r| r.systolic),
        diastolic: bp.map(|r| r.diastolic),
        sugar_status: entry_status(&record.sugar).to_string(),
        sugar_type: sugar.map(|r| r.test_type.as_str().to_string()),
        sugar_value: sugar.map(|r| r.value),
    }
}

/// Convert a storage model back into a domain record, recomputing derived flags
pub fn convert_to_domain_assessment(stored: StoredAssessment) -> Result<AssessmentRecord, String> {
    let locale = stored.locale.parse::<Locale>()?;

    let blood_pressure = match stored.bp_status.as_str() {
        STATUS_NOT_ENTERED => ReadingEntry::NotEntered,
        STATUS_SKIPPED => ReadingEntry::Skipped,
        STATUS_ENTERED => match (stored.systolic, stored.diastolic) {
            (Some(systolic), Some(diastolic)) => {
                ReadingEntry::Entered(BloodPressureReading { systolic, diastolic })
            }
            _ => return Err(format!("Session {} has an incomplete blood pressure reading", stored.id)),
        },
        other => return Err(format!("Unknown blood pressure status: {}", other)),
    };

    let sugar = match stored.sugar_status.as_str() {
        STATUS_NOT_ENTERED => ReadingEntry::NotEntered,
        STATUS_SKIPPED => ReadingEntry::Skipped,
        STATUS_ENTERED => match (stored.sugar_type.as_deref(), stored.sugar_value) {
            (Some(code), Some(value)) => ReadingEntry::Entered(SugarReading {
                test_type: code.parse::<SugarTestType>()?,
                value,
            }),
            _ => return Err(format!("Session {} has an incomplete sugar reading", stored.id)),
        },
        other => return Err(format!("Unknown sugar status: {}", other)),
    };

    let mut record = AssessmentRecord {
        id: stored.id,
        locale,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        height_cm: stored.height_cm,
        weight_kg: stored.weight_kg,
        blood_pressure,
        sugar,
        derived: DerivedFlags::default(),
    };
    record.refresh_derived();
    Ok(record)
}

/// Convert a directory record into a domain entry
pub fn convert_to_domain_jak(record: &JakRecord) -> JakEntry {
    JakEntry {
        id: record.id,
        district: record.district.clone(),
        health_block: record.health_block.clone(),
        jak_name: record.jak_name.clone(),
        institution_name: record.institution_name.clone(),
        jak_code: record.jak_code.clone(),
        ninid: record.ninid.clone(),
        email: record.email.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
        lsgi_code: record.lsgi_code.clone(),
        constituency: record.constituency.clone(),
    }
}
