use axum::Json;
use tracing::{debug, instrument};

use healthy_life_domain::i18n::Translator;
use healthy_life_domain::services::classifier::{
    classify_bmi as bmi_category, classify_bp, classify_sugar as sugar_category, compute_bmi,
    is_bp_elevated, is_sugar_elevated, HEIGHT_RANGE_CM, WEIGHT_RANGE_KG,
};

use crate::api::locale::RequestLocale;
use crate::entities::classify::{
    BloodPressureClassification, BloodPressureRequest, BmiClassification, BmiRequest, CategoryView,
    SugarClassification, SugarRequest,
};
use crate::entities::common::{ErrorResponse, LangQuery};

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    value.is_finite() && value >= min && value <= max
}

/// Compute and classify a BMI
#[utoipa::path(
    post,
    path = "/api/v1/classify/bmi",
    params(LangQuery),
    request_body = BmiRequest,
    responses(
        (status = 200, description = "BMI and its category", body = BmiClassification),
        (status = 422, description = "Height or weight out of range", body = ErrorResponse),
    ),
    tag = "classification"
)]
#[instrument]
pub async fn classify_bmi(
    RequestLocale(locale): RequestLocale,
    Json(request): Json<BmiRequest>,
) -> Result<Json<BmiClassification>, ErrorResponse> {
    let translator = Translator::new(locale);

    let mut details = serde_json::Map::new();
    if !within(request.height_cm, HEIGHT_RANGE_CM) {
        details.insert("height_cm".to_string(), translator.t("step2_height_error_invalid").into());
    }
    if !within(request.weight_kg, WEIGHT_RANGE_KG) {
        details.insert("weight_kg".to_string(), translator.t("step2_weight_error_invalid").into());
    }

    let (bmi, category) = match compute_bmi(request.height_cm, request.weight_kg)
        .and_then(|bmi| bmi_category(bmi).map(|category| (bmi, category)))
    {
        Some(found) if details.is_empty() => found,
        _ => {
            return Err(ErrorResponse::validation_error(
                &translator.t("common_invalid_reading"),
                Some(details.into()),
            ))
        }
    };

    let category = CategoryView::localized(&category, &translator);
    let summary = translator.t_with(
        "bmi_result_summary",
        &[("bmi", &bmi.to_string()), ("category", &category.label)],
    );
    debug!("BMI {} classified as {}", bmi, category.label_key);

    Ok(Json(BmiClassification {
        bmi,
        summary,
        category,
    }))
}

/// Classify a blood pressure reading
#[utoipa::path(
    post,
    path = "/api/v1/classify/blood-pressure",
    params(LangQuery),
    request_body = BloodPressureRequest,
    responses(
        (status = 200, description = "Blood pressure category", body = BloodPressureClassification),
        (status = 422, description = "Reading is not a positive number", body = ErrorResponse),
    ),
    tag = "classification"
)]
#[instrument]
pub async fn classify_blood_pressure(
    RequestLocale(locale): RequestLocale,
    Json(request): Json<BloodPressureRequest>,
) -> Result<Json<BloodPressureClassification>, ErrorResponse> {
    let translator = Translator::new(locale);

    let category = classify_bp(request.systolic, request.diastolic).ok_or_else(|| {
        ErrorResponse::validation_error(&translator.t("common_invalid_reading"), None)
    })?;

    Ok(Json(BloodPressureClassification {
        systolic: request.systolic,
        diastolic: request.diastolic,
        elevated: is_bp_elevated(Some(request.systolic), Some(request.diastolic)),
        category: CategoryView::localized(&category, &translator),
    }))
}

/// Classify a blood sugar reading for its test type
#[utoipa::path(
    post,
    path = "/api/v1/classify/sugar",
    params(LangQuery),
    request_body = SugarRequest,
    responses(
        (status = 200, description = "Blood sugar category", body = SugarClassification),
        (status = 422, description = "Value is not a positive number", body = ErrorResponse),
    ),
    tag = "classification"
)]
#[instrument]
pub async fn classify_sugar(
    RequestLocale(locale): RequestLocale,
    Json(request): Json<SugarRequest>,
) -> Result<Json<SugarClassification>, ErrorResponse> {
    let translator = Translator::new(locale);

    let category = sugar_category(request.test_type, request.value).ok_or_else(|| {
        ErrorResponse::validation_error(&translator.t("common_invalid_reading"), None)
    })?;

    Ok(Json(SugarClassification {
        test_type: request.test_type,
        value: request.value,
        unit: request.test_type.unit().to_string(),
        elevated: is_sugar_elevated(Some(request.test_type), Some(request.value)),
        category: CategoryView::localized(&category, &translator),
    }))
}
