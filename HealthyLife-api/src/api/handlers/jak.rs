use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{debug, instrument};

use healthy_life_domain::i18n::Translator;
use healthy_life_domain::services::jak::DEFAULT_NEARBY_RADIUS_KM;

use crate::api::locale::RequestLocale;
use crate::api::routes::AppState;
use crate::entities::common::{ErrorResponse, LangQuery};
use crate::entities::jak::{JakListResponse, JakQuery, JakView, NearbyJakResponse, NearbyJakView, NearbyQuery};

/// Search the JAK directory by district and free text
#[utoipa::path(
    get,
    path = "/api/v1/jak",
    params(JakQuery),
    responses(
        (status = 200, description = "Matching directory entries", body = JakListResponse),
    ),
    tag = "jak"
)]
#[instrument(skip(state))]
pub async fn list_jak(
    State(state): State<AppState>,
    Query(query): Query<JakQuery>,
) -> Json<JakListResponse> {
    let matches = state.jak.search(
        query.district.as_deref().unwrap_or_default(),
        query.q.as_deref().unwrap_or_default(),
    );
    debug!("JAK search matched {} of {} entries", matches.len(), state.jak.len());

    Json(JakListResponse {
        total: matches.len(),
        districts: state.jak.districts(),
        data: matches.into_iter().map(JakView::from).collect(),
    })
}

/// Directory entries near a point, nearest first
#[utoipa::path(
    get,
    path = "/api/v1/jak/nearby",
    params(NearbyQuery, LangQuery),
    responses(
        (status = 200, description = "Entries within the radius", body = NearbyJakResponse),
        (status = 400, description = "Invalid coordinates or radius", body = ErrorResponse),
    ),
    tag = "jak"
)]
#[instrument(skip(state))]
pub async fn nearby_jak(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<NearbyJakResponse>, ErrorResponse> {
    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return Err(ErrorResponse::bad_request("lat must be within ±90 and lon within ±180"));
    }
    let radius_km = query.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ErrorResponse::bad_request("radius_km must be a positive number"));
    }

    let translator = Translator::new(locale);
    let data: Vec<NearbyJakView> = state
        .jak
        .nearby(query.lat, query.lon, Some(radius_km))
        .iter()
        .map(|nearby| NearbyJakView::localized(nearby, &translator))
        .collect();

    Ok(Json(NearbyJakResponse {
        total: data.len(),
        radius_km,
        data,
    }))
}
