use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use healthy_life_domain::entities::{JakEntry, JakWithDistance};
use healthy_life_domain::i18n::Translator;
use healthy_life_domain::services::jak::format_distance;

/// Directory search parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct JakQuery {
    /// District name, matched case-insensitively
    pub district: Option<String>,
    /// Matched against name, institution, code, health block and constituency
    pub q: Option<String>,
}

/// Nearby search parameters
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in km (default 50)
    pub radius_km: Option<f64>,
}

/// A directory entry as listed to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JakView {
    pub id: u32,
    pub display_name: String,
    pub district: String,
    pub health_block: String,
    pub institution_name: String,
    pub jak_code: String,
    pub email: String,
    pub constituency: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
}

impl From<&JakEntry> for JakView {
    fn from(entry: &JakEntry) -> Self {
        Self {
            id: entry.id,
            display_name: entry.display_name(),
            district: entry.district.clone(),
            health_block: entry.health_block.clone(),
            institution_name: entry.institution_name.clone(),
            jak_code: entry.jak_code.clone(),
            email: entry.email.clone(),
            constituency: entry.constituency.clone(),
            latitude: entry.latitude,
            longitude: entry.longitude,
            maps_url: entry.google_maps_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JakListResponse {
    pub total: usize,
    /// Every district in the directory, for filter menus
    pub districts: Vec<String>,
    pub data: Vec<JakView>,
}

/// A directory entry with its distance from the query point
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyJakView {
    #[serde(flatten)]
    pub jak: JakView,
    pub distance_km: f64,
    /// e.g. "850m away"
    pub distance_label: String,
}

impl NearbyJakView {
    pub fn localized(nearby: &JakWithDistance, translator: &Translator) -> Self {
        let distance = format_distance(nearby.distance);
        Self {
            jak: JakView::from(&nearby.entry),
            distance_km: nearby.distance,
            distance_label: translator.t_with("jak_distance_away", &[("distance", &distance)]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyJakResponse {
    pub total: usize,
    pub radius_km: f64,
    pub data: Vec<NearbyJakView>,
}
