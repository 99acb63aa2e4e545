use healthy_life_data::repository::JakRepository;
use tracing::debug;

use crate::entities::conversions::convert_to_domain_jak;
use crate::entities::jak::{JakEntry, JakWithDistance};

/// Mean Earth radius in km
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default search radius for nearby centres, in km
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 50.0;

/// Entries in `district` (case-insensitive, empty matches all) whose name,
/// institution, code, health block or constituency contains `query`
pub fn filter_entries<'a>(entries: &'a [JakEntry], district: &str, query: &str) -> Vec<&'a JakEntry> {
    let district = district.to_lowercase();
    let query = query.trim().to_lowercase();

    entries
        .iter()
        .filter(|jak| district.is_empty() || jak.district.to_lowercase() == district)
        .filter(|jak| {
            query.is_empty()
                || [
                    &jak.jak_name,
                    &jak.institution_name,
                    &jak.jak_code,
                    &jak.health_block,
                    &jak.constituency,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

/// Great-circle distance in km (haversine)
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Entries with coordinates within `max_km` of the point, nearest first
pub fn find_nearby(entries: &[JakEntry], lat: f64, lon: f64, max_km: f64) -> Vec<JakWithDistance> {
    let mut nearby: Vec<JakWithDistance> = entries
        .iter()
        .filter_map(|jak| {
            let (jak_lat, jak_lon) = jak.coordinates()?;
            let distance = calculate_distance(lat, lon, jak_lat, jak_lon);
            (distance <= max_km).then(|| JakWithDistance {
                entry: jak.clone(),
                distance,
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    nearby
}

/// "850m" below one kilometre, otherwise "3.2km"
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round())
    } else {
        // ties round away from zero, not to even
        format!("{:.1}km", (km * 10.0).round() / 10.0)
    }
}

/// Read-only view over the loaded directory
#[derive(Debug, Clone, Default)]
pub struct JakDirectory {
    entries: Vec<JakEntry>,
}

impl JakDirectory {
    pub fn new(repository: &JakRepository) -> Self {
        let entries: Vec<JakEntry> = repository.all().iter().map(convert_to_domain_jak).collect();
        debug!("JAK directory ready with {} entries", entries.len());
        Self { entries }
    }

    pub fn from_entries(entries: Vec<JakEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[JakEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, de-duplicated district names
    pub fn districts(&self) -> Vec<String> {
        let mut districts: Vec<String> = self.entries.iter().map(|jak| jak.district.clone()).collect();
        districts.sort();
        districts.dedup();
        districts
    }

    pub fn search(&self, district: &str, query: &str) -> Vec<&JakEntry> {
        filter_entries(&self.entries, district, query)
    }

    pub fn nearby(&self, lat: f64, lon: f64, max_km: Option<f64>) -> Vec<JakWithDistance> {
        find_nearby(&self.entries, lat, lon, max_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM))
    }
}
