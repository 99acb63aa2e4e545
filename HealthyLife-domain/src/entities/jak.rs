use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// A Jan Arogya Kendra (community health centre) directory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct JakEntry {
    pub id: u32,
    pub district: String,
    pub health_block: String,
    pub jak_name: String,
    pub institution_name: String,
    pub jak_code: String,
    pub ninid: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub lsgi_code: String,
    pub constituency: String,
}

impl JakEntry {
    /// Name to show for the entry: JAK name, then institution name, then code
    pub fn display_name(&self) -> String {
        if !self.jak_name.is_empty() {
            self.jak_name.clone()
        } else if !self.institution_name.is_empty() {
            self.institution_name.clone()
        } else {
            format!("JAK {}", self.jak_code)
        }
    }

    /// Both coordinates present and numeric
    pub fn has_valid_coordinates(&self) -> bool {
        self.coordinates().is_some()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if !lat.is_nan() && !lon.is_nan() => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn google_maps_url(&self) -> Option<String> {
        self.coordinates().map(|(lat, lon)| {
            format!("https://www.google.com/maps/search/?api=1&query={},{}", lat, lon)
        })
    }
}

/// A directory entry with its distance from a reference point, in km
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct JakWithDistance {
    #[serde(flatten)]
    pub entry: JakEntry,
    pub distance: f64,
}
