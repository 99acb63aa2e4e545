use serde::{Deserialize, Serialize};

/// Storage model for a Jan Arogya Kendra directory entry, as published in
/// the directory dataset (camelCase keys)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JakRecord {
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
