use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::models::jak::JakRecord;
use super::errors::RepositoryError;

/// Read-only Jan Arogya Kendra directory, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct JakRepository {
    records: Arc<Vec<JakRecord>>,
}

impl JakRepository {
    /// An empty directory
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a directory from records already in memory
    pub fn from_records(records: Vec<JakRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Load the directory from a JSON array file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let records = Self::parse(&contents)?;
        info!("Loaded {} JAK entries from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    /// Decode a JSON array of directory records
    pub fn parse(json: &str) -> Result<Vec<JakRecord>, RepositoryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// All entries in dataset order
    pub fn all(&self) -> &[JakRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "district": "Thiruvananthapuram",
            "healthBlock": "Kesavapuram",
            "jakName": "JAK Pothencode",
            "institutionName": "FHC Pothencode",
            "jakCode": "TVM001",
            "ninid": "1234",
            "email": "jak@example.org",
            "latitude": 8.61,
            "longitude": 76.91,
            "lsgiCode": "G010101",
            "constituency": "Chirayinkeezhu"
        },
        {
            "id": 2,
            "district": "Kollam",
            "healthBlock": "Neduvathur",
            "jakName": "",
            "institutionName": "PHC Ezhukone",
            "jakCode": "KLM014",
            "ninid": "5678",
            "email": "",
            "latitude": null,
            "longitude": null,
            "lsgiCode": "G020202",
            "constituency": "Kottarakkara"
        }
    ]"#;

    #[test]
    fn test_parse_dataset() {
        let records = JakRepository::parse(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].health_block, "Kesavapuram");
        assert_eq!(records[1].latitude, None);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = JakRepository::parse("{ not json");
        assert!(matches!(result, Err(RepositoryError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = JakRepository::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(RepositoryError::Io(_))));
    }

    #[test]
    fn test_empty_directory() {
        let repo = JakRepository::empty();
        assert!(repo.is_empty());
        assert_eq!(repo.all().len(), 0);
    }
}
