// Record trait for anything kept in a persistence slot

use serde::{Deserialize, Serialize};

/// Core trait that any slot-stored record must implement
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static {
    /// Unique identifier for this record
    fn id(&self) -> &str;

    /// Fixed key of the slot holding this record type's collection
    /// Determines the JSONL filename: {collection}.jsonl
    fn collection_name() -> &'static str
    where
        Self: Sized;
}

/// Slot keys become filenames, so keep them to a safe character set
pub(crate) fn validate_collection_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Collection name cannot be empty".to_string());
    }
    if name.len() > 64 {
        return Err(format!("Collection name too long: {} (max 64 chars)", name));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(format!(
            "Invalid collection name: {} (must be alphanumeric with _/-)",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestRecord {
        id: String,
        name: String,
    }

    impl Record for TestRecord {
        fn id(&self) -> &str {
            &self.id
        }

        fn collection_name() -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_record_trait_implementation() {
        let record = TestRecord {
            id: "test-1".to_string(),
            name: "Test".to_string(),
        };

        assert_eq!(record.id(), "test-1");
        assert_eq!(record.name, "Test");
        assert_eq!(TestRecord::collection_name(), "test");
    }

    #[test]
    fn test_validation_collection_name() {
        assert!(validate_collection_name("valid_name").is_ok());
        assert!(validate_collection_name("sprint_tasks_v1").is_ok());

        assert!(validate_collection_name("invalid/name").is_err());
        assert!(validate_collection_name("../escape").is_err());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name(&"a".repeat(65)).is_err());
    }
}
