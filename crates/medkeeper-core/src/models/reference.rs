//! Lookup dictionaries: regimen codes, stations and patient categories.

use serde::{Deserialize, Serialize};

/// A regimen code and one of its meanings. A code may have several entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegimenDefinition {
    pub id: String,
    /// Shorthand schedule (e.g., "1+0+1", "BID"), upper case
    pub code: String,
    /// Human-readable meaning printed on the label
    pub meaning: String,
}

impl RegimenDefinition {
    pub fn new(code: &str, meaning: String) -> Self {
        Self {
            id: super::new_id("REG"),
            code: code.to_uppercase(),
            meaning,
        }
    }

    pub fn matches_code(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.to_lowercase()
    }
}

/// A ward station patients are assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
}

impl Station {
    pub fn new(name: String) -> Self {
        Self {
            id: super::new_id("STA"),
            name,
        }
    }
}

/// A tag grouping patients (e.g., "Day Care").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientCategory {
    pub id: String,
    pub name: String,
}

impl PatientCategory {
    pub fn new(name: String) -> Self {
        Self {
            id: super::new_id("CAT"),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regimen_code_uppercased_and_matched() {
        let regimen = RegimenDefinition::new("bid", "twice daily".into());
        assert_eq!(regimen.code, "BID");
        assert!(regimen.matches_code("Bid"));
        assert!(!regimen.matches_code("TID"));
    }

    #[test]
    fn test_lookup_ids_are_prefixed() {
        assert!(Station::new("V1".into()).id.starts_with("STA-"));
        assert!(PatientCategory::new("Picnic".into()).id.starts_with("CAT-"));
    }
}
