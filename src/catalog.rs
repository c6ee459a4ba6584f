//! Static Item Data
//!
//! Item catalog in the community data-dump shape: one JSON object keyed by
//! the item id as a string, each value carrying id, name, numeric tier, rank
//! labels, and build relations. Loaded once per process and shared read-only
//! across matches. Unknown ids report as absent, never as errors; the replay
//! treats items it cannot classify as untracked.

use crate::replay::events::ItemId;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One item's static record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub tier: u8,
    /// Rank labels, e.g. "BASIC", "LEGENDARY", "BOOTS", "STARTER".
    #[serde(default)]
    pub rank: Vec<String>,
    #[serde(default)]
    pub builds_from: Vec<ItemId>,
    #[serde(default)]
    pub builds_into: Vec<ItemId>,
    /// Asset URL, carried opaquely for downstream consumers.
    #[serde(default)]
    pub icon: Option<String>,
}

impl ItemEntry {
    pub fn is_boots(&self) -> bool {
        self.rank.iter().any(|r| r == "BOOTS")
    }

    pub fn is_starter(&self) -> bool {
        self.rank.iter().any(|r| r == "STARTER")
    }
}

/// Catalog load failures.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "item catalog could not be read: {}", e),
            Self::Json(e) => write!(f, "item catalog did not parse: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Item id to static record, indexed for per-event lookups.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<ItemId, ItemEntry>,
}

impl ItemCatalog {
    /// Parse a catalog from the JSON object keyed by item-id string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, ItemEntry> = serde_json::from_str(json)?;
        let mut items = HashMap::with_capacity(raw.len());
        for (key, mut entry) in raw {
            // The map key is authoritative when the body omits its own id.
            if entry.id == 0 {
                if let Ok(id) = key.parse::<ItemId>() {
                    entry.id = id;
                }
            }
            items.insert(entry.id, entry);
        }
        Ok(Self { items })
    }

    /// Load from a file path. Done once per process, before any fold runs.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Build directly from records, bypassing JSON. Useful for tests and
    /// embedded tables.
    pub fn from_entries(entries: impl IntoIterator<Item = ItemEntry>) -> Self {
        let items = entries.into_iter().map(|e| (e.id, e)).collect();
        Self { items }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemEntry> {
        self.items.get(&id)
    }

    pub fn tier(&self, id: ItemId) -> Option<u8> {
        self.items.get(&id).map(|e| e.tier)
    }

    pub fn is_boots(&self, id: ItemId) -> bool {
        self.items.get(&id).map(|e| e.is_boots()).unwrap_or(false)
    }

    pub fn is_starter(&self, id: ItemId) -> bool {
        self.items.get(&id).map(|e| e.is_starter()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "1055": {
            "id": 1055,
            "name": "Doran's Blade",
            "tier": 1,
            "rank": ["STARTER"],
            "buildsFrom": [],
            "buildsInto": [],
            "icon": "https://example.invalid/1055.png"
        },
        "3006": {
            "id": 3006,
            "name": "Berserker's Greaves",
            "tier": 2,
            "rank": ["BOOTS"],
            "buildsFrom": [1001],
            "buildsInto": []
        },
        "3031": {
            "id": 3031,
            "name": "Infinity Edge",
            "tier": 3,
            "rank": ["LEGENDARY"],
            "buildsFrom": [1038, 1018],
            "buildsInto": []
        }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let catalog = ItemCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(3031).unwrap().name, "Infinity Edge");
        assert_eq!(catalog.tier(3031), Some(3));
        assert!(catalog.is_boots(3006));
        assert!(!catalog.is_boots(3031));
        assert!(catalog.is_starter(1055));
    }

    #[test]
    fn test_unknown_id_is_absent_not_error() {
        let catalog = ItemCatalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.get(9999).is_none());
        assert_eq!(catalog.tier(9999), None);
        assert!(!catalog.is_boots(9999));
    }

    #[test]
    fn test_key_backfills_missing_id() {
        let json = r#"{"2003": {"name": "Health Potion", "tier": 1, "rank": ["CONSUMABLE"]}}"#;
        let catalog = ItemCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.get(2003).unwrap().name, "Health Potion");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = ItemCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.tier(1055), Some(1));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let result = ItemCatalog::from_json_str("not json at all");
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }
}
