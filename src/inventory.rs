//! Scanned-parts inventory
//!
//! A JSON list of parts. Rescanning a part already in the list adds its
//! quantity to the existing entry instead of creating a new one.

use crate::error::Result;
use bom_scanner_common::{CategoryCounters, CategoryLabel, FieldKey, ParsedFields, ScanOutcome};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Category-prefixed serial (`RE-001`)
    pub id: String,
    pub category: CategoryLabel,
    pub fields: ParsedFields,
    /// Every scan that touched this entry
    #[serde(default)]
    pub history: Vec<DateTime<Local>>,
}

impl InventoryEntry {
    /// Merge key: PN, else MPN
    pub fn key(&self) -> Option<&str> {
        merge_key(&self.fields)
    }

    pub fn quantity(&self) -> Option<u64> {
        self.fields.get(FieldKey::Qty)?.parse().ok()
    }
}

fn merge_key(fields: &ParsedFields) -> Option<&str> {
    fields.get(FieldKey::Pn).or_else(|| fields.get(FieldKey::Mpn))
}

/// What `Inventory::record` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordResult {
    Added { id: String },
    Merged { id: String, quantity: u64 },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    #[serde(skip)]
    counters: CategoryCounters,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a file; a missing file gives an empty inventory
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<InventoryEntry> = serde_json::from_str(&content)?;
        Ok(Self::from_entries(entries))
    }

    /// Rebuild the ID counters from existing entries
    pub fn from_entries(entries: Vec<InventoryEntry>) -> Self {
        let mut counters = CategoryCounters::new();
        for entry in &entries {
            counters.next_id(&entry.category);
        }
        Self { entries, counters }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| e.key() == Some(key))
    }

    /// Record a processed scan
    pub fn record(&mut self, outcome: &ScanOutcome) -> RecordResult {
        self.record_fields(outcome.fields.clone(), outcome.category.clone(), outcome.scanned_at)
    }

    /// Record a part, merging with an entry of the same PN/MPN
    ///
    /// A QTY that does not parse counts as 1.
    pub fn record_fields(
        &mut self,
        fields: ParsedFields,
        category: CategoryLabel,
        at: DateTime<Local>,
    ) -> RecordResult {
        let added: u64 = fields
            .get(FieldKey::Qty)
            .and_then(|q| q.parse().ok())
            .unwrap_or(1);

        let existing = merge_key(&fields)
            .and_then(|key| self.entries.iter().position(|e| e.key() == Some(key)));

        if let Some(index) = existing {
            let entry = &mut self.entries[index];
            let current = entry.quantity().unwrap_or(0);
            let quantity = current.saturating_add(added);
            if quantity == u64::MAX {
                warn!(id = %entry.id, current, added, "quantity capped at u64::MAX");
            }
            entry.fields.insert(FieldKey::Qty, quantity.to_string());
            for project in fields.projects {
                if !entry.fields.projects.contains(&project) {
                    entry.fields.projects.push(project);
                }
            }
            entry.history.push(at);
            debug!(id = %entry.id, quantity, "inventory entry merged");
            return RecordResult::Merged {
                id: entry.id.clone(),
                quantity,
            };
        }

        let id = self.counters.next_id(&category);
        debug!(id = %id, "inventory entry added");
        self.entries.push(InventoryEntry {
            id: id.clone(),
            category,
            fields,
            history: vec![at],
        });
        RecordResult::Added { id }
    }
}
