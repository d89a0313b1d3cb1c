//! Shared record types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field of a part record
///
/// The first eight are printed on vendor labels as `KEY:VALUE` tokens; the
/// rest are filled in by enrichment or the KiCad import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    #[serde(rename = "QTY")]
    Qty,
    #[serde(rename = "PN")]
    Pn,
    #[serde(rename = "PO")]
    Po,
    #[serde(rename = "MFR")]
    Mfr,
    #[serde(rename = "MPN")]
    Mpn,
    #[serde(rename = "CoO")]
    CoO,
    #[serde(rename = "RoHS")]
    RoHS,
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "VALUE")]
    Value,
    #[serde(rename = "FOOTPRINT")]
    Footprint,
    #[serde(rename = "REFERENCES")]
    References,
}

impl FieldKey {
    /// Keys recognised in scanned text
    pub const BARCODE_KEYS: [FieldKey; 8] = [
        FieldKey::Qty,
        FieldKey::Pn,
        FieldKey::Po,
        FieldKey::Mfr,
        FieldKey::Mpn,
        FieldKey::CoO,
        FieldKey::RoHS,
        FieldKey::Url,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Qty => "QTY",
            FieldKey::Pn => "PN",
            FieldKey::Po => "PO",
            FieldKey::Mfr => "MFR",
            FieldKey::Mpn => "MPN",
            FieldKey::CoO => "CoO",
            FieldKey::RoHS => "RoHS",
            FieldKey::Url => "URL",
            FieldKey::Value => "VALUE",
            FieldKey::Footprint => "FOOTPRINT",
            FieldKey::References => "REFERENCES",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields recovered from one scan (or one imported BOM row)
///
/// A key is present only when something was found for it, and never maps to
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    #[serde(default)]
    fields: BTreeMap<FieldKey, String>,
    /// Text as received from the reader
    #[serde(default)]
    pub raw: String,
    /// Text after character recovery and URL repair
    #[serde(default)]
    pub cleaned: String,
    /// Storage location entered by the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Projects this part is assigned to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

impl ParsedFields {
    pub fn new(raw: impl Into<String>, cleaned: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            cleaned: cleaned.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Set a field, overwriting; empty values are ignored
    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.fields.insert(key, value);
    }

    /// Set a field only if it is still missing
    pub fn fill(&mut self, key: FieldKey, value: impl Into<String>) {
        if !self.contains(key) {
            self.insert(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn part_number(&self) -> Option<&str> {
        self.get(FieldKey::Pn)
    }

    pub fn has_part_number(&self) -> bool {
        self.contains(FieldKey::Pn)
    }
}
