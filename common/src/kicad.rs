//! KiCad BOM rows
//!
//! Rows of a KiCad BOM export (CSV) and their conversion to part records.
//! Reading the file itself lives in the CLI crate.

use crate::footprint::shorten_footprint;
use crate::types::{FieldKey, ParsedFields};
use serde::{Deserialize, Serialize};

/// One row of a KiCad BOM export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KicadBomRow {
    #[serde(rename = "Reference", default)]
    pub reference: String,
    #[serde(rename = "Qty", default)]
    pub qty: String,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "Footprint", default)]
    pub footprint: String,
    #[serde(rename = "Datasheet", default)]
    pub datasheet: String,
    #[serde(rename = "DNP", default)]
    pub dnp: String,
    #[serde(rename = "Exclude from BOM", alias = "Vyloučit z BOM", default)]
    pub exclude_from_bom: String,
}

impl KicadBomRow {
    /// Row marked do-not-populate or excluded from the BOM
    pub fn is_excluded(&self) -> bool {
        !self.dnp.trim().is_empty() || !self.exclude_from_bom.trim().is_empty()
    }

    /// Reference designators, trimmed (`R1, R2`)
    pub fn references(&self) -> Vec<&str> {
        self.reference
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }

    /// Convert to a part record assigned to `project`
    ///
    /// The value doubles as PN and MPN. A datasheet of `~` means none.
    pub fn to_fields(&self, project: Option<&str>) -> ParsedFields {
        let value = self.value.trim();
        let label = format!("KiCad Import: {}", value);
        let mut fields = ParsedFields::new(label.clone(), label);

        let qty = self.qty.trim();
        fields.insert(FieldKey::Qty, if qty.is_empty() { "1" } else { qty });
        fields.insert(FieldKey::Pn, value);
        fields.insert(FieldKey::Mpn, value);
        fields.insert(FieldKey::Value, value);
        fields.insert(FieldKey::Footprint, shorten_footprint(self.footprint.trim()));
        fields.insert(FieldKey::References, self.references().join(", "));

        let datasheet = self.datasheet.trim();
        if datasheet != "~" {
            fields.insert(FieldKey::Url, datasheet);
        }

        if let Some(project) = project.map(str::trim).filter(|p| !p.is_empty()) {
            fields.projects.push(project.to_string());
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(reference: &str, value: &str, footprint: &str) -> KicadBomRow {
        KicadBomRow {
            reference: reference.to_string(),
            qty: "2".to_string(),
            value: value.to_string(),
            footprint: footprint.to_string(),
            datasheet: "~".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_fields() {
        let fields = row("R1,R2", "10k", "Resistor_SMD:R_0603_1608Metric").to_fields(Some("Amp"));
        assert_eq!(fields.get(FieldKey::Pn), Some("10k"));
        assert_eq!(fields.get(FieldKey::Mpn), Some("10k"));
        assert_eq!(fields.get(FieldKey::Qty), Some("2"));
        assert_eq!(fields.get(FieldKey::Footprint), Some("0603"));
        assert_eq!(fields.get(FieldKey::References), Some("R1, R2"));
        assert_eq!(fields.get(FieldKey::Url), None);
        assert_eq!(fields.projects, vec!["Amp"]);
        assert_eq!(fields.raw, "KiCad Import: 10k");
    }

    #[test]
    fn test_datasheet_and_default_qty() {
        let mut r = row("U1", "NE555", "Package_SO:SOIC-8");
        r.qty.clear();
        r.datasheet = "https://www.ti.com/lit/ds/symlink/ne555.pdf".to_string();
        let fields = r.to_fields(None);
        assert_eq!(fields.get(FieldKey::Qty), Some("1"));
        assert_eq!(
            fields.get(FieldKey::Url),
            Some("https://www.ti.com/lit/ds/symlink/ne555.pdf")
        );
        assert!(fields.projects.is_empty());
    }

    #[test]
    fn test_is_excluded() {
        let mut r = row("C1", "100n", "");
        assert!(!r.is_excluded());
        r.dnp = "DNP".to_string();
        assert!(r.is_excluded());
        r.dnp.clear();
        r.exclude_from_bom = "Excluded".to_string();
        assert!(r.is_excluded());
    }
}
