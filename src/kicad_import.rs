//! KiCad BOM CSV import

use crate::error::{BomError, Result};
use bom_scanner_common::{KicadBomRow, ParsedFields};
use std::path::Path;
use tracing::{debug, info};

/// Parts read from a KiCad BOM
#[derive(Debug, Default)]
pub struct KicadImport {
    pub parts: Vec<ParsedFields>,
    /// Rows marked DNP or excluded from the BOM
    pub skipped: usize,
}

/// Read a KiCad BOM export
///
/// Accepts `,` or `;` delimited files, with or without a UTF-8 BOM.
///
/// # Arguments
/// * `path` - CSV file
/// * `project` - project the parts are assigned to
pub fn import_kicad_csv(path: &Path, project: Option<&str>) -> Result<KicadImport> {
    if !path.exists() {
        return Err(BomError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_kicad_csv(&content, project)
}

pub fn parse_kicad_csv(content: &str, project: Option<&str>) -> Result<KicadImport> {
    let content = content.trim_start_matches('\u{feff}');
    let header = content.lines().next().unwrap_or("");
    let delimiter = if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut import = KicadImport::default();
    for record in reader.deserialize::<KicadBomRow>() {
        let row = record?;
        if row.is_excluded() {
            debug!(reference = %row.reference, "row excluded from BOM");
            import.skipped += 1;
            continue;
        }
        import.parts.push(row.to_fields(project));
    }

    info!(parts = import.parts.len(), skipped = import.skipped, "KiCad BOM imported");
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bom_scanner_common::FieldKey;

    #[test]
    fn test_semicolon_delimited_with_bom() {
        let content = "\u{feff}Reference;Qty;Value;Footprint;Datasheet\nR1;1;10k;Resistor_SMD:R_0805_2012Metric;~\n";
        let import = parse_kicad_csv(content, None).unwrap();
        assert_eq!(import.parts.len(), 1);
        assert_eq!(import.parts[0].get(FieldKey::Footprint), Some("0805"));
    }

    #[test]
    fn test_czech_exclude_column() {
        let content = "Reference,Qty,Value,Vyloučit z BOM\nC1,1,100n,\nC2,1,10u,Ano\n";
        let import = parse_kicad_csv(content, Some("Zdroj")).unwrap();
        assert_eq!(import.parts.len(), 1);
        assert_eq!(import.skipped, 1);
        assert_eq!(import.parts[0].projects, vec!["Zdroj"]);
    }
}
