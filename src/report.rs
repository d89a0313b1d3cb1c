//! Terminal rendering of scan results

use bom_scanner_common::{FieldKey, LookupKind, ParsedFields, PartSource, ScanOutcome};

/// `KEY: value` lines, indented
pub fn render_fields(fields: &ParsedFields) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("  {:<10} {}", format!("{}:", key), value))
        .collect();

    if let Some(location) = &fields.location {
        lines.push(format!("  {:<10} {}", "LOCATION:", location));
    }
    if !fields.projects.is_empty() {
        lines.push(format!("  {:<10} {}", "PROJECTS:", fields.projects.join(", ")));
    }

    lines.join("\n")
}

pub fn describe_source(source: &PartSource) -> String {
    match source {
        PartSource::Barcode => "barcode".to_string(),
        PartSource::PrumexId => "Prumex id".to_string(),
        PartSource::CatalogMatch { variant, via } => {
            let via = match via {
                LookupKind::Autocomplete => "autocomplete",
                LookupKind::Search => "search",
            };
            format!("catalog {} match on \"{}\"", via, variant)
        }
        PartSource::Unidentified => "unidentified".to_string(),
    }
}

/// Multi-line summary of one scan
pub fn render_outcome(outcome: &ScanOutcome) -> String {
    let mut out = String::new();
    let mark = if outcome.is_identified() { "✔" } else { "⚠" };
    out.push_str(&format!(
        "{} {} [{}] ({})\n",
        mark,
        outcome.identifier(),
        outcome.category,
        describe_source(&outcome.source)
    ));
    if outcome.fields.cleaned != outcome.fields.raw {
        out.push_str(&format!("  {:<10} {}\n", "cleaned:", outcome.fields.cleaned));
    }
    out.push_str(&render_fields(&outcome.fields));
    out
}

/// One line per part: `QTY  PN  VALUE`
pub fn render_parts_table(parts: &[ParsedFields]) -> String {
    parts
        .iter()
        .map(|p| {
            format!(
                "{:>5}  {:<24} {}",
                p.get(FieldKey::Qty).unwrap_or("-"),
                p.get(FieldKey::Pn).unwrap_or("-"),
                p.get(FieldKey::Footprint).or(p.get(FieldKey::Value)).unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
