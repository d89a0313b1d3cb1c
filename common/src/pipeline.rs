//! Scan pipeline
//!
//! Turns one line from the barcode reader into a part record:
//! 1. parse the text (character recovery, URL repair, fields)
//! 2. without a `PN`, treat a 6-digit scan as a Prumex id
//! 3. otherwise ask the catalog for a fuzzy symbol match and enrich from it
//! 4. classify the part

use crate::catalog::CatalogAccessor;
use crate::category::{classify_part, is_prumex_id, CategoryLabel};
use crate::fuzzy::{find_symbol_fuzzy, LookupKind};
use crate::parser::{parse_barcode, ParseOptions};
use crate::types::{FieldKey, ParsedFields};
use crate::url_repair::{canonical_product_url, slug_from_part_number};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Manufacturer recorded for in-house parts
pub const PRUMEX_MANUFACTURER: &str = "Prumex";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    #[serde(default)]
    pub parse: ParseOptions,
    /// Run the category classifier on identified parts
    #[serde(default = "default_true")]
    pub classify: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            classify: true,
        }
    }
}

/// Where the part number came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartSource {
    /// `PN:` token on the label
    Barcode,
    /// Bare 6-digit in-house id
    PrumexId,
    /// Fuzzy catalog lookup
    CatalogMatch { variant: String, via: LookupKind },
    /// Nothing identified the part
    Unidentified,
}

/// Result of processing one scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub fields: ParsedFields,
    pub source: PartSource,
    pub category: CategoryLabel,
    pub scanned_at: DateTime<Local>,
}

impl ScanOutcome {
    /// Part number, or the cleaned scan text when none was found
    pub fn identifier(&self) -> &str {
        self.fields
            .part_number()
            .unwrap_or_else(|| self.fields.cleaned.trim())
    }

    pub fn is_identified(&self) -> bool {
        self.source != PartSource::Unidentified
    }
}

/// Fill the minimal record of an in-house part
pub fn prumex_entry(fields: &mut ParsedFields, id: &str) {
    fields.insert(FieldKey::Pn, id);
    fields.insert(FieldKey::Mpn, id);
    fields.insert(FieldKey::Mfr, PRUMEX_MANUFACTURER);
    fields.insert(FieldKey::Value, format!("Prumex ID: {}", id));
    fields.fill(FieldKey::Qty, "1");
}

/// Scan processor, optionally backed by the remote catalog
pub struct ScanPipeline<'a> {
    options: PipelineOptions,
    catalog: Option<&'a dyn CatalogAccessor>,
}

impl<'a> ScanPipeline<'a> {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn CatalogAccessor) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn is_online(&self) -> bool {
        self.catalog.is_some()
    }

    /// Process one scanned line
    ///
    /// # Returns
    /// `None` for blank input
    pub fn process(&self, raw: &str) -> Option<ScanOutcome> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut fields = parse_barcode(raw, &self.options.parse);
        let bare = fields.cleaned.trim().to_string();

        let source = if fields.has_part_number() {
            PartSource::Barcode
        } else if is_prumex_id(&bare) {
            info!(id = %bare, "Prumex id scanned");
            prumex_entry(&mut fields, &bare);
            PartSource::PrumexId
        } else if let Some(catalog) = self.catalog {
            match find_symbol_fuzzy(&bare, catalog) {
                Some(hit) => {
                    enrich_from_catalog(&mut fields, &hit.symbol, catalog);
                    PartSource::CatalogMatch {
                        variant: hit.variant,
                        via: hit.via,
                    }
                }
                None => PartSource::Unidentified,
            }
        } else {
            PartSource::Unidentified
        };

        let category = match (self.options.classify, fields.part_number()) {
            (true, Some(pn)) => self.classify(pn, fields.get(FieldKey::Value)),
            _ => CategoryLabel::UNKNOWN,
        };

        debug!(source = ?source, category = %category, "scan processed");

        Some(ScanOutcome {
            fields,
            source,
            category,
            scanned_at: Local::now(),
        })
    }

    /// Classify a part number with this pipeline's catalog
    pub fn classify(&self, identifier: &str, description: Option<&str>) -> CategoryLabel {
        classify_part(identifier, description, self.catalog)
    }
}

/// Fill a record from the catalog entry of a confirmed symbol
///
/// Description and parameters become `VALUE`; producer and original symbol
/// only fill `MFR`/`MPN` when the scan had none.
pub fn enrich_from_catalog(fields: &mut ParsedFields, symbol: &str, catalog: &dyn CatalogAccessor) {
    fields.insert(FieldKey::Pn, symbol);

    match catalog.get_exact(&[symbol]) {
        Ok(products) => match products.first() {
            Some(product) => {
                let parameters = match catalog.parameters(symbol) {
                    Ok(list) => list
                        .iter()
                        .filter(|p| !p.value.is_empty())
                        .map(|p| format!("{}: {}", p.name, p.value))
                        .collect::<Vec<_>>()
                        .join("; "),
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "parameter lookup failed");
                        String::new()
                    }
                };

                let value = if parameters.is_empty() {
                    product.description.clone()
                } else {
                    parameters
                };
                fields.insert(FieldKey::Value, value);
                fields.fill(FieldKey::Mfr, product.producer.clone());
                fields.fill(FieldKey::Mpn, product.original_symbol.clone());
            }
            None => debug!(symbol = %symbol, "no product details"),
        },
        Err(e) => warn!(symbol = %symbol, error = %e, "product lookup failed"),
    }

    fields.insert(FieldKey::Url, canonical_product_url(&slug_from_part_number(symbol)));
    fields.fill(FieldKey::Qty, "1");
}
