//! BOM Scanner Common Library
//!
//! Scan-text pipeline shared by the CLI and any other front end:
//! keyboard recovery, URL repair, field extraction, fuzzy catalog lookup
//! and category classification. Nothing here does I/O except through a
//! [`CatalogAccessor`].

pub mod error;
pub mod keyboard;
pub mod url_repair;
pub mod types;
pub mod parser;
pub mod catalog;
pub mod fuzzy;
pub mod category;
pub mod pipeline;
pub mod footprint;
pub mod kicad;

pub use error::{Error, Result};
pub use keyboard::{recover_chars, restore_symbol_separators, KeyboardProfile};
pub use url_repair::{canonical_product_url, repair_urls};
pub use types::{FieldKey, ParsedFields};
pub use parser::{extract_fields, parse_barcode, reconcile_vendor_url, ParseOptions};
pub use catalog::{
    AutocompleteMatch, CatalogAccessor, CatalogError, CatalogProduct, MatchQuality,
    ProductParameter, SearchResponse,
};
pub use fuzzy::{candidate_variants, find_symbol_fuzzy, FuzzyHit, LookupKind};
pub use category::{
    classify_part, map_remote_category, Category, CategoryCounters, CategoryLabel,
};
pub use pipeline::{PartSource, PipelineOptions, ScanOutcome, ScanPipeline};
pub use footprint::shorten_footprint;
pub use kicad::KicadBomRow;
