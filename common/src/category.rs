//! Part category classification
//!
//! Category sources, in order:
//! 1. product-line rules for in-house Prumex parts (6-digit ids)
//! 2. the remote catalog (search over separator variants, then exact lookup)
//! 3. `Unknown`
//!
//! Remote category names are mapped to the general categories below by
//! keyword. Names that match no keyword are kept verbatim.

use crate::catalog::CatalogAccessor;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// General part category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Resistors,
    Capacitors,
    #[serde(rename = "LEDs")]
    Leds,
    Diodes,
    Transistors,
    #[serde(rename = "ICs")]
    Ics,
    Connectors,
    Inductors,
    Crystals,
    Fuses,
    #[serde(rename = "Electronic Components")]
    ElectronicComponents,
    Screws,
    Nuts,
    Bearings,
    Cables,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Category::Resistors,
        Category::Capacitors,
        Category::Leds,
        Category::Diodes,
        Category::Transistors,
        Category::Ics,
        Category::Connectors,
        Category::Inductors,
        Category::Crystals,
        Category::Fuses,
        Category::ElectronicComponents,
        Category::Screws,
        Category::Nuts,
        Category::Bearings,
        Category::Cables,
        Category::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Resistors => "Resistors",
            Category::Capacitors => "Capacitors",
            Category::Leds => "LEDs",
            Category::Diodes => "Diodes",
            Category::Transistors => "Transistors",
            Category::Ics => "ICs",
            Category::Connectors => "Connectors",
            Category::Inductors => "Inductors",
            Category::Crystals => "Crystals",
            Category::Fuses => "Fuses",
            Category::ElectronicComponents => "Electronic Components",
            Category::Screws => "Screws",
            Category::Nuts => "Nuts",
            Category::Bearings => "Bearings",
            Category::Cables => "Cables",
            Category::Unknown => "Unknown",
        }
    }

    /// Two-letter prefix of inventory IDs (`RE-001`)
    pub fn id_prefix(self) -> &'static str {
        match self {
            Category::Resistors => "RE",
            Category::Capacitors => "CP",
            Category::Leds => "LD",
            Category::Diodes => "DI",
            Category::Transistors => "TR",
            Category::Ics => "IC",
            Category::Connectors => "CN",
            Category::Inductors => "IN",
            Category::Crystals => "CR",
            Category::Fuses => "FU",
            Category::ElectronicComponents => "EC",
            Category::Screws => "SC",
            Category::Nuts => "NU",
            Category::Bearings => "BE",
            Category::Cables => "CA",
            Category::Unknown => "UN",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification result: a general category, or a remote name kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryLabel {
    Known(Category),
    Remote(String),
}

impl CategoryLabel {
    pub const UNKNOWN: CategoryLabel = CategoryLabel::Known(Category::Unknown);

    pub fn as_str(&self) -> &str {
        match self {
            CategoryLabel::Known(c) => c.name(),
            CategoryLabel::Remote(name) => name,
        }
    }

    /// Verbatim remote names share the `Unknown` prefix
    pub fn id_prefix(&self) -> &'static str {
        match self {
            CategoryLabel::Known(c) => c.id_prefix(),
            CategoryLabel::Remote(_) => Category::Unknown.id_prefix(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == CategoryLabel::UNKNOWN
    }
}

impl From<Category> for CategoryLabel {
    fn from(category: Category) -> Self {
        CategoryLabel::Known(category)
    }
}

impl From<String> for CategoryLabel {
    fn from(name: String) -> Self {
        match Category::from_name(&name) {
            Some(c) => CategoryLabel::Known(c),
            None => CategoryLabel::Remote(name),
        }
    }
}

impl From<CategoryLabel> for String {
    fn from(label: CategoryLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table for remote category names, checked in order
const REMOTE_CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Resistors,
        &["resistor", "resistance", "potentiometer", "trimmer", "varistor", "thermistor"],
    ),
    (
        Category::Capacitors,
        &["capacitor", "condensator", "electrolytic", "ceramic", "film", "tantalum"],
    ),
    (Category::Leds, &["led", "light emitting diode"]),
    (
        Category::Diodes,
        &["diode", "rectifier", "zener", "schottky", "tvs", "esd"],
    ),
    (
        Category::Transistors,
        &["transistor", "mosfet", "jfet", "bjt", "fet", "igbt"],
    ),
    (
        Category::Ics,
        &[
            "ic",
            "microcontroller",
            "microprocessor",
            "processor",
            "cpu",
            "mcu",
            "memory",
            "flash",
            "eeprom",
            "logic",
            "driver",
            "regulator",
            "converter",
            "amplifier",
            "opamp",
            "comparator",
        ],
    ),
    (
        Category::Connectors,
        &["connector", "socket", "header", "terminal", "plug"],
    ),
    (
        Category::Inductors,
        &["inductor", "coil", "choke", "transformer"],
    ),
    (Category::Crystals, &["crystal", "oscillator", "resonator"]),
    (Category::Fuses, &["fuse", "circuit breaker"]),
    (Category::Cables, &["cable", "wire", "cord"]),
    (Category::Screws, &["screw", "bolt", "šroub"]),
    (Category::Nuts, &["nut", "matice"]),
    (Category::Bearings, &["bearing", "ložisko"]),
    (
        Category::ElectronicComponents,
        &["smd", "smt", "through hole", "dip", "sot", "soic", "qfn"],
    ),
];

/// Map a distributor category name to a general category
///
/// Case-insensitive substring match; the first category whose keyword occurs
/// wins. Empty input is `Unknown`, unmatched input is returned verbatim.
pub fn map_remote_category(name: &str) -> CategoryLabel {
    if name.trim().is_empty() {
        return CategoryLabel::UNKNOWN;
    }

    let lower = name.to_lowercase();
    REMOTE_CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| CategoryLabel::Known(*category))
        .unwrap_or_else(|| CategoryLabel::Remote(name.to_string()))
}

/// Prumex in-house part number: exactly six digits
pub fn is_prumex_id(text: &str) -> bool {
    let text = text.trim();
    text.len() == 6 && text.bytes().all(|b| b.is_ascii_digit())
}

/// Product-line rules for Prumex parts, from the item description
///
/// Explicit part words are checked first, then code prefixes (`S-` screws,
/// `M-` nuts), then standard markers anywhere in the text
/// (`Imbus M5x20 DIN 912`). A `matice DIN 934` is a nut.
pub fn classify_product_line(description: &str) -> Option<Category> {
    lazy_static! {
        // DIN 912, ISO4762; not "dinghy" or "isolation"
        static ref STANDARD_MARKER_RE: Regex =
            Regex::new(r"(?i)\b(?:DIN|ISO)(?:[^A-Z]|$)").unwrap();
    }

    let lower = description.to_lowercase();

    if ["šroub", "screw", "bolt"].iter().any(|k| lower.contains(k)) {
        return Some(Category::Screws);
    }
    if ["matice", "nut"].iter().any(|k| lower.contains(k)) {
        return Some(Category::Nuts);
    }
    if ["ložisko", "bearing"].iter().any(|k| lower.contains(k)) {
        return Some(Category::Bearings);
    }

    let upper = description.trim().to_uppercase();
    if upper.starts_with("S-") || upper.starts_with("Š-") {
        return Some(Category::Screws);
    }
    if upper.starts_with("M-") || upper.starts_with("M ") {
        return Some(Category::Nuts);
    }
    if STANDARD_MARKER_RE.is_match(description) {
        return Some(Category::Screws);
    }

    None
}

/// Separator-insensitive containment between a returned symbol and the query
pub fn symbols_match(found: &str, query: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | '/'))
            .collect()
    };

    let found = normalize(found);
    let query = normalize(query);
    if found.is_empty() || query.is_empty() {
        return false;
    }
    found.contains(&query) || query.contains(&found)
}

/// Search variants of an identifier, order kept, duplicates removed
pub fn identifier_variants(identifier: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    for v in [
        identifier.to_string(),
        identifier.replace('/', "-"),
        identifier.replace('-', "/"),
        identifier.replace('/', ""),
        identifier.replace('-', ""),
    ] {
        if !v.is_empty() && !variants.contains(&v) {
            variants.push(v);
        }
    }
    variants
}

/// Decide the category of a part
///
/// # Arguments
/// * `identifier` - part number (PN)
/// * `description` - VALUE field, used by the Prumex rules
/// * `catalog` - remote catalog, `None` when offline
///
/// # Returns
/// A general category, a verbatim remote name, or `Unknown`
pub fn classify_part(
    identifier: &str,
    description: Option<&str>,
    catalog: Option<&dyn CatalogAccessor>,
) -> CategoryLabel {
    lazy_static! {
        static ref PRUMEX_VALUE_RE: Regex = Regex::new(r"(?i)^prumex id:").unwrap();
    }

    let identifier = identifier.trim();
    if identifier.is_empty() {
        return CategoryLabel::UNKNOWN;
    }

    if is_prumex_id(identifier) {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty() && !PRUMEX_VALUE_RE.is_match(d));
        if let Some(category) = description.and_then(classify_product_line) {
            debug!(identifier = %identifier, category = %category, "Prumex product line");
            return category.into();
        }
    }

    let Some(catalog) = catalog else {
        return CategoryLabel::UNKNOWN;
    };

    for variant in identifier_variants(identifier) {
        match catalog.search(&variant) {
            Ok(response) => {
                if response.total == 0 {
                    continue;
                }
                let Some(product) = response.matches.first() else {
                    continue;
                };
                if product.symbol.is_empty() || product.category.is_empty() {
                    continue;
                }
                if symbols_match(&product.symbol, identifier) {
                    debug!(variant = %variant, symbol = %product.symbol, category = %product.category, "category from search");
                    return map_remote_category(&product.category);
                }
                debug!(variant = %variant, symbol = %product.symbol, "search hit is a different part");
            }
            Err(e) => warn!(variant = %variant, error = %e, "category search failed"),
        }
    }

    match catalog.get_exact(&[identifier]) {
        Ok(products) => {
            if let Some(product) = products.first() {
                if !product.symbol.is_empty() && !product.category.is_empty() {
                    debug!(symbol = %product.symbol, category = %product.category, "category from exact lookup");
                    return map_remote_category(&product.category);
                }
            }
        }
        Err(e) => warn!(identifier = %identifier, error = %e, "exact lookup failed"),
    }

    CategoryLabel::UNKNOWN
}

/// Per-category sequence numbers for inventory IDs
///
/// Keyed by the label's name, so every verbatim remote name has its own
/// sequence even though they share the `UN` prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCounters {
    next: HashMap<String, u32>,
}

impl CategoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID (`RE-001`, `RE-002`, ...)
    pub fn next_id(&mut self, label: &CategoryLabel) -> String {
        let counter = self.next.entry(label.as_str().to_string()).or_insert(1);
        let id = format!("{}-{:03}", label.id_prefix(), *counter);
        *counter += 1;
        id
    }
}
