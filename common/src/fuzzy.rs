//! Fuzzy symbol lookup
//!
//! Used when a scan yields no `PN:` token at all, typically a bare
//! distributor symbol whose `/` was typed as `_`, `-`, `.` or `7`. A fixed
//! list of spelling variants is tried against autocomplete first, then
//! against full-text search.

use crate::catalog::{AutocompleteMatch, CatalogAccessor};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which catalog query produced the hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Autocomplete,
    Search,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyHit {
    /// Confirmed distributor symbol
    pub symbol: String,
    /// Spelling variant that found it
    pub variant: String,
    pub via: LookupKind,
}

fn push_unique(candidates: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

/// Drop the `7` in the first digit-7-digit run (`DR38472.2X6` → `DR3842.2X6`)
fn remove_spurious_seven(text: &str) -> Option<String> {
    lazy_static! {
        static ref SPURIOUS_SEVEN_RE: Regex = Regex::new(r"[0-9]7[0-9]").unwrap();
    }

    let m = SPURIOUS_SEVEN_RE.find(text)?;
    let seven_at = m.start() + 1;
    Some(format!("{}{}", &text[..seven_at], &text[seven_at + 1..]))
}

/// Spelling variants of a scanned symbol, in lookup order, duplicates removed
///
/// 1. the text itself
/// 2. `_`, `-` and `.` each replaced by `/`
/// 3. the text with its first spurious `7` removed, then that text with
///    `.`, `_` and `-` each replaced by `/`
pub fn candidate_variants(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    push_unique(&mut candidates, text.to_string());
    for sep in ['_', '-', '.'] {
        push_unique(&mut candidates, text.replace(sep, "/"));
    }

    if let Some(fixed) = remove_spurious_seven(text) {
        push_unique(&mut candidates, fixed.clone());
        for sep in ['.', '_', '-'] {
            push_unique(&mut candidates, fixed.replace(sep, "/"));
        }
    }

    candidates
}

/// Close match if there is one, otherwise the first suggestion
fn pick_suggestion(matches: &[AutocompleteMatch]) -> Option<&str> {
    let usable = || matches.iter().filter(|m| !m.symbol.is_empty());
    usable()
        .find(|m| m.quality.is_close())
        .or_else(|| usable().next())
        .map(|m| m.symbol.as_str())
}

/// Find the distributor symbol a scan most likely meant
///
/// Autocomplete runs over every variant and stops at the first response with
/// suggestions. If none has any, full-text search runs over the variants
/// other than the original text. Failed queries are logged and skipped.
///
/// # Arguments
/// * `text` - cleaned scan text
/// * `catalog` - remote catalog
///
/// # Returns
/// The confirmed symbol and the variant that found it, or `None`
pub fn find_symbol_fuzzy(text: &str, catalog: &dyn CatalogAccessor) -> Option<FuzzyHit> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let candidates = candidate_variants(text);
    debug!(text = %text, candidates = ?candidates, "fuzzy lookup");

    for variant in &candidates {
        match catalog.autocomplete(variant) {
            Ok(matches) => {
                if let Some(symbol) = pick_suggestion(&matches) {
                    info!(variant = %variant, symbol = %symbol, "autocomplete match");
                    return Some(FuzzyHit {
                        symbol: symbol.to_string(),
                        variant: variant.clone(),
                        via: LookupKind::Autocomplete,
                    });
                }
            }
            Err(e) => warn!(variant = %variant, error = %e, "autocomplete failed"),
        }
    }

    for variant in candidates.iter().skip(1) {
        match catalog.search(variant) {
            Ok(response) if response.total > 0 => {
                let hit = response.matches.first().filter(|p| !p.symbol.is_empty());
                if let Some(product) = hit {
                    info!(variant = %variant, symbol = %product.symbol, "search match");
                    return Some(FuzzyHit {
                        symbol: product.symbol.clone(),
                        variant: variant.clone(),
                        via: LookupKind::Search,
                    });
                }
            }
            Ok(_) => {}
            Err(e) => warn!(variant = %variant, error = %e, "search failed"),
        }
    }

    debug!(text = %text, "no catalog match");
    None
}
