//! Vendor product URL repair
//!
//! Scanned TME labels carry a product URL. Through a Czech keyboard layout the
//! `/` keystrokes come out as `7` and `.` sometimes does too, producing text
//! like `https:77www7tme7eu7cz7details71N54087DIO`.
//!
//! One pass with one separator policy:
//! 1. a vendor URL, however mangled, is rewritten to the canonical
//!    `https://www.tme.eu/cz/details/{symbol}/` form
//! 2. any other URL-looking token gets the generic `7` → `/`/`.` fixes

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Host of the vendor whose URLs are repaired and reconciled
pub const VENDOR_HOST: &str = "tme.eu";

/// Canonical product page prefix
pub const VENDOR_PRODUCT_BASE: &str = "https://www.tme.eu/cz/details/";

/// Canonical product page of a vendor symbol
pub fn canonical_product_url(symbol: &str) -> String {
    format!("{}{}/", VENDOR_PRODUCT_BASE, symbol)
}

/// Separator used when joining symbol segments
///
/// Segments ending in a letter suffix (`1N5408/DIO`) join with `-`, numeric
/// ones (`DR384/2`) with `_`. Matches how the vendor builds its URL slugs.
pub fn slug_separator(last_segment: &str) -> char {
    match last_segment.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => '-',
        _ => '_',
    }
}

/// Join segments recovered from a mangled URL into a lowercase slug
///
/// Empty segments are dropped: a trailing `7` or `/` left over from the
/// mangled path is not part of the symbol.
fn join_slug(segments: &[&str]) -> String {
    let segments: Vec<&str> = segments
        .iter()
        .map(|s| s.trim_matches('-'))
        .filter(|s| !s.is_empty())
        .collect();

    let Some(last) = segments.last() else {
        return String::new();
    };
    let separator = slug_separator(last).to_string();

    segments.join(&separator).to_lowercase()
}

/// Vendor slug of a part number as printed on the label (`DR384/2` → `dr384_2`)
///
/// Every `/` becomes the separator chosen by the last segment, empty ones
/// included (`ABC/` → `abc_`).
pub fn slug_from_part_number(part_number: &str) -> String {
    let Some((_, last)) = part_number.rsplit_once('/') else {
        return part_number.to_lowercase();
    };
    let separator = slug_separator(last).to_string();
    part_number.replace('/', &separator).to_lowercase()
}

/// Repair every URL in a scanned line
///
/// Only the URL span is replaced; the rest of the line is kept as is.
///
/// # Arguments
/// * `text` - scan text after character recovery
///
/// # Returns
/// Cleaned text
pub fn repair_urls(text: &str) -> String {
    lazy_static! {
        static ref VENDOR_URL_RE: Regex = Regex::new(
            r"(?i)https?[:/7]+(?:www[.7])?tme[.7]eu[./7]*(?:cz[./7]+)?details[./7]+([A-Z0-9][A-Z0-9_\-./7]*)"
        )
        .unwrap();
    }

    if VENDOR_URL_RE.is_match(text) {
        return VENDOR_URL_RE
            .replace_all(text, |caps: &Captures| repair_vendor_match(caps))
            .to_string();
    }

    text.split(' ')
        .map(|token| {
            if looks_like_url(token) {
                repair_generic_url(token)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn repair_vendor_match(caps: &Captures) -> String {
    lazy_static! {
        static ref INTACT_PREFIX_RE: Regex =
            Regex::new(r"(?i)^https?://(?:www\.)?tme\.eu/").unwrap();
    }

    let whole = caps.get(0).map_or("", |m| m.as_str());
    let symbol = caps.get(1).map_or("", |m| m.as_str());

    // An intact URL keeps its digits and dots; only `/` splits the symbol
    let segments: Vec<&str> = if INTACT_PREFIX_RE.is_match(whole) {
        symbol.split('/').collect()
    } else {
        symbol.split(['/', '7', '.']).collect()
    };

    let slug = join_slug(&segments);
    if slug.is_empty() {
        return whole.to_string();
    }
    canonical_product_url(&slug)
}

fn looks_like_url(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.starts_with("http") || lower.starts_with("www")
}

/// Generic `7` fixes for a URL of another host
fn repair_generic_url(token: &str) -> String {
    lazy_static! {
        static ref SCHEME_RE: Regex = Regex::new(r"(?i)^(https?):77").unwrap();
        static ref WWW_RE: Regex = Regex::new(r"(?i)www7").unwrap();
        static ref DOMAIN_DOT_RE: Regex = Regex::new(r"7(tme|eu|cz|com|org|net)").unwrap();
        static ref PATH_SLASH_RE: Regex =
            Regex::new(r"(https?://\S*?)7(cz|details|en|pl|de|fr)").unwrap();
        static ref DETAILS_RE: Regex = Regex::new(r"(?i)/details7([A-Z0-9])").unwrap();
    }

    let fixed = SCHEME_RE.replace(token, "${1}://");
    let fixed = WWW_RE.replace_all(&fixed, "www.");
    let fixed = DOMAIN_DOT_RE.replace_all(&fixed, ".${1}");
    let fixed = PATH_SLASH_RE.replace_all(&fixed, "${1}/${2}");
    DETAILS_RE.replace_all(&fixed, "/details/${1}").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangled_vendor_url() {
        let fixed = repair_urls("https:77www7tme7eu7cz7details71N54087DIO");
        assert_eq!(fixed, "https://www.tme.eu/cz/details/1n5408-dio/");
    }

    #[test]
    fn test_vendor_url_without_locale() {
        let fixed = repair_urls("QTY:4 http:77tme7eu7details7DR38472");
        assert_eq!(fixed, "QTY:4 https://www.tme.eu/cz/details/dr384_2/");
    }

    #[test]
    fn test_surrounding_text_kept() {
        let fixed = repair_urls("QTY:10 https:77www7tme7eu7cz7details71N54087DIO MFR:DIOTEC");
        assert_eq!(
            fixed,
            "QTY:10 https://www.tme.eu/cz/details/1n5408-dio/ MFR:DIOTEC"
        );
    }

    #[test]
    fn test_intact_url_keeps_sevens() {
        let url = "https://www.tme.eu/cz/details/1n4007/";
        assert_eq!(repair_urls(url), url);

        let url = "https://www.tme.eu/cz/details/dr384_2-2x6/";
        assert_eq!(repair_urls(url), url);
    }

    #[test]
    fn test_generic_url_fallback() {
        let fixed = repair_urls("see http:77www7example7com7en7page");
        assert!(fixed.starts_with("see http://www.example.com/en"), "{}", fixed);
    }

    #[test]
    fn test_text_without_url_unchanged() {
        assert_eq!(repair_urls("QTY:17 PN:AB7CD"), "QTY:17 PN:AB7CD");
        assert_eq!(repair_urls(""), "");
    }

    #[test]
    fn test_slug_from_part_number() {
        assert_eq!(slug_from_part_number("DR384/2"), "dr384_2");
        assert_eq!(slug_from_part_number("1N5408/DIO"), "1n5408-dio");
        assert_eq!(slug_from_part_number("BM4942G"), "bm4942g");
        assert_eq!(slug_from_part_number("DR384/2.2X6"), "dr384_2.2x6");
    }

    #[test]
    fn test_slug_from_part_number_keeps_empty_segments() {
        assert_eq!(slug_from_part_number("ABC/"), "abc_");
        assert_eq!(slug_from_part_number("A/B/"), "a_b_");
        assert_eq!(slug_from_part_number("X//DIO"), "x--dio");
    }

    #[test]
    fn test_slug_separator() {
        assert_eq!(slug_separator("DIO"), '-');
        assert_eq!(slug_separator("2"), '_');
        assert_eq!(slug_separator(""), '_');
    }
}
