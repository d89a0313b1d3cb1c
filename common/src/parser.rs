//! Barcode text parser
//!
//! Processing flow:
//! 1. keyboard character recovery
//! 2. optional symbol separator restoration
//! 3. URL repair
//! 4. `KEY:VALUE` extraction
//! 5. PN → URL reconciliation

pub use crate::category::is_prumex_id;
use crate::keyboard::{recover_chars, restore_symbol_separators, KeyboardProfile};
use crate::types::{FieldKey, ParsedFields};
use crate::url_repair::{canonical_product_url, repair_urls, slug_from_part_number, VENDOR_HOST};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub profile: KeyboardProfile,
    /// Turn `_`, `-`, `.` and stray `7` inside symbols back into `/`
    #[serde(default)]
    pub restore_separators: bool,
}

impl ParseOptions {
    pub fn with_profile(profile: KeyboardProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }
}

/// Run the whole text pipeline on one scan
///
/// # Arguments
/// * `raw` - line as received from the reader
/// * `options` - keyboard profile and separator handling
///
/// # Returns
/// Extracted fields with `raw` and `cleaned` set
pub fn parse_barcode(raw: &str, options: &ParseOptions) -> ParsedFields {
    let mut text = recover_chars(raw, options.profile);
    if options.restore_separators {
        text = restore_symbol_separators(&text);
    }
    let cleaned = repair_urls(&text);

    let mut fields = extract_fields(&cleaned);
    fields.raw = raw.to_string();
    reconcile_vendor_url(&mut fields);

    tracing::debug!(raw = %raw, cleaned = %fields.cleaned, fields = fields.len(), "barcode parsed");
    fields
}

fn field_pattern(key: FieldKey) -> Option<&'static Regex> {
    lazy_static! {
        static ref QTY_RE: Regex = Regex::new(r"(?i)(?:^|\s)QTY:(\S+)").unwrap();
        static ref PN_RE: Regex = Regex::new(r"(?i)(?:^|\s)PN:(\S+)").unwrap();
        static ref PO_RE: Regex = Regex::new(r"(?i)(?:^|\s)PO:(\S+)").unwrap();
        static ref MFR_RE: Regex = Regex::new(r"(?i)(?:^|\s)MFR:(\S+)").unwrap();
        static ref MPN_RE: Regex = Regex::new(r"(?i)(?:^|\s)MPN:(\S+)").unwrap();
        static ref COO_RE: Regex = Regex::new(r"(?i)(?:^|\s)CoO:(\S+)").unwrap();
        static ref ROHS_RE: Regex = Regex::new(r"(?i)\b(RoHS)\b").unwrap();
        static ref URL_RE: Regex = Regex::new(r"(?i)(https?://\S+)").unwrap();
    }

    let re: &'static Regex = match key {
        FieldKey::Qty => &QTY_RE,
        FieldKey::Pn => &PN_RE,
        FieldKey::Po => &PO_RE,
        FieldKey::Mfr => &MFR_RE,
        FieldKey::Mpn => &MPN_RE,
        FieldKey::CoO => &COO_RE,
        FieldKey::RoHS => &ROHS_RE,
        FieldKey::Url => &URL_RE,
        FieldKey::Value | FieldKey::Footprint | FieldKey::References => return None,
    };
    Some(re)
}

/// Pull `KEY:VALUE` tokens out of cleaned text
///
/// Keys are matched case-insensitively at the start of a whitespace-delimited
/// token, so `MPN:` never yields a `PN`. The first occurrence of each key wins.
/// RoHS is a bare flag; its value is the literal `RoHS`.
pub fn extract_fields(cleaned: &str) -> ParsedFields {
    let mut fields = ParsedFields::new(cleaned, cleaned);

    for key in FieldKey::BARCODE_KEYS {
        let value = field_pattern(key)
            .and_then(|re| re.captures(cleaned))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        if let Some(value) = value {
            let value = if key == FieldKey::RoHS { "RoHS" } else { value };
            fields.insert(key, value);
        }
    }

    fields
}

/// Rebuild a vendor URL from the part number
///
/// The part number on the label is more trustworthy than a URL that went
/// through the keyboard layout, so when both are present and the URL points
/// to the vendor the URL is regenerated from the PN.
pub fn reconcile_vendor_url(fields: &mut ParsedFields) {
    let (Some(pn), Some(url)) = (fields.get(FieldKey::Pn), fields.get(FieldKey::Url)) else {
        return;
    };
    if !url.to_lowercase().contains(VENDOR_HOST) {
        return;
    }

    let rebuilt = canonical_product_url(&slug_from_part_number(pn));
    if rebuilt != url {
        tracing::debug!(from = %url, to = %rebuilt, "vendor URL rebuilt from PN");
    }
    fields.insert(FieldKey::Url, rebuilt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_fields() {
        let fields = extract_fields("QTY:10 PN:1N4007 MFR:Vishay");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get(FieldKey::Qty), Some("10"));
        assert_eq!(fields.get(FieldKey::Pn), Some("1N4007"));
        assert_eq!(fields.get(FieldKey::Mfr), Some("Vishay"));
    }

    #[test]
    fn test_extract_noise_is_empty() {
        assert!(extract_fields("").is_empty());
        assert!(extract_fields("lorem ipsum 12345").is_empty());
    }

    #[test]
    fn test_mpn_is_not_pn() {
        let fields = extract_fields("MPN:BAT54C-7-F QTY:3");
        assert_eq!(fields.get(FieldKey::Mpn), Some("BAT54C-7-F"));
        assert_eq!(fields.get(FieldKey::Pn), None);
    }

    #[test]
    fn test_case_insensitive_keys() {
        let fields = extract_fields("qty:5 pn:BM4942G coo:CN rohs po:4500123");
        assert_eq!(fields.get(FieldKey::Qty), Some("5"));
        assert_eq!(fields.get(FieldKey::Pn), Some("BM4942G"));
        assert_eq!(fields.get(FieldKey::CoO), Some("CN"));
        assert_eq!(fields.get(FieldKey::RoHS), Some("RoHS"));
        assert_eq!(fields.get(FieldKey::Po), Some("4500123"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let fields = extract_fields("QTY:1 QTY:2");
        assert_eq!(fields.get(FieldKey::Qty), Some("1"));
    }

    #[test]
    fn test_reconcile_numeric_suffix() {
        let mut fields =
            extract_fields("https://www.tme.eu/cz/details/dr384_2-2x6/ PN:DR384/2 QTY:5");
        reconcile_vendor_url(&mut fields);
        assert_eq!(
            fields.get(FieldKey::Url),
            Some("https://www.tme.eu/cz/details/dr384_2/")
        );
    }

    #[test]
    fn test_reconcile_letter_suffix() {
        let mut fields = extract_fields("PN:1N5408/DIO URL https://www.tme.eu/cz/details/x/");
        reconcile_vendor_url(&mut fields);
        assert_eq!(
            fields.get(FieldKey::Url),
            Some("https://www.tme.eu/cz/details/1n5408-dio/")
        );
    }

    #[test]
    fn test_reconcile_ignores_other_hosts() {
        let mut fields = extract_fields("PN:ABC/1 https://example.com/abc");
        reconcile_vendor_url(&mut fields);
        assert_eq!(fields.get(FieldKey::Url), Some("https://example.com/abc"));
    }

    #[test]
    fn test_parse_mangled_scan() {
        let fields = parse_barcode(
            "QTY:1é https:77www7tme7eu7cz7details71N54087DIO",
            &ParseOptions::default(),
        );
        assert_eq!(fields.get(FieldKey::Qty), Some("10"));
        assert_eq!(
            fields.get(FieldKey::Url),
            Some("https://www.tme.eu/cz/details/1n5408-dio/")
        );
        assert_eq!(fields.raw, "QTY:1é https:77www7tme7eu7cz7details71N54087DIO");
        assert!(fields.cleaned.starts_with("QTY:10 https://www.tme.eu/"));
    }

    #[test]
    fn test_parse_with_separator_restoration() {
        let options = ParseOptions {
            profile: KeyboardProfile::ShiftRow,
            restore_separators: true,
        };
        let fields = parse_barcode("PN:DR384_2 QTY:ř", &options);
        assert_eq!(fields.get(FieldKey::Pn), Some("DR384/2"));
        assert_eq!(fields.get(FieldKey::Qty), Some("5"));
    }
}
