//! Keyboard-layout character recovery
//!
//! The barcode readers are keyboard-wedge devices. When the workstation runs a
//! Czech layout, the reader's digit keystrokes arrive as the characters on the
//! shifted number row (`ě`, `š`, `č`, ...), and `/` cannot be typed at all.
//!
//! The two scanner stations were configured differently, so the substitution
//! table exists as two named profiles. Picking the wrong one corrupts digits.

use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named substitution table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyboardProfile {
    /// Shifted number row: `+ěščřžýáíé` → `1234567890` (profile A)
    #[default]
    ShiftRow,
    /// Table of the Windows scanner station (profile B)
    Legacy,
}

const SHIFT_ROW_TABLE: &[(char, &str)] = &[
    ('+', "1"),
    ('ě', "2"),
    ('š', "3"),
    ('č', "4"),
    ('ř', "5"),
    ('ž', "6"),
    ('ý', "7"),
    ('á', "8"),
    ('í', "9"),
    ('é', "0"),
    ('ů', "0"),
];

// `+` is dropped here, and a few accented letters fold to plain ASCII
const LEGACY_TABLE: &[(char, &str)] = &[
    ('ř', "5"),
    ('š', "1"),
    ('č', "2"),
    ('ě', "3"),
    ('ý', "4"),
    ('á', "6"),
    ('í', "7"),
    ('é', "8"),
    ('ú', "9"),
    ('ů', "0"),
    ('+', ""),
    ('ž', "z"),
    ('ď', "d"),
    ('ť', "t"),
    ('ň', "n"),
];

impl KeyboardProfile {
    pub const ALL: [KeyboardProfile; 2] = [KeyboardProfile::ShiftRow, KeyboardProfile::Legacy];

    /// Substitution table of this profile
    pub fn table(self) -> &'static [(char, &'static str)] {
        match self {
            KeyboardProfile::ShiftRow => SHIFT_ROW_TABLE,
            KeyboardProfile::Legacy => LEGACY_TABLE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyboardProfile::ShiftRow => "shift-row",
            KeyboardProfile::Legacy => "legacy",
        }
    }
}

impl fmt::Display for KeyboardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KeyboardProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shift-row" | "shiftrow" | "a" | "full" => Ok(KeyboardProfile::ShiftRow),
            "legacy" | "b" | "windows" => Ok(KeyboardProfile::Legacy),
            other => Err(Error::Config(format!("unknown keyboard profile: {}", other))),
        }
    }
}

/// Replace layout artifacts with the characters the reader meant to type
///
/// Context-free and idempotent: every replacement is ASCII and no ASCII
/// character is a key of either table.
///
/// # Examples
/// ```
/// use bom_scanner_common::keyboard::{recover_chars, KeyboardProfile};
///
/// assert_eq!(recover_chars("BM4í4čG", KeyboardProfile::ShiftRow), "BM4944G");
/// ```
pub fn recover_chars(text: &str, profile: KeyboardProfile) -> String {
    let table = profile.table();
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match table.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }

    out
}

/// Restore `/` separators inside something that looks like a part symbol
///
/// Contextual pass used by the workbench scanner: the reader sends `_`, `-`,
/// `.` or a stray `7` where the label has `/`. Only applied when the text
/// contains a letters+digits run. Decimal points between two digits survive,
/// and dots are left alone entirely when the text carries a URL.
pub fn restore_symbol_separators(text: &str) -> String {
    lazy_static! {
        static ref SYMBOL_LIKE_RE: Regex = Regex::new(r"(?i)[A-Z]+[0-9]+").unwrap();
        // DR38472.2X6 -> DR384/2.2X6
        static ref SLASH_AS_SEVEN_RE: Regex = Regex::new(r"([0-9])7([0-9]\.)").unwrap();
        static ref URL_MARKER_RE: Regex = Regex::new(r"(?i)https?:|www\.").unwrap();
        static ref DASH_RE: Regex = Regex::new(r"(?i)([A-Z0-9])-([A-Z0-9])").unwrap();
    }

    if !SYMBOL_LIKE_RE.is_match(text) {
        return text.to_string();
    }

    let mut result = SLASH_AS_SEVEN_RE.replace_all(text, "${1}/${2}").to_string();
    result = result.replace('_', "/");

    if !URL_MARKER_RE.is_match(&result) {
        result = replace_non_decimal_dots(&result);
    }

    DASH_RE.replace_all(&result, "${1}/${2}").to_string()
}

/// `.` → `/` unless the dot sits between two digits
fn replace_non_decimal_dots(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != '.' {
            out.push(c);
            continue;
        }
        let prev_is_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_is_digit = i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
        out.push(if prev_is_digit && next_is_digit { '.' } else { '/' });
    }

    out
}
