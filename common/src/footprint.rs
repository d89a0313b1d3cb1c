//! KiCad footprint shortening

use lazy_static::lazy_static;
use regex::Regex;

const PART_PREFIXES: [&str; 6] = ["D_", "C_", "R_", "Fuse_", "LED_", "SW_"];

/// Shorten a KiCad footprint to its package name
///
/// `Capacitor_SMD:C_0805_2012Metric` → `0805`,
/// `Diode_SMD:D_SOD-323` → `SOD-323`.
/// Without a package token the library prefix is still dropped
/// (`Connector:Banana_Jack` → `Banana_Jack`).
pub fn shorten_footprint(footprint: &str) -> String {
    lazy_static! {
        static ref METRIC_RE: Regex = Regex::new(r"_[0-9]{4}Metric").unwrap();
        static ref PACKAGE_RE: Regex =
            Regex::new(r"([0-9]{4}|[A-Z]+-[0-9]+|SOT-[0-9]+|QFN-[0-9]+)").unwrap();
    }

    if footprint.is_empty() {
        return String::new();
    }

    let name = footprint
        .split_once(':')
        .map_or(footprint, |(_, name)| name);
    let name = PART_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);
    let name = METRIC_RE.replace_all(name, "");

    match PACKAGE_RE.find(&name) {
        Some(m) => m.as_str().to_string(),
        None => name.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_footprint() {
        assert_eq!(shorten_footprint("Capacitor_SMD:C_0805_2012Metric"), "0805");
        assert_eq!(shorten_footprint("Resistor_SMD:R_0603_1608Metric"), "0603");
        assert_eq!(shorten_footprint("Fuse:Fuse_1206_3216Metric"), "1206");
        assert_eq!(shorten_footprint("Diode_SMD:D_SOD-323"), "SOD-323");
        assert_eq!(shorten_footprint("Package_TO_SOT_SMD:SOT-23"), "SOT-23");
        assert_eq!(shorten_footprint("Package_DFN_QFN:QFN-32"), "QFN-32");
    }

    #[test]
    fn test_shorten_footprint_passthrough() {
        assert_eq!(shorten_footprint(""), "");
        assert_eq!(shorten_footprint("Connector:Banana_Jack"), "Banana_Jack");
        assert_eq!(shorten_footprint("MountingHole"), "MountingHole");
        assert_eq!(shorten_footprint("LED_THT:LED_D5.0mm"), "D5.0mm");
    }
}
