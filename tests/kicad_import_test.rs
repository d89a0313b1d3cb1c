//! KiCad BOM import tests

use bom_scanner::inventory::Inventory;
use bom_scanner::kicad_import::import_kicad_csv;
use bom_scanner_common::{CategoryLabel, FieldKey};
use chrono::Local;
use tempfile::tempdir;

const BOM: &str = "\
Reference,Qty,Value,Footprint,Datasheet,DNP,Exclude from BOM
\"C1, C2, C5\",3,100n,Capacitor_SMD:C_0603_1608Metric,~,,
D1,1,1N4148W,Diode_SMD:D_SOD-123,https://www.diodes.com/1N4148W.pdf,,
R7,1,0R,Resistor_SMD:R_0402_1005Metric,~,DNP,
U1,1,NE555,Package_SO:SOIC-8,~,,
TP1,1,TestPoint,TestPoint:TestPoint_Pad_D1.0mm,~,,Excluded
";

#[test]
fn test_import_kicad_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("power_board.csv");
    std::fs::write(&path, BOM).unwrap();

    let import = import_kicad_csv(&path, Some("power_board")).unwrap();
    assert_eq!(import.parts.len(), 3);
    assert_eq!(import.skipped, 2);

    let caps = &import.parts[0];
    assert_eq!(caps.get(FieldKey::Pn), Some("100n"));
    assert_eq!(caps.get(FieldKey::Qty), Some("3"));
    assert_eq!(caps.get(FieldKey::Footprint), Some("0603"));
    assert_eq!(caps.get(FieldKey::References), Some("C1, C2, C5"));
    assert_eq!(caps.get(FieldKey::Url), None);
    assert_eq!(caps.projects, vec!["power_board"]);

    let diode = &import.parts[1];
    assert_eq!(diode.get(FieldKey::Footprint), Some("SOD-123"));
    assert_eq!(
        diode.get(FieldKey::Url),
        Some("https://www.diodes.com/1N4148W.pdf")
    );

    assert_eq!(import.parts[2].get(FieldKey::Footprint), Some("SOIC-8"));
}

#[test]
fn test_import_into_inventory_merges_quantities() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("bom.csv");
    std::fs::write(&csv_path, BOM).unwrap();
    let inventory_path = dir.path().join("inventory.json");

    // Import the same BOM twice
    for _ in 0..2 {
        let import = import_kicad_csv(&csv_path, None).unwrap();
        let mut inventory = Inventory::load(&inventory_path).unwrap();
        for part in import.parts {
            inventory.record_fields(part, CategoryLabel::UNKNOWN, Local::now());
        }
        inventory.save(&inventory_path).unwrap();
    }

    let inventory = Inventory::load(&inventory_path).unwrap();
    assert_eq!(inventory.len(), 3);
    let caps = inventory.find("100n").unwrap();
    assert_eq!(caps.fields.get(FieldKey::Qty), Some("6"));
    assert_eq!(caps.id, "UN-001");
    assert_eq!(inventory.find("NE555").map(|e| e.id.as_str()), Some("UN-003"));
}
