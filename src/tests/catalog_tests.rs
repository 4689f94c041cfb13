use crate::catalog::{Catalog, DeviceRecord, MAX_DEVICE_ADDRESS, MIN_DEVICE_ADDRESS};

#[test]
fn lookup_known_address() {
    let catalog = Catalog::new(vec![
        DeviceRecord::new(0x23, "BH1750"),
        DeviceRecord::new(0x68, "MPU-6500"),
    ]);

    assert_eq!(catalog.lookup(0x23), Some("BH1750"));
    assert_eq!(catalog.lookup(0x68), Some("MPU-6500"));
}

#[test]
fn lookup_unknown_address() {
    let catalog = Catalog::new(vec![DeviceRecord::new(0x23, "BH1750")]);

    assert_eq!(catalog.lookup(0x24), None);
    assert_eq!(catalog.lookup(0x00), None);
    assert_eq!(catalog.lookup(0x7F), None);
}

#[test]
fn lookup_is_repeatable() {
    let catalog = Catalog::new(vec![DeviceRecord::new(0x3C, "SSD1306")]);

    assert_eq!(catalog.lookup(0x3C), Some("SSD1306"));
    assert_eq!(catalog.lookup(0x3C), Some("SSD1306"));
}

#[test]
fn duplicate_address_first_match_wins() {
    let catalog = Catalog::new(vec![
        DeviceRecord::new(0x29, "VL53L0X"),
        DeviceRecord::new(0x29, "TCS34725"),
    ]);

    assert_eq!(catalog.lookup(0x29), Some("VL53L0X"));
}

#[test]
fn empty_catalog() {
    let catalog = Catalog::new(Vec::new());

    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
    assert_eq!(catalog.lookup(0x23), None);
}

#[test]
fn builtin_catalog_entries() {
    let catalog = Catalog::builtin();

    assert!(!catalog.is_empty());
    assert!(catalog.lookup(0x23).unwrap().contains("BH1750"));
    assert!(catalog.lookup(0x68).unwrap().contains("MPU-6500"));
    assert!(catalog.lookup(0x76).unwrap().contains("BMP280"));
    assert_eq!(catalog.lookup(0x50), None);
}

#[test]
fn builtin_catalog_addresses_in_range() {
    for record in Catalog::builtin().records() {
        assert!(record.address >= MIN_DEVICE_ADDRESS);
        assert!(record.address <= MAX_DEVICE_ADDRESS);
        assert!(!record.label.trim().is_empty());
    }
}
