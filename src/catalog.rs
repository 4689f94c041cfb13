use serde::{Deserialize, Serialize};

/// Lowest 7-bit address a device may legally occupy. Addresses below are
/// reserved by the I2C specification (general call, CBUS, etc.).
pub const MIN_DEVICE_ADDRESS: u8 = 0x08;
/// Highest legal 7-bit device address; 0x78..=0x7F are reserved.
pub const MAX_DEVICE_ADDRESS: u8 = 0x77;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub address: u8,
    pub label: String
}

impl DeviceRecord {
    pub fn new(address: u8, label: &str) -> Self {
        DeviceRecord {
            address,
            label: label.to_string()
        }
    }
}

/// Immutable ordered table of known device identities. Built once at startup
/// and shared by reference across scan invocations; never mutated afterwards.
pub struct Catalog {
    records: Vec<DeviceRecord>
}

impl Catalog {
    pub fn new(records: Vec<DeviceRecord>) -> Self {
        Catalog { records }
    }

    /// The compiled-in identity table for peripherals commonly attached to
    /// the board. Used when no configuration file supplies a catalog.
    pub fn builtin() -> Self {
        Catalog::new(vec![
            DeviceRecord::new(0x23, "BH1750 ambient light sensor"),
            DeviceRecord::new(0x29, "VL53L0X distance sensor or TCS34725 color sensor"),
            DeviceRecord::new(0x38, "AHT10 humidity/temperature sensor"),
            DeviceRecord::new(0x3C, "SSD1306/SH1106 OLED display"),
            DeviceRecord::new(0x57, "MAX30100 pulse oximeter"),
            DeviceRecord::new(0x68, "MPU-6500/9250 IMU (AD0 low)"),
            DeviceRecord::new(0x69, "MPU-6500/9250 IMU (AD0 high)"),
            DeviceRecord::new(0x6B, "on-board battery charger IC"),
            DeviceRecord::new(0x76, "BMP280 pressure/temperature sensor (SDO low)"),
        ])
    }

    /// Returns the label of the first record matching the address, if any.
    /// Duplicate addresses are a configuration mistake; the first entry in
    /// table order wins.
    pub fn lookup(&self, address: u8) -> Option<&str> {
        self.records
            .iter()
            .find(|record| record.address == address)
            .map(|record| record.label.as_str())
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
