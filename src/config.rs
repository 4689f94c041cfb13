use crate::bus::{BusId, PinPair};
use crate::catalog::{DeviceRecord, MAX_DEVICE_ADDRESS, MIN_DEVICE_ADDRESS};
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{Read, Write};
use log::warn;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    SerializeError(String),
    InvalidEntry(String),
    MissingEntry(String),
    Other(String)
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            ConfigError::SerializeError(msg) => format!("serialize/parse error: {}", msg),
            ConfigError::InvalidEntry(msg) => format!("invalid config entry: {}", msg),
            ConfigError::MissingEntry(msg) => format!("missing config entry: {}", msg),
            ConfigError::Other(msg) => format!("config error: {}", msg)
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigSectionCatalog {
    pub devices: Vec<DeviceRecord>
}

impl ConfigSectionCatalog {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self { devices }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut known_addresses = Vec::new();

        for record in &self.devices {
            if record.address < MIN_DEVICE_ADDRESS || record.address > MAX_DEVICE_ADDRESS {
                return Err(ConfigError::InvalidEntry(
                    format!("catalog address 0x{:02X} is outside the valid device range", record.address)
                ));
            }

            if record.label.trim().is_empty() {
                return Err(ConfigError::InvalidEntry(
                    format!("catalog entry 0x{:02X} has an empty label", record.address)
                ));
            }

            // Duplicates are tolerated; lookup returns the first match in
            // table order, so later entries for the same address are shadowed.
            if known_addresses.contains(&record.address) {
                warn!("Catalog defines address 0x{:02X} more than once, first entry wins", record.address);
            }

            known_addresses.push(record.address);
        }

        Ok(())
    }
}

impl Default for ConfigSectionCatalog {
    fn default() -> Self {
        Self::new(crate::catalog::Catalog::builtin().records().to_vec())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigSectionBuses {
    pub pins: HashMap<BusId, PinPair>
}

impl ConfigSectionBuses {
    pub fn new(pins: HashMap<BusId, PinPair>) -> Self {
        Self { pins }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (bus, definition) in &self.pins {
            if definition.sda == definition.scl {
                return Err(ConfigError::InvalidEntry(
                    format!("{} is attempting to use the same pin twice: (SDA: {}, SCL: {})",
                    bus, definition.sda, definition.scl
                )));
            }

            for (other_bus, other_definition) in &self.pins {
                if bus != other_bus && definition.overlap(other_definition) {
                    return Err(ConfigError::InvalidEntry(
                        format!("bus pin definitions overlap: {} -> (SDA: {}, SCL: {}) with {} -> (SDA: {}, SCL: {})",
                        bus, definition.sda, definition.scl, other_bus, other_definition.sda, other_definition.scl
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ConfigSectionBuses {
    fn default() -> Self {
        Self::new(BusId::iter().map(|bus| (bus, bus.default_pins())).collect())
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Configuration {
    pub catalog_section: ConfigSectionCatalog,
    pub bus_section: ConfigSectionBuses
}

impl Configuration {
    pub fn new(catalog_section: ConfigSectionCatalog, bus_section: ConfigSectionBuses) -> Self {
        Self { catalog_section, bus_section }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog_section.validate()?;
        self.bus_section.validate()?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Configuration, ConfigError> {
        let config: Configuration = match serde_json::from_reader(reader) {
            Ok(c) => c,
            Err(e) => {
                return Err(ConfigError::SerializeError(
                    format!("failed to deserialize config file: {}", e)
                ));
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_str(json_str: String) -> Result<Configuration, ConfigError> {
        Self::from_reader(json_str.as_bytes())
    }

    pub fn to_writer<W: Write>(&self, writer: W, pretty: bool) -> Result<(), ConfigError> {
        let result;
        if pretty {
            result = serde_json::to_writer_pretty(writer, self);
        } else {
            result = serde_json::to_writer(writer, self);
        }

        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(ConfigError::SerializeError(
                format!("failed to serialize config: {}", e)
            ))
        }
    }

    pub fn to_str(&self, pretty: bool) -> Result<String, ConfigError> {
        let result;
        if pretty {
            result = serde_json::to_string_pretty(self);
        } else {
            result = serde_json::to_string(self);
        }

        match result {
            Ok(s) => Ok(s),
            Err(e) => Err(ConfigError::SerializeError(
                format!("failed to serialize config: {}", e)
            )),
        }
    }
}
