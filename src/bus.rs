use std::fmt::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The board exposes exactly two I2C controllers. Each variant carries its
/// kernel channel number, display name and default pin pair as data, so
/// nothing in the scanner references ambient hardware globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum BusId {
    Bus0,
    Bus1
}

impl BusId {
    pub fn channel(&self) -> u8 {
        match self {
            BusId::Bus0 => 0,
            BusId::Bus1 => 1
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BusId::Bus0 => "I2C 0",
            BusId::Bus1 => "I2C 1"
        }
    }

    pub fn default_pins(&self) -> PinPair {
        match self {
            BusId::Bus0 => PinPair::new(0, 1),
            BusId::Bus1 => PinPair::new(2, 3)
        }
    }
}

impl Display for BusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinPair {
    pub sda: u8,
    pub scl: u8
}

impl PinPair {
    pub fn new(sda: u8, scl: u8) -> Self {
        PinPair { sda, scl }
    }

    pub fn overlap(&self, other: &Self) -> bool {
        self.sda == other.sda ||
        self.scl == other.scl ||
        self.sda == other.scl ||
        self.scl == other.sda
    }

    pub fn to_vec(&self) -> Vec<u8> {
        vec![self.sda, self.scl]
    }

    pub fn to_arr(&self) -> [u8; 2] {
        [self.sda, self.scl]
    }
}

#[derive(Debug, PartialEq)]
pub enum ProbeError {
    InvalidConfig(String),
    BusNotFound(BusId),
    ChannelBusy(BusId),
    HardwareError(String),
    Other(String)
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            ProbeError::InvalidConfig(msg) => format!("invalid config: {}", msg),
            ProbeError::BusNotFound(bus) => format!("{} has no pin definition", bus),
            ProbeError::ChannelBusy(bus) => format!("{} is busy", bus),
            ProbeError::HardwareError(msg) => format!("hardware error: {}", msg),
            ProbeError::Other(msg) => format!("{}", msg),
        })
    }
}

impl std::error::Error for ProbeError {}

/// Seam between the sweep algorithm and the bus hardware. A scan drives one
/// strictly linear pass per bus: `configure`, a probe per address, `release`.
/// Only `configure` can fail; a nonresponsive address is an expected probe
/// outcome, not an error.
pub trait BusProbe {
    /// Binds the bus's pin pair to the I2C function with pull-ups enabled
    /// and opens the controller. Must not touch the other bus's pins.
    fn configure(&mut self, bus: BusId) -> Result<(), ProbeError>;

    /// Blocking single-byte read at `address`. Returns true iff the device
    /// acknowledged; the byte itself is discarded.
    fn probe(&mut self, bus: BusId, address: u8) -> bool;

    /// Disables pull-ups, returns both pins to an unassigned function and
    /// closes the controller. Safe to call regardless of sweep outcome.
    fn release(&mut self, bus: BusId);
}

// Bus implementations
pub mod i2c; // HardwareProbe
