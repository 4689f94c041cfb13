use crate::bus::{BusId, BusProbe, ProbeError};
use crate::catalog::Catalog;
use std::ops::Range;
use log::info;

/// Sweep range for 7-bit device addresses. Everything outside it is reserved
/// by the bus specification and never probed.
pub const ADDRESS_RANGE: Range<u8> = 0x08..0x78;

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Known(String),
    Unknown
}

impl Classification {
    pub fn label(&self) -> &str {
        match self {
            Classification::Known(label) => label.as_str(),
            Classification::Unknown => "unknown device"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    pub address: u8,
    pub classification: Classification
}

/// Findings of one scan invocation. Produced fresh each time, not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub bus: BusId,
    pub hits: Vec<ScanHit>
}

impl ScanReport {
    pub fn found_count(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Sweeps one bus for attached devices.
///
/// The invocation is self-contained and strictly linear: configure the bus,
/// probe every address in `ADDRESS_RANGE` in ascending order, then release
/// the pins unconditionally. An address that does not acknowledge is simply
/// skipped; it is the expected outcome for most of the range and never
/// aborts the sweep. Only `configure` can fail, in which case no probe is
/// issued and there is nothing to tear down.
pub fn scan<P: BusProbe>(probe: &mut P, bus: BusId, catalog: &Catalog) -> Result<ScanReport, ProbeError> {
    info!("--- Scanning {} ---", bus);
    probe.configure(bus)?;

    let mut hits = Vec::new();
    for address in ADDRESS_RANGE {
        if !probe.probe(bus, address) {
            continue;
        }

        let classification = match catalog.lookup(address) {
            Some(label) => Classification::Known(label.to_string()),
            None => Classification::Unknown
        };

        info!(">> 0x{:02X}: {}", address, classification.label());
        hits.push(ScanHit { address, classification });
    }

    if hits.is_empty() {
        info!("No devices found on {}", bus);
    } else {
        info!("{}: {} device(s) found", bus, hits.len());
    }

    probe.release(bus);
    Ok(ScanReport { bus, hits })
}
