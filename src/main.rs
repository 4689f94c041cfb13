mod bus;
mod catalog;
mod config;
mod gpio;
mod scanner;
mod tests;

use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use log::{info, warn};
use simple_logger::SimpleLogger;
use strum::IntoEnumIterator;

use bus::i2c::HardwareProbe;
use bus::BusId;
use catalog::Catalog;
use config::Configuration;
use gpio::{GpioBorrowChecker, PinState};

const CONFIG_PATH: &str = "busprobe.json";
const SCAN_INTERVAL: Duration = Duration::from_secs(10);

// Pin ids follow BCM numbering on this board, so the map is the identity.
fn load_pin_config() -> HashMap<u8, PinState> {
    let mut pins = HashMap::new();
    for i in 0..=27 {
        let pin = PinState::new(i, i);
        pins.insert(i, pin);
    }

    pins
}

fn load_configuration() -> Configuration {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        info!("No config file at {}, using built-in defaults", CONFIG_PATH);
        return Configuration::default();
    }

    match File::open(path).map_err(|e| e.to_string())
        .and_then(|f| Configuration::from_reader(f).map_err(|e| e.to_string()))
    {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load {}: {}, using built-in defaults", CONFIG_PATH, e);
            Configuration::default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new().init()?;

    let config = load_configuration();
    let catalog = Catalog::new(config.catalog_section.devices.clone());
    info!("Catalog loaded with {} known device(s)", catalog.len());

    let gpio_borrow = GpioBorrowChecker::new_rc(load_pin_config());
    let mut probe = HardwareProbe::new(&gpio_borrow, config.bus_section.pins.clone())?;

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = running.clone();
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::SeqCst);
    })?;

    let mut scan_count = 1u32;
    while running.load(Ordering::SeqCst) {
        info!("==================== SCAN #{} ====================", scan_count);
        scan_count += 1;

        for bus in BusId::iter() {
            if let Err(e) = scanner::scan(&mut probe, bus, &catalog) {
                warn!("Skipping {}: {}", bus, e);
            }
        }

        info!("Scan pass complete, next pass in {} seconds", SCAN_INTERVAL.as_secs());
        let mut waited = Duration::ZERO;
        while waited < SCAN_INTERVAL && running.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
            waited += Duration::from_millis(100);
        }
    }

    info!("Shutting down");
    Ok(())
}
