use crate::bus::{BusId, BusProbe, PinPair, ProbeError};
use crate::gpio::{GpioBorrowChecker, PinFunction, PullMode};
use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, warn};
use parking_lot::RwLock;
use uuid::Uuid;
use rppal::gpio::{Error as GpioHwError, Gpio, IoPin, Mode, PullUpDown};
use rppal::i2c::{Error as I2cHwError, I2c};

/// Fixed probe clock. The kernel driver owns the actual divider on this
/// platform, so the value is advisory and logged at configure time.
pub const BUS_CLOCK_HZ: u32 = 100_000;

fn gpio_map_err(err: GpioHwError, default_err_msg: &str) -> ProbeError {
    match err {
        GpioHwError::PinNotAvailable(p) => ProbeError::InvalidConfig(format!("pin {} is not available", p)),
        GpioHwError::PermissionDenied(s) => ProbeError::HardwareError(format!("permission denied: {}", s)),
        GpioHwError::Io(e) => ProbeError::HardwareError(format!("I/O error: {}", e)),
        _ => ProbeError::Other(default_err_msg.to_string())
    }
}

fn i2c_map_err(err: I2cHwError, default_err_msg: &str) -> ProbeError {
    match err {
        I2cHwError::Io(e) => ProbeError::HardwareError(format!("I/O error: {}", e)),
        _ => ProbeError::Other(default_err_msg.to_string())
    }
}

struct ActiveBus {
    bus: BusId,
    lease_id: Uuid,
    i2c: I2c,
    sda: IoPin,
    scl: IoPin
}

/// `BusProbe` implementation over the real controllers. Holds a lease over
/// the active bus's pin pair for the duration of one scan; at most one bus
/// is configured at a time, and the other bus's pins are never touched.
pub struct HardwareProbe {
    gpio_controller: Gpio,
    gpio_borrow: Arc<RwLock<GpioBorrowChecker>>,
    pin_config: HashMap<BusId, PinPair>,
    active: Option<ActiveBus>
}

impl HardwareProbe {
    pub fn new(
        gpio_borrow: &Arc<RwLock<GpioBorrowChecker>>,
        pin_config: HashMap<BusId, PinPair>
    ) -> Result<Self, ProbeError> {
        let gpio_checker = gpio_borrow.read();

        for (bus, definition) in &pin_config {
            if definition.sda == definition.scl {
                return Err(ProbeError::InvalidConfig(
                    format!("{} is attempting to use the same pin twice: (SDA: {}, SCL: {})",
                    bus, definition.sda, definition.scl
                )));
            }

            if !gpio_checker.has_pin(definition.sda) {
                return Err(ProbeError::InvalidConfig(
                    format!("{} is attempting to use invalid pin: {} (SDA)",
                    bus, definition.sda
                )));
            }

            if !gpio_checker.has_pin(definition.scl) {
                return Err(ProbeError::InvalidConfig(
                    format!("{} is attempting to use invalid pin: {} (SCL)",
                    bus, definition.scl
                )));
            }

            for (other_bus, other_definition) in &pin_config {
                if bus != other_bus && definition.overlap(other_definition) {
                    return Err(ProbeError::InvalidConfig(
                        format!("bus pin definitions overlap: {} -> (SDA: {}, SCL: {}) with {} -> (SDA: {}, SCL: {})",
                        bus, definition.sda, definition.scl, other_bus, other_definition.sda, other_definition.scl
                    )));
                }
            }
        }

        let gpio = Gpio::new()
            .map_err(|err| gpio_map_err(err, "Internal RPPAL error while initializing Gpio interface"))?;

        Ok(HardwareProbe {
            gpio_controller: gpio,
            gpio_borrow: gpio_borrow.clone(),
            pin_config: pin_config,
            active: None
        })
    }

    fn open_io_pin(&self, pin_id: u8) -> Result<IoPin, ProbeError> {
        let bcm_id = self.gpio_borrow.read().get(&pin_id)
            .map_err(|err| ProbeError::InvalidConfig(err.to_string()))?
            .bcm_id();

        let pin = self.gpio_controller.get(bcm_id)
            .map_err(|err| gpio_map_err(err, &format!("Internal RPPAL error while opening pin (BCM {})", bcm_id)))?;

        let mut io_pin = pin.into_io(Mode::Alt0);
        io_pin.set_pullupdown(PullUpDown::PullUp);
        Ok(io_pin)
    }
}

impl BusProbe for HardwareProbe {
    fn configure(&mut self, bus: BusId) -> Result<(), ProbeError> {
        if let Some(active) = &self.active {
            warn!("Attempted to configure {} while {} is still configured", bus, active.bus);
            return Err(ProbeError::ChannelBusy(active.bus));
        }

        let definition = match self.pin_config.get(&bus) {
            Some(v) => *v,
            None => return Err(ProbeError::BusNotFound(bus))
        };

        let lease_id = {
            let mut borrow_checker = self.gpio_borrow.write();
            if !borrow_checker.can_borrow_many(&definition.to_arr()) {
                return Err(ProbeError::HardwareError(
                    format!("{} pins are already in use", bus)
                ));
            }

            borrow_checker.borrow_many(definition.to_vec())
                .map_err(|err| ProbeError::HardwareError(err.to_string()))?
        };

        let result = (|| -> Result<(IoPin, IoPin, I2c), ProbeError> {
            let sda = self.open_io_pin(definition.sda)?;
            let scl = self.open_io_pin(definition.scl)?;

            let i2c = I2c::with_bus(bus.channel())
                .map_err(|err| i2c_map_err(err, &format!("Internal RPPAL error while opening {}", bus)))?;

            Ok((sda, scl, i2c))
        })();

        let (sda, scl, i2c) = match result {
            Ok(v) => v,
            Err(e) => {
                // Lease must not outlive a failed configure.
                let _ = self.gpio_borrow.write().release(&lease_id);
                return Err(e);
            }
        };

        {
            let mut borrow_checker = self.gpio_borrow.write();
            for pin in definition.to_arr() {
                borrow_checker.set_function(pin, PinFunction::I2c)
                    .map_err(|err| ProbeError::Other(err.to_string()))?;
                borrow_checker.set_pull(pin, PullMode::Up)
                    .map_err(|err| ProbeError::Other(err.to_string()))?;
            }
        }

        debug!("{} configured at {} Hz (SDA: {}, SCL: {})", bus, BUS_CLOCK_HZ, definition.sda, definition.scl);
        self.active = Some(ActiveBus { bus, lease_id, i2c, sda, scl });
        Ok(())
    }

    fn probe(&mut self, bus: BusId, address: u8) -> bool {
        let active = match &mut self.active {
            Some(a) if a.bus == bus => a,
            _ => {
                warn!("Probe at 0x{:02X} ignored: {} is not configured", address, bus);
                return false;
            }
        };

        if active.i2c.set_slave_address(address as u16).is_err() {
            return false;
        }

        let mut buf = [0u8; 1];
        active.i2c.read(&mut buf).is_ok()
    }

    fn release(&mut self, bus: BusId) {
        let mut active = match self.active.take() {
            Some(a) if a.bus == bus => a,
            Some(a) => {
                warn!("Attempted to release {} while {} is configured", bus, a.bus);
                self.active = Some(a);
                return;
            }
            None => return
        };

        active.sda.set_pullupdown(PullUpDown::Off);
        active.scl.set_pullupdown(PullUpDown::Off);
        active.sda.set_mode(Mode::Input);
        active.scl.set_mode(Mode::Input);

        if let Err(e) = self.gpio_borrow.write().release(&active.lease_id) {
            warn!("Failed to release pin lease for {}: {}", bus, e);
        }

        debug!("{} released", bus);
    }
}
