use std::{collections::HashMap, fmt::Display, sync::Arc};
use parking_lot::RwLock;
use uuid::Uuid;

/// Function currently assigned to a pin. Scans move pins to `I2c` on
/// configure and back to `Unassigned` on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    Unassigned,
    I2c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
    Off,
    Up,
    Down
}

pub struct PinState {
    pin_number: u8,
    bcm_id: u8,
    leased: bool,
    function: PinFunction,
    pull: PullMode
}

impl PinState {
    pub fn new(pin_number: u8, bcm_id: u8) -> Self {
        PinState {
            pin_number: pin_number,
            bcm_id: bcm_id,
            leased: false,
            function: PinFunction::Unassigned,
            pull: PullMode::Off
        }
    }

    pub fn pin_id(&self) -> u8 {
        self.pin_number
    }

    pub fn bcm_id(&self) -> u8 {
        self.bcm_id
    }

    pub fn function(&self) -> PinFunction {
        self.function
    }

    pub fn pull(&self) -> PullMode {
        self.pull
    }

    pub fn is_neutral(&self) -> bool {
        !self.leased && self.function == PinFunction::Unassigned && self.pull == PullMode::Off
    }
}

#[derive(Debug, PartialEq)]
pub enum GpioError {
    Busy(u8),
    PinNotFound(u8),
    LeaseNotFound,
    NotLeased(u8),
    Other(String)
}

impl Display for GpioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            GpioError::Busy(p) => format!("pin {} is busy", p),
            GpioError::PinNotFound(p) => format!("pin {} is not available", p),
            GpioError::LeaseNotFound => format!("specified lease does not exist"),
            GpioError::NotLeased(p) => format!("pin {} is not held by any lease", p),
            GpioError::Other(s) => format!("{}", s),
        })
    }
}

pub struct GpioBorrowChecker {
    pins: HashMap<u8, PinState>,
    leases: HashMap<Uuid, Vec<u8>>
}

impl GpioBorrowChecker {
    pub fn new(pins: HashMap<u8, PinState>) -> Self {
        GpioBorrowChecker {
            pins: pins,
            leases: HashMap::new()
        }
    }

    pub fn new_rc(pins: HashMap<u8, PinState>) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(GpioBorrowChecker::new(pins)))
    }

    pub fn get(&self, pin: &u8) -> Result<&PinState, GpioError> {
        match self.pins.contains_key(pin) {
            true => Ok(self.pins.get(pin).unwrap()),
            false => Err(GpioError::PinNotFound(pin.to_owned()))
        }
    }

    pub fn get_pins(&self) -> Vec<&PinState> {
        self.pins.values().collect()
    }

    pub fn get_borrowed(&self) -> Vec<&PinState> {
        self.pins.values().filter(|x| x.leased).collect()
    }

    pub fn has_pin(&self, pin: u8) -> bool {
        self.pins.contains_key(&pin)
    }

    pub fn has_lease(&self, borrow_id: &Uuid) -> bool {
        self.leases.contains_key(borrow_id)
    }

    pub fn can_borrow_one(&self, pin: u8) -> bool {
        match self.pins.contains_key(&pin) {
            true => !self.pins.get(&pin).unwrap().leased,
            false => false
        }
    }

    pub fn can_borrow_many(&self, pins: &[u8]) -> bool {
        for pin in pins {
            if !self.can_borrow_one(*pin) {
                return false;
            }
        }

        true
    }

    pub fn borrow_one(&mut self, pin: u8) -> Result<Uuid, GpioError> {
        self.borrow_many(vec![pin])
    }

    pub fn borrow_many(&mut self, pins: Vec<u8>) -> Result<Uuid, GpioError> {
        for pin in pins.iter() {
            if !self.pins.contains_key(pin) {
                return Err(GpioError::PinNotFound(pin.to_owned()));
            }

            if self.pins.get(pin).unwrap().leased {
                return Err(GpioError::Busy(pin.to_owned()));
            }
        }

        for pin in pins.iter() {
            let pin_state = self.pins.get_mut(pin).unwrap();
            pin_state.leased = true;
        }

        let uuid = Uuid::new_v4();
        self.leases.insert(uuid, pins);
        Ok(uuid)
    }

    /// Records the function a leased pin has been switched to.
    pub fn set_function(&mut self, pin: u8, function: PinFunction) -> Result<(), GpioError> {
        let pin_state = match self.pins.get_mut(&pin) {
            Some(p) => p,
            None => return Err(GpioError::PinNotFound(pin))
        };

        if !pin_state.leased {
            return Err(GpioError::NotLeased(pin));
        }

        pin_state.function = function;
        Ok(())
    }

    pub fn set_pull(&mut self, pin: u8, pull: PullMode) -> Result<(), GpioError> {
        let pin_state = match self.pins.get_mut(&pin) {
            Some(p) => p,
            None => return Err(GpioError::PinNotFound(pin))
        };

        if !pin_state.leased {
            return Err(GpioError::NotLeased(pin));
        }

        pin_state.pull = pull;
        Ok(())
    }

    pub fn function_of(&self, pin: u8) -> Result<PinFunction, GpioError> {
        self.get(&pin).map(|p| p.function)
    }

    pub fn pull_of(&self, pin: u8) -> Result<PullMode, GpioError> {
        self.get(&pin).map(|p| p.pull)
    }

    /// Releasing a lease returns every pin in it to the neutral state:
    /// unleased, unassigned function, pulls off.
    pub fn release(&mut self, borrow_id: &Uuid) -> Result<(), GpioError> {
        if !self.leases.contains_key(borrow_id) {
            return Err(GpioError::LeaseNotFound);
        }

        let lease = self.leases.get(borrow_id).unwrap();
        for pin in lease {
            let pin_state = self.pins.get_mut(pin).unwrap();
            pin_state.leased = false;
            pin_state.function = PinFunction::Unassigned;
            pin_state.pull = PullMode::Off;
        }

        self.leases.remove(borrow_id);
        Ok(())
    }
}
