use crate::gpio::{GpioBorrowChecker, GpioError, PinFunction, PinState, PullMode};
use std::collections::HashMap;

fn test_pin_map() -> HashMap<u8, PinState> {
    let mut pin_map = HashMap::new();
    pin_map.insert(0, PinState::new(0, 0));
    pin_map.insert(1, PinState::new(1, 1));
    pin_map.insert(2, PinState::new(2, 2));
    pin_map.insert(3, PinState::new(3, 3));
    pin_map.insert(4, PinState::new(4, 4));
    pin_map
}

#[test]
fn has_pin_test() {
    let gpio = GpioBorrowChecker::new(test_pin_map());

    // non-existent pins
    assert!(!gpio.has_pin(5));
    assert!(!gpio.has_pin(27));

    // test multiple times
    assert!(gpio.has_pin(0));
    assert!(gpio.has_pin(0));

    // test existing pins
    assert!(gpio.has_pin(1));
    assert!(gpio.has_pin(4));
}

#[test]
fn borrow_many() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert!(gpio.borrow_many(vec![0, 1]).is_ok());
    assert!(gpio.borrow_many(vec![2, 3]).is_ok());
    assert!(gpio.borrow_many(vec![4]).is_ok());
}

#[test]
fn notfound_borrow_many() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert_eq!(
        gpio.borrow_many(vec![2, 3, 7]),
        Err(GpioError::PinNotFound(7))
    );
    assert_eq!(gpio.borrow_many(vec![0, 9]), Err(GpioError::PinNotFound(9)));
}

#[test]
fn busy_borrow_many() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert!(gpio.borrow_many(vec![0, 1, 2]).is_ok());
    assert_eq!(gpio.borrow_many(vec![2, 3]), Err(GpioError::Busy(2)));
}

#[test]
fn borrow_many_and_release() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    let lease1 = gpio.borrow_many(vec![0, 1]).unwrap();
    let lease2 = gpio.borrow_many(vec![2, 3]).unwrap();

    assert_eq!(gpio.release(&lease1), Ok(()));
    assert!(!gpio.has_lease(&lease1));
    assert!(gpio.has_lease(&lease2));
    assert_eq!(gpio.release(&lease2), Ok(()));
    assert!(!gpio.has_lease(&lease2));
}

#[test]
fn busy_borrow_one() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert!(gpio.borrow_one(2).is_ok());
    assert_eq!(gpio.borrow_one(2), Err(GpioError::Busy(2)));
}

#[test]
fn set_function_and_pull_on_leased_pins() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    gpio.borrow_many(vec![0, 1]).unwrap();
    assert_eq!(gpio.set_function(0, PinFunction::I2c), Ok(()));
    assert_eq!(gpio.set_pull(0, PullMode::Up), Ok(()));
    assert_eq!(gpio.function_of(0), Ok(PinFunction::I2c));
    assert_eq!(gpio.pull_of(0), Ok(PullMode::Up));

    // untouched pin in the same lease keeps its defaults
    assert_eq!(gpio.function_of(1), Ok(PinFunction::Unassigned));
    assert_eq!(gpio.pull_of(1), Ok(PullMode::Off));
}

#[test]
fn set_function_requires_lease() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert_eq!(gpio.set_function(0, PinFunction::I2c), Err(GpioError::NotLeased(0)));
    assert_eq!(gpio.set_pull(0, PullMode::Up), Err(GpioError::NotLeased(0)));
    assert_eq!(gpio.set_function(9, PinFunction::I2c), Err(GpioError::PinNotFound(9)));
}

#[test]
fn release_resets_pins_to_neutral() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    let lease = gpio.borrow_many(vec![0, 1]).unwrap();
    gpio.set_function(0, PinFunction::I2c).unwrap();
    gpio.set_pull(0, PullMode::Up).unwrap();
    gpio.set_function(1, PinFunction::I2c).unwrap();
    gpio.set_pull(1, PullMode::Up).unwrap();

    assert_eq!(gpio.release(&lease), Ok(()));

    for pin in [0, 1] {
        let state = gpio.get(&pin).unwrap();
        assert!(state.is_neutral());
        assert_eq!(state.function(), PinFunction::Unassigned);
        assert_eq!(state.pull(), PullMode::Off);
    }

    // pins are immediately borrowable again
    assert!(gpio.borrow_many(vec![0, 1]).is_ok());
}

#[test]
fn get_borrowed_tracks_leases() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    assert!(gpio.get_borrowed().is_empty());
    let lease = gpio.borrow_many(vec![2, 3]).unwrap();
    assert_eq!(gpio.get_borrowed().len(), 2);
    gpio.release(&lease).unwrap();
    assert!(gpio.get_borrowed().is_empty());
}

#[test]
fn release_unknown_lease() {
    let mut gpio = GpioBorrowChecker::new(test_pin_map());

    let lease = uuid::Uuid::new_v4();
    assert_eq!(gpio.release(&lease), Err(GpioError::LeaseNotFound));
}
