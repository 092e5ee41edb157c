//! Platform services the adapter forwards to
//!
//! Timing is not listed here, the adapter takes any
//! [`embedded_hal::delay::DelayNs`] for that.
//!
//! None of these report errors. An implementation sitting on fallible
//! hardware calls logs the failure and carries on, the panel driver notices
//! broken hardware through its own busy-pin timeouts.

use crate::epdif::pins::{Level, PinId, PinMode};
use crate::epdif::spi::{SpiBusPins, SpiSettings};

/// Pin mode setup and digital I/O
pub trait PinControl {
    /// Configure the direction of `pin`
    fn pin_mode(&mut self, pin: PinId, mode: PinMode);

    /// Drive `pin` to `level`
    fn digital_write(&mut self, pin: PinId, level: Level);

    /// Sample the level of `pin`
    fn digital_read(&mut self, pin: PinId) -> Level;
}

/// SPI peripheral: bus bring-up, transaction settings and byte exchange
pub trait SpiPeripheral {
    /// Attach the peripheral to its clock and data lines
    fn begin(&mut self, pins: SpiBusPins);

    /// Apply `settings` to every following transfer. There is no matching end,
    /// the transaction stays open for as long as the peripheral lives.
    fn begin_transaction(&mut self, settings: SpiSettings);

    /// Clock out `data` and return the byte clocked in at the same time
    fn transfer(&mut self, data: u8) -> u8;
}

impl<T: PinControl + ?Sized> PinControl for &mut T {
    fn pin_mode(&mut self, pin: PinId, mode: PinMode) {
        T::pin_mode(self, pin, mode)
    }

    fn digital_write(&mut self, pin: PinId, level: Level) {
        T::digital_write(self, pin, level)
    }

    fn digital_read(&mut self, pin: PinId) -> Level {
        T::digital_read(self, pin)
    }
}

impl<T: SpiPeripheral + ?Sized> SpiPeripheral for &mut T {
    fn begin(&mut self, pins: SpiBusPins) {
        T::begin(self, pins)
    }

    fn begin_transaction(&mut self, settings: SpiSettings) {
        T::begin_transaction(self, settings)
    }

    fn transfer(&mut self, data: u8) -> u8 {
        T::transfer(self, data)
    }
}
