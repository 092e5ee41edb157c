//! Display interface: pin I/O, delays and SPI bytes for the panel driver
use embedded_hal::delay::DelayNs;

use crate::epdif::pins::{Level, PinId, PinMode, Pins};
use crate::epdif::platform::{PinControl, SpiPeripheral};
use crate::epdif::spi::{SpiBusPins, EPD_SPI_SETTINGS};

/// Status returned by [`EpdInterface::if_init`], initialization cannot fail
pub const IF_INIT_OK: i32 = 0;

/// The operations an e-paper panel driver needs from the hardware
///
/// Everything is synchronous and none of it reports errors. Calling anything
/// but [`if_init`](EpdInterface::if_init) first is undefined as far as the
/// panel is concerned.
pub trait EpdInterface {
    /// Set the logical level of `pin`
    fn digital_write(&mut self, pin: PinId, value: Level);

    /// Read the logical level of `pin`
    fn digital_read(&mut self, pin: PinId) -> Level;

    /// Block for roughly `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Send one byte with chip select held low around it.
    /// The byte clocked in meanwhile is dropped.
    fn spi_transfer(&mut self, data: u8);

    /// Configure the panel pins, power the panel and open the SPI transaction.
    /// Always returns [`IF_INIT_OK`].
    fn if_init(&mut self) -> i32;
}

/// The Connection Interface of Waveshare style EPD boards
///
/// Owns the platform handles it forwards to, so a driver can be tested
/// against mocks and several panels can live side by side.
pub struct EpdIf<GPIO, DELAY, SPI> {
    /// Pin assignment
    pins: Pins,
    /// Pin mode setup and digital I/O
    gpio: GPIO,
    /// Blocking delays
    delay: DELAY,
    /// SPI peripheral, chip select is not left to it
    spi: SPI,
}

impl<GPIO, DELAY, SPI> EpdIf<GPIO, DELAY, SPI> {
    /// Create the interface, nothing touches the hardware until `if_init`
    pub fn new(pins: Pins, gpio: GPIO, delay: DELAY, spi: SPI) -> Self {
        EpdIf {
            pins,
            gpio,
            delay,
            spi,
        }
    }

    /// Pin assignment this interface was built with
    pub fn pins(&self) -> &Pins {
        &self.pins
    }

    /// Give back the platform handles
    pub fn release(self) -> (GPIO, DELAY, SPI) {
        (self.gpio, self.delay, self.spi)
    }
}

impl<GPIO, DELAY, SPI> EpdInterface for EpdIf<GPIO, DELAY, SPI>
where
    GPIO: PinControl,
    DELAY: DelayNs,
    SPI: SpiPeripheral,
{
    fn digital_write(&mut self, pin: PinId, value: Level) {
        self.gpio.digital_write(pin, value);
    }

    fn digital_read(&mut self, pin: PinId) -> Level {
        self.gpio.digital_read(pin)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn spi_transfer(&mut self, data: u8) {
        self.gpio.digital_write(self.pins.cs, Level::Low);
        let _ = self.spi.transfer(data);
        self.gpio.digital_write(self.pins.cs, Level::High);
    }

    fn if_init(&mut self) -> i32 {
        log::info!("Initializing e-paper interface with pins {:?}", self.pins);

        self.gpio.pin_mode(self.pins.cs, PinMode::Output);
        self.gpio.pin_mode(self.pins.rst, PinMode::Output);
        self.gpio.pin_mode(self.pins.dc, PinMode::Output);
        self.gpio.pin_mode(self.pins.busy, PinMode::Input);

        // Panel power on
        self.gpio.pin_mode(self.pins.pwr, PinMode::Output);
        self.digital_write(self.pins.pwr, Level::High);

        self.spi.begin(SpiBusPins {
            sck: self.pins.sck,
            miso: None,
            mosi: self.pins.mosi,
            ss: self.pins.cs,
        });
        self.spi.begin_transaction(EPD_SPI_SETTINGS);

        log::info!("SPI transaction open with {:?}", EPD_SPI_SETTINGS);
        IF_INIT_OK
    }
}
