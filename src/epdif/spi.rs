//! SPI bus settings and a [`SpiPeripheral`] over any embedded-hal bus

use embedded_hal::spi::{self, SpiBus};

use crate::epdif::pins::PinId;
use crate::epdif::platform::SpiPeripheral;

/// Bus settings the panel is driven with: 4 MHz, MSB first, mode 0
pub const EPD_SPI_SETTINGS: SpiSettings = SpiSettings {
    clock_hz: 4_000_000,
    bit_order: BitOrder::MsbFirst,
    mode: SpiMode::Mode0,
};

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    pub const fn polarity(self) -> Polarity {
        match self {
            SpiMode::Mode0 | SpiMode::Mode1 => Polarity::IdleLow,
            SpiMode::Mode2 | SpiMode::Mode3 => Polarity::IdleHigh,
        }
    }

    pub const fn phase(self) -> Phase {
        match self {
            SpiMode::Mode0 | SpiMode::Mode2 => Phase::CaptureOnFirstTransition,
            SpiMode::Mode1 | SpiMode::Mode3 => Phase::CaptureOnSecondTransition,
        }
    }
}

impl From<SpiMode> for spi::Mode {
    fn from(mode: SpiMode) -> Self {
        match mode {
            SpiMode::Mode0 => spi::MODE_0,
            SpiMode::Mode1 => spi::MODE_1,
            SpiMode::Mode2 => spi::MODE_2,
            SpiMode::Mode3 => spi::MODE_3,
        }
    }
}

/// Settings held for the duration of a bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiSettings {
    /// Bus clock in Hz
    pub clock_hz: u32,
    pub bit_order: BitOrder,
    pub mode: SpiMode,
}

/// Physical lines the bus is brought up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiBusPins {
    pub sck: PinId,
    /// `None` leaves the receive line disabled
    pub miso: Option<PinId>,
    pub mosi: PinId,
    /// Select pin the bus is associated with. The adapter drives it itself,
    /// the peripheral must not toggle it.
    pub ss: PinId,
}

/// [`SpiPeripheral`] over an embedded-hal [`SpiBus`]
///
/// The HAL has already configured clock, mode and pins when the bus was built,
/// so `begin` and `begin_transaction` only record what was asked for.
pub struct HalSpi<B> {
    bus: B,
    settings: Option<SpiSettings>,
}

impl<B> HalSpi<B> {
    pub fn new(bus: B) -> Self {
        HalSpi {
            bus,
            settings: None,
        }
    }

    /// Settings of the open transaction, if any
    pub fn settings(&self) -> Option<SpiSettings> {
        self.settings
    }

    /// Give back the wrapped bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B> SpiPeripheral for HalSpi<B>
where
    B: SpiBus<u8>,
{
    fn begin(&mut self, pins: SpiBusPins) {
        log::debug!("SPI bus already set up by the HAL, ignoring pins {:?}", pins);
    }

    fn begin_transaction(&mut self, settings: SpiSettings) {
        log::debug!("SPI transaction opened with {:?}", settings);
        self.settings = Some(settings);
    }

    fn transfer(&mut self, data: u8) -> u8 {
        let mut buffer = [data];
        if let Err(e) = self.bus.transfer_in_place(&mut buffer) {
            log::error!("SPI transfer error for byte 0x{:02X}: {:?}", data, e);
        }
        if let Err(e) = self.bus.flush() {
            log::error!("SPI flush error: {:?}", e);
        }
        buffer[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::{ErrorKind, ErrorType};

    /// Loopback bus that hands back the complement of every byte written
    struct MockBus {
        written: Vec<u8>,
        flushes: usize,
        fail: bool,
    }

    impl MockBus {
        fn new() -> Self {
            MockBus {
                written: Vec::new(),
                flushes: 0,
                fail: false,
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl SpiBus<u8> for MockBus {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            self.written.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.written.extend_from_slice(write);
            for (r, w) in read.iter_mut().zip(write) {
                *r = !w;
            }
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.written.extend_from_slice(words);
            for w in words.iter_mut() {
                *w = !*w;
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn panel_settings_are_4mhz_msb_first_mode_0() {
        assert_eq!(EPD_SPI_SETTINGS.clock_hz, 4_000_000);
        assert_eq!(EPD_SPI_SETTINGS.bit_order, BitOrder::MsbFirst);
        assert_eq!(EPD_SPI_SETTINGS.mode.polarity(), Polarity::IdleLow);
        assert_eq!(
            EPD_SPI_SETTINGS.mode.phase(),
            Phase::CaptureOnFirstTransition
        );
    }

    #[test]
    fn modes_map_onto_embedded_hal_modes() {
        assert_eq!(spi::Mode::from(SpiMode::Mode0), spi::MODE_0);
        assert_eq!(spi::Mode::from(SpiMode::Mode1), spi::MODE_1);
        assert_eq!(spi::Mode::from(SpiMode::Mode2), spi::MODE_2);
        assert_eq!(spi::Mode::from(SpiMode::Mode3), spi::MODE_3);
        assert_eq!(SpiMode::Mode3.polarity(), Polarity::IdleHigh);
        assert_eq!(SpiMode::Mode1.phase(), Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn hal_spi_exchanges_one_byte_and_flushes() {
        let mut spi = HalSpi::new(MockBus::new());
        assert_eq!(spi.transfer(0x0F), 0xF0);
        assert_eq!(spi.transfer(0x55), 0xAA);

        let bus = spi.release();
        assert_eq!(bus.written, vec![0x0F, 0x55]);
        assert_eq!(bus.flushes, 2);
    }

    #[test]
    fn hal_spi_records_transaction_settings() {
        let mut spi = HalSpi::new(MockBus::new());
        assert_eq!(spi.settings(), None);

        spi.begin(SpiBusPins {
            sck: 13,
            miso: None,
            mosi: 14,
            ss: 15,
        });
        spi.begin_transaction(EPD_SPI_SETTINGS);
        assert_eq!(spi.settings(), Some(EPD_SPI_SETTINGS));
        assert!(spi.release().written.is_empty());
    }

    #[test]
    fn hal_spi_bus_error_is_swallowed() {
        let mut bus = MockBus::new();
        bus.fail = true;
        let mut spi = HalSpi::new(bus);

        // The byte is handed back unchanged, nothing panics
        assert_eq!(spi.transfer(0x12), 0x12);
        assert_eq!(spi.release().flushes, 1);
    }
}
