//! ESP-IDF platform for the e-paper interface
//!
//! GPIO goes straight through the ESP-IDF C API since pins are addressed by
//! number, SPI runs on [`SpiBusDriver`] without a hardware chip select.
use anyhow::Context;

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin};
use esp_idf_svc::hal::spi::{self, config::BitOrder as EspBitOrder, SpiBusDriver, SpiDriver, SPI2};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::{
    esp, gpio_get_level, gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
    gpio_reset_pin, gpio_set_direction, gpio_set_level, EspError,
};

use crate::epdif::interface::EpdIf;
use crate::epdif::pins::{Level, PinId, PinMode, Pins};
use crate::epdif::platform::{PinControl, SpiPeripheral};
use crate::epdif::spi::{BitOrder, HalSpi, SpiBusPins, SpiSettings};

/// Interface wired for the ESP32 driver board, ready for `if_init`
pub fn epdif(spi2: SPI2) -> EpdIf<EspGpio, Delay, EspSpi> {
    EpdIf::new(
        Pins::ESP32_DRIVER_BOARD,
        EspGpio,
        Delay::default(),
        EspSpi::new(spi2),
    )
}

/// GPIO by pin number
///
/// Outputs are set up as input/output so reading one back gives the driven level.
pub struct EspGpio;

impl EspGpio {
    fn configure(pin: PinId, mode: PinMode) -> Result<(), EspError> {
        let direction = match mode {
            PinMode::Input => gpio_mode_t_GPIO_MODE_INPUT,
            PinMode::Output => gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
        };
        // SAFETY: plain register setup, the pin number is checked by ESP-IDF
        unsafe {
            esp!(gpio_reset_pin(pin))?;
            esp!(gpio_set_direction(pin, direction))
        }
    }
}

impl PinControl for EspGpio {
    fn pin_mode(&mut self, pin: PinId, mode: PinMode) {
        if let Err(e) = Self::configure(pin, mode) {
            log::error!("Failed to set GPIO{} to {:?}: {:?}", pin, mode, e);
        }
    }

    fn digital_write(&mut self, pin: PinId, level: Level) {
        // SAFETY: see `configure`
        if let Err(e) = esp!(unsafe { gpio_set_level(pin, u8::from(level).into()) }) {
            log::error!("Failed to drive GPIO{} {:?}: {:?}", pin, level, e);
        }
    }

    fn digital_read(&mut self, pin: PinId) -> Level {
        // SAFETY: see `configure`
        Level::from(unsafe { gpio_get_level(pin) } != 0)
    }
}

/// SPI2 as a [`SpiPeripheral`]
///
/// The bus driver is built when the transaction opens because ESP-IDF wants
/// pins and settings at the same time. It is kept until the value is dropped.
pub struct EspSpi {
    spi: Option<SPI2>,
    pins: Option<SpiBusPins>,
    bus: Option<HalSpi<SpiBusDriver<'static, SpiDriver<'static>>>>,
}

impl EspSpi {
    /// Wrap the SPI2 peripheral, nothing is configured yet
    pub fn new(spi2: SPI2) -> Self {
        EspSpi {
            spi: Some(spi2),
            pins: None,
            bus: None,
        }
    }

    fn open(
        &mut self,
        settings: SpiSettings,
    ) -> anyhow::Result<SpiBusDriver<'static, SpiDriver<'static>>> {
        let pins = self.pins.context("SPI bus not started")?;
        let spi2 = self.spi.take().context("SPI2 already in use")?;

        // SAFETY: the bus pins are owned by this peripheral from here on,
        // nothing else in the firmware touches them
        let (sclk, sdo, sdi) = unsafe {
            (
                AnyOutputPin::new(pins.sck),
                AnyOutputPin::new(pins.mosi),
                pins.miso.map(|miso| AnyIOPin::new(miso)),
            )
        };

        let driver = SpiDriver::new(
            spi2,
            sclk,
            sdo,
            sdi,
            &spi::SpiDriverConfig::new().dma(spi::Dma::Disabled),
        )
        .context("Could not create SPI driver")?;

        let bit_order = match settings.bit_order {
            BitOrder::MsbFirst => EspBitOrder::MsbFirst,
            BitOrder::LsbFirst => EspBitOrder::LsbFirst,
        };
        let config = spi::SpiConfig::new()
            .baudrate(Hertz(settings.clock_hz))
            .data_mode(settings.mode.into())
            .bit_order(bit_order);

        SpiBusDriver::new(driver, &config).context("Could not create SPI bus driver")
    }
}

impl SpiPeripheral for EspSpi {
    fn begin(&mut self, pins: SpiBusPins) {
        log::info!(
            "SPI2 on SCK GPIO{}, MOSI GPIO{}, chip select GPIO{} driven by hand",
            pins.sck,
            pins.mosi,
            pins.ss
        );
        self.pins = Some(pins);
    }

    fn begin_transaction(&mut self, settings: SpiSettings) {
        if let Some(bus) = &self.bus {
            log::warn!(
                "SPI transaction already open with {:?}, keeping it",
                bus.settings()
            );
            return;
        }

        match self.open(settings) {
            Ok(driver) => {
                let mut bus = HalSpi::new(driver);
                bus.begin_transaction(settings);
                self.bus = Some(bus);
            }
            Err(e) => log::error!("Failed to open SPI transaction: {:?}", e),
        }
    }

    fn transfer(&mut self, data: u8) -> u8 {
        match &mut self.bus {
            Some(bus) => bus.transfer(data),
            None => {
                log::error!("SPI transfer of 0x{:02X} without an open transaction", data);
                0
            }
        }
    }
}
