//! Hardware interface between an e-paper panel driver and the ESP32 pin/SPI runtime
#![deny(missing_docs)]
#![allow(clippy::must_use_candidate)]

#[allow(missing_docs)]
pub mod epdif;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use crate::epdif::interface::{EpdIf, EpdInterface, IF_INIT_OK};
pub use crate::epdif::pins::{Level, PinId, PinMode, Pins};
pub use crate::epdif::platform::{PinControl, SpiPeripheral};
pub use crate::epdif::spi::{
    BitOrder, HalSpi, Phase, Polarity, SpiBusPins, SpiMode, SpiSettings, EPD_SPI_SETTINGS,
};
