//! E-paper hardware interface
//!
//! The thin layer an e-paper panel driver talks to instead of the board:
//! pin writes and reads, blocking delays and single SPI bytes.
//!
//! The driver only ever sees [`interface::EpdInterface`]. [`interface::EpdIf`]
//! implements it on top of three platform handles it owns:
//!
//! - a [`platform::PinControl`] for pin modes and digital I/O
//! - an [`embedded_hal::delay::DelayNs`] for delays
//! - a [`platform::SpiPeripheral`] for the bus
//!
//! ### Usage
//!
//! 1. build the platform handles, on ESP-IDF see `crate::esp::epdif`
//! 1. wrap them with [`interface::EpdIf::new`] together with the [`pins::Pins`] of the board
//! 1. call [`interface::EpdInterface::if_init`] once, then hand the interface to the panel driver
//!
//! ### Chip select
//!
//! Chip select is driven by the interface itself, low for exactly one byte at a
//! time. The SPI peripheral is brought up with the pin but must not toggle it.

pub mod interface;
pub mod pins;
pub mod platform;
pub mod spi;
