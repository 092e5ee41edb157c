//! Pin definitions for the e-paper panel and the SPI bus it hangs off
//!
//! Pin numbers are the platform's raw GPIO numbers, they are handed to the
//! platform untouched.

/// Platform numeric pin id (ESP-IDF `gpio_num_t`)
pub type PinId = i32;

/// Logical level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// `true` for [`Level::High`]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

/// Any non-zero value counts as high, like the Arduino `digitalWrite`
impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Level::from(value != 0)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

/// Direction a pin is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// Pin assignment of the panel connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pins {
    /// Chip select, driven by the adapter around every byte (active low)
    pub cs: PinId,
    /// Panel reset (active low)
    pub rst: PinId,
    /// Data/Command control pin (High for data, Low for command)
    pub dc: PinId,
    /// Busy status pin, driven by the panel while it refreshes
    pub busy: PinId,
    /// Panel power enable (active high)
    pub pwr: PinId,
    /// SPI clock
    pub sck: PinId,
    /// SPI Master Out Slave In
    pub mosi: PinId,
}

impl Pins {
    /// Waveshare style ESP32 e-paper driver board
    pub const ESP32_DRIVER_BOARD: Pins = Pins {
        cs: 15,
        rst: 26,
        dc: 27,
        busy: 25,
        pwr: 33,
        sck: 13,
        mosi: 14,
    };
}

impl Default for Pins {
    fn default() -> Self {
        Self::ESP32_DRIVER_BOARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_integer_treats_non_zero_as_high() {
        assert_eq!(Level::from(0u8), Level::Low);
        assert_eq!(Level::from(1u8), Level::High);
        assert_eq!(Level::from(0xA5u8), Level::High);
    }

    #[test]
    fn level_converts_back_to_zero_or_one() {
        assert_eq!(u8::from(Level::Low), 0);
        assert_eq!(u8::from(Level::High), 1);
        assert!(bool::from(Level::High));
        assert!(!Level::from(false).is_high());
    }

    #[test]
    fn default_pins_are_the_driver_board_wiring() {
        let pins = Pins::default();
        assert_eq!(pins, Pins::ESP32_DRIVER_BOARD);
        assert_eq!(pins.sck, 13);
        assert_eq!(pins.mosi, 14);
    }
}
