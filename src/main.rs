//! Bring-up firmware for the e-paper interface: power the panel, open the bus,
//! pulse reset and watch the busy line.

#[cfg(target_os = "espidf")]
use anyhow::Context;

#[cfg(target_os = "espidf")]
use epdif::{EpdInterface, Level, IF_INIT_OK};

/// 5.65 inch ACeP panels pull busy low while refreshing
#[cfg(target_os = "espidf")]
const BUSY_IDLE_LEVEL: Level = Level::High;
#[cfg(target_os = "espidf")]
const BUSY_POLL_MS: u32 = 10;
#[cfg(target_os = "espidf")]
const BUSY_WAIT_TIMEOUT_MS: u32 = 5000; // 5 seconds timeout

/// Poll the busy pin until it reads `BUSY_IDLE_LEVEL`, `false` on timeout
#[cfg(target_os = "espidf")]
fn wait_until_idle(epd: &mut impl EpdInterface, busy: epdif::PinId) -> bool {
    let mut waited = 0;
    while epd.digital_read(busy) != BUSY_IDLE_LEVEL {
        if waited >= BUSY_WAIT_TIMEOUT_MS {
            return false;
        }
        epd.delay_ms(BUSY_POLL_MS);
        waited += BUSY_POLL_MS;
    }
    log::info!("Busy pin idle after ~{} ms", waited);
    true
}

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals =
        esp_idf_svc::hal::peripherals::Peripherals::take().context("Could not take peripherals")?;

    let mut epd = epdif::esp::epdif(peripherals.spi2);
    let pins = *epd.pins();

    if epd.if_init() != IF_INIT_OK {
        anyhow::bail!("E-paper interface initialization failed");
    }
    log::info!("Panel powered, waiting for it to settle");
    epd.delay_ms(100);

    // Hardware reset
    epd.digital_write(pins.rst, Level::High);
    epd.delay_ms(20);
    epd.digital_write(pins.rst, Level::Low);
    epd.delay_ms(2);
    epd.digital_write(pins.rst, Level::High);
    epd.delay_ms(20);

    if wait_until_idle(&mut epd, pins.busy) {
        log::info!("Panel answered the reset, interface is ready");
    } else {
        log::error!(
            "TIMEOUT waiting for busy pin to read {:?} after {} ms, check wiring and power",
            BUSY_IDLE_LEVEL,
            BUSY_WAIT_TIMEOUT_MS
        );
    }

    let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
    log::info!("Reset reason: {:?}", reset_reason);

    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("This firmware runs on ESP-IDF, build it for an xtensa-esp32-espidf target");
}
