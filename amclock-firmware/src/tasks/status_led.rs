// Status-LED Task - Schiebt das Status-Muster alle 125 ms auf die LED
use amclock_core::{StatusIndicator, StatusPattern};
use defmt::info;
use embassy_time::{Duration, Ticker};
use esp_hal::gpio::{Level, Output};

use crate::StatusSignal;
use crate::config::{STATUS_LED_ACTIVE_LOW, STATUS_TICK_MS};

/// Status-LED Task
///
/// Liest neue Muster non-blocking aus dem Signal, gibt pro Tick das
/// niederwertigste Bit aus und rotiert das Wort.
///
/// # Parameter
/// - `led`: Ausgang der Status-LED
/// - `initial`: Muster beim Start (Provisionierung oder Verbinden)
/// - `patterns`: Signal für Musterwechsel
#[embassy_executor::task]
pub async fn status_led_task(
    mut led: Output<'static>,
    initial: StatusPattern,
    patterns: &'static StatusSignal,
) {
    let mut indicator = StatusIndicator::new(initial);
    let mut ticker = Ticker::every(Duration::from_millis(STATUS_TICK_MS));

    loop {
        if let Some(pattern) = patterns.try_take() {
            info!("Status: {} -> {}", indicator.pattern(), pattern);
            indicator.set_pattern(pattern);
        }

        let lit = indicator.tick();
        led.set_level(Level::from(lit != STATUS_LED_ACTIVE_LOW));

        ticker.next().await;
    }
}
