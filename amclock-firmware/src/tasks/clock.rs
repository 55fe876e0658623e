// Uhren-Task - Berechnet einmal pro Sekunde Ziel-Level und LED-Zustände
use amclock_core::{ClockDriver, DisplayFrame, DisplayPhase, NetworkClock, TimeOfDay, TimeSource};
use defmt::info;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::{Input, Level, Output};

use crate::config::{CLOCK_POLL_MS, UTC_OFFSET_SECS};
use crate::{SyncSignal, TargetSignal};

/// Zeitquelle auf Basis der SNTP-Samples
///
/// `update()` übernimmt ein neues Sample aus dem Signal (falls vorhanden)
/// und merkt sich die aktuelle Systemzeit für die Extrapolation.
pub struct SyncedClock {
    clock: NetworkClock,
    samples: &'static SyncSignal,
    now_ms: u64,
}

impl SyncedClock {
    pub fn new(utc_offset_secs: i32, samples: &'static SyncSignal) -> Self {
        Self {
            clock: NetworkClock::new(utc_offset_secs),
            samples,
            now_ms: Instant::now().as_millis(),
        }
    }
}

impl TimeSource for SyncedClock {
    fn update(&mut self) {
        if let Some(sample) = self.samples.try_take() {
            if !self.clock.is_synced() {
                info!("Clock: First time sync {}", sample);
            }
            self.clock.apply(sample);
        }
        self.now_ms = Instant::now().as_millis();
    }

    fn time_of_day(&self) -> Option<TimeOfDay> {
        self.clock.time_of_day_at(self.now_ms)
    }
}

/// Uhren-Task
///
/// Fragt alle 25 ms Taster und Uhr ab, der `ClockDriver` lässt aber nur
/// einmal pro Sekunde ein Update durch. Ein neuer Frame setzt die beiden
/// LEDs und schickt den Ziel-Level an den Smoother.
///
/// # Parameter
/// - `hour_led`, `minute_led`: Anzeige-LEDs
/// - `button`: Taster (active-low), gedrückt = Kalibrierung
/// - `samples`: NTP-Samples vom SNTP-Task
/// - `targets`: Ziel-Level für den Output-Task
#[embassy_executor::task]
pub async fn clock_task(
    mut hour_led: Output<'static>,
    mut minute_led: Output<'static>,
    button: Input<'static>,
    samples: &'static SyncSignal,
    targets: &'static TargetSignal,
) {
    let mut time = SyncedClock::new(UTC_OFFSET_SECS, samples);
    let mut driver = ClockDriver::new(Instant::now().as_millis());
    let mut calibrating = false;

    loop {
        let held = button.is_low();
        if let Some(frame) = driver.poll(Instant::now().as_millis(), held, &mut time) {
            let now_calibrating = frame.phase == DisplayPhase::Calibration;
            if now_calibrating != calibrating {
                calibrating = now_calibrating;
                info!(
                    "Clock: Calibration {}",
                    if calibrating { "started" } else { "finished" }
                );
            }

            apply_frame(&frame, &mut hour_led, &mut minute_led);
            targets.signal(frame.target);
        }

        Timer::after(Duration::from_millis(CLOCK_POLL_MS)).await;
    }
}

fn apply_frame(frame: &DisplayFrame, hour_led: &mut Output<'static>, minute_led: &mut Output<'static>) {
    hour_led.set_level(Level::from(frame.hour_led));
    minute_led.set_level(Level::from(frame.minute_led));
}
