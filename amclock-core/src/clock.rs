//! Uhren-Treiber und Netzwerk-Uhr
//!
//! `ClockDriver` berechnet einmal pro Sekunde Ziel-Level und LED-Zustände,
//! `NetworkClock` extrapoliert die lokale Zeit aus dem letzten NTP-Sample.

use crate::logic::{
    CLOCK_UPDATE_INTERVAL_MS, MAX_LEVEL, display_phase, hours_level, minutes_level,
};
use crate::traits::TimeSource;
use crate::types::{DisplayFrame, DisplayPhase, SyncSample, TimeOfDay};

/// Zeitgesteuerter Anzeige-Treiber
///
/// Zwei Modi:
/// - **Kalibrierung** (Taster gedrückt): beide LEDs an, Ziel = 1023.
///   Der Zeitstempel wird dabei nicht weitergesetzt, damit nach dem
///   Loslassen sofort wieder die Uhrzeit angezeigt wird.
/// - **Normal**: Stunden- und Minuten-Phase im 10-Sekunden-Wechsel.
#[derive(Debug, Clone)]
pub struct ClockDriver {
    last_update_ms: u64,
    interval_ms: u64,
    minute_led: bool,
}

impl ClockDriver {
    pub const fn new(now_ms: u64) -> Self {
        Self::with_interval(now_ms, CLOCK_UPDATE_INTERVAL_MS)
    }

    pub const fn with_interval(now_ms: u64, interval_ms: u64) -> Self {
        Self {
            last_update_ms: now_ms,
            interval_ms,
            minute_led: false,
        }
    }

    /// Prüft ob ein Update fällig ist und berechnet ggf. den neuen Anzeige-Zustand
    ///
    /// Rückgabe `None`: Intervall noch nicht abgelaufen oder keine gültige Zeit.
    /// Die bisherige Ausgabe bleibt dann unverändert.
    pub fn poll<T: TimeSource>(
        &mut self,
        now_ms: u64,
        button_held: bool,
        time: &mut T,
    ) -> Option<DisplayFrame> {
        if now_ms.saturating_sub(self.last_update_ms) < self.interval_ms {
            return None;
        }

        if button_held {
            self.minute_led = true;
            return Some(DisplayFrame {
                phase: DisplayPhase::Calibration,
                hour_led: true,
                minute_led: true,
                target: MAX_LEVEL,
            });
        }

        self.last_update_ms = now_ms;
        time.update();
        let now = time.time_of_day()?;
        Some(self.frame_for(now))
    }

    fn frame_for(&mut self, now: TimeOfDay) -> DisplayFrame {
        match display_phase(now.seconds) {
            DisplayPhase::Minutes => {
                self.minute_led = !self.minute_led;
                DisplayFrame {
                    phase: DisplayPhase::Minutes,
                    hour_led: false,
                    minute_led: self.minute_led,
                    target: minutes_level(now.minutes),
                }
            }
            _ => {
                self.minute_led = false;
                DisplayFrame {
                    phase: DisplayPhase::Hours,
                    hour_led: true,
                    minute_led: false,
                    target: hours_level(now.seconds_of_half_day()),
                }
            }
        }
    }
}

/// Lokale Uhr auf Basis des letzten NTP-Samples
///
/// Zwischen zwei Synchronisationen wird mit der monotonen Systemzeit
/// weitergezählt (Sekundenauflösung).
#[derive(Debug, Clone)]
pub struct NetworkClock {
    utc_offset_secs: i32,
    last_sample: Option<SyncSample>,
}

impl NetworkClock {
    pub const fn new(utc_offset_secs: i32) -> Self {
        Self {
            utc_offset_secs,
            last_sample: None,
        }
    }

    pub fn apply(&mut self, sample: SyncSample) {
        self.last_sample = Some(sample);
    }

    pub fn last_sample(&self) -> Option<SyncSample> {
        self.last_sample
    }

    pub fn is_synced(&self) -> bool {
        self.last_sample.is_some()
    }

    /// Aktuelle Unix-Sekunden zum Zeitpunkt `now_ms`
    pub fn unix_seconds_at(&self, now_ms: u64) -> Option<u64> {
        let sample = self.last_sample?;
        let elapsed_secs = now_ms.saturating_sub(sample.received_at_ms) / 1000;
        Some(sample.unix_seconds.saturating_add(elapsed_secs))
    }

    /// Lokale Uhrzeit zum Zeitpunkt `now_ms`
    pub fn time_of_day_at(&self, now_ms: u64) -> Option<TimeOfDay> {
        let unix = i64::try_from(self.unix_seconds_at(now_ms)?).ok()?;
        Some(TimeOfDay::from_unix_seconds(unix, self.utc_offset_secs))
    }
}
