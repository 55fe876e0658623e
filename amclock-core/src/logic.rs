//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use core::fmt::Write;

use crate::types::{DisplayPhase, HOSTNAME_CAPACITY, Hostname};

/// Maximaler Ausgangs-Level (10 Bit PWM)
pub const MAX_LEVEL: u16 = 1023;

/// Sekunden eines 12h-Zifferblatts
pub const HALF_DAY_SECS: u32 = 12 * 3600;

/// Mindestabstand zwischen zwei Uhren-Updates
pub const CLOCK_UPDATE_INTERVAL_MS: u64 = 1000;

/// Bestimmt die Anzeige-Phase aus den Sekunden der aktuellen Minute
///
/// Gerade 10s-Fenster (0x, 2x, 4x) zeigen Stunden, ungerade (1x, 3x, 5x) Minuten.
///
/// ```
/// # use amclock_core::{display_phase, DisplayPhase};
/// assert_eq!(display_phase(25), DisplayPhase::Hours);
/// assert_eq!(display_phase(35), DisplayPhase::Minutes);
/// ```
pub fn display_phase(seconds: u8) -> DisplayPhase {
    if (seconds / 10) & 0x01 == 1 {
        DisplayPhase::Minutes
    } else {
        DisplayPhase::Hours
    }
}

/// Ziel-Level für die Minuten-Phase: `floor(m * 1023 / 60)`
pub fn minutes_level(minutes: u8) -> u16 {
    let level = u32::from(minutes) * u32::from(MAX_LEVEL) / 60;
    clamp_level(level)
}

/// Ziel-Level für die Stunden-Phase: `floor(s * 1023 / 43200)`
///
/// `seconds_of_half_day` sind Sekunden seit 0 bzw. 12 Uhr.
pub fn hours_level(seconds_of_half_day: u32) -> u16 {
    let level = seconds_of_half_day.min(HALF_DAY_SECS - 1) * u32::from(MAX_LEVEL) / HALF_DAY_SECS;
    clamp_level(level)
}

fn clamp_level(level: u32) -> u16 {
    u16::try_from(level).map_or(MAX_LEVEL, |l| l.min(MAX_LEVEL))
}

/// Erzeugt den Hostnamen aus Präfix und den letzten drei MAC-Bytes
///
/// ```
/// # use amclock_core::device_hostname;
/// let name = device_hostname("amclock-", [0x24, 0x0a, 0xc4, 0x01, 0xab, 0xcd]);
/// assert_eq!(name.as_str(), "amclock-01abcd");
/// ```
pub fn device_hostname(prefix: &str, mac: [u8; 6]) -> Hostname {
    let mut name = Hostname::new();
    // Präfix wird bei Überlänge abgeschnitten, die Chip-ID hat immer Platz
    let max_prefix = HOSTNAME_CAPACITY - 6;
    let prefix = prefix.get(..prefix.len().min(max_prefix)).unwrap_or("");
    let _ = name.push_str(prefix);
    let _ = write!(name, "{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_phase_windows() {
        for s in 0..10 {
            assert_eq!(display_phase(s), DisplayPhase::Hours);
        }
        for s in 10..20 {
            assert_eq!(display_phase(s), DisplayPhase::Minutes);
        }
        assert_eq!(display_phase(40), DisplayPhase::Hours);
        assert_eq!(display_phase(59), DisplayPhase::Minutes);
    }

    #[test]
    fn test_minutes_level_bounds() {
        assert_eq!(minutes_level(0), 0);
        assert_eq!(minutes_level(30), 511);
        assert_eq!(minutes_level(59), 1005);
    }

    #[test]
    fn test_hours_level_bounds() {
        assert_eq!(hours_level(0), 0);
        assert_eq!(hours_level(6 * 3600), 511);
        assert_eq!(hours_level(HALF_DAY_SECS - 1), 1022);
    }

    #[test]
    fn test_device_hostname_pads_hex() {
        let name = device_hostname("amclock-", [0, 0, 0, 0x00, 0x0f, 0x01]);
        assert_eq!(name.as_str(), "amclock-000f01");
    }
}
