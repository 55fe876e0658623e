//! Core Types für die Uhr
//!
//! Datenstrukturen ohne Hardware-Dependencies

use heapless::String;

/// Maximale SSID-Länge laut IEEE 802.11
pub const SSID_MAX_LEN: usize = 32;

/// WPA2-Passphrase: 8..=63 Zeichen, oder 64 Hex-Zeichen als PSK
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 64;

/// Puffergrößen für Formular-Eingaben (größer als die Grenzen oben,
/// die Länge prüft erst `WifiCredentials::new`)
pub const SSID_INPUT_CAPACITY: usize = 2 * SSID_MAX_LEN;
pub const PASSWORD_INPUT_CAPACITY: usize = 2 * PASSWORD_MAX_LEN;

/// Kapazität für Hostnamen wie "amclock-a1b2c3"
pub const HOSTNAME_CAPACITY: usize = 32;

/// Hostname des Geräts (mDNS und Access-Point-SSID)
pub type Hostname = String<HOSTNAME_CAPACITY>;

/// Lokale Uhrzeit (24h)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    const SECS_PER_DAY: i64 = 86_400;

    /// Erstellt eine Uhrzeit, `None` bei ungültigen Werten
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 && seconds < 60 {
            Some(Self {
                hours,
                minutes,
                seconds,
            })
        } else {
            None
        }
    }

    /// Berechnet die lokale Uhrzeit aus Unix-Sekunden und UTC-Offset
    ///
    /// Nutzt die euklidische Division, damit negative Offsets
    /// korrekt auf den Vortag umbrechen.
    ///
    /// ```
    /// # use amclock_core::TimeOfDay;
    /// // 1970-01-01 00:00:00 UTC in UTC+8
    /// let t = TimeOfDay::from_unix_seconds(0, 8 * 3600);
    /// assert_eq!((t.hours, t.minutes, t.seconds), (8, 0, 0));
    /// ```
    pub fn from_unix_seconds(unix_seconds: i64, utc_offset_secs: i32) -> Self {
        let local = unix_seconds.saturating_add(i64::from(utc_offset_secs));
        let secs_of_day = local.rem_euclid(Self::SECS_PER_DAY);
        // secs_of_day < 86400, passt in u8-Komponenten
        Self {
            hours: (secs_of_day / 3600) as u8,
            minutes: ((secs_of_day % 3600) / 60) as u8,
            seconds: (secs_of_day % 60) as u8,
        }
    }

    /// Sekunden seit Mitternacht bzw. Mittag (12h-Zifferblatt), 0..43200
    pub fn seconds_of_half_day(&self) -> u32 {
        u32::from(self.hours % 12) * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }
}

/// Ergebnis einer erfolgreichen NTP-Abfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSample {
    /// Unix-Sekunden laut Server
    pub unix_seconds: u64,
    /// Monotone Systemzeit beim Empfang (Millisekunden seit Boot)
    pub received_at_ms: u64,
}

/// Anzeige-Phase des Uhren-Treibers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPhase {
    /// Taster gedrückt: beide LEDs an, Vollausschlag
    Calibration,
    /// Gerade 10s-Fenster: Stundenzeiger, Stunden-LED leuchtet
    Hours,
    /// Ungerade 10s-Fenster: Minutenzeiger, Minuten-LED blinkt
    Minutes,
}

/// Ergebnis eines Uhren-Updates: Pin-Zustände und Ziel-Level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFrame {
    pub phase: DisplayPhase,
    pub hour_led: bool,
    pub minute_led: bool,
    pub target: u16,
}

/// Fehler bei der Validierung von WiFi-Zugangsdaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialsError {
    EmptySsid,
    SsidTooLong,
    PasswordTooShort,
    PasswordTooLong,
}

/// Validierte WiFi-Zugangsdaten
///
/// Ein leeres Passwort steht für ein offenes Netzwerk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: String<SSID_MAX_LEN>,
    password: String<PASSWORD_MAX_LEN>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        if !password.is_empty() && password.len() < PASSWORD_MIN_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }

        let ssid = String::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let password =
            String::try_from(password).map_err(|_| CredentialsError::PasswordTooLong)?;

        Ok(Self { ssid, password })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for TimeOfDay {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{=u8}:{=u8}:{=u8}",
            self.hours,
            self.minutes,
            self.seconds
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SyncSample {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SyncSample {{ unix: {}, at: {}ms }}",
            self.unix_seconds,
            self.received_at_ms
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayFrame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "DisplayFrame {{ phase: {}, hour: {}, minute: {}, target: {} }}",
            self.phase,
            self.hour_led,
            self.minute_led,
            self.target
        )
    }
}

// Passwort wird bewusst nicht geloggt
#[cfg(feature = "defmt")]
impl defmt::Format for WifiCredentials {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "WifiCredentials {{ ssid: {}, open: {} }}",
            self.ssid.as_str(),
            self.is_open()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_utc_offset() {
        // 2024-01-01 00:00:00 UTC
        let t = TimeOfDay::from_unix_seconds(1_704_067_200, 8 * 3600);
        assert_eq!(t, TimeOfDay::new(8, 0, 0).unwrap());
    }

    #[test]
    fn test_time_of_day_negative_offset_wraps_to_previous_day() {
        let t = TimeOfDay::from_unix_seconds(1_704_067_200, -3600);
        assert_eq!(t, TimeOfDay::new(23, 0, 0).unwrap());
    }

    #[test]
    fn test_time_of_day_rejects_invalid() {
        assert!(TimeOfDay::new(24, 0, 0).is_none());
        assert!(TimeOfDay::new(0, 60, 0).is_none());
        assert!(TimeOfDay::new(0, 0, 60).is_none());
    }

    #[test]
    fn test_seconds_of_half_day() {
        let t = TimeOfDay::new(15, 30, 15).unwrap();
        assert_eq!(t.seconds_of_half_day(), 3 * 3600 + 30 * 60 + 15);
    }

    #[test]
    fn test_credentials_open_network() {
        let creds = WifiCredentials::new("Heimnetz", "").unwrap();
        assert_eq!(creds.ssid(), "Heimnetz");
        assert!(creds.is_open());
    }

    #[test]
    fn test_credentials_validation() {
        assert_eq!(
            WifiCredentials::new("", "geheim123"),
            Err(CredentialsError::EmptySsid)
        );
        assert_eq!(
            WifiCredentials::new("Heimnetz", "kurz"),
            Err(CredentialsError::PasswordTooShort)
        );
        assert_eq!(
            WifiCredentials::new("abcdefghijklmnopqrstuvwxyz0123456", "geheim123"),
            Err(CredentialsError::SsidTooLong)
        );
    }
}
