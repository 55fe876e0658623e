//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Netzwerk-Zugriff
//! ohne konkrete Implementierung.

use crate::types::TimeOfDay;

/// Fehler-Typ für PWM-Ausgabe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    WriteFailed,
}

/// Trait für den dimmbaren Ausgang (Zeigerinstrument / Helligkeit)
///
/// # Implementierungen
/// - **Production:** LedcOutput (ESP32 LEDC Peripheral, 10 Bit)
/// - **Testing:** MockPwmOutput (in-memory Mock)
pub trait PwmOutput {
    /// Schreibt einen Level im Bereich 0..=1023 auf den Ausgang
    ///
    /// # Fehlerbehandlung
    /// Gibt `OutputError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write_level(&mut self, level: u16) -> Result<(), OutputError>;
}

/// Netzwerk-Zeitquelle mit fester UTC-Verschiebung
///
/// Fehler werden nicht gemeldet: solange keine gültige Zeit vorliegt,
/// liefert `time_of_day()` einfach `None`.
pub trait TimeSource {
    /// Übernimmt neue Synchronisations-Daten, falls vorhanden
    fn update(&mut self);

    /// Liefert die aktuelle lokale Uhrzeit, sobald einmal synchronisiert wurde
    fn time_of_day(&self) -> Option<TimeOfDay>;

    /// Wurde bereits eine gültige Zeit empfangen?
    fn is_time_set(&self) -> bool {
        self.time_of_day().is_some()
    }
}

/// Callback-Schnittstelle für WiFi-Zustandswechsel
///
/// Wird vom Netzwerk-Layer synchron aufgerufen, wenn sich der Zustand ändert.
pub trait ConnectivityEvents {
    /// IPv4-Adresse erhalten
    fn on_connected(&mut self);

    /// Verbindung zum Access Point verloren
    fn on_disconnected(&mut self);
}

#[cfg(feature = "defmt")]
impl defmt::Format for OutputError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OutputError::WriteFailed => defmt::write!(fmt, "Write failed"),
        }
    }
}
