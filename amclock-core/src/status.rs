//! Status-LED Blinkmuster
//!
//! Ein 16-Bit-Wort wird alle 125ms um ein Bit rotiert, das niederwertigste
//! Bit bestimmt den LED-Zustand. Ein voller Umlauf dauert 2 Sekunden.

use crate::traits::ConnectivityEvents;

/// Verbindungszustand, kodiert als Blinkmuster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusPattern {
    /// Mit WLAN verbunden: gleichmäßiges Blinken (2x pro Umlauf)
    Normal,
    /// Verbindungsaufbau: kurzes Doppelblinken
    Connecting,
    /// Provisionierung: langes An/Aus
    Provisioning,
}

impl StatusPattern {
    pub const NORMAL_WORD: u16 = 0b0000_1111_0000_1111;
    pub const CONNECTING_WORD: u16 = 0b1100_1100_0000_0000;
    pub const PROVISIONING_WORD: u16 = 0b1111_1111_0000_0000;

    pub const ALL: [StatusPattern; 3] = [Self::Normal, Self::Connecting, Self::Provisioning];

    pub const fn word(self) -> u16 {
        match self {
            Self::Normal => Self::NORMAL_WORD,
            Self::Connecting => Self::CONNECTING_WORD,
            Self::Provisioning => Self::PROVISIONING_WORD,
        }
    }
}

/// Rotierendes Blinkmuster der Status-LED
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    pattern: StatusPattern,
    word: u16,
}

impl StatusIndicator {
    pub const fn new(pattern: StatusPattern) -> Self {
        Self {
            pattern,
            word: pattern.word(),
        }
    }

    /// Wechselt das Muster und beginnt den Umlauf von vorne
    pub fn set_pattern(&mut self, pattern: StatusPattern) {
        self.pattern = pattern;
        self.word = pattern.word();
    }

    pub fn pattern(&self) -> StatusPattern {
        self.pattern
    }

    pub fn word(&self) -> u16 {
        self.word
    }

    /// Gibt das niederwertigste Bit aus und rotiert das Wort um eins nach rechts
    ///
    /// Rückgabe: `true` wenn die LED leuchten soll.
    pub fn tick(&mut self) -> bool {
        let lit = self.word & 0x01 != 0;
        self.word = self.word.rotate_right(1);
        lit
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(StatusPattern::Normal)
    }
}

impl ConnectivityEvents for StatusIndicator {
    fn on_connected(&mut self) {
        self.set_pattern(StatusPattern::Normal);
    }

    fn on_disconnected(&mut self) {
        self.set_pattern(StatusPattern::Connecting);
    }
}
