//! Boot-Modus und Provisionierungs-Sitzung
//!
//! Wird der Taster beim Booten gehalten, wartet das Gerät auf neue
//! WiFi-Zugangsdaten. Die Sitzung wird periodisch abgefragt und endet
//! entweder mit Zugangsdaten oder nach Ablauf des Timeouts.

/// Start-Modus, beim Booten einmalig aus dem Taster-Zustand bestimmt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootMode {
    Normal,
    Provisioning,
}

impl BootMode {
    pub fn from_button(held: bool) -> Self {
        if held {
            Self::Provisioning
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProvisioningStatus {
    Waiting,
    Completed,
    TimedOut,
}

impl ProvisioningStatus {
    /// Sitzung beendet, Setup-Dienste können gestoppt werden
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

/// Laufende Provisionierung
///
/// `timeout_ms = None` wartet unbegrenzt.
#[derive(Debug, Clone, Copy)]
pub struct ProvisioningSession {
    started_at_ms: u64,
    timeout_ms: Option<u64>,
}

impl ProvisioningSession {
    pub const fn new(started_at_ms: u64, timeout_ms: Option<u64>) -> Self {
        Self {
            started_at_ms,
            timeout_ms,
        }
    }

    /// Abfrage des Sitzungs-Zustands
    ///
    /// Eingetroffene Zugangsdaten haben Vorrang vor einem gleichzeitig
    /// abgelaufenen Timeout.
    pub fn poll(&self, now_ms: u64, completed: bool) -> ProvisioningStatus {
        if completed {
            return ProvisioningStatus::Completed;
        }
        match self.timeout_ms {
            Some(timeout) if self.elapsed_ms(now_ms) >= timeout => ProvisioningStatus::TimedOut,
            _ => ProvisioningStatus::Waiting,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}
