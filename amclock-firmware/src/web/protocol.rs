// Setup-Protokoll: Formular-Daten und JSON-Antworten des Setup-Servers

use amclock_core::CredentialsError;
use amclock_core::types::{PASSWORD_INPUT_CAPACITY, SSID_INPUT_CAPACITY};
use heapless::String;
use serde::{Deserialize, Serialize};

/// Formular der Setup-Seite (application/x-www-form-urlencoded)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProvisionForm {
    pub ssid: String<SSID_INPUT_CAPACITY>,
    #[serde(default)]
    pub password: String<PASSWORD_INPUT_CAPACITY>,
}

/// Antwort auf POST /provision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result")]
pub enum SetupReply {
    #[serde(rename = "accepted")]
    Accepted { message: &'static str },
    #[serde(rename = "rejected")]
    Rejected { message: &'static str },
}

impl SetupReply {
    pub fn accepted() -> Self {
        SetupReply::Accepted {
            message: "Zugangsdaten übernommen, Gerät verbindet sich",
        }
    }

    pub fn rejected(error: CredentialsError) -> Self {
        let message = match error {
            CredentialsError::EmptySsid => "SSID fehlt",
            CredentialsError::SsidTooLong => "SSID zu lang (max. 32 Zeichen)",
            CredentialsError::PasswordTooShort => "Passwort zu kurz (min. 8 Zeichen)",
            CredentialsError::PasswordTooLong => "Passwort zu lang (max. 64 Zeichen)",
        };
        SetupReply::Rejected { message }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SetupReply::Accepted { .. } => 200,
            SetupReply::Rejected { .. } => 400,
        }
    }
}

/// Antwort auf GET /status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub hostname: &'static str,
    pub version: &'static str,
}
