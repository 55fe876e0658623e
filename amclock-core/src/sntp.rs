//! SNTP Paket-Kodierung (RFC 4330)
//!
//! Nur die Teile, die ein Client für eine einfache Zeitabfrage braucht:
//! Request bauen, Response prüfen, Transmit-Timestamp nach Unix-Sekunden wandeln.

/// Größe eines NTP-Pakets ohne Extensions
pub const NTP_PACKET_SIZE: usize = 48;

/// Standard-Port für NTP
pub const NTP_PORT: u16 = 123;

/// Sekunden zwischen 1900-01-01 (NTP-Epoche) und 1970-01-01 (Unix-Epoche)
const NTP_TO_UNIX_SECONDS: u64 = 2_208_988_800;

/// LI=0, VN=3, Mode=3 (client)
const CLIENT_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;
const LEAP_ALARM: u8 = 3;

const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

/// Fehler beim Auswerten einer NTP-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SntpError {
    /// Antwort kürzer als 48 Bytes
    TooShort,
    /// Mode ist weder Server noch Broadcast
    UnexpectedMode,
    /// Stratum 0: Kiss-o'-Death, Server will nicht antworten
    KissOfDeath,
    /// Leap Indicator 3: Server-Uhr nicht synchronisiert
    Unsynchronized,
    /// Transmit-Timestamp ist 0
    MissingTimestamp,
    /// Transmit-Timestamp liegt vor 1970-01-01
    BeforeUnixEpoch,
}

/// Baut einen NTP v3 Client-Request
pub fn build_request() -> [u8; NTP_PACKET_SIZE] {
    let mut request = [0u8; NTP_PACKET_SIZE];
    request[0] = CLIENT_HEADER;
    request
}

/// Prüft eine Server-Antwort und liefert die Unix-Sekunden des Transmit-Timestamps
///
/// Timestamps mit gelöschtem MSB werden der NTP-Ära 1 (ab Februar 2036)
/// zugeordnet.
pub fn parse_response(response: &[u8]) -> Result<u64, SntpError> {
    let packet: &[u8; NTP_PACKET_SIZE] = response
        .get(..NTP_PACKET_SIZE)
        .and_then(|p| p.try_into().ok())
        .ok_or(SntpError::TooShort)?;

    let leap = packet[0] >> 6;
    let mode = packet[0] & 0x07;
    let stratum = packet[1];

    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(SntpError::UnexpectedMode);
    }
    if stratum == 0 {
        return Err(SntpError::KissOfDeath);
    }
    if leap == LEAP_ALARM {
        return Err(SntpError::Unsynchronized);
    }

    let ntp_seconds = u32::from_be_bytes([
        packet[TRANSMIT_TIMESTAMP_OFFSET],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 1],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 2],
        packet[TRANSMIT_TIMESTAMP_OFFSET + 3],
    ]);
    if ntp_seconds == 0 {
        return Err(SntpError::MissingTimestamp);
    }

    ntp_to_unix(ntp_seconds).ok_or(SntpError::BeforeUnixEpoch)
}

fn ntp_to_unix(ntp_seconds: u32) -> Option<u64> {
    let era_seconds = if ntp_seconds & 0x8000_0000 == 0 {
        u64::from(ntp_seconds) + (1u64 << 32)
    } else {
        u64::from(ntp_seconds)
    };
    era_seconds.checked_sub(NTP_TO_UNIX_SECONDS)
}

#[cfg(feature = "defmt")]
impl defmt::Format for SntpError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SntpError::TooShort => defmt::write!(fmt, "Response too short"),
            SntpError::UnexpectedMode => defmt::write!(fmt, "Unexpected mode"),
            SntpError::KissOfDeath => defmt::write!(fmt, "Kiss-o'-Death"),
            SntpError::Unsynchronized => defmt::write!(fmt, "Server unsynchronized"),
            SntpError::MissingTimestamp => defmt::write!(fmt, "Missing transmit timestamp"),
            SntpError::BeforeUnixEpoch => defmt::write!(fmt, "Timestamp before 1970"),
        }
    }
}
