//! Integration Tests für Netzwerk-nahe Logik
//!
//! SNTP-Auswertung, Netzwerk-Uhr, Provisionierung und Status-Events.

use amclock_core::{
    BootMode, ClockDriver, ConnectivityEvents, CredentialsError, DisplayPhase, NTP_PACKET_SIZE,
    NetworkClock, ProvisioningSession, ProvisioningStatus, SntpError, StatusIndicator,
    StatusPattern, SyncSample, TimeOfDay, TimeSource, WifiCredentials, build_request,
    device_hostname, parse_response,
};
use amclock_core::types::{
    PASSWORD_INPUT_CAPACITY, PASSWORD_MAX_LEN, SSID_INPUT_CAPACITY, SSID_MAX_LEN,
};

const NTP_UNIX_OFFSET: u64 = 2_208_988_800;
const UTC_PLUS_8: i32 = 8 * 3600;

// ============================================================================
// Mock Connectivity Events
// ============================================================================

#[derive(Default)]
pub struct RecordingEvents {
    pub events: Vec<&'static str>,
}

impl ConnectivityEvents for RecordingEvents {
    fn on_connected(&mut self) {
        self.events.push("connected");
    }

    fn on_disconnected(&mut self) {
        self.events.push("disconnected");
    }
}

/// TimeSource über eine NetworkClock mit manuell gesetzter Systemzeit
struct SimulatedClock {
    clock: NetworkClock,
    now_ms: u64,
}

impl TimeSource for SimulatedClock {
    fn update(&mut self) {}

    fn time_of_day(&self) -> Option<TimeOfDay> {
        self.clock.time_of_day_at(self.now_ms)
    }
}

fn server_response(unix_seconds: u64) -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = 0x24; // LI=0, VN=4, Mode=4
    packet[1] = 2;
    let ntp = (unix_seconds + NTP_UNIX_OFFSET) as u32;
    packet[40..44].copy_from_slice(&ntp.to_be_bytes());
    packet
}

// ============================================================================
// Tests: SNTP
// ============================================================================

#[test]
fn test_sntp_request_is_client_mode() {
    let request = build_request();
    assert_eq!(request.len(), NTP_PACKET_SIZE);
    assert_eq!(request[0] & 0x07, 3);
}

#[test]
fn test_sntp_valid_response() {
    // 2025-06-01 12:00:00 UTC
    let packet = server_response(1_748_779_200);
    assert_eq!(parse_response(&packet), Ok(1_748_779_200));
}

#[test]
fn test_sntp_rejects_invalid_packets() {
    let packet = server_response(1_748_779_200);
    assert_eq!(parse_response(&packet[..47]), Err(SntpError::TooShort));

    let mut kod = packet;
    kod[1] = 0;
    assert_eq!(parse_response(&kod), Err(SntpError::KissOfDeath));

    let mut alarm = packet;
    alarm[0] |= 0b1100_0000;
    assert_eq!(parse_response(&alarm), Err(SntpError::Unsynchronized));

    let mut symmetric = packet;
    symmetric[0] = (symmetric[0] & !0x07) | 1;
    assert_eq!(parse_response(&symmetric), Err(SntpError::UnexpectedMode));
}

#[test]
fn test_sntp_accepts_longer_datagram() {
    let mut datagram = [0u8; 68];
    datagram[..NTP_PACKET_SIZE].copy_from_slice(&server_response(1_000_000_000));
    assert_eq!(parse_response(&datagram), Ok(1_000_000_000));
}

#[test]
fn test_sntp_pre_epoch_reply_keeps_last_sample() {
    let mut clock = NetworkClock::new(0);
    clock.apply(SyncSample {
        unix_seconds: 1_748_779_200,
        received_at_ms: 0,
    });

    // Transmit-Timestamp 1968, wie ihn ein kaputter Server liefern kann
    let mut packet = server_response(0);
    packet[40..44].copy_from_slice(&0x8000_0001u32.to_be_bytes());

    match parse_response(&packet) {
        Ok(unix_seconds) => clock.apply(SyncSample {
            unix_seconds,
            received_at_ms: 5_000,
        }),
        Err(e) => assert_eq!(e, SntpError::BeforeUnixEpoch),
    }
    assert_eq!(clock.unix_seconds_at(5_000), Some(1_748_779_205));
}

// ============================================================================
// Tests: NetworkClock
// ============================================================================

#[test]
fn test_network_clock_applies_utc_offset() {
    let mut clock = NetworkClock::new(UTC_PLUS_8);
    // 2025-06-01 20:15:42 UTC -> 04:15:42 Ortszeit
    let unix = parse_response(&server_response(1_748_808_942)).unwrap();
    clock.apply(SyncSample {
        unix_seconds: unix,
        received_at_ms: 0,
    });
    assert_eq!(clock.time_of_day_at(0), TimeOfDay::new(4, 15, 42));
    assert_eq!(clock.time_of_day_at(18_999), TimeOfDay::new(4, 16, 0));
}

#[test]
fn test_network_clock_resync_replaces_sample() {
    let mut clock = NetworkClock::new(0);
    clock.apply(SyncSample {
        unix_seconds: 100,
        received_at_ms: 0,
    });
    clock.apply(SyncSample {
        unix_seconds: 500,
        received_at_ms: 60_000,
    });
    assert_eq!(clock.unix_seconds_at(61_000), Some(501));
}

#[test]
fn test_driver_follows_network_clock() {
    let mut clock = NetworkClock::new(0);
    clock.apply(SyncSample {
        unix_seconds: 12 * 3600 + 5 * 60 + 29,
        received_at_ms: 0,
    });
    let mut source = SimulatedClock { clock, now_ms: 0 };
    let mut driver = ClockDriver::new(0);

    source.now_ms = 1000;
    let frame = driver.poll(1000, false, &mut source).unwrap();
    // 12:05:30 -> Minuten-Phase
    assert_eq!(frame.phase, DisplayPhase::Minutes);

    source.now_ms = 11_000;
    let frame = driver.poll(11_000, false, &mut source).unwrap();
    // 12:05:40 -> Stunden-Phase, 12 Uhr entspricht 0
    assert_eq!(frame.phase, DisplayPhase::Hours);
    assert_eq!(frame.target, amclock_core::hours_level(5 * 60 + 40));
}

#[test]
fn test_driver_unsynced_clock_suppresses_updates() {
    let mut source = SimulatedClock {
        clock: NetworkClock::new(UTC_PLUS_8),
        now_ms: 5000,
    };
    let mut driver = ClockDriver::new(0);
    assert_eq!(driver.poll(5000, false, &mut source), None);
}

// ============================================================================
// Tests: Status Events
// ============================================================================

#[test]
fn test_connectivity_events_switch_pattern() {
    let mut indicator = StatusIndicator::new(StatusPattern::Connecting);

    indicator.on_connected();
    assert_eq!(indicator.pattern(), StatusPattern::Normal);
    assert_eq!(indicator.word(), StatusPattern::NORMAL_WORD);

    indicator.tick();
    indicator.on_disconnected();
    assert_eq!(indicator.pattern(), StatusPattern::Connecting);
    assert_eq!(indicator.word(), StatusPattern::CONNECTING_WORD);
}

#[test]
fn test_recording_events_order() {
    fn flap(events: &mut impl ConnectivityEvents) {
        events.on_connected();
        events.on_disconnected();
        events.on_connected();
    }

    let mut events = RecordingEvents::default();
    flap(&mut events);
    assert_eq!(events.events, vec!["connected", "disconnected", "connected"]);
}

// ============================================================================
// Tests: Provisionierung
// ============================================================================

#[test]
fn test_boot_with_button_enters_provisioning() {
    let mode = BootMode::from_button(true);
    assert_eq!(mode, BootMode::Provisioning);

    let indicator = StatusIndicator::new(StatusPattern::Provisioning);
    assert_eq!(indicator.word(), StatusPattern::PROVISIONING_WORD);
}

#[test]
fn test_provisioning_poll_loop() {
    let session = ProvisioningSession::new(0, Some(300_000));
    let mut now = 0;
    let mut status = ProvisioningStatus::Waiting;

    while status == ProvisioningStatus::Waiting {
        now += 25;
        status = session.poll(now, now == 10_000);
    }
    assert_eq!(status, ProvisioningStatus::Completed);
    assert_eq!(session.elapsed_ms(now), 10_000);
}

#[test]
fn test_provisioning_timeout_fallback() {
    let session = ProvisioningSession::new(2_000, Some(300_000));
    assert_eq!(session.poll(301_999, false), ProvisioningStatus::Waiting);
    assert_eq!(session.poll(302_000, false), ProvisioningStatus::TimedOut);
}

#[test]
fn test_credentials_from_form_values() {
    let creds = WifiCredentials::new("Wohnzimmer", "geheim123").unwrap();
    assert_eq!(creds.ssid(), "Wohnzimmer");
    assert!(!creds.is_open());

    assert_eq!(
        WifiCredentials::new("Wohnzimmer", "kurz"),
        Err(CredentialsError::PasswordTooShort)
    );
    assert_eq!(
        WifiCredentials::new("", "geheim123"),
        Err(CredentialsError::EmptySsid)
    );
}

#[test]
fn test_overlong_form_values_reach_validation() {
    let ssid = "s".repeat(SSID_MAX_LEN + 1);
    let password = "p".repeat(PASSWORD_MAX_LEN + 1);
    // Passen noch in die Formular-Puffer, scheitern erst an der Validierung
    assert!(ssid.len() <= SSID_INPUT_CAPACITY);
    assert!(password.len() <= PASSWORD_INPUT_CAPACITY);

    assert_eq!(
        WifiCredentials::new(&ssid, "geheim123"),
        Err(CredentialsError::SsidTooLong)
    );
    assert_eq!(
        WifiCredentials::new("Wohnzimmer", &password),
        Err(CredentialsError::PasswordTooLong)
    );
}

#[test]
fn test_hostname_from_mac() {
    let name = device_hostname("amclock-", [0x40, 0x4c, 0xca, 0x0a, 0xbc, 0x1f]);
    assert_eq!(name.as_str(), "amclock-0abc1f");
}
