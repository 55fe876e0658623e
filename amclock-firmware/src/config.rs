// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use amclock_core::WifiCredentials;

// ============================================================================
// Hardware
// ============================================================================
//
// Pins werden in main.rs über die Peripherals verdrahtet:
// - Status-LED:  GPIO2
// - Stunden-LED: GPIO4
// - Minuten-LED: GPIO5
// - PWM-Ausgang: GPIO6 (Drehspulinstrument)
// - Taster:      GPIO9 (BOOT-Taster, active-low mit Pull-up)

/// Status-LED leuchtet bei LOW
pub const STATUS_LED_ACTIVE_LOW: bool = true;

/// PWM-Frequenz des LEDC-Ausgangs in kHz (10 Bit Auflösung)
pub const PWM_FREQUENCY_KHZ: u32 = 1;

// ============================================================================
// Timing
// ============================================================================

/// Schiebe-Intervall des Status-Musters
pub const STATUS_TICK_MS: u64 = 125;

/// Intervall des Ausgangs-Smoothers
pub const SMOOTH_TICK_MS: u64 = 32;

/// Schrittweite des Smoothers pro Tick
pub const SMOOTH_STEP: u16 = amclock_core::DEFAULT_STEP;

/// Abfrage-Intervall der Uhren-Schleife (Update selbst nur 1x pro Sekunde)
pub const CLOCK_POLL_MS: u64 = 25;

/// Abfrage-Intervall während der Provisionierung
pub const PROVISIONING_POLL_MS: u64 = 25;

// ============================================================================
// Zeit / NTP
// ============================================================================

/// Zeitzone: UTC+8
pub const UTC_OFFSET_SECS: i32 = 8 * 3600;

/// NTP-Server, überschreibbar über NTP_SERVER in .env
pub const NTP_SERVER: &str = match option_env!("NTP_SERVER") {
    Some(server) => server,
    None => "pool.ntp.org",
};

/// Neu-Synchronisation nach erfolgreicher Abfrage
pub const NTP_SYNC_INTERVAL_SECS: u64 = 60;

/// Wartezeit nach fehlgeschlagener Abfrage
pub const NTP_RETRY_DELAY_SECS: u64 = 5;

/// Timeout für die Antwort des NTP-Servers
pub const NTP_RESPONSE_TIMEOUT_SECS: u64 = 3;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Lokaler UDP-Port für NTP-Abfragen
pub const NTP_LOCAL_PORT: u16 = 50123;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID aus WIFI_SSID in .env (optional)
pub const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// WiFi Passwort aus WIFI_PASSWORD in .env (leer = offenes Netz)
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Zur Build-Zeit eingebackene Zugangsdaten, falls vorhanden und gültig
pub fn build_credentials() -> Option<WifiCredentials> {
    WifiCredentials::new(WIFI_SSID?, WIFI_PASSWORD).ok()
}

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Wartezeit nach Verbindungsabbruch
pub const WIFI_RECONNECT_DELAY_SECS: u64 = 2;

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Provisionierung (Access-Point + Setup-Seite)
// ============================================================================

/// Präfix des Hostnamens, gefolgt von den letzten drei MAC-Bytes
pub const HOSTNAME_PREFIX: &str = "amclock-";

/// Timeout der Provisionierung, danach Fallback auf Build-Zeit-Zugangsdaten
pub const PROVISIONING_TIMEOUT_SECS: u64 = 300;

/// Adresse des Geräts im Setup-Netz
pub const AP_ADDRESS: [u8; 4] = [192, 168, 4, 1];

/// DHCP-Bereich für Clients am Access-Point
pub const AP_DHCP_RANGE_START: [u8; 4] = [192, 168, 4, 50];
pub const AP_DHCP_RANGE_END: [u8; 4] = [192, 168, 4, 200];

/// WiFi-Kanal des Access-Points
pub const AP_CHANNEL: u8 = 6;

/// Buffer-Größe für DHCP-Pakete
pub const DHCP_BUFFER_SIZE: usize = 600;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS TTL (Time To Live) in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// Wartezeit nach Fehler vor erneutem Versuch
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// Multicast DNS nutzt Port 5353 laut RFC 6762
pub const MDNS_PORT: u16 = 5353;

/// Standard mDNS Multicast-Gruppe laut RFC 6762
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes (Standard MTU)
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Setup-Server
// ============================================================================

/// HTTP Buffer-Größe für Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP Buffer-Größen in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// JSON-Buffer für Antworten des Setup-Servers
pub const JSON_REPLY_BUFFER_SIZE: usize = 128;
