// WiFi Task - Verbindet mit WLAN und meldet Zustandswechsel
use amclock_core::{ConnectivityEvents, StatusPattern, WifiCredentials};
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::StatusSignal;
use crate::config::{WIFI_RECONNECT_DELAY_SECS, WIFI_RETRY_DELAY_SECS};

/// Maximale Wartezeit auf eine DHCP-Adresse nach dem Verbinden
const DHCP_TIMEOUT_SECS: u64 = 30;

/// Übersetzt Verbindungs-Events in Status-Muster für die Status-LED
pub struct StatusNotifier {
    patterns: &'static StatusSignal,
}

impl StatusNotifier {
    pub fn new(patterns: &'static StatusSignal) -> Self {
        Self { patterns }
    }
}

impl ConnectivityEvents for StatusNotifier {
    fn on_connected(&mut self) {
        self.patterns.signal(StatusPattern::Normal);
    }

    fn on_disconnected(&mut self) {
        self.patterns.signal(StatusPattern::Connecting);
    }
}

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Konfiguriert den Station-Modus (auch nach einer Provisionierung im AP-Modus)
/// - Verbindet mit dem Access Point und wartet auf die DHCP-Adresse
/// - Meldet Verbunden/Getrennt über `ConnectivityEvents`
/// - Reconnected nach Verbindungsabbruch
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    credentials: WifiCredentials,
    stack: &'static Stack<'static>,
    mut events: StatusNotifier,
) {
    info!("WiFi: Starting connection task for {}", credentials);

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(credentials.ssid().into())
                    .with_password(credentials.password().into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        info!("WiFi: Connecting to '{}'...", credentials.ssid());
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Associated, waiting for IP address...");

        // "Verbunden" gilt erst mit IPv4-Adresse
        if with_timeout(
            Duration::from_secs(DHCP_TIMEOUT_SECS),
            wait_for_network(stack),
        )
        .await
        .is_err()
        {
            warn!("WiFi: No IP address after {}s, reconnecting", DHCP_TIMEOUT_SECS);
            let _ = controller.disconnect_async().await;
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }

        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
        }
        events.on_connected();

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
        events.on_disconnected();

        Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
    }
}

/// Network Task
///
/// Prozessiert die Pakete eines Netzwerk-Stacks. Zwei Instanzen:
/// Station (Normalbetrieb) und Access-Point (Provisionierung).
#[embassy_executor::task(pool_size = 2)]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis Link up ist und eine IPv4-Konfiguration vom DHCP vorliegt
pub async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
