// Provisionierung - Access-Point mit DHCP-Server und Setup-Seite
//
// Wird der Taster beim Booten gehalten (oder fehlen Zugangsdaten), öffnet das
// Gerät einen Access-Point mit dem Hostnamen als SSID. Auf http://192.168.4.1/
// können SSID und Passwort eingegeben werden.

use core::net::Ipv4Addr;

use amclock_core::{ProvisioningSession, ProvisioningStatus, WifiCredentials};
use defmt::{Debug2Format, error, info, warn};
use edge_dhcp::server::{Server as DhcpServer, ServerOptions as DhcpServerOptions};
use edge_dhcp::{Options as DhcpOptions, Packet as DhcpPacket};
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{
    Config as NetConfig, Ipv4Address, Ipv4Cidr, Stack, StackResources, StaticConfigV4,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};
use esp_radio::wifi::{AccessPointConfig, ModeConfig, WifiController, WifiDevice};
use picoserve::extract::Form;
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Response, StatusCode};
use picoserve::routing::{get, post};
use serde::Serialize;
use static_cell::StaticCell;

use crate::CredentialsSignal;
use crate::config::{
    AP_ADDRESS, AP_CHANNEL, AP_DHCP_RANGE_END, AP_DHCP_RANGE_START, DHCP_BUFFER_SIZE,
    HTTP_BUFFER_SIZE, JSON_REPLY_BUFFER_SIZE, PROVISIONING_POLL_MS, TCP_RX_BUFFER_SIZE,
    TCP_TX_BUFFER_SIZE,
};
use crate::tasks::wifi::net_task;
use crate::web::SETUP_HTML;
use crate::web::protocol::{DeviceInfo, ProvisionForm, SetupReply};

/// DHCP Ports für Server und Client
const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;

type ShutdownSignal = Signal<CriticalSectionRawMutex, ()>;

/// Stopp-Signale für DHCP-Server (0) und Setup-Server (1, 2)
static SETUP_SHUTDOWN: [ShutdownSignal; 3] = [const { Signal::new() }; 3];

/// Beendet DHCP- und Setup-Server. Der AP-`net_task` bleibt auf dem
/// gestoppten Interface im Leerlauf.
fn shutdown_setup_services() {
    for signal in &SETUP_SHUTDOWN {
        signal.signal(());
    }
}

/// Provisionierung durchführen
///
/// Startet den Access-Point, spawnt Netzwerk-, DHCP- und HTTP-Tasks und fragt
/// alle 25 ms ab, ob Zugangsdaten eingetroffen sind. Danach (oder nach
/// `timeout_ms`) wird der Access-Point wieder gestoppt.
///
/// # Returns
/// - `Some(credentials)` - Zugangsdaten über die Setup-Seite erhalten
/// - `None` - Timeout oder Access-Point konnte nicht gestartet werden
pub async fn provision(
    spawner: &Spawner,
    controller: &mut WifiController<'static>,
    ap_device: WifiDevice<'static>,
    hostname: &'static str,
    credentials: &'static CredentialsSignal,
    timeout_ms: Option<u64>,
) -> Option<WifiCredentials> {
    info!("Provisioning: Opening access point '{}'", hostname);

    let ap_config = AccessPointConfig::default()
        .with_ssid(hostname.into())
        .with_channel(AP_CHANNEL);

    if let Err(e) = controller.set_config(&ModeConfig::AccessPoint(ap_config)) {
        error!("Provisioning: Failed to set AP config: {}", Debug2Format(&e));
        return None;
    }
    if let Err(e) = controller.start_async().await {
        error!("Provisioning: Failed to start AP: {}", Debug2Format(&e));
        return None;
    }

    let ap_ip = Ipv4Address::from(AP_ADDRESS);
    let net_config = NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(ap_ip, 24),
        gateway: Some(ap_ip),
        dns_servers: Default::default(),
    });

    // DHCP-Server (1) + Setup-Server (2)
    static AP_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    static AP_STACK: StaticCell<Stack<'static>> = StaticCell::new();
    // Kein Zufall nötig: nur lokale Verbindungen im Setup-Netz
    let (stack, runner) = embassy_net::new(
        ap_device,
        net_config,
        AP_RESOURCES.init(StackResources::new()),
        0,
    );
    let stack = &*AP_STACK.init(stack);

    let spawned = spawner
        .spawn(net_task(runner))
        .and_then(|_| spawner.spawn(ap_dhcp_task(stack, &SETUP_SHUTDOWN[0])))
        .and_then(|_| {
            spawner.spawn(setup_server_task(
                0,
                stack,
                hostname,
                credentials,
                &SETUP_SHUTDOWN[1],
            ))
        })
        .and_then(|_| {
            spawner.spawn(setup_server_task(
                1,
                stack,
                hostname,
                credentials,
                &SETUP_SHUTDOWN[2],
            ))
        });
    if let Err(e) = spawned {
        error!("Provisioning: Failed to spawn tasks: {}", Debug2Format(&e));
        shutdown_setup_services();
        let _ = controller.stop_async().await;
        return None;
    }

    info!(
        "Provisioning: Setup page on http://{}/",
        Debug2Format(&ap_ip)
    );

    let session = ProvisioningSession::new(Instant::now().as_millis(), timeout_ms);
    let result = loop {
        let received = credentials.try_take();
        let status = session.poll(Instant::now().as_millis(), received.is_some());
        if status.is_finished() {
            // Antwort an den Browser noch ausliefern lassen
            Timer::after(Duration::from_secs(1)).await;
            shutdown_setup_services();
        }
        match status {
            ProvisioningStatus::Completed => break received,
            ProvisioningStatus::TimedOut => {
                warn!(
                    "Provisioning: Timed out after {}s",
                    session.elapsed_ms(Instant::now().as_millis()) / 1000
                );
                break None;
            }
            ProvisioningStatus::Waiting => {
                Timer::after(Duration::from_millis(PROVISIONING_POLL_MS)).await;
            }
        }
    };

    if let Some(creds) = &result {
        info!("Provisioning: Received {}", creds);
    }

    if let Err(e) = controller.stop_async().await {
        warn!("Provisioning: Failed to stop AP: {}", Debug2Format(&e));
    }

    result
}

/// DHCP-Server für Clients am Access-Point
#[embassy_executor::task]
pub async fn ap_dhcp_task(stack: &'static Stack<'static>, shutdown: &'static ShutdownSignal) {
    while !stack.is_config_up() {
        Timer::after(Duration::from_millis(100)).await;
    }

    let mut rx_meta = [PacketMetadata::EMPTY; 2];
    let mut rx_buffer = [0u8; DHCP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 2];
    let mut tx_buffer = [0u8; DHCP_BUFFER_SIZE];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        error!("DHCP: Failed to bind port {}: {}", DHCP_SERVER_PORT, Debug2Format(&e));
        return;
    }

    let server_ip = Ipv4Addr::from(AP_ADDRESS);
    let mut gw_buf = [Ipv4Addr::UNSPECIFIED; 1];
    let server_options = DhcpServerOptions::new(server_ip, Some(&mut gw_buf));

    let mut server = DhcpServer::<_, 8>::new_with_et(server_ip);
    server.range_start = Ipv4Addr::from(AP_DHCP_RANGE_START);
    server.range_end = Ipv4Addr::from(AP_DHCP_RANGE_END);

    info!("DHCP: Server running on port {}", DHCP_SERVER_PORT);

    let mut request_buf = [0u8; DHCP_BUFFER_SIZE];
    let mut reply_buf = [0u8; DHCP_BUFFER_SIZE];
    let serve = async {
        loop {
            let Ok((len, _meta)) = socket.recv_from(&mut request_buf).await else {
                continue;
            };

            let request = match DhcpPacket::decode(&request_buf[..len]) {
                Ok(packet) => packet,
                Err(e) => {
                    warn!("DHCP: Decode error: {}", Debug2Format(&e));
                    continue;
                }
            };

            let mut opt_buf = DhcpOptions::buf();
            if let Some(reply) = server.handle_request(&mut opt_buf, &server_options, &request) {
                match reply.encode(&mut reply_buf) {
                    Ok(encoded) => {
                        let dest = (Ipv4Address::new(255, 255, 255, 255), DHCP_CLIENT_PORT);
                        if let Err(e) = socket.send_to(encoded, dest).await {
                            warn!("DHCP: Send error: {}", Debug2Format(&e));
                        }
                    }
                    Err(e) => warn!("DHCP: Encode error: {}", Debug2Format(&e)),
                }
            }
        }
    };

    select(serve, shutdown.wait()).await;
    info!("DHCP: Server stopped");
}

/// JSON-Antwort mit Status-Code
///
/// Serialisiert mit serde-json-core in einen Stack-Buffer, ohne Heap.
struct JsonReply<T: Serialize> {
    status: u16,
    body: T,
}

impl<T: Serialize> IntoResponse for JsonReply<T> {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let mut json_buffer = [0u8; JSON_REPLY_BUFFER_SIZE];
        let (status, json) = match serde_json_core::to_slice(&self.body, &mut json_buffer) {
            Ok(n) => (
                self.status,
                core::str::from_utf8(&json_buffer[..n]).unwrap_or("{}"),
            ),
            Err(_) => (500, "{}"),
        };

        Response::new(StatusCode::new(status), json)
            .with_header("Content-Type", "application/json")
            .write_to(connection, response_writer)
            .await
    }
}

/// Setup-Server Task - läuft im Setup-Netz des Access-Points
///
/// - `GET /` liefert die Setup-Seite
/// - `GET /status` liefert Hostname und Firmware-Version
/// - `POST /provision` prüft SSID/Passwort und meldet sie an die Provisionierung
///
/// **Task Pool:** 2 Instanzen, damit Seite und Formular parallel laufen können.
#[embassy_executor::task(pool_size = 2)]
pub async fn setup_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    hostname: &'static str,
    credentials: &'static CredentialsSignal,
    shutdown: &'static ShutdownSignal,
) {
    info!("HTTP: Setup server task {} starting on port 80...", task_id);

    let app = picoserve::Router::new()
        .route("/", get(serve_setup_page))
        .route(
            "/status",
            get(move || async move {
                JsonReply {
                    status: 200,
                    body: DeviceInfo {
                        hostname,
                        version: env!("CARGO_PKG_VERSION"),
                    },
                }
            }),
        )
        .route(
            "/provision",
            post(move |Form(form): Form<ProvisionForm>| async move {
                handle_provision(form, credentials)
            }),
        );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    select(
        server.listen_and_serve(task_id, *stack, 80, &mut rx_buffer, &mut tx_buffer),
        shutdown.wait(),
    )
    .await;

    info!("HTTP: Setup server task {} ended", task_id);
}

async fn serve_setup_page() -> impl IntoResponse {
    Response::new(StatusCode::OK, SETUP_HTML).with_header("Content-Type", "text/html; charset=utf-8")
}

fn handle_provision(
    form: ProvisionForm,
    credentials: &'static CredentialsSignal,
) -> JsonReply<SetupReply> {
    let reply = match WifiCredentials::new(&form.ssid, &form.password) {
        Ok(creds) => {
            info!("HTTP: Credentials for '{}' accepted", creds.ssid());
            credentials.signal(creds);
            SetupReply::accepted()
        }
        Err(e) => {
            warn!("HTTP: Credentials rejected: {}", e);
            SetupReply::rejected(e)
        }
    };

    JsonReply {
        status: reply.status_code(),
        body: reply,
    }
}
