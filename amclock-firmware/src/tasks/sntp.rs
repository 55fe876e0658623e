// SNTP Task - Holt periodisch die Uhrzeit vom NTP-Server
use amclock_core::{NTP_PACKET_SIZE, NTP_PORT, SntpError, SyncSample, build_request, parse_response};
use defmt::{Debug2Format, info, warn};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType};
use embassy_time::{Duration, Instant, Timer, with_timeout};

use crate::SyncSignal;
use crate::config::{
    DNS_TIMEOUT_SECS, NTP_LOCAL_PORT, NTP_RESPONSE_TIMEOUT_SECS, NTP_RETRY_DELAY_SECS,
    NTP_SERVER, NTP_SYNC_INTERVAL_SECS,
};
use crate::tasks::wifi::wait_for_network;

/// SNTP Task
///
/// - Wartet auf Netzwerk-Verbindung
/// - Fragt `NTP_SERVER` ab und schickt das Ergebnis an den Uhren-Task
/// - Nach Erfolg erneut nach `NTP_SYNC_INTERVAL_SECS`, nach Fehler nach
///   `NTP_RETRY_DELAY_SECS`
#[embassy_executor::task]
pub async fn sntp_task(stack: &'static Stack<'static>, samples: &'static SyncSignal) {
    info!("SNTP: Task started, waiting for network...");

    loop {
        wait_for_network(stack).await;

        match query_time(stack).await {
            Ok(sample) => {
                info!("SNTP: Synchronized, {}", sample);
                samples.signal(sample);
                Timer::after(Duration::from_secs(NTP_SYNC_INTERVAL_SECS)).await;
            }
            Err(e) => {
                warn!(
                    "SNTP: Query failed: {}, retrying in {}s",
                    e, NTP_RETRY_DELAY_SECS
                );
                Timer::after(Duration::from_secs(NTP_RETRY_DELAY_SECS)).await;
            }
        }
    }
}

/// Eine einzelne SNTP-Abfrage
///
/// 1. DNS-Auflösung von `NTP_SERVER`
/// 2. Client-Request per UDP senden
/// 3. Antwort mit Timeout empfangen und prüfen
async fn query_time(stack: &'static Stack<'static>) -> Result<SyncSample, SntpTaskError> {
    let server = resolve_hostname(stack, NTP_SERVER).await?;

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; NTP_PACKET_SIZE * 2];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; NTP_PACKET_SIZE];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket
        .bind(NTP_LOCAL_PORT)
        .map_err(|_| SntpTaskError::SocketBindFailed)?;

    socket
        .send_to(&build_request(), (IpAddress::Ipv4(server), NTP_PORT))
        .await
        .map_err(|_| SntpTaskError::SendFailed)?;

    let mut response = [0u8; NTP_PACKET_SIZE * 2];
    let (len, _meta) = with_timeout(
        Duration::from_secs(NTP_RESPONSE_TIMEOUT_SECS),
        socket.recv_from(&mut response),
    )
    .await
    .map_err(|_| SntpTaskError::ResponseTimeout)?
    .map_err(|_| SntpTaskError::ReceiveFailed)?;
    let received_at_ms = Instant::now().as_millis();

    let unix_seconds =
        parse_response(&response[..len]).map_err(SntpTaskError::InvalidResponse)?;

    Ok(SyncSample {
        unix_seconds,
        received_at_ms,
    })
}

/// Löst Hostname zu IPv4-Adresse auf
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<Ipv4Address, SntpTaskError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => {
            for addr in addrs {
                if let IpAddress::Ipv4(ipv4) = addr {
                    info!("SNTP: '{}' resolved to {}", hostname, Debug2Format(&ipv4));
                    return Ok(ipv4);
                }
            }
            Err(SntpTaskError::DnsResolutionFailed)
        }
        Ok(Err(_)) => Err(SntpTaskError::DnsResolutionFailed),
        Err(_) => Err(SntpTaskError::DnsTimeout),
    }
}

/// SNTP Fehler-Typen
///
/// Jeder Fehler führt zu einem erneuten Versuch nach `NTP_RETRY_DELAY_SECS`.
#[derive(Debug)]
enum SntpTaskError {
    DnsResolutionFailed,
    DnsTimeout,
    SocketBindFailed,
    SendFailed,
    ResponseTimeout,
    ReceiveFailed,
    InvalidResponse(SntpError),
}

impl defmt::Format for SntpTaskError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SntpTaskError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            SntpTaskError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            SntpTaskError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            SntpTaskError::SendFailed => defmt::write!(fmt, "Send failed"),
            SntpTaskError::ResponseTimeout => defmt::write!(fmt, "Response timeout"),
            SntpTaskError::ReceiveFailed => defmt::write!(fmt, "Receive failed"),
            SntpTaskError::InvalidResponse(e) => defmt::write!(fmt, "Invalid response: {}", e),
        }
    }
}
