// mDNS Responder Task - Advertised den Geräte-Hostnamen via Multicast DNS
//
// Die Uhr ist damit unter "<hostname>.local" (z.B. "amclock-0abc1f.local")
// im lokalen Netzwerk erreichbar, ohne dass ein DNS-Server benötigt wird.
//
// - Protokoll: mDNS (RFC 6762), UDP Multicast auf 224.0.0.251:5353
// - Unterstützt: A-Records (IPv4 Hostname-Auflösung)
// - Library: edge-mdns (no_std) mit edge-nal-embassy als Adapter

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::config::{
    MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT, MDNS_RECONNECT_DELAY_SECS,
    MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

type MdnsUdpBuffers = UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>;

/// Counter für mDNS Transaction IDs (Eindeutigkeit genügt)
static RNG_COUNTER: AtomicU32 = AtomicU32::new(0);

fn mdns_rng(buf: &mut [u8]) {
    let mut counter = RNG_COUNTER.fetch_add(1, Ordering::Relaxed);
    for chunk in buf.chunks_mut(4) {
        let bytes = counter.to_le_bytes();
        let len = chunk.len().min(4);
        chunk[..len].copy_from_slice(&bytes[..len]);
        counter = counter.wrapping_add(1);
    }
}

/// mDNS Responder Task
///
/// Wartet auf eine DHCP-Adresse, bindet auf `0.0.0.0:5353`, tritt der
/// Multicast-Gruppe bei und beantwortet A-Record Queries für `hostname`.
/// Nach jedem Fehler wird nach `MDNS_RECONNECT_DELAY_SECS` neu gestartet,
/// dabei wird auch eine geänderte IP-Adresse übernommen.
///
/// # Parameter
/// - `stack`: Station-Stack
/// - `hostname`: Hostname ohne ".local" Suffix
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>, hostname: &'static str) {
    info!("mDNS: Task started, waiting for network...");

    // Buffer überleben die Reconnects, StaticCell darf nur einmal initialisiert werden
    static UDP_BUFFERS: static_cell::StaticCell<MdnsUdpBuffers> = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(MdnsUdpBuffers::new);

    loop {
        wait_for_network(stack).await;

        match run_mdns_responder(stack, udp_buffers, hostname).await {
            Ok(_) => warn!("mDNS: Responder stopped normally"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Reconnecting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

async fn run_mdns_responder(
    stack: &'static Stack<'static>,
    udp_buffers: &'static MdnsUdpBuffers,
    hostname: &'static str,
) -> Result<(), MdnsError> {
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    let udp_stack = Udp::new(*stack, udp_buffers);

    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    let (recv, send) = socket.split();

    let host = Host {
        hostname,
        ipv4: our_ip.into(),
        // kein proto-ipv6 in smoltcp
        ipv6: [0u8; 16].into(),
        ttl: Ttl::from_secs(MDNS_TTL_SECS),
    };

    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Broadcast-Signal wird von der API verlangt, hier ungenutzt
    let signal = Signal::<NoopRawMutex, ()>::new();

    let mdns = io::Mdns::new(
        Some(our_ip),
        None,
        recv,
        send,
        recv_buf,
        send_buf,
        mdns_rng,
        &signal,
    );

    info!("mDNS: Responder running, advertising '{}.local'", hostname);

    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)?;

    Ok(())
}

/// mDNS Fehler-Typen
///
/// Jeder Fehler führt zu einem Reconnect-Versuch im Haupt-Loop.
#[derive(Debug)]
enum MdnsError {
    /// Keine IPv4-Konfiguration (Verbindung zwischenzeitlich verloren)
    NoAddress,
    /// UDP Socket konnte nicht auf Port MDNS_PORT gebunden werden
    SocketBindFailed,
    /// Multicast-Gruppe konnte nicht gejoint werden
    MulticastJoinFailed,
    /// mDNS Responder Loop ist fehlgeschlagen
    ResponderFailed,
}

impl defmt::Format for MdnsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MdnsError::NoAddress => defmt::write!(fmt, "No IPv4 address"),
            MdnsError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            MdnsError::MulticastJoinFailed => defmt::write!(fmt, "Multicast join failed"),
            MdnsError::ResponderFailed => defmt::write!(fmt, "Responder failed"),
        }
    }
}
