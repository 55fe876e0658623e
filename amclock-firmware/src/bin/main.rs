// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use amclock::config::{
    EXTRA_HEAP_SIZE, HOSTNAME_PREFIX, PROVISIONING_TIMEOUT_SECS, STATUS_LED_ACTIVE_LOW,
    WIFI_HEAP_SIZE, build_credentials,
};
use amclock::hal::LedcOutput;
use amclock::tasks::{
    StatusNotifier, clock_task, connection_task, mdns_responder_task, net_task, output_task,
    provision, sntp_task, status_led_task,
};
use amclock::{BootMode, CredentialsSignal, StatusPattern, StatusSignal, SyncSignal, TargetSignal};
use amclock_core::{Hostname, device_hostname};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

// Signals zwischen den Tasks (je ein Schreiber, ein Leser)
static STATUS_PATTERN: StatusSignal = StatusSignal::new();
static TARGET_LEVEL: TargetSignal = TargetSignal::new();
static TIME_SYNC: SyncSignal = SyncSignal::new();
static CREDENTIALS: CredentialsSignal = CredentialsSignal::new();

/// Main Entry Point
///
/// Initialisiert Hardware, startet die Anzeige-Tasks, führt bei Bedarf die
/// Provisionierung durch und spawnt danach die Netzwerk-Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // ------------------------------------------------------------------------
    // Hardware: LEDs, Taster, PWM
    // ------------------------------------------------------------------------
    let status_led = Output::new(
        peripherals.GPIO2,
        Level::from(STATUS_LED_ACTIVE_LOW),
        OutputConfig::default(),
    );
    let hour_led = Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default());
    let minute_led = Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default());
    let button = Input::new(
        peripherals.GPIO9,
        InputConfig::default().with_pull(Pull::Up),
    );
    let pwm = LedcOutput::new(peripherals.LEDC, peripherals.GPIO6)
        .expect("Failed to initialize LEDC output");

    // Boot-Modus einmalig aus dem Taster bestimmen
    let fallback = build_credentials();
    let boot_mode = if fallback.is_none() {
        warn!("Boot: No build-time WiFi credentials, entering provisioning");
        BootMode::Provisioning
    } else {
        BootMode::from_button(button.is_low())
    };
    info!("Boot: Mode {}", boot_mode);

    let initial_pattern = match boot_mode {
        BootMode::Provisioning => StatusPattern::Provisioning,
        BootMode::Normal => StatusPattern::Connecting,
    };

    spawner
        .spawn(status_led_task(status_led, initial_pattern, &STATUS_PATTERN))
        .unwrap();
    spawner.spawn(output_task(pwm, &TARGET_LEVEL)).unwrap();

    // ------------------------------------------------------------------------
    // WiFi
    // ------------------------------------------------------------------------
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (mut wifi_controller, wifi_interfaces) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Hostname aus den letzten drei MAC-Bytes
    static HOSTNAME: StaticCell<Hostname> = StaticCell::new();
    let hostname = HOSTNAME
        .init(device_hostname(
            HOSTNAME_PREFIX,
            wifi_interfaces.sta.mac_address(),
        ))
        .as_str();
    info!("Boot: Hostname {}", hostname);

    let credentials = match boot_mode {
        BootMode::Provisioning => {
            // Ohne Fallback wird unbegrenzt gewartet
            let timeout_ms = fallback.as_ref().map(|_| PROVISIONING_TIMEOUT_SECS * 1000);
            let provisioned = provision(
                &spawner,
                &mut wifi_controller,
                wifi_interfaces.ap,
                hostname,
                &CREDENTIALS,
                timeout_ms,
            )
            .await;
            STATUS_PATTERN.signal(StatusPattern::Connecting);
            provisioned.or(fallback)
        }
        BootMode::Normal => fallback,
    };

    let Some(credentials) = credentials else {
        // Nur erreichbar, wenn der Access-Point nicht starten konnte
        error!("Boot: No WiFi credentials available, reset to retry provisioning");
        loop {
            Timer::after(Duration::from_secs(3600)).await;
        }
    };

    // Netzwerk-Stack (Station) erstellen
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // DHCP + DNS + SNTP + mDNS
    static RESOURCES: StaticCell<StackResources<6>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_interfaces.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner
        .spawn(connection_task(
            wifi_controller,
            credentials,
            stack,
            StatusNotifier::new(&STATUS_PATTERN),
        ))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(sntp_task(stack, &TIME_SYNC)).unwrap();
    spawner.spawn(mdns_responder_task(stack, hostname)).unwrap();

    // Uhren-Task erst nach der Provisionierung: der Taster dient dort
    // nicht mehr der Boot-Auswahl, sondern der Kalibrierung
    spawner
        .spawn(clock_task(
            hour_led,
            minute_led,
            button,
            &TIME_SYNC,
            &TARGET_LEVEL,
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
