// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Geteilter Zustand wird über Signals übergeben (siehe lib.rs).

pub mod clock;
pub mod mdns;
pub mod output;
pub mod provisioning;
pub mod sntp;
pub mod status_led;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use clock::clock_task;
pub use mdns::mdns_responder_task;
pub use output::output_task;
pub use provisioning::{ap_dhcp_task, provision, setup_server_task};
pub use sntp::sntp_task;
pub use status_led::status_led_task;
pub use wifi::{StatusNotifier, connection_task, net_task};
