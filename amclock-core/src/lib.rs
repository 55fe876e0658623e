//! amclock Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Zustandsautomaten und Pure Functions,
//! die auf dem Host getestet werden können.

#![no_std]

pub mod clock;
pub mod logic;
pub mod provisioning;
pub mod smoothing;
pub mod sntp;
pub mod status;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use clock::{ClockDriver, NetworkClock};
pub use logic::{
    CLOCK_UPDATE_INTERVAL_MS, HALF_DAY_SECS, MAX_LEVEL, device_hostname, display_phase,
    hours_level, minutes_level,
};
pub use provisioning::{BootMode, ProvisioningSession, ProvisioningStatus};
pub use smoothing::{DEFAULT_STEP, OutputSmoother};
pub use sntp::{NTP_PACKET_SIZE, NTP_PORT, SntpError, build_request, parse_response};
pub use status::{StatusIndicator, StatusPattern};
pub use traits::{ConnectivityEvents, OutputError, PwmOutput, TimeSource};
pub use types::{
    CredentialsError, DisplayFrame, DisplayPhase, Hostname, SyncSample, TimeOfDay,
    WifiCredentials,
};
