// Library-Root: Tasks, HAL-Adapter und Konfiguration der Uhr
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von amclock-core
pub use amclock_core::{
    BootMode, ConnectivityEvents, DisplayFrame, PwmOutput, StatusPattern, SyncSample, TimeSource,
    WifiCredentials,
};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

// ============================================================================
// Type-Aliase für Signal-Typen
// ============================================================================
//
// Jeder geteilte Zustand hat genau einen Schreiber und einen Leser.
// Signal hält nur den letzten Wert, der Leser holt ihn mit try_take().

/// Status-Muster (WiFi-Task / Boot → Status-LED Task)
pub type StatusSignal = Signal<CriticalSectionRawMutex, StatusPattern>;

/// Ziel-Level des PWM-Ausgangs (Uhren-Task → Smoother Task)
pub type TargetSignal = Signal<CriticalSectionRawMutex, u16>;

/// NTP-Ergebnis (SNTP-Task → Uhren-Task)
pub type SyncSignal = Signal<CriticalSectionRawMutex, SyncSample>;

/// Zugangsdaten aus der Setup-Seite (HTTP-Task → Provisionierung)
pub type CredentialsSignal = Signal<CriticalSectionRawMutex, WifiCredentials>;
