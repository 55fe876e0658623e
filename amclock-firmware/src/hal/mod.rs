// Hardware Abstraction Layer (HAL) Module
//
// Kapselt den PWM-Ausgang hinter dem PwmOutput Trait aus amclock-core.

pub mod pwm_output;

pub use pwm_output::{LedcOutput, PwmSetupError};
