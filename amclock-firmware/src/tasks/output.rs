// Output Task - Führt den PWM-Ausgang in festen Schritten zum Ziel-Level
use amclock_core::{OutputSmoother, PwmOutput};
use defmt::error;
use embassy_time::{Duration, Ticker};

use crate::TargetSignal;
use crate::config::{SMOOTH_STEP, SMOOTH_TICK_MS};
use crate::hal::LedcOutput;

/// Smoother-Logik - ohne Hardware-Abhängigkeit
///
/// Der generische Parameter `P: PwmOutput` erlaubt echte Hardware
/// (LedcOutput) oder einen Mock.
///
/// Alle 32 ms wird der aktuelle Level um höchstens `SMOOTH_STEP` Richtung
/// Ziel bewegt. Ist das Ziel erreicht, wird nichts geschrieben.
pub async fn output_logic<P: PwmOutput>(mut output: P, targets: &'static TargetSignal) -> ! {
    let mut smoother = OutputSmoother::new(SMOOTH_STEP);
    let mut ticker = Ticker::every(Duration::from_millis(SMOOTH_TICK_MS));

    loop {
        if let Some(target) = targets.try_take() {
            smoother.set_target(target);
        }

        if let Some(level) = smoother.tick() {
            if let Err(e) = output.write_level(level) {
                error!("Output: Failed to write level {}: {}", level, e);
            }
        }

        ticker.next().await;
    }
}

/// Output Task - Embassy Task für den LEDC-Ausgang
#[embassy_executor::task]
pub async fn output_task(output: LedcOutput, targets: &'static TargetSignal) {
    output_logic(output, targets).await
}
