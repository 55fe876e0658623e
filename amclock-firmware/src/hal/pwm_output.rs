// PWM-Ausgang über das LEDC Peripheral
//
// Treibt das Drehspulinstrument mit 10 Bit Auflösung (0..=1023).

use amclock_core::{MAX_LEVEL, OutputError, PwmOutput};
use esp_hal::ledc::channel::{self, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use static_cell::StaticCell;

use crate::config::PWM_FREQUENCY_KHZ;

/// Fehler beim Einrichten des LEDC-Ausgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmSetupError {
    TimerConfig,
    ChannelConfig,
}

impl defmt::Format for PwmSetupError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PwmSetupError::TimerConfig => defmt::write!(fmt, "LEDC timer config failed"),
            PwmSetupError::ChannelConfig => defmt::write!(fmt, "LEDC channel config failed"),
        }
    }
}

/// Real Hardware PWM Output
///
/// Channel und Timer müssen 'static sein, da der Channel den Timer referenziert.
/// Es gibt nur einen Ausgang, `new` darf daher nur einmal aufgerufen werden.
pub struct LedcOutput {
    channel: channel::Channel<'static, LowSpeed>,
}

impl LedcOutput {
    /// Richtet LEDC Timer0 (10 Bit, APB-Takt) und Channel0 auf `pin` ein
    ///
    /// Der Ausgang startet mit Tastgrad 0.
    pub fn new(
        ledc: esp_hal::peripherals::LEDC<'static>,
        pin: esp_hal::peripherals::GPIO6<'static>,
    ) -> Result<Self, PwmSetupError> {
        static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
        static TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

        let ledc = LEDC.init(Ledc::new(ledc));
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let timer = TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
        timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty10Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
            })
            .map_err(|_| PwmSetupError::TimerConfig)?;

        let mut channel = ledc.channel(channel::Number::Channel0, pin);
        channel
            .configure(channel::config::Config {
                timer: &*timer,
                duty_pct: 0,
                pin_config: channel::config::PinConfig::PushPull,
            })
            .map_err(|_| PwmSetupError::ChannelConfig)?;

        Ok(Self { channel })
    }
}

impl PwmOutput for LedcOutput {
    fn write_level(&mut self, level: u16) -> Result<(), OutputError> {
        if level > MAX_LEVEL {
            return Err(OutputError::WriteFailed);
        }

        // Bei Duty10Bit entspricht der Roh-Wert direkt dem Level
        self.channel.set_duty_hw(u32::from(level));
        Ok(())
    }
}
