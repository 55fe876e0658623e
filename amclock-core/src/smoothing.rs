//! Sanfte Rampe für den PWM-Ausgang
//!
//! Das Zeigerinstrument soll bei Zielwechseln (z.B. Kalibrierung → Uhrzeit)
//! nicht springen. Pro Tick bewegt sich der aktuelle Wert um einen festen
//! Schritt auf das Ziel zu, ohne es zu überschreiten.

use crate::logic::MAX_LEVEL;

/// Standard-Schrittweite pro Tick
pub const DEFAULT_STEP: u16 = 32;

#[derive(Debug, Clone)]
pub struct OutputSmoother {
    current: u16,
    target: u16,
    step: u16,
}

impl OutputSmoother {
    /// Erstellt einen Smoother mit Start- und Zielwert 0
    ///
    /// Eine Schrittweite von 0 wird auf 1 angehoben.
    pub const fn new(step: u16) -> Self {
        Self {
            current: 0,
            target: 0,
            step: if step == 0 { 1 } else { step },
        }
    }

    /// Setzt den Zielwert (begrenzt auf `MAX_LEVEL`)
    pub fn set_target(&mut self, level: u16) {
        self.target = level.min(MAX_LEVEL);
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Ein Rampen-Schritt
    ///
    /// Rückgabe: neuer Wert, der auf die Hardware geschrieben werden muss,
    /// oder `None` wenn das Ziel bereits erreicht ist.
    pub fn tick(&mut self) -> Option<u16> {
        if self.current < self.target {
            self.current = self.current.saturating_add(self.step).min(self.target);
        } else if self.current > self.target {
            self.current = self.current.saturating_sub(self.step).max(self.target);
        } else {
            return None;
        }
        Some(self.current)
    }
}

impl Default for OutputSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_up_clamps_last_step() {
        let mut smoother = OutputSmoother::new(32);
        smoother.set_target(100);
        assert_eq!(smoother.tick(), Some(32));
        assert_eq!(smoother.tick(), Some(64));
        assert_eq!(smoother.tick(), Some(96));
        assert_eq!(smoother.tick(), Some(100));
        assert_eq!(smoother.tick(), None);
    }

    #[test]
    fn test_ramp_down() {
        let mut smoother = OutputSmoother::new(32);
        smoother.set_target(70);
        while smoother.tick().is_some() {}
        smoother.set_target(0);
        assert_eq!(smoother.tick(), Some(38));
        assert_eq!(smoother.tick(), Some(6));
        assert_eq!(smoother.tick(), Some(0));
        assert!(smoother.is_settled());
    }

    #[test]
    fn test_no_write_when_settled() {
        let mut smoother = OutputSmoother::default();
        assert_eq!(smoother.tick(), None);
    }

    #[test]
    fn test_target_is_clamped() {
        let mut smoother = OutputSmoother::default();
        smoother.set_target(5000);
        assert_eq!(smoother.target(), MAX_LEVEL);
    }

    #[test]
    fn test_zero_step_still_converges() {
        let mut smoother = OutputSmoother::new(0);
        smoother.set_target(3);
        assert_eq!(smoother.tick(), Some(1));
        assert_eq!(smoother.tick(), Some(2));
        assert_eq!(smoother.tick(), Some(3));
    }
}
