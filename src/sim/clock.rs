//! Race clock
//!
//! Owns the race phase and elapsed time. The simulation only steps while the
//! clock is running; pausing withholds ticks rather than interrupting one.

use serde::{Deserialize, Serialize};

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Waiting for the first control input
    NotStarted,
    Running,
    Paused,
    /// Final lap completed
    Finished,
}

impl RacePhase {
    /// Centre-screen message for the phase, if any
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            RacePhase::NotStarted => Some("Move to begin"),
            RacePhase::Paused => Some("PAUSE"),
            RacePhase::Finished => Some("Congratulations!"),
            RacePhase::Running => None,
        }
    }
}

/// Fixed-interval race clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceClock {
    interval_ms: u32,
    elapsed_ms: u64,
    phase: RacePhase,
}

impl RaceClock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0,
            phase: RacePhase::NotStarted,
        }
    }

    /// Begin or resume. Returns true if the phase changed.
    pub fn start(&mut self) -> bool {
        match self.phase {
            RacePhase::NotStarted | RacePhase::Paused => {
                log::debug!("Clock running at {} ms", self.elapsed_ms);
                self.phase = RacePhase::Running;
                true
            }
            _ => false,
        }
    }

    /// Pause a running race. Returns true if the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == RacePhase::Running {
            log::debug!("Clock paused at {} ms", self.elapsed_ms);
            self.phase = RacePhase::Paused;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self) {
        log::debug!("Clock finished at {} ms", self.elapsed_ms);
        self.phase = RacePhase::Finished;
    }

    pub fn reset(&mut self) {
        self.phase = RacePhase::NotStarted;
        self.elapsed_ms = 0;
    }

    /// Count one interval if running. True means one simulation step is due.
    pub fn advance(&mut self) -> bool {
        if self.phase != RacePhase::Running {
            return false;
        }
        self.elapsed_ms += u64::from(self.interval_ms);
        true
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Whole seconds elapsed
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RacePhase::Paused
    }

    pub fn has_started(&self) -> bool {
        self.phase != RacePhase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == RacePhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut clock = RaceClock::new(10);
        assert!(!clock.has_started());
        assert!(!clock.advance());
        assert_eq!(clock.elapsed_ms(), 0);

        assert!(clock.start());
        assert!(!clock.start());
        for _ in 0..150 {
            assert!(clock.advance());
        }
        assert_eq!(clock.elapsed_ms(), 1500);
        assert_eq!(clock.elapsed_secs(), 1);

        assert!(clock.pause());
        assert!(clock.is_paused());
        assert!(!clock.advance());
        assert_eq!(clock.elapsed_ms(), 1500);

        assert!(clock.start());
        clock.finish();
        assert!(clock.has_finished());
        assert!(!clock.advance());
        assert!(!clock.start());
        assert!(!clock.pause());

        clock.reset();
        assert_eq!(clock.phase(), RacePhase::NotStarted);
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn test_banners() {
        assert_eq!(RacePhase::NotStarted.banner(), Some("Move to begin"));
        assert_eq!(RacePhase::Running.banner(), None);
        assert_eq!(RacePhase::Finished.banner(), Some("Congratulations!"));
    }
}
