use std::time::{Duration, Instant};

use super::ManageError;

/// How long the success flag stays up after a save.
pub const SUCCESS_FLASH: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    Saving,
    Saved { until: Instant },
    Errored(String),
}

/// Load/save lifecycle of one page plus the validation cue flag.
#[derive(Debug, Clone)]
pub struct Status {
    phase: Phase,
    show_validation: bool,
}

impl Default for Status {
    fn default() -> Self {
        Status {
            phase: Phase::Loading,
            show_validation: false,
        }
    }
}

impl Status {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The current phase with an expired success flag resolved back to `Loaded`.
    pub fn phase_at(&self, now: Instant) -> Phase {
        match self.phase {
            Phase::Saved { until } if now >= until => Phase::Loaded,
            ref p => p.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Saving)
    }

    pub fn is_success(&self) -> bool {
        self.is_success_at(Instant::now())
    }

    pub fn is_success_at(&self, now: Instant) -> bool {
        matches!(self.phase, Phase::Saved { until } if now < until)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Errored(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn show_validation(&self) -> bool {
        self.show_validation
    }

    pub fn set_show_validation(&mut self, on: bool) {
        self.show_validation = on;
    }

    pub fn loaded(&mut self) {
        self.phase = Phase::Loaded;
    }

    /// Enter `Saving`; refuses while a load or another save is in flight.
    pub fn begin_saving(&mut self) -> Result<(), ManageError> {
        if self.is_loading() {
            return Err(ManageError::Busy);
        }
        self.phase = Phase::Saving;
        Ok(())
    }

    pub fn succeed(&mut self, now: Instant) {
        self.phase = Phase::Saved {
            until: now + SUCCESS_FLASH,
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Errored(message.into());
    }

    pub fn dismiss_error(&mut self) {
        if let Phase::Errored(_) = self.phase {
            self.phase = Phase::Loaded;
        }
    }

    /// Resolve an expired success flag.
    pub fn tick(&mut self, now: Instant) {
        self.phase = self.phase_at(now);
    }
}
