//! Day/night cross-fade driven by its own fixed-step schedule.
//!
//! ## Tickets
//!
//! Every `toggle` issues a new ticket. Scheduled steps carry the ticket they
//! were issued under, and the scheduler drops any step whose ticket is no
//! longer current. A second toggle in the middle of a run therefore cancels
//! the first one: the stale chain stops at its next step, and the new run
//! starts from whatever blend was live at the moment of the toggle.

use bevy_log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::preset::{blend, EnvironmentPreset, TimeOfDay};
use super::starfield::{Starfield, StarfieldSettings};

/// Identifies one transition run. Strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TransitionTicket(pub u64);

/// Step count and duration of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    pub steps: u32,
    pub duration_ms: u64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            steps: 60,
            duration_ms: 1000,
        }
    }
}

impl TransitionSettings {
    /// Delay between two consecutive steps.
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.steps.max(1)
    }
}

/// A step waiting to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub ticket: TransitionTicket,
    pub step: u32,
    pub due: Duration,
}

/// Delayed step queue with ticket-based cancellation.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    pending: Vec<ScheduledStep>,
    current: TransitionTicket,
}

impl TransitionScheduler {
    /// Issue a new ticket, invalidating every step scheduled under older ones.
    pub fn issue_ticket(&mut self) -> TransitionTicket {
        self.current = TransitionTicket(self.current.0 + 1);
        self.current
    }

    pub fn schedule(&mut self, step: ScheduledStep) {
        self.pending.push(step);
    }

    /// Take the earliest step due at `now` that still holds the current ticket.
    /// Stale steps met on the way are discarded.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledStep> {
        loop {
            let index = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due <= now)
                .min_by_key(|(_, s)| s.due)
                .map(|(i, _)| i)?;
            let step = self.pending.swap_remove(index);
            if step.ticket == self.current {
                return Some(step);
            }
            log::debug!(
                "Dropping stale transition step {} of run {:?}",
                step.step,
                step.ticket
            );
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Something the renderer has to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// The live preset moved; read it from [`EnvironmentTransition::live`].
    Progress {
        ticket: TransitionTicket,
        step: u32,
        progress: f32,
    },
    /// Swap the toggle button glyph and caption.
    GlyphChanged {
        glyph: &'static str,
        label: &'static str,
    },
    /// Night fell: a starfield was built and should be shown.
    StarfieldMaterialized { stars: usize },
    /// Day broke: the starfield was dropped.
    StarfieldDisposed,
    Completed {
        ticket: TransitionTicket,
        mode: TimeOfDay,
    },
}

/// Two-state day/night toggle with a bounded cross-fade.
#[derive(Debug)]
pub struct EnvironmentTransition {
    settings: TransitionSettings,
    starfield_settings: StarfieldSettings,
    seed: u64,
    mode: TimeOfDay,
    live: EnvironmentPreset,
    origin: EnvironmentPreset,
    scheduler: TransitionScheduler,
    running: Option<TransitionTicket>,
    starfield: Option<Starfield>,
}

impl EnvironmentTransition {
    pub fn new(settings: TransitionSettings, starfield_settings: StarfieldSettings, seed: u64) -> Self {
        let day = EnvironmentPreset::day();
        Self {
            settings,
            starfield_settings,
            seed,
            mode: TimeOfDay::Day,
            live: day,
            origin: day,
            scheduler: TransitionScheduler::default(),
            running: None,
            starfield: None,
        }
    }

    /// Last requested mode. While a run is in progress this is its target.
    pub fn mode(&self) -> TimeOfDay {
        self.mode
    }

    /// The blended preset to apply to the scene right now.
    pub fn live(&self) -> &EnvironmentPreset {
        &self.live
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.starfield.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Flip the target mode and start a new run at `now`, cancelling any run
    /// still in progress.
    pub fn toggle(&mut self, now: Duration) -> TransitionTicket {
        if let Some(previous) = self.running {
            debug!("Cancelling environment transition {:?}", previous);
        }

        self.mode = self.mode.toggled();
        self.origin = self.live;
        let ticket = self.scheduler.issue_ticket();
        self.running = Some(ticket);
        self.scheduler.schedule(ScheduledStep {
            ticket,
            step: 1,
            due: now + self.settings.step_interval(),
        });

        debug!("Environment transition {:?} toward {:?}", ticket, self.mode);
        ticket
    }

    /// Run every step due at `now`, in order, and report what changed.
    pub fn poll(&mut self, now: Duration) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        while let Some(scheduled) = self.scheduler.pop_due(now) {
            self.run_step(scheduled, &mut events);
        }
        events
    }

    fn run_step(&mut self, scheduled: ScheduledStep, events: &mut Vec<TransitionEvent>) {
        let steps = self.settings.steps.max(1);
        let progress = scheduled.step as f32 / steps as f32;
        self.live = blend(&self.origin, &self.mode.preset(), progress, self.mode);
        events.push(TransitionEvent::Progress {
            ticket: scheduled.ticket,
            step: scheduled.step,
            progress,
        });

        if scheduled.step < steps {
            self.scheduler.schedule(ScheduledStep {
                ticket: scheduled.ticket,
                step: scheduled.step + 1,
                due: scheduled.due + self.settings.step_interval(),
            });
            return;
        }

        self.finish(scheduled.ticket, events);
    }

    /// One-time effects of the terminal step.
    fn finish(&mut self, ticket: TransitionTicket, events: &mut Vec<TransitionEvent>) {
        self.running = None;
        events.push(TransitionEvent::GlyphChanged {
            glyph: self.mode.toggle_glyph(),
            label: self.mode.toggle_label(),
        });

        match self.mode {
            TimeOfDay::Night => {
                if self.starfield.is_none() {
                    let field =
                        Starfield::generate(&self.starfield_settings, self.seed.wrapping_add(ticket.0));
                    events.push(TransitionEvent::StarfieldMaterialized { stars: field.len() });
                    self.starfield = Some(field);
                }
            }
            TimeOfDay::Day => {
                if self.starfield.take().is_some() {
                    events.push(TransitionEvent::StarfieldDisposed);
                }
            }
        }

        events.push(TransitionEvent::Completed {
            ticket,
            mode: self.mode,
        });
        debug!("Environment transition {:?} finished in {:?}", ticket, self.mode);
    }
}
