//! ConsentGate - the consent state machine.
//!
//! ```text
//! Unknown ──(record granted)──────────────────────────────► Closed
//!    │
//!    └─(record absent/other)─► Shown ─(accept|reject)─► Decided ─(delay)─► Closed
//! ```
//!
//! The gate reads the record once, mounts the banner if needed, and on
//! accept or reject writes the sentinel, fades the overlay and schedules
//! removal. Settings is rendered but has no handler.

use crate::config::GateConfig;
use crate::error::{ConsentError, Result};
use crate::markup::{BannerMarkup, Control};
use crate::store::ConsentStore;
use crate::surface::{BannerSurface, Timer};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle state of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    /// Record not read yet.
    Unknown,
    /// Banner visible, awaiting input.
    Shown,
    /// Record persisted, fade-out in progress.
    Decided,
    /// Terminal. Banner removed or never created.
    Closed,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Unknown => write!(f, "unknown"),
            GateState::Shown => write!(f, "shown"),
            GateState::Decided => write!(f, "decided"),
            GateState::Closed => write!(f, "closed"),
        }
    }
}

/// Which completing control the user chose.
///
/// Both persist the same sentinel; the distinction only reaches callers and
/// logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn from_control(control: Control) -> Option<Self> {
        match control {
            Control::Accept => Some(Decision::Accepted),
            Control::Reject => Some(Decision::Rejected),
            Control::Settings => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accepted => write!(f, "accepted"),
            Decision::Rejected => write!(f, "rejected"),
        }
    }
}

/// Consent gate for one page load.
///
/// Built once by the page bootstrap. While the banner is shown the surface
/// holds the control handlers, and through them the gate; unmounting drops
/// both.
pub struct ConsentGate<S, U, T> {
    config: GateConfig,
    store: S,
    surface: Rc<U>,
    timer: T,
    state: Rc<Cell<GateState>>,
}

impl<S, U, T> ConsentGate<S, U, T>
where
    S: ConsentStore + 'static,
    U: BannerSurface + 'static,
    T: Timer + 'static,
{
    /// Validate `config` and build a gate in `Unknown`.
    pub fn new(config: GateConfig, store: S, surface: Rc<U>, timer: T) -> Result<Rc<Self>> {
        config.validate()?;
        Ok(Rc::new(Self {
            config,
            store,
            surface,
            timer,
            state: Rc::new(Cell::new(GateState::Unknown)),
        }))
    }

    pub fn state(&self) -> GateState {
        self.state.get()
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Whether the stored record equals the granted sentinel.
    pub fn is_granted(&self) -> Result<bool> {
        let value = self.store.get(&self.config.storage_key)?;
        Ok(value.as_deref() == Some(self.config.granted_value.as_str()))
    }

    /// Read the record and show the banner if consent is not yet granted.
    ///
    /// Returns the state reached: `Closed` when already granted, `Shown`
    /// otherwise. Store errors propagate and leave the gate in `Unknown`
    /// with nothing mounted.
    pub fn initialize(self: &Rc<Self>) -> Result<GateState> {
        if self.state() != GateState::Unknown {
            return Err(ConsentError::AlreadyInitialized);
        }

        if self.is_granted()? {
            tracing::debug!(key = %self.config.storage_key, "consent already granted");
            self.transition(GateState::Closed);
            return Ok(GateState::Closed);
        }

        let markup = BannerMarkup::render(&self.config);
        self.surface.mount(&markup)?;

        if let Err(e) = self.wire_controls() {
            self.surface.unmount();
            return Err(e);
        }

        self.transition(GateState::Shown);
        Ok(GateState::Shown)
    }

    fn wire_controls(self: &Rc<Self>) -> Result<()> {
        // Settings stays unwired.
        for control in Control::ALL.into_iter().filter(|c| c.completes_consent()) {
            let gate = Rc::clone(self);
            self.surface.on_control(
                control,
                Box::new(move |activated| {
                    let Some(decision) = Decision::from_control(activated) else {
                        return;
                    };
                    if let Err(e) = gate.handle_consent(decision) {
                        tracing::error!(error = %e, %decision, "failed to record consent");
                    }
                }),
            )?;
        }
        Ok(())
    }

    /// Completion action for accept and reject.
    ///
    /// Writes the sentinel, starts the fade-out and schedules removal after
    /// the configured delay. Returns `None` when the gate is not `Shown`
    /// (e.g. a second click during fade-out). A failed write leaves the
    /// banner up and schedules nothing.
    pub fn handle_consent(&self, decision: Decision) -> Result<Option<Decision>> {
        let state = self.state();
        if state != GateState::Shown {
            tracing::debug!(%state, %decision, "ignoring consent action");
            return Ok(None);
        }

        if decision == Decision::Rejected {
            // No distinct rejected record exists; reject completes the flow
            // exactly like accept.
            tracing::warn!(
                key = %self.config.storage_key,
                "reject recorded with the granted sentinel"
            );
        }

        self.store
            .set(&self.config.storage_key, &self.config.granted_value)?;
        tracing::info!(%decision, key = %self.config.storage_key, "consent recorded");
        self.transition(GateState::Decided);

        let timing = self.config.timing;
        self.surface.begin_fade_out(timing.fade_out_ms);

        let surface = Rc::clone(&self.surface);
        let state = Rc::clone(&self.state);
        self.timer.schedule(
            timing.removal_delay_ms,
            Box::new(move || {
                surface.unmount();
                state.set(GateState::Closed);
                tracing::debug!("consent banner removed");
            }),
        );

        Ok(Some(decision))
    }

    fn transition(&self, to: GateState) {
        let from = self.state.replace(to);
        tracing::debug!(%from, %to, "consent gate transition");
    }
}
