//! Tap vs hold disambiguation for `TapHold` keys.
//!
//! ```text
//! Idle -> PendingDecision -> ResolvedTap  -> Idle   (released before threshold)
//!                         -> ResolvedHold -> Idle   (threshold reached, or interrupted)
//! ```
//!
//! The machine only decides; it reports each decision as a [`Resolution`]
//! and the caller applies the chosen action.

use crate::action::BasicAction;
use crate::consts::{DEFAULT_TAP_HOLD_TICKS, NUM_KEYS};
use crate::core_types::{elapsed, KeyIndex, Tick};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::debug;

/// What happens to a pending tap-hold key when another key goes down.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterruptPolicy {
    /// Resolve every pending key as hold before the other key is resolved,
    /// so a held layer already applies to it.
    #[default]
    HoldOnOtherKeyPress,
    /// Other keys are ignored; only release or timeout decide.
    TimeoutOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TapHoldState {
    #[default]
    Idle,
    PendingDecision {
        since: Tick,
        tap: BasicAction,
        hold: BasicAction,
    },
    /// Tap emitted this cycle; released on the next poll.
    ResolvedTap { tap: BasicAction },
    ResolvedHold { hold: BasicAction },
}

/// A decision the caller must apply for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    TapPressed(BasicAction),
    TapReleased(BasicAction),
    HoldPressed(BasicAction),
    HoldReleased(BasicAction),
}

impl Resolution {
    pub const fn is_press(&self) -> bool {
        matches!(self, Self::TapPressed(_) | Self::HoldPressed(_))
    }

    pub const fn action(&self) -> BasicAction {
        match self {
            Self::TapPressed(a) | Self::TapReleased(a) => *a,
            Self::HoldPressed(a) | Self::HoldReleased(a) => *a,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TapHoldMachine {
    threshold: Tick,
    policy: InterruptPolicy,
    states: [TapHoldState; NUM_KEYS],
}

impl TapHoldMachine {
    pub const fn new(threshold: Tick, policy: InterruptPolicy) -> Self {
        Self {
            threshold,
            policy,
            states: [TapHoldState::Idle; NUM_KEYS],
        }
    }

    pub fn threshold(&self) -> Tick {
        self.threshold
    }

    pub fn policy(&self) -> InterruptPolicy {
        self.policy
    }

    pub fn state(&self, key: KeyIndex) -> TapHoldState {
        self.states[key.get()]
    }

    /// True while `key` is tracked by the machine (any state but `Idle`).
    pub fn is_tracking(&self, key: KeyIndex) -> bool {
        self.states[key.get()] != TapHoldState::Idle
    }

    pub fn has_pending(&self) -> bool {
        self.states
            .iter()
            .any(|s| matches!(s, TapHoldState::PendingDecision { .. }))
    }

    /// Starts a decision for `key` pressed at `now`.
    ///
    /// The key is always `Idle` here: its last tap was flushed by `poll`
    /// before any edge of this cycle, and a hold ends with the release edge
    /// that precedes this press.
    pub fn begin(&mut self, key: KeyIndex, tap: BasicAction, hold: BasicAction, now: Tick) {
        self.states[key.get()] = TapHoldState::PendingDecision {
            since: now,
            tap,
            hold,
        };
        debug!("key {} tap-hold pending at tick {}", key, now);
    }

    /// Handles the release edge of `key`.
    pub fn release(&mut self, key: KeyIndex) -> Option<Resolution> {
        let state = &mut self.states[key.get()];
        match *state {
            TapHoldState::PendingDecision { tap, .. } => {
                *state = TapHoldState::ResolvedTap { tap };
                debug!("key {} resolved as tap {}", key, tap);
                Some(Resolution::TapPressed(tap))
            }
            TapHoldState::ResolvedHold { hold } => {
                *state = TapHoldState::Idle;
                Some(Resolution::HoldReleased(hold))
            }
            TapHoldState::Idle | TapHoldState::ResolvedTap { .. } => None,
        }
    }

    /// Advances time: finishes last cycle's taps and resolves pending keys
    /// held for at least the threshold as hold. Keys are visited in index
    /// order.
    pub fn poll(&mut self, now: Tick, mut on: impl FnMut(KeyIndex, Resolution)) {
        for key in KeyIndex::all() {
            let state = &mut self.states[key.get()];
            match *state {
                TapHoldState::ResolvedTap { tap } => {
                    *state = TapHoldState::Idle;
                    on(key, Resolution::TapReleased(tap));
                }
                TapHoldState::PendingDecision { since, hold, .. }
                    if elapsed(now, since) >= self.threshold =>
                {
                    *state = TapHoldState::ResolvedHold { hold };
                    debug!("key {} resolved as hold {} on timeout", key, hold);
                    on(key, Resolution::HoldPressed(hold));
                }
                _ => {}
            }
        }
    }

    /// Applies the interrupt policy for a press of `by`.
    pub fn interrupt(&mut self, by: KeyIndex, mut on: impl FnMut(KeyIndex, Resolution)) {
        if self.policy != InterruptPolicy::HoldOnOtherKeyPress {
            return;
        }
        for key in KeyIndex::all().filter(|&k| k != by) {
            let state = &mut self.states[key.get()];
            if let TapHoldState::PendingDecision { hold, .. } = *state {
                *state = TapHoldState::ResolvedHold { hold };
                debug!("key {} resolved as hold {} by key {}", key, hold, by);
                on(key, Resolution::HoldPressed(hold));
            }
        }
    }

    pub fn reset(&mut self) {
        self.states = [TapHoldState::Idle; NUM_KEYS];
    }
}

impl Default for TapHoldMachine {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_HOLD_TICKS, InterruptPolicy::default())
    }
}
