//! Per-key contact debouncing.
//!
//! Each key owns one [`DebounceCell`]; no cell ever reads another, so the
//! filter is correct for any per-key evaluation order.

use crate::consts::{DEFAULT_DEBOUNCE_SAMPLES, NUM_KEYS};
use crate::core_types::{elapsed, KeyIndex, Tick, Transition};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Edges produced by one pass over the whole matrix, indexed by key.
pub type Edges = [Option<Transition>; NUM_KEYS];

/// Stability criterion a new level has to meet before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebouncePolicy {
    /// The new level must be seen on this many consecutive samples.
    Samples(u8),
    /// The new level must persist for this many ticks since it was first seen.
    Elapsed(Tick),
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self::Samples(DEFAULT_DEBOUNCE_SAMPLES)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DebounceCell {
    stable: bool,
    /// A level differing from `stable` is being observed.
    changing: bool,
    count: u8,
    since: Tick,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    policy: DebouncePolicy,
    cells: [DebounceCell; NUM_KEYS],
}

impl Debouncer {
    pub const fn new(policy: DebouncePolicy) -> Self {
        Self {
            policy,
            cells: [DebounceCell {
                stable: false,
                changing: false,
                count: 0,
                since: 0,
            }; NUM_KEYS],
        }
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    /// Feeds one raw sample of `key` and returns the accepted edge, if any.
    ///
    /// Any sample equal to the stable level cancels a change in progress.
    pub fn sample(&mut self, key: KeyIndex, raw: bool, now: Tick) -> Option<Transition> {
        let cell = &mut self.cells[key.get()];

        if raw == cell.stable {
            cell.changing = false;
            cell.count = 0;
            return None;
        }

        if !cell.changing {
            cell.changing = true;
            cell.count = 0;
            cell.since = now;
        }
        cell.count = cell.count.saturating_add(1);

        let settled = match self.policy {
            DebouncePolicy::Samples(n) => cell.count >= n.max(1),
            DebouncePolicy::Elapsed(ticks) => elapsed(now, cell.since) >= ticks,
        };

        if !settled {
            return None;
        }

        cell.stable = raw;
        cell.changing = false;
        cell.count = 0;

        let edge = Transition::from_level(raw);
        trace!("key {} debounced {} at tick {}", key, edge, now);
        Some(edge)
    }

    /// Samples every key once.
    pub fn sample_all(&mut self, levels: &[bool; NUM_KEYS], now: Tick) -> Edges {
        let mut edges = [None; NUM_KEYS];
        for key in KeyIndex::all() {
            edges[key.get()] = self.sample(key, levels[key.get()], now);
        }
        edges
    }

    /// Stable (debounced) level of `key`.
    pub fn is_pressed(&self, key: KeyIndex) -> bool {
        self.cells[key.get()].stable
    }

    /// Forgets all state; every key is considered released.
    pub fn reset(&mut self) {
        self.cells = [DebounceCell::default(); NUM_KEYS];
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DebouncePolicy::default())
    }
}
