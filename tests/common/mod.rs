#![allow(dead_code)]

use key_lib::config::EngineConfig;
use key_lib::consts::NUM_KEYS;
use key_lib::debounce::Edges;
use key_lib::engine::{CycleOutput, Engine};
use key_lib::keycodes::KeyCode;
use key_lib::tap_hold::InterruptPolicy;
use key_lib::{ConfigIndex, KeyIndex, LayerIndex, Tick, Transition};

pub const C0: ConfigIndex = ConfigIndex::FIRST;
pub const C1: ConfigIndex = ConfigIndex::new(1);
pub const L0: LayerIndex = LayerIndex::BASE;
pub const L1: LayerIndex = LayerIndex::new(1);
pub const L2: LayerIndex = LayerIndex::new(2);
pub const L3: LayerIndex = LayerIndex::new(3);

pub const NO_EDGES: Edges = [None; NUM_KEYS];

pub fn k(i: usize) -> KeyIndex {
    KeyIndex::new(i)
}

pub fn press(keys: &[usize]) -> Edges {
    edges(keys, Transition::Pressed)
}

pub fn release(keys: &[usize]) -> Edges {
    edges(keys, Transition::Released)
}

fn edges(keys: &[usize], transition: Transition) -> Edges {
    let mut e = NO_EDGES;
    for &key in keys {
        e[key] = Some(transition);
    }
    e
}

pub fn settings(tap_hold_ticks: Tick, policy: InterruptPolicy) -> EngineConfig {
    EngineConfig {
        tap_hold_ticks,
        interrupt_policy: policy,
        ..Default::default()
    }
}

pub fn codes(output: &CycleOutput) -> Vec<KeyCode> {
    output.report.iter().collect()
}

/// Feeds debounced edges with an explicit clock.
pub struct Driver<'k> {
    pub engine: Engine<'k>,
    pub now: Tick,
}

impl<'k> Driver<'k> {
    pub fn new(engine: Engine<'k>) -> Self {
        Self { engine, now: 0 }
    }

    /// One cycle at the current tick, then advances the clock.
    pub fn step(&mut self, edges: &Edges) -> CycleOutput {
        let out = self.engine.process_edges(edges, self.now);
        self.now += 1;
        out
    }

    /// Idle cycles until the clock reaches `tick` (exclusive).
    pub fn idle_until(&mut self, tick: Tick) -> Vec<CycleOutput> {
        let mut outputs = Vec::new();
        while self.now < tick {
            outputs.push(self.step(&NO_EDGES));
        }
        outputs
    }
}
