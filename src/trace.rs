//! Recorded raw matrix activity, replayed through an [`Engine`] on the host.
//!
//! CSV format, one row per raw level change:
//!
//! ```text
//! tick,key,level
//! 0,7,1
//! 150,7,0
//! ```
//!
//! A key keeps its last level until the next row for it.

use crate::consts::NUM_KEYS;
use crate::core_types::{ConfigIndex, KeyIndex, LayerIndex, Tick};
use crate::engine::Engine;
use crate::error::KlResult;
use crate::keycodes::KeyCode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub tick: Tick,
    pub key: KeyIndex,
    /// Raw electrical level, non-zero = closed.
    pub level: u8,
}

impl TraceEvent {
    pub fn pressed(&self) -> bool {
        self.level != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTrace {
    events: Vec<TraceEvent>,
}

impl ScanTrace {
    /// Events are ordered by tick; rows sharing a tick keep file order.
    pub fn new(mut events: Vec<TraceEvent>) -> Self {
        events.sort_by_key(|e| e.tick);
        Self { events }
    }

    pub fn from_reader<R: Read>(reader: R) -> KlResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let events = rdr
            .deserialize::<TraceEvent>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(events))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KlResult<Self> {
        let file = File::open(&path)?;
        let trace = Self::from_reader(file)?;
        info!(
            "Loaded {} trace events from {}",
            trace.events.len(),
            path.as_ref().display()
        );
        Ok(trace)
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn last_tick(&self) -> Tick {
        self.events.last().map_or(0, |e| e.tick)
    }
}

/// State after a cycle whose report changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayFrame {
    pub tick: Tick,
    pub config: ConfigIndex,
    pub layers: Vec<LayerIndex>,
    pub codes: Vec<KeyCode>,
}

/// Runs `engine` for every tick in `0..=until` and returns the frames where
/// the report changed.
pub fn replay(engine: &mut Engine<'_>, trace: &ScanTrace, until: Tick) -> Vec<ReplayFrame> {
    let mut levels = [false; NUM_KEYS];
    let mut events = trace.events.iter().peekable();
    let mut frames = Vec::new();

    for tick in 0..=until {
        while let Some(event) = events.next_if(|e| e.tick <= tick) {
            levels[event.key.get()] = event.pressed();
        }

        let output = engine.scan(&levels, tick);
        if output.changed {
            let frame = ReplayFrame {
                tick,
                config: engine.config(),
                layers: engine.layers().active_layers_highest_first().collect(),
                codes: output.report.iter().collect(),
            };
            debug!("tick {}: {:?}", tick, frame.codes);
            frames.push(frame);
        }
    }
    frames
}
