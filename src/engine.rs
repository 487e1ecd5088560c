use crate::action::Action;
use crate::config::EngineConfig;
use crate::consts::NUM_KEYS;
use crate::core_types::{ConfigIndex, KeyIndex, Tick, Transition};
use crate::debounce::{Debouncer, Edges};
use crate::error::KlResult;
use crate::keymap::KeymapTable;
use crate::layer::LayerStack;
use crate::report::{ReportAssembler, ReportSet};
use crate::resolver::ActionResolver;
use crate::tap_hold::{Resolution, TapHoldMachine, TapHoldState};
use tracing::info;

/// Result of one scan cycle, handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutput {
    pub report: ReportSet,
    /// The report differs from the previous cycle's.
    pub changed: bool,
}

/// Key event resolution engine.
///
/// One call to [`Engine::scan`] per scan cycle:
/// raw levels -> debounce -> tap-hold -> resolve -> report.
/// Within a cycle all release edges are handled before all press edges,
/// each group in ascending key index.
/// All state is sized at compile time; nothing is allocated after `new`.
#[derive(Debug, Clone)]
pub struct Engine<'k> {
    keymap: &'k KeymapTable,
    config: ConfigIndex,
    pending_config: Option<ConfigIndex>,
    debouncer: Debouncer,
    layers: LayerStack,
    resolver: ActionResolver,
    tap_hold: TapHoldMachine,
    assembler: ReportAssembler,
}

impl<'k> Engine<'k> {
    pub fn new(keymap: &'k KeymapTable, settings: &EngineConfig) -> KlResult<Self> {
        Ok(Self {
            keymap,
            config: settings.initial_config_index()?,
            pending_config: None,
            debouncer: Debouncer::new(settings.debounce_policy()),
            layers: LayerStack::new(),
            resolver: ActionResolver::new(),
            tap_hold: TapHoldMachine::new(settings.tap_hold_ticks, settings.interrupt_policy),
            assembler: ReportAssembler::new(),
        })
    }

    /// Runs one full cycle on raw matrix levels sampled at `now`.
    pub fn scan(&mut self, levels: &[bool; NUM_KEYS], now: Tick) -> CycleOutput {
        let edges = self.debouncer.sample_all(levels, now);
        self.process_edges(&edges, now)
    }

    /// Runs one cycle on already debounced edges.
    pub fn process_edges(&mut self, edges: &Edges, now: Tick) -> CycleOutput {
        self.apply_pending_config();

        let Self {
            tap_hold,
            resolver,
            layers,
            ..
        } = self;
        tap_hold.poll(now, |key, resolution| {
            apply_resolution(resolver, layers, key, resolution)
        });

        // Releases first, so a press in the same cycle cannot turn a
        // pending tap-hold key that is already up into a hold.
        for transition in [Transition::Released, Transition::Pressed] {
            for key in KeyIndex::all() {
                if edges[key.get()] == Some(transition) {
                    self.handle_edge(key, transition, now);
                }
            }
        }

        if let Some(config) = self.resolver.take_config_request() {
            self.pending_config = Some(config);
        }

        self.assembler.begin_cycle();
        for code in self.resolver.emitting() {
            self.assembler.add(Action::Emit(code));
        }
        let previous = *self.assembler.last();
        let report = self.assembler.end_cycle();

        CycleOutput {
            report,
            changed: report != previous,
        }
    }

    fn handle_edge(&mut self, key: KeyIndex, transition: Transition, now: Tick) {
        let Self {
            keymap,
            config,
            layers,
            resolver,
            tap_hold,
            ..
        } = self;

        match transition {
            Transition::Pressed => {
                tap_hold.interrupt(key, |other, resolution| {
                    apply_resolution(resolver, layers, other, resolution)
                });

                let action = resolver.resolve(*keymap, key, transition, *config, layers);
                if let Action::TapHold(tap, hold) = action {
                    tap_hold.begin(key, tap, hold, now);
                }
            }
            Transition::Released => match tap_hold.release(key) {
                Some(resolution) => {
                    resolver.key_up(key);
                    apply_resolution(resolver, layers, key, resolution);
                }
                None => {
                    resolver.resolve(*keymap, key, transition, *config, layers);
                }
            },
        }
    }

    /// Queues a switch to `config`, applied at the start of the next cycle.
    pub fn set_config(&mut self, config: ConfigIndex) {
        self.pending_config = Some(config);
    }

    fn apply_pending_config(&mut self) {
        let Some(next) = self.pending_config.take() else {
            return;
        };
        if next == self.config {
            return;
        }
        info!("Switching config {} -> {}", self.config, next);
        self.config = next;
        self.layers.clear();
        self.resolver.reset();
        self.tap_hold.reset();
    }

    pub fn config(&self) -> ConfigIndex {
        self.config
    }

    pub fn pending_config(&self) -> Option<ConfigIndex> {
        self.pending_config
    }

    pub fn keymap(&self) -> &'k KeymapTable {
        self.keymap
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn resolver(&self) -> &ActionResolver {
        &self.resolver
    }

    pub fn tap_hold_state(&self, key: KeyIndex) -> TapHoldState {
        self.tap_hold.state(key)
    }

    /// Debounced level of `key`.
    pub fn is_pressed(&self, key: KeyIndex) -> bool {
        self.debouncer.is_pressed(key)
    }

    pub fn last_report(&self) -> &ReportSet {
        self.assembler.last()
    }
}

fn apply_resolution(
    resolver: &mut ActionResolver,
    layers: &mut LayerStack,
    key: KeyIndex,
    resolution: Resolution,
) {
    if resolution.is_press() {
        resolver.press(key, resolution.action(), layers);
    } else {
        resolver.release(key, layers);
    }
}
