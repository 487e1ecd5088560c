use crate::action::{Action, BasicAction};
use crate::consts::{NUM_KEYS, NUM_LAYERS};
use crate::core_types::{ConfigIndex, KeyIndex, LayerIndex, Transition};
use crate::keycodes::KeyCode;
use crate::keymap::KeymapTable;
use crate::layer::LayerStack;
use tracing::debug;

/// Turns key edges into actions and applies their layer side effects.
///
/// The action a key resolved to on press is latched for that key, so the
/// release undoes exactly that action even if the layer stack has changed
/// in between. A layer is active while its hold count is non-zero or its
/// toggle latch is set.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    /// Debounced key state as seen through `resolve`/`key_up`.
    down: [bool; NUM_KEYS],
    latched: [Option<BasicAction>; NUM_KEYS],
    holds: [u8; NUM_LAYERS],
    toggled: [bool; NUM_LAYERS],
    config_request: Option<ConfigIndex>,
}

impl ActionResolver {
    pub const fn new() -> Self {
        Self {
            down: [false; NUM_KEYS],
            latched: [None; NUM_KEYS],
            holds: [0; NUM_LAYERS],
            toggled: [false; NUM_LAYERS],
            config_request: None,
        }
    }

    /// First non-transparent entry for `key`, scanning from the most recently
    /// activated layer down to the base layer. `NoOp` if every layer is
    /// transparent.
    pub fn lookup(
        keymap: &KeymapTable,
        key: KeyIndex,
        config: ConfigIndex,
        layers: &LayerStack,
    ) -> Action {
        layers
            .active_layers_highest_first()
            .map(|layer| keymap.lookup(config, layer, key))
            .find(|action| !action.is_transparent())
            .unwrap_or(Action::NoOp)
    }

    /// Resolves one edge.
    ///
    /// On press the looked-up action is returned; immediate actions are
    /// latched and applied, a `TapHold` is returned untouched for the caller
    /// to defer. On release the latched action is undone and returned.
    pub fn resolve(
        &mut self,
        keymap: &KeymapTable,
        key: KeyIndex,
        transition: Transition,
        config: ConfigIndex,
        layers: &mut LayerStack,
    ) -> Action {
        self.down[key.get()] = transition.is_press();
        match transition {
            Transition::Pressed => {
                let action = Self::lookup(keymap, key, config, layers);
                if let Some(basic) = action.basic() {
                    self.press(key, basic, layers);
                }
                action
            }
            Transition::Released => self
                .release(key, layers)
                .map(Action::from)
                .unwrap_or(Action::NoOp),
        }
    }

    /// Latches `action` for `key` and applies its press side effects.
    /// A `Combined` action is latched as the `Emit` it resolves to.
    pub fn press(&mut self, key: KeyIndex, action: BasicAction, layers: &mut LayerStack) {
        if let Some(previous) = self.latched[key.get()] {
            debug!("key {} pressed while {} still latched", key, previous);
            self.release(key, layers);
        }

        let action = match action {
            BasicAction::Combined {
                other,
                normal,
                combined,
            } => {
                let code = if self.down[other.get()] { combined } else { normal };
                debug!("key {} combined with key {}: {}", key, other, code);
                BasicAction::Emit(code)
            }
            other => other,
        };

        match action {
            BasicAction::LayerHold(layer) => {
                self.holds[layer.get()] += 1;
                self.sync_layer(layer, layers);
            }
            BasicAction::LayerToggle(layer) => {
                self.toggled[layer.get()] = !self.toggled[layer.get()];
                self.sync_layer(layer, layers);
            }
            BasicAction::ConfigSwitch(config) => {
                self.config_request = Some(config);
            }
            BasicAction::Emit(_)
            | BasicAction::Chord(_)
            | BasicAction::Combined { .. }
            | BasicAction::NoOp => {}
        }

        self.latched[key.get()] = Some(action);
    }

    /// Undoes the action latched for `key`, if any, and returns it.
    pub fn release(&mut self, key: KeyIndex, layers: &mut LayerStack) -> Option<BasicAction> {
        let action = self.latched[key.get()].take()?;
        if let BasicAction::LayerHold(layer) = action {
            let count = &mut self.holds[layer.get()];
            debug_assert!(*count > 0, "hold count underflow on layer {}", layer);
            *count = count.saturating_sub(1);
            self.sync_layer(layer, layers);
        }
        Some(action)
    }

    fn sync_layer(&self, layer: LayerIndex, layers: &mut LayerStack) {
        if self.holds[layer.get()] > 0 || self.toggled[layer.get()] {
            layers.activate(layer);
        } else {
            layers.deactivate(layer);
        }
    }

    pub fn latched(&self, key: KeyIndex) -> Option<BasicAction> {
        self.latched[key.get()]
    }

    /// Marks `key` as up without resolving anything, for releases the
    /// tap-hold machine consumed.
    pub fn key_up(&mut self, key: KeyIndex) {
        self.down[key.get()] = false;
    }

    pub fn is_down(&self, key: KeyIndex) -> bool {
        self.down[key.get()]
    }

    /// Codes of every latched `Emit` or `Chord`, in key-index order.
    pub fn emitting(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.latched
            .iter()
            .flatten()
            .flat_map(BasicAction::codes)
            .copied()
    }

    pub fn hold_count(&self, layer: LayerIndex) -> u8 {
        self.holds[layer.get()]
    }

    pub fn is_toggled(&self, layer: LayerIndex) -> bool {
        self.toggled[layer.get()]
    }

    /// Config requested by a `ConfigSwitch` since the last call.
    pub fn take_config_request(&mut self) -> Option<ConfigIndex> {
        self.config_request.take()
    }

    /// Drops every latch, hold and toggle. Key up/down state is kept. The
    /// caller clears the layer stack.
    pub fn reset(&mut self) {
        *self = Self {
            down: self.down,
            ..Self::new()
        };
    }
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new()
    }
}
