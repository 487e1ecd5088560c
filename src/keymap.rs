use crate::action::{Action, BasicAction};
use crate::consts::{NUM_CONFIGS, NUM_KEYS, NUM_LAYERS};
use crate::core_types::{ConfigIndex, KeyIndex, LayerIndex};
use crate::error::{KeyLibError, KlResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub type LayerMap = [Action; NUM_KEYS];
pub type ConfigMap = [LayerMap; NUM_LAYERS];

/// Static `[config][layer][key] -> Action` table.
///
/// Built once before the scan loop starts and only read afterwards; the
/// engine borrows it immutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapTable {
    configs: [ConfigMap; NUM_CONFIGS],
}

impl KeymapTable {
    /// A table where every entry is `NoOp`.
    pub const fn new() -> Self {
        Self {
            configs: [[[Action::NoOp; NUM_KEYS]; NUM_LAYERS]; NUM_CONFIGS],
        }
    }

    pub const fn from_configs(configs: [ConfigMap; NUM_CONFIGS]) -> Self {
        Self { configs }
    }

    #[inline(always)]
    pub fn lookup(&self, config: ConfigIndex, layer: LayerIndex, key: KeyIndex) -> Action {
        self.configs[config.get()][layer.get()][key.get()]
    }

    pub fn set(&mut self, config: ConfigIndex, layer: LayerIndex, key: KeyIndex, action: Action) {
        self.configs[config.get()][layer.get()][key.get()] = action;
    }

    pub fn layer(&self, config: ConfigIndex, layer: LayerIndex) -> &LayerMap {
        &self.configs[config.get()][layer.get()]
    }

    pub fn layer_mut(&mut self, config: ConfigIndex, layer: LayerIndex) -> &mut LayerMap {
        &mut self.configs[config.get()][layer.get()]
    }

    pub fn is_layer_empty(&self, config: ConfigIndex, layer: LayerIndex) -> bool {
        self.layer(config, layer).iter().all(Action::is_transparent)
    }

    /// Checks the table for authoring mistakes that would leave keys dead or
    /// layers unreachable.
    pub fn validate(&self) -> KlResult<()> {
        let mut problems = Vec::new();

        for config in ConfigIndex::all() {
            let has_upper = LayerIndex::all()
                .skip(1)
                .any(|layer| !self.is_layer_empty(config, layer));
            if has_upper && self.is_layer_empty(config, LayerIndex::BASE) {
                problems.push(format!(
                    "config {}: upper layers are populated but the base layer is empty",
                    config
                ));
            }

            for layer in LayerIndex::all() {
                for key in KeyIndex::all() {
                    let action = self.lookup(config, layer, key);
                    let at = format!("config {} layer {} key {}", config, layer, key);

                    let parts: [Option<BasicAction>; 2] = match action {
                        Action::TapHold(tap, hold) => {
                            if tap.is_transparent() && hold.is_transparent() {
                                problems.push(format!("{}: tap-hold with no tap and no hold", at));
                            }
                            [Some(tap), Some(hold)]
                        }
                        other => [other.basic(), None],
                    };

                    for part in parts.iter().flatten() {
                        if let BasicAction::Combined { other, .. } = part {
                            if *other == key {
                                problems.push(format!("{}: combined key watches itself", at));
                            }
                        }
                    }

                    for target in parts.iter().flatten().filter_map(BasicAction::layer) {
                        if target.is_base() {
                            problems.push(format!("{}: layer action targets the base layer", at));
                        } else if self.is_layer_empty(config, target) {
                            warn!("{}: layer action targets empty layer {}", at, target);
                        }
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(KeyLibError::Validation(problems.join("; ")))
        }
    }

    pub fn from_file_model(file: &KeymapFile) -> KlResult<Self> {
        if file.configs.len() > NUM_CONFIGS {
            return Err(KeyLibError::Validation(format!(
                "{} configs given, at most {} supported",
                file.configs.len(),
                NUM_CONFIGS
            )));
        }

        let mut table = Self::new();
        for (c, entry) in file.configs.iter().enumerate() {
            let config = ConfigIndex::try_from(c)?;
            let mut seen = [false; NUM_LAYERS];

            for layer_entry in &entry.layers {
                let layer = layer_entry.layer;
                if seen[layer.get()] {
                    return Err(KeyLibError::Validation(format!(
                        "config {} ('{}'): layer {} defined twice",
                        config, entry.name, layer
                    )));
                }
                seen[layer.get()] = true;

                if layer_entry.keys.len() > NUM_KEYS {
                    return Err(KeyLibError::Validation(format!(
                        "config {} layer {}: {} keys given, board has {}",
                        config,
                        layer,
                        layer_entry.keys.len(),
                        NUM_KEYS
                    )));
                }

                let map = table.layer_mut(config, layer);
                map[..layer_entry.keys.len()].copy_from_slice(&layer_entry.keys);
            }
        }
        Ok(table)
    }

    /// File form of this table. Empty upper layers are omitted.
    pub fn to_file_model(&self, name: &str) -> KeymapFile {
        let configs = ConfigIndex::all()
            .map(|config| ConfigEntry {
                name: format!("config_{}", config),
                layers: LayerIndex::all()
                    .filter(|&layer| layer.is_base() || !self.is_layer_empty(config, layer))
                    .map(|layer| LayerEntry {
                        layer,
                        keys: self.layer(config, layer).to_vec(),
                    })
                    .collect(),
            })
            .collect();

        KeymapFile {
            name: name.to_string(),
            configs,
        }
    }

    pub fn from_json_str(content: &str) -> KlResult<Self> {
        let file: KeymapFile = serde_json::from_str(content)?;
        Self::from_file_model(&file)
    }

    pub fn to_json_string(&self, name: &str) -> KlResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_file_model(name))?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KlResult<Self> {
        let content = fs::read_to_string(&path)?;
        let table = Self::from_json_str(&content)?;
        info!("Loaded keymap from {}", path.as_ref().display());
        Ok(table)
    }
}

impl Default for KeymapTable {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON document describing a full keymap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeymapFile {
    #[serde(default)]
    pub name: String,
    pub configs: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub name: String,
    pub layers: Vec<LayerEntry>,
}

/// Keys beyond the end of `keys` are `NoOp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEntry {
    pub layer: LayerIndex,
    pub keys: Vec<Action>,
}
