use crate::consts::{DEFAULT_DEBOUNCE_SAMPLES, DEFAULT_TAP_HOLD_TICKS};
use crate::core_types::{ConfigIndex, Tick};
use crate::debounce::DebouncePolicy;
use crate::error::{KeyLibError, KlResult};
use crate::tap_hold::InterruptPolicy;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Timing and policy knobs of the engine. Fixed for the lifetime of an
/// engine instance.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consecutive samples a new level must be seen on
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_SAMPLES)]
    pub debounce_samples: u8,

    /// Use a minimum elapsed time (ticks) instead of a sample count
    #[arg(long)]
    pub debounce_ticks: Option<Tick>,

    /// Ticks before a pending tap-hold key resolves as hold
    #[arg(long, default_value_t = DEFAULT_TAP_HOLD_TICKS)]
    pub tap_hold_ticks: Tick,

    #[arg(long, value_enum, default_value_t = InterruptPolicy::HoldOnOtherKeyPress)]
    pub interrupt_policy: InterruptPolicy,

    /// Keymap table selected at startup
    #[arg(long, default_value_t = 0)]
    pub initial_config: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_samples: DEFAULT_DEBOUNCE_SAMPLES,
            debounce_ticks: None,
            tap_hold_ticks: DEFAULT_TAP_HOLD_TICKS,
            interrupt_policy: InterruptPolicy::default(),
            initial_config: 0,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KlResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.initial_config_index()?;
        Ok(config)
    }

    pub fn debounce_policy(&self) -> DebouncePolicy {
        match self.debounce_ticks {
            Some(ticks) => DebouncePolicy::Elapsed(ticks),
            None => DebouncePolicy::Samples(self.debounce_samples),
        }
    }

    pub fn initial_config_index(&self) -> KlResult<ConfigIndex> {
        ConfigIndex::try_from(self.initial_config).map_err(|e| {
            KeyLibError::Config(format!("initial_config {}: {}", self.initial_config, e))
        })
    }

    /// Overwrites fields the user set explicitly on the command line, leaving
    /// file-provided values for everything that only has a clap default.
    pub fn merge_from_cli(&mut self, cli: &EngineConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(debounce_samples, "debounce_samples");
        update_if_present!(debounce_ticks, "debounce_ticks");
        update_if_present!(tap_hold_ticks, "tap_hold_ticks");
        update_if_present!(interrupt_policy, "interrupt_policy");
        update_if_present!(initial_config, "initial_config");
    }
}
