pub mod action;
pub mod config;
pub mod consts;
pub mod core_types;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod keycodes;
pub mod keymap;
pub mod layer;
pub mod layouts;
pub mod report;
pub mod resolver;
pub mod tap_hold;
pub mod trace;

pub use action::{Action, BasicAction};
pub use core_types::{ConfigIndex, KeyIndex, LayerIndex, Tick, Transition};
pub use engine::{CycleOutput, Engine};
pub use keycodes::KeyCode;
pub use keymap::KeymapTable;
