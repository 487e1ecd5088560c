use crate::consts::{IS_SPLIT, NUM_CONFIGS, NUM_KEYS, NUM_LAYERS};
use crate::error::KeyLibError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic scan-cycle clock.
/// Wraps around after u32::MAX ticks; use [`elapsed`] to compare instants.
pub type Tick = u32;

/// Ticks between `since` and `now`, correct across a clock wrap.
#[inline(always)]
pub const fn elapsed(now: Tick, since: Tick) -> Tick {
    now.wrapping_sub(since)
}

/// A debounced edge of a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Pressed,
    Released,
}

impl Transition {
    pub const fn from_level(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    pub const fn is_press(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
        }
    }
}

macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident, $limit:expr, $kind:literal, $panic_msg:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            /// Exclusive upper bound of valid indices.
            pub const LIMIT: usize = $limit;

            /// # Panics
            /// Panics when `index` is out of range. An out-of-range index is a
            /// table/config mismatch, never a runtime condition.
            pub const fn new(index: usize) -> Self {
                assert!(index < $limit, $panic_msg);
                Self(index as u8)
            }

            #[inline(always)]
            pub const fn get(self) -> usize {
                self.0 as usize
            }

            pub fn all() -> impl Iterator<Item = Self> {
                (0..$limit).map(|i| Self(i as u8))
            }
        }

        impl TryFrom<usize> for $name {
            type Error = KeyLibError;

            fn try_from(index: usize) -> Result<Self, Self::Error> {
                if index < $limit {
                    Ok(Self(index as u8))
                } else {
                    Err(KeyLibError::IndexOutOfRange {
                        kind: $kind,
                        index,
                        limit: $limit,
                    })
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = KeyLibError;

            fn try_from(index: u8) -> Result<Self, Self::Error> {
                Self::try_from(index as usize)
            }
        }

        impl From<$name> for u8 {
            fn from(index: $name) -> u8 {
                index.0
            }
        }

        impl From<$name> for usize {
            fn from(index: $name) -> usize {
                index.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_type!(
    /// Physical switch position in `0..NUM_KEYS`.
    KeyIndex,
    NUM_KEYS,
    "key",
    "key index out of range"
);

index_type!(
    /// Layer in `0..NUM_LAYERS`. Layer 0 is the always-active base layer.
    LayerIndex,
    NUM_LAYERS,
    "layer",
    "layer index out of range"
);

index_type!(
    /// Keymap table (configuration profile) in `0..NUM_CONFIGS`.
    ConfigIndex,
    NUM_CONFIGS,
    "config",
    "config index out of range"
);

impl LayerIndex {
    pub const BASE: LayerIndex = LayerIndex(0);

    pub const fn is_base(self) -> bool {
        self.0 == 0
    }
}

impl ConfigIndex {
    pub const FIRST: ConfigIndex = ConfigIndex(0);
}

/// Build-time dimensions of the board, as reported to a configuration host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardInfo {
    pub num_configs: u8,
    pub num_keys: u8,
    pub num_layers: u8,
    pub is_split: bool,
}

impl KeyboardInfo {
    pub const CURRENT: KeyboardInfo = KeyboardInfo {
        num_configs: NUM_CONFIGS as u8,
        num_keys: NUM_KEYS as u8,
        num_layers: NUM_LAYERS as u8,
        is_split: IS_SPLIT,
    };

    /// Wire form: `[configs, keys, layers, split]`.
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.num_configs,
            self.num_keys,
            self.num_layers,
            self.is_split as u8,
        ]
    }
}
