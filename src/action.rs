use crate::consts::MAX_CHORD_CODES;
use crate::core_types::{ConfigIndex, KeyIndex, LayerIndex};
use crate::error::KeyLibError;
use crate::keycodes::KeyCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice;

/// Two or three codes sent together by one key, e.g. `LeftCtrl+C`.
///
/// Serialized as a plain list of codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyCode>", into = "Vec<KeyCode>")]
pub struct KeyChord {
    // Unused slots repeat codes[0].
    codes: [KeyCode; MAX_CHORD_CODES],
    len: u8,
}

impl KeyChord {
    pub const fn pair(a: KeyCode, b: KeyCode) -> Self {
        Self {
            codes: [a, b, a],
            len: 2,
        }
    }

    pub const fn triple(a: KeyCode, b: KeyCode, c: KeyCode) -> Self {
        Self {
            codes: [a, b, c],
            len: 3,
        }
    }

    pub fn as_slice(&self) -> &[KeyCode] {
        &self.codes[..self.len as usize]
    }
}

impl TryFrom<Vec<KeyCode>> for KeyChord {
    type Error = KeyLibError;

    fn try_from(codes: Vec<KeyCode>) -> Result<Self, Self::Error> {
        match codes[..] {
            [a, b] => Ok(Self::pair(a, b)),
            [a, b, c] => Ok(Self::triple(a, b, c)),
            _ => Err(KeyLibError::Validation(format!(
                "a chord needs 2 to {} codes, got {}",
                MAX_CHORD_CODES,
                codes.len()
            ))),
        }
    }
}

impl From<KeyChord> for Vec<KeyCode> {
    fn from(chord: KeyChord) -> Self {
        chord.as_slice().to_vec()
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

/// An action that takes effect immediately when its key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicAction {
    /// Transparent: falls through to the next active layer.
    #[default]
    NoOp,
    Emit(KeyCode),
    /// All codes are pressed and released as one unit.
    Chord(KeyChord),
    /// Emits `combined` if key `other` is down at press time, `normal`
    /// otherwise. Decided once per press.
    Combined {
        other: KeyIndex,
        normal: KeyCode,
        combined: KeyCode,
    },
    /// Active while the key is held (reference counted per layer).
    LayerHold(LayerIndex),
    /// Latches the layer on or off on press.
    LayerToggle(LayerIndex),
    /// Selects another keymap table, effective from the next scan cycle.
    ConfigSwitch(ConfigIndex),
}

/// A keymap entry.
///
/// `TapHold` carries two [`BasicAction`]s, so tap-hold entries never nest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[default]
    NoOp,
    Emit(KeyCode),
    Chord(KeyChord),
    Combined {
        other: KeyIndex,
        normal: KeyCode,
        combined: KeyCode,
    },
    LayerHold(LayerIndex),
    LayerToggle(LayerIndex),
    ConfigSwitch(ConfigIndex),
    /// `TapHold(tap, hold)`
    TapHold(BasicAction, BasicAction),
}

impl Action {
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// The immediate form of this action, `None` for `TapHold`.
    pub const fn basic(self) -> Option<BasicAction> {
        match self {
            Self::NoOp => Some(BasicAction::NoOp),
            Self::Emit(code) => Some(BasicAction::Emit(code)),
            Self::Chord(chord) => Some(BasicAction::Chord(chord)),
            Self::Combined {
                other,
                normal,
                combined,
            } => Some(BasicAction::Combined {
                other,
                normal,
                combined,
            }),
            Self::LayerHold(layer) => Some(BasicAction::LayerHold(layer)),
            Self::LayerToggle(layer) => Some(BasicAction::LayerToggle(layer)),
            Self::ConfigSwitch(config) => Some(BasicAction::ConfigSwitch(config)),
            Self::TapHold(..) => None,
        }
    }
}

impl BasicAction {
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Codes this action puts in the report while latched. Empty for
    /// `Combined`, which is latched as the `Emit` it resolved to.
    pub fn codes(&self) -> &[KeyCode] {
        match self {
            Self::Emit(code) => slice::from_ref(code),
            Self::Chord(chord) => chord.as_slice(),
            _ => &[],
        }
    }

    /// Layer targeted by a layer-control action.
    pub const fn layer(&self) -> Option<LayerIndex> {
        match self {
            Self::LayerHold(layer) | Self::LayerToggle(layer) => Some(*layer),
            _ => None,
        }
    }
}

impl From<BasicAction> for Action {
    fn from(action: BasicAction) -> Self {
        match action {
            BasicAction::NoOp => Self::NoOp,
            BasicAction::Emit(code) => Self::Emit(code),
            BasicAction::Chord(chord) => Self::Chord(chord),
            BasicAction::Combined {
                other,
                normal,
                combined,
            } => Self::Combined {
                other,
                normal,
                combined,
            },
            BasicAction::LayerHold(layer) => Self::LayerHold(layer),
            BasicAction::LayerToggle(layer) => Self::LayerToggle(layer),
            BasicAction::ConfigSwitch(config) => Self::ConfigSwitch(config),
        }
    }
}

impl fmt::Display for BasicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "_"),
            Self::Emit(code) => write!(f, "{}", code),
            Self::Chord(chord) => write!(f, "{}", chord),
            Self::Combined {
                other,
                normal,
                combined,
            } => write!(f, "{}|{}@{}", normal, combined, other),
            Self::LayerHold(layer) => write!(f, "MO({})", layer),
            Self::LayerToggle(layer) => write!(f, "TG({})", layer),
            Self::ConfigSwitch(config) => write!(f, "CFG({})", config),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TapHold(tap, hold) => write!(f, "{}/{}", tap, hold),
            other => match other.basic() {
                Some(basic) => basic.fmt(f),
                None => Ok(()),
            },
        }
    }
}
