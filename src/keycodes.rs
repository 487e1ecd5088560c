use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// HID keyboard/keypad usage page (0x07) codes emitted by the engine.
///
/// Names parse case-insensitively; common QMK-style aliases are accepted
/// (`"SPC"`, `"ENT"`, `"LSFT"`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum KeyCode {
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    #[strum(to_string = "Kc1", serialize = "1")]
    Kc1 = 0x1E,
    #[strum(to_string = "Kc2", serialize = "2")]
    Kc2 = 0x1F,
    #[strum(to_string = "Kc3", serialize = "3")]
    Kc3 = 0x20,
    #[strum(to_string = "Kc4", serialize = "4")]
    Kc4 = 0x21,
    #[strum(to_string = "Kc5", serialize = "5")]
    Kc5 = 0x22,
    #[strum(to_string = "Kc6", serialize = "6")]
    Kc6 = 0x23,
    #[strum(to_string = "Kc7", serialize = "7")]
    Kc7 = 0x24,
    #[strum(to_string = "Kc8", serialize = "8")]
    Kc8 = 0x25,
    #[strum(to_string = "Kc9", serialize = "9")]
    Kc9 = 0x26,
    #[strum(to_string = "Kc0", serialize = "0")]
    Kc0 = 0x27,

    #[strum(to_string = "Enter", serialize = "ENT", serialize = "RET")]
    Enter = 0x28,
    #[strum(to_string = "Escape", serialize = "ESC")]
    Escape = 0x29,
    #[strum(to_string = "Backspace", serialize = "BSPC")]
    Backspace = 0x2A,
    #[strum(to_string = "Tab")]
    Tab = 0x2B,
    #[strum(to_string = "Space", serialize = "SPC")]
    Space = 0x2C,
    #[strum(to_string = "Minus", serialize = "-")]
    Minus = 0x2D,
    #[strum(to_string = "Equal", serialize = "=")]
    Equal = 0x2E,
    #[strum(to_string = "LeftBracket", serialize = "[")]
    LeftBracket = 0x2F,
    #[strum(to_string = "RightBracket", serialize = "]")]
    RightBracket = 0x30,
    #[strum(to_string = "Backslash", serialize = "\\")]
    Backslash = 0x31,
    NonUsHash = 0x32,
    #[strum(to_string = "Semicolon", serialize = ";")]
    Semicolon = 0x33,
    #[strum(to_string = "Quote", serialize = "'")]
    Quote = 0x34,
    #[strum(to_string = "Grave", serialize = "`")]
    Grave = 0x35,
    #[strum(to_string = "Comma", serialize = ",")]
    Comma = 0x36,
    #[strum(to_string = "Dot", serialize = ".")]
    Dot = 0x37,
    #[strum(to_string = "Slash", serialize = "/")]
    Slash = 0x38,
    #[strum(to_string = "CapsLock", serialize = "CAPS")]
    CapsLock = 0x39,

    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    #[strum(to_string = "Insert", serialize = "INS")]
    Insert = 0x49,
    Home = 0x4A,
    #[strum(to_string = "PageUp", serialize = "PGUP")]
    PageUp = 0x4B,
    #[strum(to_string = "Delete", serialize = "DEL")]
    Delete = 0x4C,
    End = 0x4D,
    #[strum(to_string = "PageDown", serialize = "PGDN")]
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,

    #[strum(to_string = "LeftCtrl", serialize = "LCTL")]
    LeftCtrl = 0xE0,
    #[strum(to_string = "LeftShift", serialize = "LSFT")]
    LeftShift = 0xE1,
    #[strum(to_string = "LeftAlt", serialize = "LALT")]
    LeftAlt = 0xE2,
    #[strum(to_string = "LeftGui", serialize = "LGUI")]
    LeftGui = 0xE3,
    #[strum(to_string = "RightCtrl", serialize = "RCTL")]
    RightCtrl = 0xE4,
    #[strum(to_string = "RightShift", serialize = "RSFT")]
    RightShift = 0xE5,
    #[strum(to_string = "RightAlt", serialize = "RALT")]
    RightAlt = 0xE6,
    #[strum(to_string = "RightGui", serialize = "RGUI")]
    RightGui = 0xE7,
}

const MODIFIER_BASE: u8 = 0xE0;

impl KeyCode {
    /// Raw HID usage id.
    #[inline(always)]
    pub const fn usage(self) -> u8 {
        self as u8
    }

    pub const fn is_modifier(self) -> bool {
        self.usage() >= MODIFIER_BASE
    }

    /// Bit of this modifier in the HID modifier byte, `None` for regular keys.
    pub const fn modifier_bit(self) -> Option<u8> {
        if self.is_modifier() {
            Some(1 << (self.usage() - MODIFIER_BASE))
        } else {
            None
        }
    }

    /// Unshifted key that produces `c` on a US layout.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        let code = match c {
            'a'..='z' => {
                let offset = c as u8 - b'a';
                // A..Z are contiguous.
                return Self::from_usage(Self::A.usage() + offset);
            }
            '1'..='9' => {
                let offset = c as u8 - b'1';
                return Self::from_usage(Self::Kc1.usage() + offset);
            }
            '0' => Self::Kc0,
            '\n' => Self::Enter,
            '\t' => Self::Tab,
            ' ' => Self::Space,
            '-' => Self::Minus,
            '=' => Self::Equal,
            '[' => Self::LeftBracket,
            ']' => Self::RightBracket,
            '\\' => Self::Backslash,
            ';' => Self::Semicolon,
            '\'' => Self::Quote,
            '`' => Self::Grave,
            ',' => Self::Comma,
            '.' => Self::Dot,
            '/' => Self::Slash,
            _ => return None,
        };
        Some(code)
    }

    /// Reverse of [`KeyCode::usage`].
    pub fn from_usage(usage: u8) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|code| code.usage() == usage)
    }
}
