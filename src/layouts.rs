//! Built-in keymaps for a 42-key split board (3x12 plus 6 thumb keys).
//!
//! Key index = `row * 12 + col` for the three main rows, thumbs are 36..=41
//! left to right. The 30-key alpha block occupies columns 1..=10.

use crate::action::{Action, BasicAction, KeyChord};
use crate::core_types::{ConfigIndex, KeyIndex, LayerIndex};
use crate::keycodes::KeyCode;
use crate::keymap::{KeymapTable, LayerMap};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const COLS: usize = 12;
pub const ROWS: usize = 3;
pub const THUMB_START: usize = ROWS * COLS;
pub const ALPHA_KEYS: usize = 30;

pub const LAYER_SYMBOLS: LayerIndex = LayerIndex::new(1);
pub const LAYER_NAV: LayerIndex = LayerIndex::new(2);
pub const LAYER_SYSTEM: LayerIndex = LayerIndex::new(3);
pub const LAYER_GAME: LayerIndex = LayerIndex::new(4);

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownLayout {
    Qwerty,
    ColemakDh,
    Dvorak,
}

impl KnownLayout {
    // Row-major 30-key alpha block.
    pub fn get_str(&self) -> &'static str {
        match self {
            Self::Qwerty => "qwertyuiopasdfghjkl;zxcvbnm,./",
            Self::ColemakDh => "qwfpbjluy;arstgmneiozxcdvkh,./",
            Self::Dvorak => "',.pyfgcrlaoeuidhtns;qjkxbmwvz",
        }
    }

    pub fn to_codes(&self) -> [Option<KeyCode>; ALPHA_KEYS] {
        alpha_codes(self.get_str())
    }
}

pub fn get_all_layouts() -> HashMap<KnownLayout, [Option<KeyCode>; ALPHA_KEYS]> {
    KnownLayout::iter()
        .map(|layout| (layout, layout.to_codes()))
        .collect()
}

/// Key at `row`/`col` of the main block.
pub const fn position(row: usize, col: usize) -> KeyIndex {
    KeyIndex::new(row * COLS + col)
}

pub const fn thumb(n: usize) -> KeyIndex {
    KeyIndex::new(THUMB_START + n)
}

/// Physical key of the `i`-th alpha block slot.
pub const fn alpha_position(i: usize) -> KeyIndex {
    position(i / 10, i % 10 + 1)
}

// '_' (or any char without a key code) leaves the slot transparent.
fn alpha_codes(block: &str) -> [Option<KeyCode>; ALPHA_KEYS] {
    let mut codes = [None; ALPHA_KEYS];
    for (slot, c) in codes.iter_mut().zip(block.chars()) {
        *slot = KeyCode::from_char(c);
    }
    codes
}

fn fill_alpha(map: &mut LayerMap, codes: &[Option<KeyCode>; ALPHA_KEYS]) {
    for (i, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            map[alpha_position(i).get()] = Action::Emit(*code);
        }
    }
}

fn set(map: &mut LayerMap, key: KeyIndex, action: Action) {
    map[key.get()] = action;
}

fn base_layer(map: &mut LayerMap, layout: KnownLayout) {
    fill_alpha(map, &layout.to_codes());

    set(map, position(0, 0), Action::Emit(KeyCode::Tab));
    set(map, position(0, 11), Action::Emit(KeyCode::Backspace));
    set(
        map,
        position(1, 0),
        Action::TapHold(
            BasicAction::Emit(KeyCode::Escape),
            BasicAction::Emit(KeyCode::LeftCtrl),
        ),
    );
    set(map, position(1, 11), Action::Emit(KeyCode::Quote));
    set(map, position(2, 0), Action::Emit(KeyCode::LeftShift));
    set(map, position(2, 11), Action::Emit(KeyCode::RightShift));

    set(map, thumb(0), Action::Emit(KeyCode::LeftGui));
    set(map, thumb(1), Action::LayerHold(LAYER_SYMBOLS));
    set(
        map,
        thumb(2),
        Action::TapHold(
            BasicAction::Emit(KeyCode::Space),
            BasicAction::LayerHold(LAYER_SYSTEM),
        ),
    );
    set(
        map,
        thumb(3),
        Action::TapHold(
            BasicAction::Emit(KeyCode::Enter),
            BasicAction::LayerHold(LAYER_NAV),
        ),
    );
    set(map, thumb(4), Action::LayerHold(LAYER_NAV));
    set(map, thumb(5), Action::Emit(KeyCode::RightAlt));
}

fn symbols_layer(map: &mut LayerMap) {
    fill_alpha(map, &alpha_codes("1234567890`-=[]\\;'____________"));
    set(map, position(0, 11), Action::Emit(KeyCode::Delete));
}

fn nav_layer(map: &mut LayerMap) {
    let nav = [
        (position(0, 6), KeyCode::Home),
        (position(0, 7), KeyCode::PageDown),
        (position(0, 8), KeyCode::PageUp),
        (position(0, 9), KeyCode::End),
        (position(1, 6), KeyCode::Left),
        (position(1, 7), KeyCode::Down),
        (position(1, 8), KeyCode::Up),
        (position(1, 9), KeyCode::Right),
        (position(1, 1), KeyCode::LeftGui),
        (position(1, 2), KeyCode::LeftAlt),
        (position(1, 3), KeyCode::LeftCtrl),
        (position(1, 4), KeyCode::LeftShift),
        (position(2, 6), KeyCode::Insert),
        (position(2, 7), KeyCode::PrintScreen),
    ];
    for (key, code) in nav {
        set(map, key, Action::Emit(code));
    }

    // Undo, cut, copy, paste under the left home row mods.
    let clipboard = [KeyCode::Z, KeyCode::X, KeyCode::C, KeyCode::V];
    for (col, code) in (1..).zip(clipboard) {
        set(
            map,
            position(2, col),
            Action::Chord(KeyChord::pair(KeyCode::LeftCtrl, code)),
        );
    }
}

fn system_layer(map: &mut LayerMap) {
    let fkeys = [
        KeyCode::F1,
        KeyCode::F2,
        KeyCode::F3,
        KeyCode::F4,
        KeyCode::F5,
        KeyCode::F6,
        KeyCode::F7,
        KeyCode::F8,
        KeyCode::F9,
        KeyCode::F10,
        KeyCode::F11,
        KeyCode::F12,
    ];
    for (i, code) in fkeys.into_iter().enumerate() {
        set(map, alpha_position(i), Action::Emit(code));
    }
    for config in ConfigIndex::all() {
        set(
            map,
            alpha_position(20 + config.get()),
            Action::ConfigSwitch(config),
        );
    }
    set(map, alpha_position(29), Action::LayerToggle(LAYER_GAME));
}

fn game_layer(map: &mut LayerMap) {
    set(map, position(1, 0), Action::Emit(KeyCode::LeftCtrl));
    set(map, thumb(2), Action::Emit(KeyCode::Space));
    set(map, thumb(3), Action::Emit(KeyCode::Enter));
    set(map, thumb(5), Action::LayerToggle(LAYER_GAME));
}

/// One config per [`KnownLayout`], sharing the same upper layers.
pub fn default_keymap() -> KeymapTable {
    let mut table = KeymapTable::new();
    for (config, layout) in ConfigIndex::all().zip(KnownLayout::iter()) {
        base_layer(table.layer_mut(config, LayerIndex::BASE), layout);
        symbols_layer(table.layer_mut(config, LAYER_SYMBOLS));
        nav_layer(table.layer_mut(config, LAYER_NAV));
        system_layer(table.layer_mut(config, LAYER_SYSTEM));
        game_layer(table.layer_mut(config, LAYER_GAME));
    }
    table
}
