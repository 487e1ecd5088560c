use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use key_lib::action::{Action, BasicAction};
use key_lib::core_types::{ConfigIndex, KeyIndex, KeyboardInfo, LayerIndex};
use key_lib::keymap::KeymapTable;
use key_lib::layouts::{get_all_layouts, KnownLayout, COLS, THUMB_START};
use key_lib::trace::ReplayFrame;
use strum::IntoEnumIterator;

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_info() {
    let info = KeyboardInfo::CURRENT;
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    table.set_header(vec![
        Cell::new("Property").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Configs"), Cell::new(info.num_configs)]);
    table.add_row(vec![Cell::new("Keys"), Cell::new(info.num_keys)]);
    table.add_row(vec![Cell::new("Layers"), Cell::new(info.num_layers)]);
    table.add_row(vec![Cell::new("Split"), Cell::new(info.is_split)]);
    table.add_row(vec![
        Cell::new("Wire bytes"),
        Cell::new(format!("{:02x?}", info.to_bytes())).fg(Color::Cyan),
    ]);
    println!("\n{}", table);

    let layouts = get_all_layouts();
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Config").add_attribute(Attribute::Bold),
        Cell::new("Built-in layout").add_attribute(Attribute::Bold),
        Cell::new("Alpha block"),
    ]);
    for (config, layout) in ConfigIndex::all().zip(KnownLayout::iter()) {
        let mapped = layouts.get(&layout).map_or(0, |codes| codes.iter().flatten().count());
        table.add_row(vec![
            Cell::new(config),
            Cell::new(layout).fg(Color::Green),
            Cell::new(format!("{} ({} keys)", layout.get_str(), mapped)),
        ]);
    }
    println!("{}", table);
}

pub fn print_replay_frames(frames: &[ReplayFrame]) {
    if frames.is_empty() {
        println!("\n(no report changes)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Tick").add_attribute(Attribute::Bold),
        Cell::new("Cfg"),
        Cell::new("Layers"),
        Cell::new("Report").fg(Color::Cyan),
    ]);
    if let Some(col) = table.column_mut(0) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for frame in frames {
        let report = if frame.codes.is_empty() {
            Cell::new("-").fg(Color::DarkGrey)
        } else {
            Cell::new(join(&frame.codes)).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(frame.tick),
            Cell::new(frame.config),
            Cell::new(join(&frame.layers)),
            report,
        ]);
    }
    println!("\n{}", table);
}

#[derive(Debug, Default)]
struct LayerCounts {
    emits: usize,
    layer_actions: usize,
    tap_holds: usize,
    config_switches: usize,
}

fn count_layer(keymap: &KeymapTable, config: ConfigIndex, layer: LayerIndex) -> LayerCounts {
    let mut counts = LayerCounts::default();
    for action in keymap.layer(config, layer) {
        match action {
            Action::NoOp => {}
            Action::Emit(_) | Action::Chord(_) | Action::Combined { .. } => counts.emits += 1,
            Action::LayerHold(_) | Action::LayerToggle(_) => counts.layer_actions += 1,
            Action::ConfigSwitch(_) => counts.config_switches += 1,
            Action::TapHold(..) => counts.tap_holds += 1,
        }
    }
    counts
}

pub fn print_keymap_summary(keymap: &KeymapTable, configs: &[ConfigIndex]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Cfg").add_attribute(Attribute::Bold),
        Cell::new("Layer").add_attribute(Attribute::Bold),
        Cell::new("Emit"),
        Cell::new("Layer"),
        Cell::new("Tap/Hold"),
        Cell::new("Cfg Sw"),
        Cell::new("Free").fg(Color::DarkGrey),
    ]);
    for i in 2..=6 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for &config in configs {
        for layer in LayerIndex::all() {
            if !layer.is_base() && keymap.is_layer_empty(config, layer) {
                continue;
            }
            let c = count_layer(keymap, config, layer);
            let used = c.emits + c.layer_actions + c.tap_holds + c.config_switches;
            table.add_row(vec![
                Cell::new(config),
                Cell::new(layer).add_attribute(Attribute::Bold),
                Cell::new(c.emits),
                Cell::new(c.layer_actions),
                Cell::new(c.tap_holds),
                Cell::new(c.config_switches),
                Cell::new(KeyIndex::LIMIT - used).fg(Color::DarkGrey),
            ]);
        }
    }
    println!("\n{}", table);
}

fn short_label(action: Action) -> String {
    match action {
        Action::NoOp => String::new(),
        Action::TapHold(tap, hold) => format!("{}\n{}", short_basic(tap), short_basic(hold)),
        other => other.to_string(),
    }
}

fn short_basic(action: BasicAction) -> String {
    match action {
        BasicAction::NoOp => "-".to_string(),
        other => other.to_string(),
    }
}

pub fn print_layer_grid(keymap: &KeymapTable, config: ConfigIndex, layer: LayerIndex) {
    println!("\nConfig {} / Layer {}", config, layer);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let map = keymap.layer(config, layer);
    let cell = |action: &Action| Cell::new(short_label(*action)).set_alignment(CellAlignment::Center);

    for row in map[..THUMB_START].chunks(COLS) {
        table.add_row(row.iter().map(cell).collect::<Vec<_>>());
    }

    // Thumb cluster sits under the inner columns.
    let thumbs = &map[THUMB_START..];
    let pad = (COLS - thumbs.len()) / 2;
    let mut last: Vec<Cell> = (0..pad).map(|_| Cell::new("")).collect();
    last.extend(thumbs.iter().map(cell));
    table.add_row(last);

    println!("{}", table);
}
