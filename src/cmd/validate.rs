use crate::reports;
use clap::Args;
use key_lib::core_types::{ConfigIndex, LayerIndex};
use key_lib::keymap::KeymapTable;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Only summarize this config
    #[arg(short, long)]
    pub config: Option<u8>,

    /// Print the key grid of every populated layer
    #[arg(long, default_value_t = false)]
    pub grid: bool,
}

/// Returns false when the keymap has problems.
pub fn run(args: &ValidateArgs, keymap: &KeymapTable) -> bool {
    let configs: Vec<ConfigIndex> = match args.config {
        Some(c) => match ConfigIndex::try_from(c) {
            Ok(config) => vec![config],
            Err(e) => {
                error!("{}", e);
                return false;
            }
        },
        None => ConfigIndex::all().collect(),
    };

    println!("\n🔎 === KEYMAP AUDIT === 🔎");
    reports::print_keymap_summary(keymap, &configs);

    if args.grid {
        for &config in &configs {
            for layer in LayerIndex::all() {
                if layer.is_base() || !keymap.is_layer_empty(config, layer) {
                    reports::print_layer_grid(keymap, config, layer);
                }
            }
        }
    }

    match keymap.validate() {
        Ok(()) => {
            println!("\n✅ Keymap is valid.");
            true
        }
        Err(e) => {
            error!("❌ {}", e);
            false
        }
    }
}
