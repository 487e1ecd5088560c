use crate::reports;
use clap::Args;
use key_lib::config::EngineConfig;
use key_lib::core_types::Tick;
use key_lib::engine::Engine;
use key_lib::error::KlResult;
use key_lib::keymap::KeymapTable;
use key_lib::trace::{self, ScanTrace};
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub settings: EngineConfig,

    /// Scan trace CSV with `tick,key,level` rows
    #[arg(short, long)]
    pub trace: String,

    /// Ticks to keep scanning after the last trace event
    #[arg(long, default_value_t = 1000)]
    pub tail: Tick,

    /// Also write the frames to this JSON file
    #[arg(long)]
    pub json: Option<String>,
}

pub fn run(args: &ReplayArgs, keymap: &KeymapTable, settings: &EngineConfig) -> KlResult<()> {
    keymap.validate()?;
    let trace = ScanTrace::load_from_file(&args.trace)?;
    let mut engine = Engine::new(keymap, settings)?;

    let until = trace.last_tick().saturating_add(args.tail);
    println!(
        "\n▶️  Replaying {} events over {} ticks (debounce {:?}, tap-hold {} ticks, {})",
        trace.events().len(),
        until as u64 + 1,
        settings.debounce_policy(),
        settings.tap_hold_ticks,
        settings.interrupt_policy
    );

    let frames = trace::replay(&mut engine, &trace, until);
    reports::print_replay_frames(&frames);

    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&frames)?)?;
        info!("💾 Wrote {} frames to {}", frames.len(), path);
    }
    Ok(())
}
