use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use key_lib::config::EngineConfig;
use key_lib::keymap::KeymapTable;
use key_lib::layouts::default_keymap;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keymap JSON file. Built-in layouts are used when omitted.
    #[arg(global = true, short, long)]
    keymap: Option<String>,

    /// Engine settings JSON file.
    #[arg(global = true, short, long)]
    settings: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded scan trace and print every report change
    Replay(cmd::replay::ReplayArgs),
    /// Check a keymap for authoring errors
    Validate(cmd::validate::ValidateArgs),
    /// Print the build-time board dimensions
    Info,
    /// Write the keymap (built-in unless --keymap is given) as JSON
    Export(cmd::export::ExportArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let keymap = match &cli.keymap {
        Some(path) => {
            info!("📂 Loading Keymap: {}", path);
            KeymapTable::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            })
        }
        None => {
            info!("⌨️  No keymap given. Using built-in layouts.");
            default_keymap()
        }
    };

    match cli.command {
        Commands::Replay(ref args) => {
            let mut settings = args.settings.clone();
            if let Some(path) = &cli.settings {
                info!("⚙️  Loading Settings from: {}", path);
                let mut file_settings = EngineConfig::load_from_file(path).unwrap_or_else(|e| {
                    error!("{}", e);
                    process::exit(1);
                });
                if let Some(sub_matches) = matches.subcommand_matches("replay") {
                    file_settings.merge_from_cli(&args.settings, sub_matches);
                }
                settings = file_settings;
            } else {
                warn!("⚠️  No settings file. Using defaults and CLI flags.");
            }

            if let Err(e) = cmd::replay::run(args, &keymap, &settings) {
                error!("{}", e);
                process::exit(1);
            }
        }
        Commands::Validate(ref args) => {
            if !cmd::validate::run(args, &keymap) {
                process::exit(1);
            }
        }
        Commands::Info => reports::print_info(),
        Commands::Export(ref args) => {
            if let Err(e) = cmd::export::run(args, &keymap) {
                error!("{}", e);
                process::exit(1);
            }
        }
    }
}
