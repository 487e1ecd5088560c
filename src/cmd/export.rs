use clap::Args;
use key_lib::error::KlResult;
use key_lib::keymap::KeymapTable;
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Destination file. Printed to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Name stored in the keymap document
    #[arg(long, default_value = "default")]
    pub name: String,
}

pub fn run(args: &ExportArgs, keymap: &KeymapTable) -> KlResult<()> {
    let json = keymap.to_json_string(&args.name)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("💾 Keymap '{}' written to {}", args.name, path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
