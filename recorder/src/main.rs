#[macro_use]
extern crate log;
extern crate custom_error;

mod errors;
mod export;
mod frames;
mod options;

use std::{env, path::PathBuf, process, time::{SystemTime, UNIX_EPOCH}};

use env_logger::Env;

use errors::RecorderError;
use export::{default_output_path, export_recording};
use options::{ExportConfig, ExportOptions};

const DEFAULT_LOGGING_LEVEL: &str = "info";

const USAGE: &str = "please specify command:\n\
    recorder export --source=<frames dir> [--output=recording.gif] [--fps=10] [--loop=0] \
    [--channel-order=bgra] [--parallel=true]";

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let args: Vec<String> = env::args().collect();
    debug!("args are: {:?}", args);

    if args.len() > 1 && args[1] == "export" {
        if let Err(err) = run_export(&args) {
            error!("export failed: {}", err);
            process::exit(1);
        }
    } else {
        error!("{}", USAGE);
        process::exit(2);
    }
}

fn run_export(args: &[String]) -> Result<(), RecorderError> {
    let options = ExportOptions::from_args(args);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|v| v.as_secs())
        .unwrap_or(0);
    let home = env::var_os("HOME").map(PathBuf::from);

    let config = ExportConfig::from_options(&options, default_output_path(home, timestamp))?;
    debug!("export config: {:?}", config);

    let frames = export_recording(&config)?;
    info!("done, {} frames saved to {}", frames, config.output.display());

    Ok(())
}
