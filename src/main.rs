use std::path::PathBuf;
use std::process::ExitCode;

use yearfall::{AnimationConfig, FontSource};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional single argument: a block font JSON file.
    let font = match std::env::args_os().nth(1) {
        Some(path) => FontSource::Path(PathBuf::from(path)),
        None => FontSource::Builtin,
    };
    let config = AnimationConfig::default().with_font(font);

    match yearfall::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
