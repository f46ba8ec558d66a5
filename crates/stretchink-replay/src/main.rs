//! Replay entry point.

use std::process::ExitCode;
use stretchink_replay::{ReplayError, load_script, replay};

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: stretchink-replay <script.json>");
        return ExitCode::from(2);
    };

    let script = match load_script(&path) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("Failed to load {}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(script.config.log_filter.as_str()),
    )
    .init();
    log::info!("Starting StretchInk replay of {}", path);

    let result = replay(&script)
        .and_then(|outcome| serde_json::to_string_pretty(&outcome).map_err(ReplayError::from));
    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Replay failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
