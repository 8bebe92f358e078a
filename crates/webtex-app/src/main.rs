mod cli;
mod probe;
mod replay;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use webtex_config::WebtexConfig;

use cli::Command;

fn init_logging(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            directive.parse().unwrap_or_else(|_| "info".parse().unwrap()),
        ))
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Read config before logging is up; a load failure is reported once
    // the subscriber exists.
    let loaded = webtex_config::load_config_from(args.config.as_deref());
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("info");
    init_logging(args.log_level.as_deref().unwrap_or(config_level));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        WebtexConfig::default()
    });
    tracing::info!("webtex v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &args.command {
        Command::Probe(probe) => probe::run(probe, &config).map_err(|e| e.to_string()),
        Command::Replay(replay) => replay::run(replay, &config)
            .and_then(|summary| {
                serde_json::to_string_pretty(&summary)
                    .map_err(|e| webtex_common::WebtexError::Other(e.to_string()))
            })
            .map_err(|e| e.to_string()),
    };

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
