//! KissKH addon - KissKH videos and Spanish subtitles for Stremio
//!
//! # Usage
//!
//! ```bash
//! # Serve the addon on the configured port
//! kisskh-addon
//!
//! # One-off lookups (for scripting)
//! kisskh-addon streams tt13443470:1:5
//! kisskh-addon subtitles tt13443470:1:5 --json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kisskh_addon::cli::{Cli, Command, ExitCode, Output, ServeCmd};
use kisskh_addon::commands;
use kisskh_addon::config::Config;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run_cli(cli).await.into()
}

/// Log to stderr so JSON output on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = match &cli.config {
        Some(path) => Config::load_from(path).with_env_overrides(),
        None => Config::load(),
    };

    match cli.command {
        Some(Command::Serve(cmd)) => commands::serve_cmd(cmd, config, &output).await,

        Some(Command::Streams(cmd)) => commands::streams_cmd(cmd, config, &output).await,

        Some(Command::Subtitles(cmd)) => commands::subtitles_cmd(cmd, config, &output).await,

        Some(Command::Manifest) => commands::manifest_cmd(&output),

        None => commands::serve_cmd(ServeCmd::default(), config, &output).await,
    }
}
