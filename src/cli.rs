//! CLI - Command Line Interface for the KissKH addon
//!
//! Runs the addon server, or resolves a single id from the shell.
//! Lookup output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Serve the addon (default when no subcommand is given)
//! kisskh-addon serve --port 7000
//!
//! # One-off lookups
//! kisskh-addon streams tt13443470:1:5
//! kisskh-addon subtitles tt13443470:1:5 --json
//! kisskh-addon streams tt9999999 --type movie
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Nothing resolved for the id
    NotFound = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// KissKH addon - KissKH videos and Spanish subtitles for Stremio
///
/// Run without arguments to start the addon server.
#[derive(Parser, Debug)]
#[command(
    name = "kisskh-addon",
    version,
    about = "KissKH videos and Spanish subtitles for Stremio",
    after_help = "EXAMPLES:\n\
                  kisskh-addon                               Serve the addon\n\
                  kisskh-addon streams tt13443470:1:5        Resolve an episode video\n\
                  kisskh-addon subtitles tt13443470:1:5 -j   Resolve Spanish subtitles"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit to serve)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the addon HTTP server
    Serve(ServeCmd),

    /// Resolve the video stream for an id
    #[command(visible_alias = "st")]
    Streams(LookupCmd),

    /// Resolve Spanish subtitles for an id
    #[command(visible_alias = "sub")]
    Subtitles(LookupCmd),

    /// Print the addon manifest
    Manifest,
}

/// Run the addon server
#[derive(Args, Debug, Default)]
pub struct ServeCmd {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Resolve one Stremio id
#[derive(Args, Debug)]
pub struct LookupCmd {
    /// Stremio id: tt1234567 or tt1234567:SEASON:EPISODE
    #[arg(required = true)]
    pub id: String,

    /// Content type
    #[arg(long = "type", short = 't', value_enum, default_value = "series")]
    pub media_type: TypeArg,
}

/// Content type argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeArg {
    Series,
    Movie,
}

impl From<TypeArg> for MediaType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Series => MediaType::Series,
            TypeArg::Movie => MediaType::Movie,
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// JSON envelope for command output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// IMDB ID Validation
// =============================================================================

/// Validate the IMDB part of a Stremio id (tt followed by digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    let imdb = id.split(':').next().unwrap_or_default();
    if imdb.starts_with("tt") && imdb.len() >= 9 && imdb[2..].chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid IMDB ID format (expected tt followed by 7+ digits)")
    }
}

// =============================================================================
// Tests
// =============================================================================
