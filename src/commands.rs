//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the addon handlers.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::sync::Arc;

use crate::addon::{Addon, Manifest};
use crate::cache::SubtitleCache;
use crate::cli::{validate_imdb_id, ExitCode, LookupCmd, Output, ServeCmd};
use crate::config::Config;
use crate::models::MediaType;
use crate::resolver::ResolverChain;
use crate::server;

/// Wire the production resolver and an empty cache into an addon
pub fn build_addon(config: &Config) -> Addon {
    Addon::new(Arc::new(ResolverChain::new(config)), SubtitleCache::new())
}

// =============================================================================
// Serve Command
// =============================================================================

pub async fn serve_cmd(cmd: ServeCmd, config: Config, output: &Output) -> ExitCode {
    let host = cmd.host.unwrap_or_else(|| config.host.clone());
    let port = cmd.port.unwrap_or(config.port);

    output.info(format!(
        "Install in Stremio: http://{}:{}/manifest.json",
        host, port
    ));

    match server::serve(build_addon(&config), &host, port).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Server failed: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Streams Command
// =============================================================================

pub async fn streams_cmd(cmd: LookupCmd, config: Config, output: &Output) -> ExitCode {
    if let Err(e) = validate_imdb_id(&cmd.id) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let media_type = MediaType::from(cmd.media_type);
    output.info(format!("Resolving stream for {} {}", media_type, cmd.id));

    let response = build_addon(&config).streams(media_type, &cmd.id).await;
    if response.streams.is_empty() {
        return output.error("No stream found", ExitCode::NotFound);
    }

    if let Err(e) = output.print(&response) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Subtitles Command
// =============================================================================

pub async fn subtitles_cmd(cmd: LookupCmd, config: Config, output: &Output) -> ExitCode {
    if let Err(e) = validate_imdb_id(&cmd.id) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let media_type = MediaType::from(cmd.media_type);
    output.info(format!("Resolving subtitles for {} {}", media_type, cmd.id));

    let response = build_addon(&config).subtitles(media_type, &cmd.id).await;
    if response.subtitles.is_empty() {
        return output.error("No subtitles found", ExitCode::NotFound);
    }

    if let Err(e) = output.print(&response) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Manifest Command
// =============================================================================

pub fn manifest_cmd(output: &Output) -> ExitCode {
    if let Err(e) = output.print(Manifest::default()) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    #[test]
    fn test_manifest_cmd_succeeds() {
        assert_eq!(manifest_cmd(&quiet_output()), ExitCode::Success);
    }

    #[tokio::test]
    async fn test_lookup_rejects_bad_id() {
        let cmd = LookupCmd {
            id: "12345".to_string(),
            media_type: crate::cli::TypeArg::Series,
        };
        let code = streams_cmd(cmd, Config::default(), &quiet_output()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }
}
