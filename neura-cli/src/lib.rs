//! # neuraCanavas CLI
//!
//! Headless host for the sketch page: replays a scripted sketch, writes the
//! PNG snapshot, and runs the same generate flow the browser host uses.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p neura-cli -- --script sketch.json --prompt "ink wash" --out painting.png
//! ```
//!
//! ## Against a remote backend:
//!
//! ```bash
//! NEURA_API_URL=https://paint.example.com cargo run -p neura-cli -- --script sketch.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved surface size, backend configuration and file paths
//! - `script` - JSON sketch scripts replayed onto a session
//! - `output` - Turning a generated image reference into bytes on disk

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod error;
pub mod output;
pub mod script;

pub use error::{CliError, CliResult};
pub use output::{fetch_image, write_image};
pub use script::{load_script, parse_script, replay, ScriptStep};

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use neura_client::ClientConfig;
use neura_core::MAX_DIMENSION;

fn dimension_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_DIMENSION))
}

/// Command-line arguments for neura-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "neura-cli")]
#[command(about = "Replay a sketch and turn it into a painting with the neuraCanavas backend")]
#[command(version)]
pub struct CliArgs {
    /// Backend base URL (e.g., <http://localhost:5000>)
    #[arg(long, env = "NEURA_API_URL")]
    pub api_url: Option<String>,

    /// Surface width in pixels
    #[arg(long, default_value = "800", value_parser = dimension_parser())]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "600", value_parser = dimension_parser())]
    pub height: u32,

    /// JSON sketch script to replay
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Prompt forwarded to the model
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Write the sketch snapshot (PNG) here
    #[arg(long)]
    pub sketch_out: Option<PathBuf>,

    /// Write the generated image here
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Request timeout in seconds (none by default)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Only replay and snapshot the sketch; do not call the backend
    #[arg(long)]
    pub no_generate: bool,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Backend client configuration.
    pub client: ClientConfig,
    /// Sketch script to replay.
    pub script: Option<PathBuf>,
    /// Prompt text as entered.
    pub prompt: String,
    /// Destination for the sketch snapshot.
    pub sketch_out: Option<PathBuf>,
    /// Destination for the generated image.
    pub out: Option<PathBuf>,
    /// Whether to call the backend.
    pub generate: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Configuration with default values: an 800x600 surface and a local backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            client: ClientConfig::default(),
            script: None,
            prompt: String::new(),
            sketch_out: None,
            out: None,
            generate: true,
        }
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let mut client = ClientConfig::from_value(args.api_url.as_deref());
        if let Some(secs) = args.timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs));
        }

        Self {
            width: args.width,
            height: args.height,
            client,
            script: args.script,
            prompt: args.prompt,
            sketch_out: args.sketch_out,
            out: args.out,
            generate: !args.no_generate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neura_client::DEFAULT_API_URL;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("neura-cli").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn defaults_generate_against_local_backend() {
        let config = CliConfig::from(CliArgs {
            api_url: None,
            ..parse(&[])
        });
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.client.base_url, DEFAULT_API_URL);
        assert!(config.client.timeout.is_none());
        assert!(config.generate);
    }

    #[test]
    fn flags_map_onto_config() {
        let config = CliConfig::from(parse(&[
            "--api-url",
            "https://paint.example.com",
            "--width",
            "320",
            "--height",
            "200",
            "--prompt",
            "ink wash",
            "--timeout-secs",
            "30",
            "--out",
            "painting.png",
            "--no-generate",
        ]));
        assert_eq!(config.client.base_url, "https://paint.example.com");
        assert_eq!(config.client.timeout, Some(Duration::from_secs(30)));
        assert_eq!((config.width, config.height), (320, 200));
        assert_eq!(config.prompt, "ink wash");
        assert_eq!(config.out, Some(PathBuf::from("painting.png")));
        assert!(!config.generate);
    }

    #[test]
    fn surface_size_is_bounded() {
        let args = |w: &str, h: &str| {
            CliArgs::try_parse_from(["neura-cli", "--width", w, "--height", h])
        };
        assert!(args("0", "600").is_err());
        assert!(args("800", "4294967295").is_err());
        assert!(args(&(MAX_DIMENSION + 1).to_string(), "600").is_err());
        let max = MAX_DIMENSION.to_string();
        let parsed = args(&max, &max).expect("parse");
        assert_eq!((parsed.width, parsed.height), (MAX_DIMENSION, MAX_DIMENSION));
    }

    #[test]
    fn blank_api_url_falls_back_to_default() {
        let config = CliConfig::from(parse(&["--api-url", " "]));
        assert_eq!(config.client.base_url, DEFAULT_API_URL);
    }
}
