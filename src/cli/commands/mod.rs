//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod extract;
mod serve;
mod tools;

use clap::{Parser, Subcommand};

use crate::config::{Settings, SettingsArgs};

#[derive(Parser)]
#[command(name = "doctext")]
#[command(about = "Extract text from remote documents with budgeted OCR")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the extraction web server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT
        #[arg(long, env = "BIND", default_value = serve::DEFAULT_BIND)]
        bind: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Extract text from a URL or local file and print it as JSON
    Extract {
        /// http(s) URL or path to a local file
        source: String,

        /// Character budget for extracted text
        #[arg(short, long, allow_negative_numbers = true)]
        max_chars: Option<i64>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Check if required OCR tools are installed
    Tools,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, settings } => {
            let settings = Settings::from_args(&settings)?;
            serve::cmd_serve(settings, &bind).await
        }
        Commands::Extract {
            source,
            max_chars,
            settings,
        } => {
            let settings = Settings::from_args(&settings)?;
            extract::cmd_extract(settings, &source, max_chars).await
        }
        Commands::Tools => tools::cmd_tools(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::parse_from(["doctext", "-v", "extract", "doc.pdf", "--max-chars", "250"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract {
                source, max_chars, ..
            } => {
                assert_eq!(source, "doc.pdf");
                assert_eq!(max_chars, Some(250));
            }
            _ => panic!("expected extract command"),
        }
    }
}
