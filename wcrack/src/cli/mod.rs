//! Command line interface.

mod api;
mod text;
mod words;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::db::{Database, DatabaseBackend, LibSqlBackend};

pub use api::{probe_health, ApiCommand};
pub use text::TextArgs;
pub use words::WordsCommand;

#[derive(Debug, Parser)]
#[command(name = "wcrack")]
#[command(version)]
#[command(about = "Extract text from screenshots and run word frequency analysis")]
pub struct Cli {
    /// Print verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// YAML, TOML or JSON config file layered over the environment.
    /// Falls back to `WCRACK_CONFIG`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract words from a screenshot (PNG/JPEG) or a directory of them into a text file
    Text(TextArgs),
    /// Manage stored words
    #[command(subcommand)]
    Words(WordsCommand),
    /// Run or probe the HTTP API
    #[command(subcommand)]
    Api(ApiCommand),
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| std::env::var_os("WCRACK_CONFIG").map(PathBuf::from))
    }

    pub async fn run(self, config: Config, shutdown: CancellationToken) -> anyhow::Result<()> {
        match self.command {
            Command::Text(args) => text::run(args, &config, self.verbose, shutdown).await,
            Command::Words(cmd) => words::run(cmd, &config, self.verbose, shutdown).await,
            Command::Api(cmd) => api::run(cmd, config, shutdown).await,
        }
    }
}

async fn open_database(config: &Config) -> anyhow::Result<Arc<dyn DatabaseBackend>> {
    let db = Database::new(&config.database).await?;
    Ok(Arc::new(LibSqlBackend::new(db)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_text_command() {
        let cli = Cli::try_parse_from(["wcrack", "-v", "text", "--path", "shots", "-o", "out"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Text(args) => {
                assert_eq!(args.path, PathBuf::from("shots"));
                assert_eq!(args.out, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_words_frequency_default_limit() {
        let cli = Cli::try_parse_from(["wcrack", "words", "frequency"]).unwrap();
        match cli.command {
            Command::Words(WordsCommand::Frequency { limit }) => assert_eq!(limit, 30),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_words_add_many() {
        let cli = Cli::try_parse_from(["wcrack", "words", "add-many", "words.json"]).unwrap();
        match cli.command {
            Command::Words(WordsCommand::AddMany { file }) => {
                assert_eq!(file, PathBuf::from("words.json"))
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_text_requires_path() {
        assert!(Cli::try_parse_from(["wcrack", "text"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["wcrack", "api", "healthz", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
