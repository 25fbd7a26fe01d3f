//! Quire CLI
//!
//! Validates typed content collections and their front matter.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Quire.
#[derive(Parser)]
#[command(
    name = "quire",
    version,
    about = "Typed content collections with front-matter validation"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "quire.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Validate every collection and report invalid documents
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// List the entries of a collection, newest first
    List {
        /// Collection name (e.g., blog)
        collection: String,
        /// Include draft entries
        #[arg(long)]
        drafts: bool,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new document with its required fields stubbed
    New {
        /// Collection name (e.g., articles)
        collection: String,
        /// Document name, used for the title and file name
        name: String,
    },
    /// Rescan collections whenever their files change
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    quire::init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { strict } => {
            quire::cmd::check::run(&cli.config, strict)?;
        }
        Commands::List {
            collection,
            drafts,
            json,
        } => {
            quire::cmd::list::run(&cli.config, &collection, drafts, json)?;
        }
        Commands::New { collection, name } => {
            quire::cmd::new::run(&cli.config, &collection, &name)?;
        }
        Commands::Watch => {
            quire::cmd::watch::run(&cli.config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["quire", "check", "--strict"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("quire.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_list_command_parsing() {
        let args = ["quire", "list", "blog"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::List {
                collection,
                drafts,
                json,
            } => {
                assert_eq!(collection, "blog");
                assert!(!drafts);
                assert!(!json);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_list_with_flags() {
        let args = ["quire", "list", "articles", "--drafts", "--json"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::List { drafts, json, .. } => {
                assert!(drafts);
                assert!(json);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_new_command_parsing() {
        let args = ["quire", "new", "articles", "my-article"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::New { collection, name } => {
                assert_eq!(collection, "articles");
                assert_eq!(name, "my-article");
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_new_requires_name() {
        let args = ["quire", "new", "articles"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_watch_command_parsing() {
        let args = ["quire", "watch"];
        let cli = Cli::parse_from(args);
        assert!(matches!(cli.command, Commands::Watch));
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["quire", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["quire", "--config", "site.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
