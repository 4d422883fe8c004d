use clap::{Parser, Subcommand};
use newsrec::Result;
use newsrec::commands::{build_index, recommend, show_article, show_status};
use newsrec::config::{Config, get_config_dir, run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsrec")]
#[command(about = "Content-based news recommendations from TF-IDF article similarity")]
#[command(version)]
struct Cli {
    /// Configuration directory, defaults to ~/.newsrec
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure data sources and recommendation settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Build the content index and refresh the cache
    Build {
        /// Rebuild even when the cache is up to date
        #[arg(long)]
        force: bool,
    },
    /// Recommend articles for a user
    Recommend {
        /// User to recommend for
        #[arg(long)]
        user: String,
        /// Maximum number of articles, defaults to the configured limit
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Boost articles whose title or body contains this text
        #[arg(long, short = 'q')]
        query: Option<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show an article and the articles most similar to it
    Show {
        /// Article ID
        id: String,
    },
    /// Show the state of the data files and index cache
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => get_config_dir()?,
    };

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config(&config_dir)?;
            } else {
                run_interactive_config(&config_dir)?;
            }
        }
        Commands::Build { force } => {
            build_index(&Config::load(&config_dir)?, force)?;
        }
        Commands::Recommend {
            user,
            limit,
            query,
            json,
        } => {
            recommend(
                &Config::load(&config_dir)?,
                &user,
                limit,
                query.as_deref(),
                json,
            )?;
        }
        Commands::Show { id } => {
            show_article(&Config::load(&config_dir)?, &id)?;
        }
        Commands::Status => {
            show_status(&Config::load(&config_dir)?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["newsrec", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Status));
            assert_eq!(parsed.config_dir, None);
        }
    }

    #[test]
    fn recommend_command_with_user() {
        let cli = Cli::try_parse_from(["newsrec", "recommend", "--user", "U13740"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Recommend {
                user,
                limit,
                query,
                json,
            } = parsed.command
            {
                assert_eq!(user, "U13740");
                assert_eq!(limit, None);
                assert_eq!(query, None);
                assert!(!json);
            }
        }
    }

    #[test]
    fn recommend_command_with_options() {
        let cli = Cli::try_parse_from([
            "newsrec",
            "recommend",
            "--user",
            "U1",
            "-n",
            "5",
            "--query",
            "climate change",
            "--json",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Recommend {
                limit, query, json, ..
            } = parsed.command
            {
                assert_eq!(limit, Some(5));
                assert_eq!(query, Some("climate change".to_string()));
                assert!(json);
            }
        }
    }

    #[test]
    fn recommend_requires_user() {
        let cli = Cli::try_parse_from(["newsrec", "recommend"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn negative_limit_is_rejected() {
        let cli = Cli::try_parse_from(["newsrec", "recommend", "--user", "U1", "-n", "-3"]);
        assert!(cli.is_err());
    }

    #[test]
    fn build_force_flag() {
        let cli = Cli::try_parse_from(["newsrec", "build", "--force"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Build { force } = parsed.command {
                assert!(force);
            }
        }
    }

    #[test]
    fn show_command_with_id() {
        let cli = Cli::try_parse_from(["newsrec", "show", "N55528"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Show { id } = parsed.command {
                assert_eq!(id, "N55528");
            }
        }
    }

    #[test]
    fn global_config_dir() {
        let cli = Cli::try_parse_from(["newsrec", "build", "--config-dir", "/tmp/newsrec"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert_eq!(parsed.config_dir, Some(PathBuf::from("/tmp/newsrec")));
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["newsrec", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["newsrec", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["newsrec", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
