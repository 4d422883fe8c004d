
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, ConfigError};
use crate::index::StopWords;
use crate::interactions::InteractionFormat;

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 newsrec Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Data Sources").bold().yellow());
    eprintln!("Point newsrec at the article corpus and the interaction log.");
    eprintln!();

    configure_data(&mut config)?;

    eprintln!();
    eprintln!("{}", style("Recommendation Settings").bold().yellow());
    configure_recommendations(&mut config)?;

    eprintln!();
    if config.news_path().exists() {
        eprintln!("{}", style("✓ Article corpus found!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Article corpus does not exist yet").yellow()
        );
        eprintln!("You can continue, but recommendations will be empty until it is in place.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Data:").bold().yellow());
    eprintln!("  Articles: {}", style(config.news_path().display()).cyan());
    eprintln!(
        "  Interactions: {} ({})",
        style(config.interactions_path().display()).cyan(),
        config.data.interactions_format
    );
    eprintln!("  Cache: {}", style(config.cache_dir_path().display()).cyan());

    eprintln!();
    eprintln!("{}", style("Vectorizer:").bold().yellow());
    eprintln!("  Lowercase: {}", style(config.vectorizer.lowercase).cyan());
    eprintln!("  Min DF: {}", style(config.vectorizer.min_df).cyan());
    eprintln!("  Max DF: {}", style(config.vectorizer.max_df).cyan());
    eprintln!("  Stop words: {}", style(config.vectorizer.stop_words).cyan());
    eprintln!(
        "  Sublinear TF: {}",
        style(config.vectorizer.sublinear_tf).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Recommendations:").bold().yellow());
    eprintln!(
        "  Default limit: {}",
        style(config.recommend.default_limit).cyan()
    );
    eprintln!("  Query boost: {}", style(config.recommend.query_boost).cyan());
    eprintln!(
        "  Exclude history: {}",
        style(config.recommend.exclude_history).cyan()
    );

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    let exists = config_dir.join("config.toml").exists();
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("Existing configuration is invalid. Using defaults.").yellow()
            );
            Ok(Config::with_base_dir(config_dir))
        },
        |config| {
            if exists {
                eprintln!("{}", style("Found existing configuration.").green());
            } else {
                eprintln!(
                    "{}",
                    style("No existing configuration found. Using defaults.").yellow()
                );
            }
            Ok(config)
        },
    )
}

fn configure_data(config: &mut Config) -> Result<()> {
    let news_path: String = Input::new()
        .with_prompt("Article corpus (TSV)")
        .default(config.data.news_path.display().to_string())
        .validate_with(non_empty_path)
        .interact_text()?;

    let interactions_path: String = Input::new()
        .with_prompt("Interaction log (TSV)")
        .default(config.data.interactions_path.display().to_string())
        .validate_with(non_empty_path)
        .interact_text()?;

    let formats = [InteractionFormat::Pairs, InteractionFormat::Behaviors];
    let default_index = formats
        .iter()
        .position(|&f| f == config.data.interactions_format)
        .unwrap_or(0);
    let format_index = Select::new()
        .with_prompt("Interaction log format")
        .default(default_index)
        .items(&formats)
        .interact()?;

    config.data.set_news_path(PathBuf::from(news_path))?;
    config
        .data
        .set_interactions_path(PathBuf::from(interactions_path))?;
    config.data.interactions_format = formats[format_index];

    Ok(())
}

fn configure_recommendations(config: &mut Config) -> Result<()> {
    let default_limit: usize = Input::new()
        .with_prompt("Default number of recommendations")
        .default(config.recommend.default_limit)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if *input == 0 {
                Err("Limit must be greater than 0")
            } else if *input > 1000 {
                Err("Limit must be 1000 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let query_boost: f32 = Input::new()
        .with_prompt("Score boost for articles matching the search query")
        .default(config.recommend.query_boost)
        .validate_with(|input: &f32| -> Result<(), ConfigError> {
            let mut temp_config = Config::default();
            temp_config.set_query_boost(*input)
        })
        .interact_text()?;

    let exclude_history = Confirm::new()
        .with_prompt("Hide articles the user has already read?")
        .default(config.recommend.exclude_history)
        .interact()?;

    let stop_words = [StopWords::None, StopWords::English];
    let default_index = stop_words
        .iter()
        .position(|&s| s == config.vectorizer.stop_words)
        .unwrap_or(0);
    let stop_words_index = Select::new()
        .with_prompt("Stop word list")
        .default(default_index)
        .items(&stop_words)
        .interact()?;

    config.set_default_limit(default_limit)?;
    config.set_query_boost(query_boost)?;
    config.recommend.exclude_history = exclude_history;
    config.vectorizer.stop_words = stop_words[stop_words_index];

    Ok(())
}

#[expect(clippy::ptr_arg, reason = "dialoguer validators receive &String")]
fn non_empty_path(input: &String) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("Path cannot be empty")
    } else {
        Ok(())
    }
}
