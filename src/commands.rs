use anyhow::{Context, Result};
use console::style;
use itertools::Itertools;
use serde::Serialize;
use std::fs;
use std::sync::Arc;

use crate::config::Config;
use crate::corpus::CorpusStore;
use crate::index::{ContentIndex, IndexSource, cache};
use crate::interactions::InteractionLog;
use crate::recommend::{Recommender, ScoredArticle};

/// How many neighbours `show` lists under an article
const SIMILAR_ARTICLES_SHOWN: usize = 5;

/// JSON shape printed by `recommend --json`
#[derive(Debug, Serialize)]
struct RecommendationReport<'a> {
    user_id: &'a str,
    query: Option<&'a str>,
    recommendations: Vec<ScoredArticle>,
}

fn load_interactions(config: &Config) -> InteractionLog {
    InteractionLog::load_or_empty(config.interactions_path(), config.data.interactions_format)
}

/// Missing or unreadable corpus files give an empty index
fn open_index(config: &Config, force_rebuild: bool) -> (ContentIndex, IndexSource) {
    let corpus = CorpusStore::load_or_empty(config.news_path());
    ContentIndex::load_or_build(
        corpus,
        &config.vectorizer,
        &config.cache_dir_path(),
        force_rebuild,
    )
}

/// Fit the vectorizer and similarity matrix, refreshing the on-disk cache
#[inline]
pub fn build_index(config: &Config, force: bool) -> Result<()> {
    let (index, source) = open_index(config, force);

    if index.is_empty() {
        println!(
            "{}",
            style("No articles to index. Check the configured corpus path.").yellow()
        );
        println!("Articles: {}", config.news_path().display());
        return Ok(());
    }

    let stats = index.corpus().stats();
    println!("{}", style("✓ Content index ready").green());
    println!("  Source: {}", source);
    println!("  Articles: {}", index.len());
    println!("  Vocabulary: {} terms", index.vectorizer().vocabulary_size());
    if stats.missing_text > 0 {
        println!("  Dropped (missing text): {}", stats.missing_text);
    }
    if stats.duplicate_ids > 0 {
        println!("  Dropped (duplicate id): {}", stats.duplicate_ids);
    }
    if stats.malformed_rows > 0 {
        println!("  Skipped (malformed): {}", stats.malformed_rows);
    }
    println!(
        "  Cache: {}",
        cache::cache_file_path(&config.cache_dir_path()).display()
    );

    Ok(())
}

/// Print recommendations for `user_id`
#[inline]
pub fn recommend(
    config: &Config,
    user_id: &str,
    limit: Option<usize>,
    query: Option<&str>,
    json: bool,
) -> Result<()> {
    let (index, _) = open_index(config, false);
    let log = load_interactions(config);
    let recommender = Recommender::new(Arc::new(index), config.recommend.clone());

    let recommendations = recommender.recommend_scored(user_id, &log, limit, query);

    if json {
        let report = RecommendationReport {
            user_id,
            query,
            recommendations,
        };
        let output = serde_json::to_string_pretty(&report)
            .context("Failed to serialize recommendations")?;
        println!("{output}");
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No recommendations for user {}.", style(user_id).cyan());
        if log.history_of(user_id).next().is_none() {
            println!("The user has no reading history. Try adding --query.");
        }
        return Ok(());
    }

    println!(
        "{}",
        style(format!("📰 Recommendations for {user_id}")).bold().cyan()
    );
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        println!("Boosting articles that mention \"{}\"", query);
    }
    println!();

    for (rank, scored) in recommendations.iter().enumerate() {
        let title = recommender
            .index()
            .article(&scored.id)
            .map_or("", |article| article.title.as_str());
        println!(
            "{:>3}. {} {:.4}  {}",
            rank + 1,
            style(&scored.id).cyan(),
            scored.score,
            title
        );
    }

    Ok(())
}

/// Print one article and its closest neighbours
#[inline]
pub fn show_article(config: &Config, article_id: &str) -> Result<()> {
    let (index, _) = open_index(config, false);

    let Some(article) = index.article(article_id) else {
        println!("Article not found: {}", style(article_id).yellow());
        return Ok(());
    };

    println!("{} {}", style("📄").bold(), style(&article.title).bold());
    println!("   ID: {}", article.id);
    if !article.category.is_empty() {
        println!("   Category: {} / {}", article.category, article.subcategory);
    }
    if let Some(url) = &article.url {
        println!("   URL: {}", url);
    }
    println!();
    println!("{}", article.body);

    let Some(position) = index.identifiers().position_of(article_id) else {
        return Ok(());
    };
    let Some(row) = index.similarity().row(position) else {
        return Ok(());
    };

    let neighbours = row
        .iter()
        .enumerate()
        .filter(|&(other, score)| other != position && *score > 0.0)
        .sorted_by(|a, b| b.1.total_cmp(a.1))
        .take(SIMILAR_ARTICLES_SHOWN)
        .collect_vec();

    if neighbours.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", style("Similar articles:").bold().yellow());
    for (other, score) in neighbours {
        if let Some(similar) = index.corpus().get(other) {
            println!(
                "   {} {:.4}  {}",
                style(&similar.id).cyan(),
                score,
                similar.title
            );
        }
    }

    Ok(())
}

/// Report on data files and the index cache without rebuilding anything
#[inline]
pub fn show_status(config: &Config) -> Result<()> {
    println!("📊 newsrec Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("⚙️  Configuration:");
    let config_path = config.config_file_path();
    if config_path.exists() {
        println!("   ✅ {}", config_path.display());
    } else {
        println!("   ⚠️  {} (using defaults)", config_path.display());
    }

    println!("📰 Article Corpus:");
    let news_path = config.news_path();
    let corpus = match CorpusStore::load(&news_path) {
        Ok(corpus) => {
            let stats = corpus.stats();
            println!("   ✅ {}", news_path.display());
            println!(
                "   📋 {} articles ({} rows read, {} dropped)",
                corpus.len(),
                stats.rows_read,
                stats.rows_read.saturating_sub(corpus.len())
            );
            Some(corpus)
        }
        Err(e) => {
            println!("   ❌ {}", e);
            None
        }
    };

    println!("👥 Interaction Log:");
    let interactions_path = config.interactions_path();
    match InteractionLog::load(&interactions_path, config.data.interactions_format) {
        Ok(log) => {
            let users = log
                .records()
                .iter()
                .map(|record| record.user_id.as_str())
                .unique()
                .count();
            println!(
                "   ✅ {} ({})",
                interactions_path.display(),
                config.data.interactions_format
            );
            println!("   📋 {} interactions from {} users", log.len(), users);
        }
        Err(e) => {
            println!("   ❌ {}", e);
        }
    }

    println!("💾 Index Cache:");
    let cache_dir = config.cache_dir_path();
    let cache_path = cache::cache_file_path(&cache_dir);
    match fs::metadata(&cache_path) {
        Ok(metadata) => {
            println!(
                "   📁 {} ({} KiB)",
                cache_path.display(),
                metadata.len() / 1024
            );
            if let Some(corpus) = corpus {
                match cache::load(&cache_dir, &corpus, &config.vectorizer) {
                    Ok(_) => println!("   ✅ Up to date"),
                    Err(e) => println!("   ⚠️  Will be rebuilt: {}", e),
                }
            }
        }
        Err(_) => {
            println!("   💤 Not built yet. Run 'newsrec build'.");
        }
    }

    Ok(())
}
