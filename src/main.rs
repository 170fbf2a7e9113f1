use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use storyline::cluster::agglomerative::Linkage;
use storyline::cluster::tfidf::TextField;
use storyline::config::Config;
use storyline::corpus::{self, Article, MissingFieldPolicy};
use storyline::output::terminal;
use storyline::pipeline::{self, ClusterCount, ClusterResult};

/// Storyline: group news articles into stories.
///
/// Reads the scraper's article cache, clusters articles that cover the same
/// story, and prints each story with its keywords and sample headlines.
#[derive(Parser)]
#[command(name = "storyline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the article cache and list every story
    Clusters {
        #[command(flatten)]
        run: RunArgs,

        /// Only show stories covered by more than one source
        #[arg(long)]
        featured: bool,

        /// Print the full result as JSON instead of the story list
        #[arg(long)]
        json: bool,
    },

    /// Show every article in one story
    Cluster {
        /// Story number as shown by `storyline clusters` (starts at 1)
        id: usize,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options shared by every command that clusters the cache.
#[derive(Args)]
struct RunArgs {
    /// Article cache JSON (default: STORYLINE_ARTICLES_PATH or article_cache.json)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Merge cutoff for cluster distance (default: 1.5)
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of stories: threshold (default), auto (by corpus size) or a fixed count
    #[arg(long)]
    clusters: Option<ClusterCount>,

    /// Cluster linkage: average, complete or single
    #[arg(long)]
    linkage: Option<Linkage>,

    /// Text to vectorize: body or title-body
    #[arg(long)]
    text_field: Option<TextField>,

    /// Drop thin articles (short title or body, no image) before clustering
    #[arg(long)]
    clean: bool,

    /// Treat a missing title or body as empty instead of rejecting the cache
    #[arg(long)]
    allow_missing: bool,
}

impl RunArgs {
    /// Apply CLI overrides on top of the environment configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.articles_path = input.clone();
        }
        if let Some(threshold) = self.threshold {
            config.distance_threshold = threshold;
        }
        if let Some(clusters) = self.clusters {
            config.cluster_count = clusters;
        }
        if let Some(linkage) = self.linkage {
            config.linkage = linkage;
        }
        if let Some(text_field) = self.text_field {
            config.text_field = text_field;
        }
    }

    fn missing_field_policy(&self) -> MissingFieldPolicy {
        if self.allow_missing {
            MissingFieldPolicy::TreatAsEmpty
        } else {
            MissingFieldPolicy::Reject
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storyline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clusters {
            run,
            featured,
            json,
        } => {
            let (_, result) = load_and_cluster(&run)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_stories(&result, featured);
            }
        }

        Commands::Cluster { id, run } => {
            let (articles, result) = load_and_cluster(&run)?;

            match result.story(id) {
                Some(story) => terminal::display_story_detail(story, &articles),
                None => {
                    anyhow::bail!(
                        "No story {id}. There are {} stories; run `storyline clusters` to list them.",
                        result.n_clusters()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Load the cache named by config and flags, optionally clean it, and cluster it.
fn load_and_cluster(run: &RunArgs) -> Result<(Vec<Article>, ClusterResult)> {
    let mut config = Config::load()?;
    run.apply(&mut config);

    let mut articles = corpus::load_articles(&config.articles_path, run.missing_field_policy())?;
    if run.clean {
        articles = corpus::clean_articles(articles)?;
    }

    if articles.is_empty() {
        println!(
            "{}",
            format!("No articles to cluster in {}", config.articles_path.display()).yellow()
        );
        if run.clean {
            println!("{}", "Every article was dropped by --clean.".dimmed());
        }
        anyhow::bail!("Nothing to cluster");
    }

    let params = config.engine_params();
    info!(
        articles = articles.len(),
        threshold = params.distance_threshold,
        clusters = %params.cluster_count,
        linkage = %params.linkage,
        "Clustering articles"
    );
    let result = pipeline::cluster_articles(&articles, &params)
        .with_context(|| format!("Failed to cluster {}", config.articles_path.display()))?;

    Ok((articles, result))
}
