use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use tabweave::config::{ClassifierBackend, Config};
use tabweave::content::provider::ContentProvider;
use tabweave::content::snapshot::SnapshotProvider;
use tabweave::grouping::engine::GroupingEngine;
use tabweave::output::terminal::TerminalSink;
use tabweave::topics::traits::{Availability, Classifier, NoClassifier};

/// Tabweave: group open pages by what they're about.
///
/// Asks a local language model for each page's topic and clusters pages
/// with matching topics. Without a model, pages are grouped by domain.
#[derive(Parser)]
#[command(name = "tabweave", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group the pages in a snapshot file and show the result
    Group {
        /// JSON snapshot of open pages
        snapshot: PathBuf,

        /// Skip the classifier and group by domain
        #[arg(long)]
        no_ai: bool,

        /// Seconds allowed per topic extraction (overrides TABWEAVE_TOPIC_TIMEOUT_SECS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },

    /// Show classifier backend and availability
    Status,

    /// Print the lexical similarity of two topics
    Similarity {
        topic_a: String,
        topic_b: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tabweave=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            snapshot,
            no_ai,
            timeout,
        } => {
            let config = Config::load()?;
            let mut options = config.engine_options();
            if let Some(secs) = timeout {
                options.extraction_timeout = Duration::from_secs(secs);
            }

            let classifier: Arc<dyn Classifier> = if no_ai {
                Arc::new(NoClassifier)
            } else {
                config.classifier()
            };
            let engine = GroupingEngine::with_options(classifier, options);

            let provider = SnapshotProvider::load(&snapshot)?;
            let pages = provider.pages().await?;
            info!(pages = pages.len(), snapshot = %snapshot.display(), "Loaded snapshot");
            let sink = TerminalSink::new(pages.into_iter().map(|p| (p.handle, p.title)));

            let outcome = engine.group_and_apply(&provider, &sink).await?;
            sink.display();
            println!(
                "{}",
                format!(
                    "Created {} groups from {} clusters ({} grouping).",
                    outcome.groups_created,
                    outcome.clusters.len(),
                    outcome.strategy
                )
                .dimmed()
            );
        }

        Commands::Status => {
            let config = Config::load()?;
            match config.classifier_backend {
                ClassifierBackend::None => {
                    println!("Classifier: none (grouping by domain)");
                }
                ClassifierBackend::Ollama => {
                    println!("Classifier: ollama at {}", config.ollama_url);
                    println!("Model: {}", config.model);
                    let availability = config.classifier().availability().await;
                    let shown = match availability {
                        Availability::Available => availability.to_string().green(),
                        Availability::Downloading => availability.to_string().yellow(),
                        Availability::Unavailable => availability.to_string().red(),
                    };
                    println!("Availability: {shown}");
                    if availability != Availability::Available {
                        println!(
                            "  {}",
                            format!("Run `ollama pull {}` to enable topic grouping.", config.model)
                                .dimmed()
                        );
                    }
                }
            }
            println!("Topic timeout: {}s", config.topic_timeout.as_secs());
        }

        Commands::Similarity { topic_a, topic_b } => {
            let score = tabweave::topics::similarity::score(&topic_a, &topic_b);
            println!("{score:.3}");
        }
    }

    Ok(())
}
