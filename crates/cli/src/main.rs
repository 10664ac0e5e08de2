use anyhow::{Context, Result, anyhow};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{AppConfig, MovieRecommendation, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// CineMatrix - content-based movie recommendations
#[derive(Parser)]
#[command(name = "cinematrix")]
#[command(about = "Find movies similar to one you like", long_about = None)]
struct Cli {
    /// Catalog table artifact (overrides CINEMATRIX_CATALOG_PATH)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Similarity matrix artifact (overrides CINEMATRIX_SIMILARITY_PATH)
    #[arg(long)]
    similarity: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the titles that can be used with `recommend`
    Titles {
        /// Only show titles containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of titles to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Recommend movies similar to a title
    Recommend {
        /// Exact title as listed by `titles`
        #[arg(long)]
        title: String,

        /// Number of recommendations (defaults to CINEMATRIX_RECOMMENDATION_COUNT)
        #[arg(long)]
        limit: Option<usize>,

        /// Skip poster lookups
        #[arg(long)]
        no_posters: bool,
    },

    /// Time recommendation queries over the catalog
    Benchmark {
        /// Number of queries to run
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if let Some(path) = cli.similarity {
        config.similarity_path = path;
    }

    // Nothing is usable without the artifacts, so a load failure ends the process
    println!("Loading catalog from {}...", config.catalog_path.display());
    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_files(&config.catalog_path, &config.similarity_path)
            .context("Failed to load movie catalog")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Titles { search, limit } => handle_titles(&catalog, search, limit)?,
        Commands::Recommend {
            title,
            limit,
            no_posters,
        } => handle_recommend(catalog, &config, title, limit, no_posters).await?,
        Commands::Benchmark { requests } => handle_benchmark(catalog, &config, requests)?,
    }

    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(catalog: &Catalog, search: Option<String>, limit: Option<usize>) -> Result<()> {
    let titles: Vec<&str> = match &search {
        Some(query) => catalog
            .search(query)
            .into_iter()
            .map(|m| m.title.as_str())
            .collect(),
        None => catalog.titles(),
    };

    if titles.is_empty() {
        if let Some(query) = search {
            return Err(anyhow!("No titles match '{}'", query));
        }
    }

    let shown = limit.unwrap_or(titles.len()).min(titles.len());
    for title in &titles[..shown] {
        println!("{}", title);
    }
    if shown < titles.len() {
        println!("{}", format!("... and {} more", titles.len() - shown).dimmed());
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: Arc<Catalog>,
    config: &AppConfig,
    title: String,
    limit: Option<usize>,
    no_posters: bool,
) -> Result<()> {
    let orchestrator = if no_posters {
        RecommendationOrchestrator::new(catalog, config.placeholder_lookup())
    } else {
        RecommendationOrchestrator::from_config(catalog, config)?
    };
    let limit = limit.unwrap_or(config.recommendation_count);

    let recommendations = if no_posters {
        orchestrator.get_recommendations_without_posters(&title, limit)?
    } else {
        orchestrator.get_recommendations(&title, limit).await?
    };

    print_recommendations(&title, &recommendations, !no_posters);
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(catalog: Arc<Catalog>, config: &AppConfig, requests: usize) -> Result<()> {
    if catalog.is_empty() || requests == 0 {
        return Err(anyhow!("Nothing to benchmark"));
    }

    let orchestrator = RecommendationOrchestrator::new(catalog.clone(), config.placeholder_lookup());
    let titles = catalog.titles();

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for title in titles.iter().cycle().take(requests) {
        let start = Instant::now();
        orchestrator.get_recommendations_without_posters(title, config.recommendation_count)?;
        timings.push(start.elapsed());
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Queries: {}", requests);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} queries/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[MovieRecommendation], show_posters: bool) {
    println!(
        "{}",
        format!("Because you picked '{}':", title).bold().blue()
    );
    for rec in recommendations {
        println!(
            "{}. {} {}",
            rec.rank.to_string().green(),
            rec.title.bold(),
            format!("[{}% match]", rec.score).magenta()
        );
        if show_posters {
            println!("   Poster: {}", rec.poster_url.dimmed());
        }
    }
}
