use clap::{Parser, Subcommand};
use scout_core::KeywordScout;
use std::path::PathBuf;

mod config;
mod output;

use config::load_config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "scout-cli")]
#[command(about = "Keyword opportunity analysis for video creators")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full opportunity/difficulty analysis for a keyword
    #[command(alias = "an")]
    Analyze {
        keyword: String,
        /// Also run the batched long-tail analysis and print it
        #[arg(long)]
        long_tails: bool,
        /// Cap on returned long-tail variations
        #[arg(long)]
        max_long_tails: Option<usize>,
    },
    /// Raw research bundle (search + autocomplete + metrics)
    #[command(alias = "re")]
    Research { keyword: String },
    /// Batched long-tail analysis only
    #[command(alias = "lt")]
    Longtail {
        keyword: String,
        #[arg(long)]
        max: Option<usize>,
    },
    /// Cached trending digest for a region
    #[command(alias = "tr")]
    Trending {
        #[arg(default_value = "US")]
        region: String,
        /// Show the cached videos instead of the keyword summaries
        #[arg(long)]
        videos: bool,
    },
    /// Warm the trending digest for a region now
    Warmup {
        #[arg(default_value = "US")]
        region: String,
        /// Keep running and re-warm all configured regions daily
        #[arg(long)]
        daemon: bool,
    },
    /// Validate the effective configuration and print it
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose raises the fallback level.
    let fallback = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;

    if matches!(cli.command, Commands::Config) {
        println!("{config:#?}");
        println!("configuration OK");
        return Ok(());
    }

    let adapters = scout_sources::build_adapters(&config.sources);
    let store = config.open_store().await?;
    let scout = KeywordScout::new(config.scout_config(), adapters, store);

    match cli.command {
        Commands::Analyze {
            keyword,
            long_tails,
            max_long_tails,
        } => {
            let analysis = scout
                .analyse_keyword(&keyword, max_long_tails.unwrap_or(config.max_long_tails))
                .await?;
            print!("{}", output::render_analysis(cli.format, &analysis));
            if long_tails {
                let results = scout
                    .analyse_long_tails(&keyword, max_long_tails.unwrap_or(config.max_long_tails))
                    .await?;
                print!("{}", output::render_long_tails(cli.format, &results));
            }
        }
        Commands::Research { keyword } => {
            let research = scout.research_keyword(&keyword).await?;
            print!("{}", output::render_research(cli.format, &research));
        }
        Commands::Longtail { keyword, max } => {
            let results = scout
                .analyse_long_tails(&keyword, max.unwrap_or(config.max_long_tails))
                .await?;
            print!("{}", output::render_long_tails(cli.format, &results));
        }
        Commands::Trending { region, videos } => {
            if videos {
                let cached = scout.get_trending_videos(&region).await?;
                print!(
                    "{}",
                    output::render_trending_videos(cli.format, &region, &cached)
                );
            } else {
                let cached = scout.get_trending_keywords(&region).await?;
                print!(
                    "{}",
                    output::render_trending_keywords(cli.format, &region, &cached)
                );
            }
        }
        Commands::Warmup { region, daemon } => {
            if daemon {
                let (shutdown, worker) = scout.spawn_warmup_worker();
                tokio::signal::ctrl_c().await?;
                let _ = shutdown.send(true);
                let _ = worker.await;
            } else {
                scout.warm_up_region(&region).await?;
                let cached = scout.get_trending_keywords(&region).await?;
                print!(
                    "{}",
                    output::render_trending_keywords(cli.format, &region, &cached)
                );
            }
        }
        Commands::Config => unreachable!("handled above"),
    }

    Ok(())
}
