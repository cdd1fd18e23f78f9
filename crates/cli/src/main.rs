use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, UserId};
use ml_client::{AlsParams, ExportedRecommendations, Metric, Recommender, RecommenderClient};
use report::{RenderConfig, build_reports, render_report};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// ReelReport - top-N movie recommendation reports from an ALS model
#[derive(Parser, Debug)]
#[command(name = "reel-report")]
#[command(about = "Train an ALS recommender and print per-user top-N reports", long_about = None)]
struct Cli {
    /// Directory holding movies.csv and ratings.csv
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Address of the ALS recommender service
    #[arg(long, default_value = "http://localhost:50051")]
    ml_service: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload ratings and train the ALS model on the service
    Train {
        /// Number of latent factors
        #[arg(long, default_value_t = AlsParams::default().rank)]
        rank: u32,

        #[arg(long, default_value_t = AlsParams::default().max_iter)]
        max_iter: u32,

        /// Regularization strength
        #[arg(long, default_value_t = AlsParams::default().reg_param)]
        reg_param: f64,

        /// Share of ratings used for training; the rest is held out
        #[arg(long, default_value_t = AlsParams::default().train_fraction)]
        train_fraction: f64,

        /// Seed for the train/test split
        #[arg(long, default_value_t = AlsParams::default().seed)]
        seed: u64,
    },

    /// Print the model's RMSE on the held-out ratings
    Evaluate {
        /// Read a finished run from this export directory instead of the service
        #[arg(long)]
        from_export: Option<PathBuf>,
    },

    /// Print top-N recommendations for one or more users
    Recommend {
        /// Users to report on
        #[arg(long, num_args = 1.., value_delimiter = ',', required = true)]
        user_ids: Vec<UserId>,

        /// Number of recommendations per user
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Read a finished run from this export directory instead of the service
        #[arg(long)]
        from_export: Option<PathBuf>,

        /// Never truncate titles
        #[arg(long)]
        full_width: bool,

        /// Truncate titles longer than this (ignored with --full-width)
        #[arg(long, default_value_t = RenderConfig::default().max_title_width)]
        max_title_width: usize,
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

    match cli.command {
        Commands::Train {
            rank,
            max_iter,
            reg_param,
            train_fraction,
            seed,
        } => {
            let params = AlsParams {
                rank,
                max_iter,
                reg_param,
                train_fraction,
                seed,
                ..AlsParams::default()
            };
            handle_train(&cli.data_dir, &cli.ml_service, &params).await?
        }
        Commands::Evaluate { from_export } => match from_export {
            Some(dir) => {
                let mut export = open_export(&dir)?;
                handle_evaluate(&mut export).await?
            }
            None => {
                let mut client = connect(&cli.ml_service).await?;
                handle_evaluate(&mut client).await?
            }
        },
        Commands::Recommend {
            user_ids,
            top_n,
            from_export,
            full_width,
            max_title_width,
        } => {
            let config = if full_width {
                RenderConfig::full_width()
            } else {
                RenderConfig::default().with_max_title_width(max_title_width)
            };
            let data_index = load_dataset(&cli.data_dir)?;
            match from_export {
                Some(dir) => {
                    let mut export = open_export(&dir)?;
                    handle_recommend(&mut export, &data_index, &user_ids, top_n, &config).await?
                }
                None => {
                    let mut client = connect(&cli.ml_service).await?;
                    handle_recommend(&mut client, &data_index, &user_ids, top_n, &config).await?
                }
            }
        }
    }

    Ok(())
}

fn load_dataset(data_dir: &Path) -> Result<DataIndex> {
    println!("Loading dataset from {}...", data_dir.display());
    let start = Instant::now();
    let data_index = DataIndex::load_from_files(data_dir).context("Failed to load dataset")?;
    let (users, movies, ratings) = data_index.counts();
    println!(
        "{} Loaded {} movies, {} ratings from {} users in {:?}",
        "✓".green(),
        movies,
        ratings,
        users,
        start.elapsed()
    );
    Ok(data_index)
}

async fn connect(addr: &str) -> Result<RecommenderClient> {
    RecommenderClient::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to ML service at {}", addr))
}

fn open_export(dir: &Path) -> Result<ExportedRecommendations> {
    ExportedRecommendations::open(dir)
        .with_context(|| format!("Failed to open export directory {}", dir.display()))
}

/// Handle the 'train' command
async fn handle_train(data_dir: &Path, addr: &str, params: &AlsParams) -> Result<()> {
    let data_index = load_dataset(data_dir)?;
    let mut client = connect(addr).await?;

    let start = Instant::now();
    let summary = client
        .fit(data_index.ratings(), params)
        .await
        .context("Training failed")?;

    println!(
        "{} Trained on {} ratings, holding out {} for evaluation ({:?})",
        "✓".green(),
        summary.train_count,
        summary.test_count,
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'evaluate' command
async fn handle_evaluate<R: Recommender>(recommender: &mut R) -> Result<()> {
    let rmse = recommender
        .evaluate(Metric::Rmse)
        .await
        .context("Evaluation failed")?;
    println!("Root-mean-square error = {}", format!("{:.4}", rmse).bold());
    Ok(())
}

/// Handle the 'recommend' command
///
/// Every requested user gets a table or an error line; the command fails
/// at the end if any user could not be reported.
async fn handle_recommend<R: Recommender>(
    recommender: &mut R,
    data_index: &DataIndex,
    user_ids: &[UserId],
    top_n: usize,
    config: &RenderConfig,
) -> Result<()> {
    let bulk = recommender
        .recommend_for_all_users(top_n)
        .await
        .context("Failed to fetch recommendations")?;
    info!("Model returned recommendations for {} users", bulk.len());

    let reports = build_reports(user_ids, &bulk, data_index);

    let mut failed = 0;
    for user_report in &reports {
        println!();
        println!(
            "{}",
            format!("Recommendations for user {}", user_report.user_id)
                .bold()
                .blue()
        );
        match &user_report.outcome {
            Ok(report) => print!("{}", render_report(report, config)),
            Err(e) => {
                failed += 1;
                println!("{} {}", "✗".red(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} reports could not be built", failed, reports.len());
    }
    Ok(())
}
