mod api;
mod export;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use competitor_analytics::config::{AnalyticsConfig, LoggingConfig};
use competitor_analytics::ingest::{dataset_to_json, parse_dataset};
use competitor_analytics::synthetic::generate_dataset;
use competitor_analytics::{
    build_report, format_float, format_number, format_percent, AnalysisReport,
};

pub(crate) const DEFAULT_DEMO_USERS: &str = "example_user1,example_user2,example_user3";

#[derive(Parser)]
#[command(name = "competitor-analytics", about = "Competitor social media analytics")]
struct Cli {
    /// Path to an analytics TOML config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a competitor dataset.
    Analyze(AnalyzeArgs),
    /// Generate a synthetic competitor dataset.
    Demo(DemoArgs),
    /// Serve the analytics JSON API.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    /// Dataset JSON file; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Write the full report as JSON.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct DemoArgs {
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_DEMO_USERS)]
    users: Vec<String>,
    #[arg(long, default_value_t = 20)]
    posts: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = AnalyticsConfig::load(cli.config).map_err(|err| err.to_string())?;
    init_logging(&config.logging);
    tracing::debug!(path = ?config_path, "configuration loaded");

    match cli.command {
        Command::Analyze(args) => run_analyze(args, &config).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Serve(args) => server::serve(args, config).await,
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &AnalyticsConfig) -> Result<(), String> {
    let raw = read_input(args.input.as_deref())?;
    let dataset = parse_dataset(&raw).map_err(|err| err.to_string())?;
    let report = build_report(&dataset, config).map_err(|err| err.to_string())?;

    print_metrics(&report);
    print_insights(&report);
    if args.details {
        print_details(&report);
    }

    if let Some(path) = args.output {
        export::write_json(&path, &report)
            .await
            .map_err(|err| err.to_string())?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

async fn run_demo(args: DemoArgs) -> Result<(), String> {
    let usernames: Vec<String> = args
        .users
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if usernames.is_empty() {
        return Err("at least one username is required".to_string());
    }

    let dataset = generate_dataset(&usernames, args.posts, args.seed);
    let payload = dataset_to_json(&dataset).map_err(|err| err.to_string())?;

    match args.output {
        Some(path) => {
            export::write_json(&path, &payload)
                .await
                .map_err(|err| err.to_string())?;
            println!(
                "Demo dataset with {} profiles written to {}",
                dataset.len(),
                path.display()
            );
        }
        None => {
            let text = serde_json::to_string_pretty(&payload)
                .map_err(|err| format!("failed to serialize dataset: {}", err))?;
            println!("{}", text);
        }
    }
    Ok(())
}

fn print_metrics(report: &AnalysisReport) {
    if report.metrics.is_empty() {
        println!("No profiles with posts to compare.");
        return;
    }

    println!("Competitor metrics ({} profiles):", report.metrics.len());
    for row in &report.metrics {
        println!(
            "- {}{}: followers {} | engagement rate {} | avg engagement {} | posts/week {} | follower ratio {}",
            row.username,
            if row.verified { " (verified)" } else { "" },
            format_number(row.followers as f64),
            format_percent(row.engagement_rate),
            format_number(row.avg_engagement),
            format_float(row.posts_per_week, 2),
            format_float(row.follower_following_ratio, 2)
        );
    }
}

fn print_insights(report: &AnalysisReport) {
    let insights = &report.insights;
    if insights.is_empty() {
        println!("\nNot enough data for insights.");
        return;
    }

    if let Some(top) = &insights.top_performers {
        println!(
            "\nTop performers: engagement {} | followers {} | activity {}",
            top.highest_engagement, top.most_followers, top.most_active
        );
    }
    if let Some(benchmarks) = &insights.benchmarks {
        println!(
            "Benchmarks: engagement rate {} | followers {} | posting frequency {} posts per week",
            format_percent(benchmarks.avg_engagement_rate),
            format_number(benchmarks.avg_followers),
            format_float(benchmarks.avg_posting_frequency, 2)
        );
    }
    if let Some(recommendations) = &insights.recommendations {
        println!("\nRecommendations:");
        println!("- Optimal content type: {}", recommendations.optimal_content_type);
        println!(
            "- Target engagement rate: {}",
            format_percent(recommendations.target_engagement_rate)
        );
        println!(
            "- Posting frequency: {}",
            recommendations.recommended_posting_frequency
        );
    }
    if let Some(gaps) = &insights.competitive_gaps {
        println!(
            "\nLeader advantage: engagement {} pts | followers {} | activity {} posts per week",
            format_float(gaps.engagement_leader_advantage, 2),
            format_float(gaps.follower_leader_advantage, 0),
            format_float(gaps.activity_leader_advantage, 2)
        );
    }
}

fn print_details(report: &AnalysisReport) {
    println!("\nProfile details:");
    for profile in &report.profiles {
        let patterns = &profile.posting_patterns;
        println!("  {}:", profile.username);
        if patterns.is_empty() {
            println!("    no posts");
            continue;
        }
        println!(
            "    best day: {} | best time: {} | posts: {}",
            patterns.optimal_day.map(|day| day.label()).unwrap_or("-"),
            patterns.optimal_time.map(|time| time.label()).unwrap_or("-"),
            patterns.total_posts
        );
        println!(
            "    best content type: {}",
            profile
                .content_performance
                .best_performing
                .map(|content_type| content_type.label())
                .unwrap_or("-")
        );
        let tags: Vec<&str> = profile
            .hashtags
            .top_by_frequency
            .iter()
            .take(5)
            .map(|entry| entry.hashtag.as_str())
            .collect();
        if !tags.is_empty() {
            println!(
                "    top hashtags: {} ({} per post)",
                tags.join(" "),
                format_float(profile.hashtags.avg_hashtags_per_post, 2)
            );
        }
    }

    if !report.hashtag_adoption.is_empty() {
        println!("\nMost adopted hashtags:");
        for entry in &report.hashtag_adoption {
            println!("- {} (used by {} competitors)", entry.hashtag, entry.competitors);
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    if let Some(path) = path {
        return std::fs::read_to_string(path)
            .map_err(|err| format!("failed reading {}: {}", path.display(), err));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    if buffer.trim().is_empty() {
        return Err("missing dataset: pass --input or pipe JSON on stdin".to_string());
    }
    Ok(buffer)
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
