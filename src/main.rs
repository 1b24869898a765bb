use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use newstrackr::cli::{Cli, Commands};
use newstrackr::config::{clamp_count, Config};
use newstrackr::domain::{DisplayRecord, FeedQuery, KNOWN_COUNTRIES, KNOWN_TOPICS};
use newstrackr::errors::NewsResult;
use newstrackr::http::ReqwestFetcher;
use newstrackr::services::{Pipeline, RunReport, Session};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> NewsResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    init_logging(&config);

    match cli.command {
        Commands::Config => {
            println!("{}", config.describe());
            Ok(())
        }
        Commands::List => {
            print_known_values();
            Ok(())
        }
        Commands::Top {
            topic,
            country,
            count,
            json,
        } => {
            let country = country.unwrap_or_else(|| config.country.clone());
            let query = FeedQuery::top(topic.as_deref(), &country)?;
            let mut session = Session::new(ttl_window(&config));
            cmd_show(&config, &mut session, &query, count, json)
        }
        Commands::Search { query, count, json } => {
            let mut session = Session::new(ttl_window(&config));
            let query = session.enter_search(&query)?;
            cmd_show(&config, &mut session, &query, count, json)
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn ttl_window(config: &Config) -> chrono::Duration {
    chrono::Duration::from_std(config.cache_ttl).unwrap_or_else(|_| chrono::Duration::hours(1))
}

fn cmd_show(
    config: &Config,
    session: &mut Session,
    query: &FeedQuery,
    count: Option<usize>,
    json: bool,
) -> NewsResult<()> {
    let fetcher = Arc::new(ReqwestFetcher::new(&config.user_agent)?);
    let pipeline = Pipeline::new(fetcher, config);
    let count = count.map(clamp_count).unwrap_or(config.count);

    if !json {
        println!("Fetching latest news for {}...\n", query.label());
    }

    let items = session.load(pipeline.feeds(), query, Utc::now());
    if items.is_empty() {
        if json {
            println!("{}", serde_json::to_string_pretty(&RunReport::default())?);
        } else {
            println!("No news found for {}", query.label());
        }
        return Ok(());
    }

    let report = pipeline.run(items, count);

    for notice in &report.notices {
        eprintln!("{}", notice.format());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_known_values() {
    println!("Topics:");
    for topic in KNOWN_TOPICS {
        println!("  {}", topic);
    }

    println!("\nCountries:");
    for (name, code) in KNOWN_COUNTRIES {
        println!("  {}  {}", code, name);
    }
}

fn print_report(report: &RunReport) {
    for (i, record) in report.records.iter().enumerate() {
        print_record(i + 1, record);
    }

    println!(
        "Showing {} of {} articles.",
        report.records.len(),
        report.requested
    );
}

fn print_record(index: usize, record: &DisplayRecord) {
    println!("({}) {}", index, record.headline());

    match &record.article.top_image {
        Some(image) => println!("    Poster: {}", image),
        None => println!("    No poster image found."),
    }

    if !record.article.summary.is_empty() {
        println!("    {}", record.article.summary);
    }

    let source = if record.feed_item.source.is_empty() {
        "source"
    } else {
        record.feed_item.source.as_str()
    };
    println!("    Read more at {}: {}", source, record.final_url);

    if !record.feed_item.published_at.is_empty() {
        println!("    Published: {}", record.feed_item.published_at);
    }

    println!();
}
