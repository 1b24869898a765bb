use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use crate::domain::KNOWN_TOPICS;

#[derive(Parser)]
#[command(name = "newstrackr")]
#[command(about = "Fetch news feeds, resolve article links and summarize them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show trending news, or news for one topic
    Top {
        /// News section; omit for trending stories
        #[arg(
            short,
            long,
            ignore_case = true,
            value_parser = PossibleValuesParser::new(KNOWN_TOPICS.iter().copied())
        )]
        topic: Option<String>,

        /// Two-letter country code (defaults to NEWSTRACKR_COUNTRY)
        #[arg(short, long)]
        country: Option<String>,

        /// Number of articles to process, 5 to 25
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print records as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search news
    Search {
        /// Search terms
        query: String,

        /// Number of articles to process, 5 to 25
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Print records as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List known topics and country codes
    List,

    /// Print the effective configuration
    Config,
}
