use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use oxdict::scraper::{Lookup, ScraperError, WebScraper};

#[derive(Parser)]
#[command(name = "oxdict")]
#[command(about = "An oxfordlearnersdictionaries.com scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Look a word up by its direct definition page
    Define {
        #[arg(help = "Word to look up")]
        word: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Look a word up through the search endpoint (follows the best match)
    Search {
        #[arg(help = "Word to search for")]
        word: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let (word, mode, format) = match cli.command {
        Commands::Define { word, format } => (word, Lookup::Define, format),
        Commands::Search { word, format } => (word, Lookup::Search, format),
    };

    log::info!("Fetching {}...", mode.url(&word));

    let entry = match scraper.fetch_entry(&word, mode) {
        Ok(entry) => entry,
        Err(ScraperError::WordNotFound(word)) => {
            log::error!("No dictionary entry for '{}'", word);
            process::exit(1);
        }
        Err(e) => {
            log::error!("Error fetching entry: {}", e);
            process::exit(1);
        }
    };

    match format {
        OutputFormat::Json => serialize_json(&entry),
        OutputFormat::Text => print!("{}", entry),
    }
}
