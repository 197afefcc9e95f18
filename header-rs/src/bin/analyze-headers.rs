//! CLI for inspecting email header dumps
//!
//! # Usage
//!
//! ```bash
//! # Analyze one or more header dumps (raw text or JSON)
//! analyze-headers analyze hdr.txt hdr2.json
//!
//! # Read from stdin
//! cat message.eml | analyze-headers analyze
//!
//! # Show the parsed header structure
//! analyze-headers parse hdr.txt
//!
//! # Show the normalized {key, value} entries
//! analyze-headers normalize hdr.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use header_rs::analysis::{HeaderAnalyzer, HeaderInput};
use header_rs::{logging, Config};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "analyze-headers")]
#[command(about = "Check SPF/DKIM/DMARC results in email headers", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Treat input as raw header text even if it parses as JSON
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print authentication flags for each input
    Analyze {
        /// Header dump files (stdin when omitted)
        files: Vec<PathBuf>,
    },
    /// Print the parsed structure of a raw header block
    Parse {
        /// Raw header file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print the normalized entry list
    Normalize {
        /// Header dump file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    logging::init(&config.logging)?;

    let analyzer = HeaderAnalyzer::new(&config.analysis);

    match cli.command {
        Commands::Analyze { files } => {
            if files.is_empty() {
                let input = to_input(&read_input(None)?, cli.raw)?;
                print_json(&analyzer.analyze(input)?)?;
            }

            for file in &files {
                info!("Analyzing {}", file.display());
                let input = to_input(&read_input(Some(file))?, cli.raw)?;
                let result = analyzer
                    .analyze(input)
                    .with_context(|| format!("Failed to analyze {}", file.display()))?;
                print_json(&result)?;
            }
        }
        Commands::Parse { file } => {
            let text = read_input(file.as_deref())?;
            let parsed = analyzer.parser().parse(&text)?;
            print_json(&parsed)?;
        }
        Commands::Normalize { file } => {
            let input = to_input(&read_input(file.as_deref())?, cli.raw)?;
            let entries = analyzer.normalize(input)?;
            debug!("Normalized {} entries", entries.len());
            print_json(&entries)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn to_input(text: &str, raw: bool) -> anyhow::Result<HeaderInput> {
    if raw {
        Ok(HeaderInput::Raw(text.to_string()))
    } else {
        Ok(HeaderInput::from_text(text)?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
