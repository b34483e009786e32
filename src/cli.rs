use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inquire::Text;
use tracing::info;

use crate::config::Settings;
use crate::models::event::EventRecord;
use crate::service::extraction_service::EventExtractor;
use crate::service::ics_service;

#[derive(Parser)]
#[command(about = "Turn free-form event descriptions into .ics calendar files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the event fields from text and print them as JSON
    Extract {
        text: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Write a calendar file from explicit fields
    Ics {
        #[arg(long)]
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Extract from text and write the calendar file in one go
    Convert {
        text: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn cli(
    extractor: &EventExtractor,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    // Fine to exit here on bad arguments
    let cli = Cli::parse();
    run_command(cli.command, extractor, settings).await
}

pub async fn run_command(
    command: Commands,
    extractor: &EventExtractor,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Extract { text, api_key } => {
            let text = resolve_text(text)?;
            let record = extractor.extract(Some(&text), api_key.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Ics {
            title,
            date,
            time,
            location,
            description,
            output,
        } => {
            let record = EventRecord::from_parts(
                Some(&title),
                Some(&date),
                time.as_deref(),
                location.as_deref(),
                description.as_deref(),
            );
            write_calendar(&record, output, settings).await?;
        }
        Commands::Convert {
            text,
            api_key,
            output,
        } => {
            let text = resolve_text(text)?;
            let record = extractor.extract(Some(&text), api_key.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            write_calendar(&record, output, settings).await?;
        }
    }
    Ok(())
}

async fn write_calendar(
    record: &EventRecord,
    output: Option<PathBuf>,
    settings: &Settings,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let content = ics_service::generate_ics(record, &settings.calendar_name)?;
    let path = output.unwrap_or_else(|| PathBuf::from(ics_service::download_filename(record)));
    tokio::fs::write(&path, content).await?;
    info!(path = %path.display(), "calendar file written");
    println!("Wrote {}", path.display());
    Ok(path)
}

fn resolve_text(text: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    match text {
        Some(text) => Ok(text),
        None => specify_prompt(),
    }
}

fn specify_prompt() -> Result<String, Box<dyn std::error::Error>> {
    Ok(Text::new("Describe the event.").prompt()?)
}
