#![allow(non_snake_case)]

use std::env;
use std::sync::Arc;

use textCalendar::cli;
use textCalendar::config::{AppConfig, Settings};
use textCalendar::runtime::{self, ApiState};
use textCalendar::service::extraction_service::EventExtractor;
use textCalendar::service::openai_service::OpenAIService;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    // Fine to panic here
    let settings = Settings::load(&config).expect("Invalid configuration");

    let openai = Arc::new(OpenAIService::from_settings(&settings));
    let extractor = EventExtractor::new(openai, settings.default_api_key.clone());

    match settings.run_mode.as_str() {
        "api" => {
            let state = Arc::new(ApiState {
                extractor,
                calendar_name: settings.calendar_name.clone(),
            });
            runtime::run_api(state, settings.api_addr).await;
        }
        "cli" => {
            if let Err(e) = cli::cli(&extractor, &settings).await {
                error!(error = %e, "command failed");
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("Invalid run mode {}", other);
            std::process::exit(2);
        }
    }
}
