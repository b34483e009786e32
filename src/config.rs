use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::SocketAddr;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_CALENDAR_NAME: &str = "My Calendar";
pub const DEFAULT_RUN_MODE: &str = "cli";
pub const DEFAULT_API_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Typed view over the configuration used by both run modes.
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub calendar_name: String,
    pub run_mode: String,
    pub api_addr: SocketAddr,
}

impl Settings {
    pub fn load(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| config.lookup(key))
    }

    pub fn from_lookup<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let temperature = match get_prop("OPENAI_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|_| ConfigError::Value {
                key: "OPENAI_TEMPERATURE",
                value: raw.clone(),
            })?,
            None => DEFAULT_TEMPERATURE,
        };
        let raw_addr = get_prop("API_ADDR").unwrap_or(DEFAULT_API_ADDR.to_string());
        let api_addr = raw_addr.trim().parse::<SocketAddr>().map_err(|_| ConfigError::Value {
            key: "API_ADDR",
            value: raw_addr.clone(),
        })?;

        Ok(Self {
            default_api_key: get_prop("OPENAI_API_KEY"),
            model: get_prop("OPENAI_MODEL").unwrap_or(DEFAULT_MODEL.to_string()),
            base_url: get_prop("OPENAI_BASE_URL")
                .unwrap_or(DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            temperature,
            calendar_name: get_prop("CALENDAR_NAME").unwrap_or(DEFAULT_CALENDAR_NAME.to_string()),
            run_mode: get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string()),
            api_addr,
        })
    }
}
