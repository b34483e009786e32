use thiserror::Error;

/// Failures talking to the completion backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Could not reach the completion backend: {0}")]
    Request(String),

    #[error("Completion backend returned status {status}")]
    Status { status: u16, body: String },

    #[error("Could not decode the completion backend response: {0}")]
    Decode(String),

    #[error("Completion backend returned no content")]
    EmptyReply,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Request(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Input text is required")]
    MissingInput,

    #[error("An API key for the completion backend is required")]
    MissingCredential,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Could not extract structured event data from the text")]
    ExtractionParse { reply: String },
}

impl ExtractError {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractError::MissingInput => "missing_input",
            ExtractError::MissingCredential => "missing_credential",
            ExtractError::Backend(_) => "backend",
            ExtractError::ExtractionParse { .. } => "extraction_parse",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IcsError {
    #[error("A title and a start date are required to create an event")]
    IncompleteRecord,

    #[error("Invalid {field}: {value:?}")]
    DateParse { field: &'static str, value: String },
}

impl IcsError {
    pub fn label(&self) -> &'static str {
        match self {
            IcsError::IncompleteRecord => "incomplete_record",
            IcsError::DateParse { .. } => "date_parse",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config line {line}: {content}")]
    Syntax { line: usize, content: String },

    #[error("Invalid value for {key}: {value:?}")]
    Value { key: &'static str, value: String },
}
