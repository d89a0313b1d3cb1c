use thiserror::Error;

#[derive(Error, Debug)]
pub enum BomError {
    #[error(transparent)]
    Common(#[from] bom_scanner_common::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TME credentials are not set. Run `bom-scan config --set-token TOKEN --set-secret SECRET` or export TME_TOKEN / TME_APP_SECRET")]
    MissingCredentials,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BomError>;
