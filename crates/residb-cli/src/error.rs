use residb::core::database::registry::DatabaseError;
use residb::core::io::csv::CsvExportError;
use residb::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    CsvExport(#[from] CsvExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Database validation failed with {errors} error(s) and {warnings} warning(s)")]
    Validation { errors: usize, warnings: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
