use crate::error::{CliError, Result};
use residb::engine::config::parse_sequence;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A residue sequence written either as one string or as an array of names.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FileSequence {
    Text(String),
    List(Vec<String>),
}

impl FileSequence {
    pub fn into_residues(self) -> Vec<String> {
        match self {
            FileSequence::Text(text) => parse_sequence(&text),
            FileSequence::List(names) => names,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub sequence: Option<FileSequence>,
    pub parameter_set: Option<String>,
    pub require_parameters: Option<bool>,
    pub chain_name: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading build configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
