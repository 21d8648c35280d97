use thiserror::Error;

pub const DEFAULT_PARAMETER_SET: &str = "amber";
pub const DEFAULT_CHAIN_NAME: &str = "A";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Settings for assembling one polymer chain from residue templates.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Residue names in chain order: template names or PDB residue names.
    pub sequence: Vec<String>,
    /// Parameter set supplying charges and atom types (`amber`).
    pub parameter_set: String,
    /// Fail instead of leaving atoms without charge or atom type.
    pub require_parameters: bool,
    pub chain_name: String,
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    sequence: Option<Vec<String>>,
    parameter_set: Option<String>,
    require_parameters: Option<bool>,
    chain_name: Option<String>,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence<I, S>(mut self, residues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence = Some(residues.into_iter().map(Into::into).collect());
        self
    }
    pub fn parameter_set(mut self, name: impl Into<String>) -> Self {
        self.parameter_set = Some(name.into());
        self
    }
    pub fn require_parameters(mut self, required: bool) -> Self {
        self.require_parameters = Some(required);
        self
    }
    pub fn chain_name(mut self, name: impl Into<String>) -> Self {
        self.chain_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        let sequence = self
            .sequence
            .ok_or(ConfigError::MissingParameter("sequence"))?;
        if sequence.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "sequence",
                reason: "sequence contains no residues".to_string(),
            });
        }
        let parameter_set = self
            .parameter_set
            .unwrap_or_else(|| DEFAULT_PARAMETER_SET.to_string());
        if parameter_set.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "parameter_set",
                reason: "name must not be empty".to_string(),
            });
        }
        Ok(AssemblyConfig {
            sequence,
            parameter_set,
            require_parameters: self.require_parameters.unwrap_or(false),
            chain_name: self
                .chain_name
                .unwrap_or_else(|| DEFAULT_CHAIN_NAME.to_string()),
        })
    }
}

/// Splits a sequence string such as `"NALA-ALA-CALA"` or `"DA5 DA DA3"` into residue
/// names. Hyphens, commas and whitespace all separate residues.
pub fn parse_sequence(text: &str) -> Vec<String> {
    text.split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
