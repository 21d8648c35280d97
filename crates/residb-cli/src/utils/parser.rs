use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid atom reference '{0}'. Expected RESIDUE:ATOM (e.g., '2:CA').")]
    InvalidAtomReference(String),

    #[error("Residue position in '{0}' must be a positive integer.")]
    InvalidResiduePosition(String),

    #[error("Invalid boolean value for {key}: '{value}'")]
    InvalidBool { key: String, value: String },
}

/// An atom named by its 1-based residue position and a PDB name or attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomReference {
    pub position: usize,
    pub atom: String,
}

impl AtomReference {
    /// Zero-based residue index.
    pub fn residue_index(&self) -> usize {
        self.position - 1
    }
}

pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_atom_reference(text: &str) -> Result<AtomReference, ParseError> {
    let (position, atom) = text
        .split_once(':')
        .filter(|(_, atom)| !atom.trim().is_empty())
        .ok_or_else(|| ParseError::InvalidAtomReference(text.to_string()))?;
    let position = position
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&p| p > 0)
        .ok_or_else(|| ParseError::InvalidResiduePosition(text.to_string()))?;
    Ok(AtomReference {
        position,
        atom: atom.trim().to_string(),
    })
}
