use crate::core::utils::identifiers::{is_amino_acid_code, is_nucleotide_code};
use std::fmt;

/// Polymer class of an assembled chain, inferred from its residues' PDB codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChainType {
    Protein,
    DNA,
    RNA,
    #[default]
    Other,
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Protein => "Protein",
                ChainType::DNA => "DNA",
                ChainType::RNA => "RNA",
                ChainType::Other => "Other",
            }
        )
    }
}

impl ChainType {
    /// Classifies a sequence of PDB residue codes.
    ///
    /// All codes must agree for the chain to be classified as a polymer type; an empty
    /// or mixed sequence yields [`ChainType::Other`].
    pub fn infer<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut inferred: Option<ChainType> = None;
        for code in codes {
            let kind = if is_amino_acid_code(code) {
                ChainType::Protein
            } else if is_nucleotide_code(code) {
                if code.trim().to_ascii_uppercase().starts_with('D') {
                    ChainType::DNA
                } else {
                    ChainType::RNA
                }
            } else {
                return ChainType::Other;
            };
            match inferred {
                None => inferred = Some(kind),
                Some(previous) if previous != kind => return ChainType::Other,
                Some(_) => {}
            }
        }
        inferred.unwrap_or_default()
    }
}
