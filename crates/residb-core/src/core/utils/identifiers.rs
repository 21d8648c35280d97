use phf::{Set, phf_set};

/// Separator between group instance names and atom names in an attribute path.
pub const PATH_SEPARATOR: char = '.';

static AMINO_ACID_CODES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "HID", "HIE", "HIP", "HSD", "HSE", "HSP", "CYX", "CYM", "ASH", "GLH", "LYN",
};

static NUCLEOTIDE_CODES: Set<&'static str> = phf_set! {
    "DA", "DC", "DG", "DT", "A", "C", "G", "U", "RA", "RC", "RG", "RU",
};

/// Checks that `name` can be used as an atom or group instance name.
///
/// Names follow identifier rules (`[A-Za-z_][A-Za-z0-9_]*`) so that they can be joined
/// into dotted attribute paths without ambiguity.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits an attribute path into its components. `"a.b.N"` yields `["a", "b", "N"]`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR).collect()
}

pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{name}")
    }
}

/// The last component of an attribute path.
pub fn local_name(path: &str) -> &str {
    split_path(path).last().copied().unwrap_or(path)
}

/// Whether an element tag denotes hydrogen (or deuterium).
pub fn is_hydrogen_tag(tag: &str) -> bool {
    let first_char = tag.trim().chars().next().map(|c| c.to_ascii_uppercase());
    matches!(first_char, Some('H') | Some('D'))
}

/// Canonical form of a PDB atom or residue name: surrounding whitespace removed, upper case.
pub fn normalize_pdb_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Whether `code` names an amino acid residue, including protonation variants and
/// four-letter terminal variants such as `NALA` / `CALA`.
pub fn is_amino_acid_code(code: &str) -> bool {
    let code = normalize_pdb_name(code);
    if AMINO_ACID_CODES.contains(code.as_str()) {
        return true;
    }
    code.len() == 4
        && (code.starts_with('N') || code.starts_with('C'))
        && AMINO_ACID_CODES.contains(&code[1..])
}

/// Whether `code` names a nucleotide residue, including `5`/`3` terminal variants
/// such as `DA5` / `DA3`.
pub fn is_nucleotide_code(code: &str) -> bool {
    let code = normalize_pdb_name(code);
    let base = code.trim_end_matches(['5', '3']);
    !base.is_empty() && base.len() + 1 >= code.len() && NUCLEOTIDE_CODES.contains(base)
}
