use phf::{Map, phf_map};

/// Definition sources compiled into the library, keyed by definition name.
pub(crate) static BUILTIN_SOURCES: Map<&'static str, &'static str> = phf_map! {
    "adenine" => include_str!("../../../data/adenine.toml"),
    "alanine" => include_str!("../../../data/alanine.toml"),
    "alanine_cterm" => include_str!("../../../data/alanine_cterm.toml"),
    "alanine_nterm" => include_str!("../../../data/alanine_nterm.toml"),
    "alanine_sidechain" => include_str!("../../../data/alanine_sidechain.toml"),
    "deoxyadenosine" => include_str!("../../../data/deoxyadenosine.toml"),
    "deoxyadenosine_3ter" => include_str!("../../../data/deoxyadenosine_3ter.toml"),
    "deoxyadenosine_5ter" => include_str!("../../../data/deoxyadenosine_5ter.toml"),
    "deoxyribose" => include_str!("../../../data/deoxyribose.toml"),
    "glycine" => include_str!("../../../data/glycine.toml"),
    "histidine_delta" => include_str!("../../../data/histidine_delta.toml"),
    "histidine_delta_sidechain" => include_str!("../../../data/histidine_delta_sidechain.toml"),
    "histidine_epsilon" => include_str!("../../../data/histidine_epsilon.toml"),
    "histidine_epsilon_sidechain" => include_str!("../../../data/histidine_epsilon_sidechain.toml"),
    "histidine_plus" => include_str!("../../../data/histidine_plus.toml"),
    "histidine_plus_sidechain" => include_str!("../../../data/histidine_plus_sidechain.toml"),
    "peptide" => include_str!("../../../data/peptide.toml"),
    "peptide_cterm" => include_str!("../../../data/peptide_cterm.toml"),
    "peptide_nterm" => include_str!("../../../data/peptide_nterm.toml"),
    "phosphate" => include_str!("../../../data/phosphate.toml"),
    "serine" => include_str!("../../../data/serine.toml"),
    "serine_sidechain" => include_str!("../../../data/serine_sidechain.toml"),
};

/// Names of the built-in definitions, sorted.
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_SOURCES.keys().copied().collect();
    names.sort_unstable();
    names
}

pub fn builtin_source(name: &str) -> Option<&'static str> {
    BUILTIN_SOURCES.get(name).copied()
}
