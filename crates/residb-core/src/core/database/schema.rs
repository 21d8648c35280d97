use serde::Deserialize;
use std::collections::BTreeMap;

/// On-disk form of a group or residue definition (one TOML file per definition).
///
/// Paths used in bonds, parameter maps, PDB maps and chain links are attribute paths
/// relative to the definition: `"H5T"` for an own atom, `"sidechain.C_beta"` for an atom
/// of the `sidechain` sub-group instance.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GroupDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub net_charge: Option<f64>,
    #[serde(default)]
    pub atoms: Vec<AtomSpec>,
    #[serde(default)]
    pub groups: Vec<GroupInstanceSpec>,
    #[serde(default)]
    pub bonds: Vec<[String; 2]>,
    #[serde(default)]
    pub chain_links: Option<ChainLinkSpec>,
    #[serde(default)]
    pub pdb_map: Vec<PdbMapSpec>,
    #[serde(default)]
    pub pdb_alternative: BTreeMap<String, String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSpec>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AtomSpec {
    pub name: String,
    pub element: String,
}

/// A named instance of another definition inside this one.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GroupInstanceSpec {
    /// Local attribute name (`sidechain`).
    pub name: String,
    /// Database key of the referenced definition (`alanine_sidechain`).
    pub group: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChainLinkSpec {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PdbMapSpec {
    pub residue: String,
    #[serde(default)]
    pub atoms: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    #[serde(default)]
    pub charges: BTreeMap<String, f64>,
    #[serde(default)]
    pub atom_types: BTreeMap<String, String>,
}

impl GroupDefinition {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Names of the definitions this one instantiates, in declaration order.
    pub fn referenced_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.group.as_str())
    }
}
