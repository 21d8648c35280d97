use super::atom::AtomDef;
use super::topology::Bond;
use crate::core::utils::identifiers::normalize_pdb_name;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Atoms used to link a residue to its neighbours in a polymer chain.
///
/// `previous` bonds to the predecessor's `next` atom; `None` on either side marks a chain
/// terminus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainLinks {
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

/// PDB naming of a template under one PDB residue name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbEntry {
    /// PDB residue name (e.g. `"HIE"`).
    pub residue: String,
    /// PDB atom name to template atom index.
    pub atoms: BTreeMap<String, usize>,
}

impl PdbEntry {
    pub fn new(residue: &str) -> Self {
        Self {
            residue: residue.to_string(),
            atoms: BTreeMap::new(),
        }
    }

    /// Reverse lookup: the PDB name assigned to a template atom.
    pub fn name_of(&self, atom: usize) -> Option<&str> {
        self.atoms
            .iter()
            .find(|(_, idx)| **idx == atom)
            .map(|(name, _)| name.as_str())
    }
}

/// Partial charges and force-field atom types for one force field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    pub charges: HashMap<usize, f64>,
    pub atom_types: HashMap<usize, String>,
}

impl ParameterSet {
    pub fn charge(&self, atom: usize) -> Option<f64> {
        self.charges.get(&atom).copied()
    }

    pub fn atom_type(&self, atom: usize) -> Option<&str> {
        self.atom_types.get(&atom).map(String::as_str)
    }

    pub fn total_charge(&self) -> f64 {
        self.charges.values().sum()
    }

    /// Indices in `0..atom_count` without a charge, in ascending order.
    pub fn missing_charges(&self, atom_count: usize) -> Vec<usize> {
        (0..atom_count)
            .filter(|i| !self.charges.contains_key(i))
            .collect()
    }

    /// Indices in `0..atom_count` without an atom type, in ascending order.
    pub fn missing_atom_types(&self, atom_count: usize) -> Vec<usize> {
        (0..atom_count)
            .filter(|i| !self.atom_types.contains_key(i))
            .collect()
    }

    pub fn is_complete(&self, atom_count: usize) -> bool {
        self.missing_charges(atom_count).is_empty()
            && self.missing_atom_types(atom_count).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty() && self.atom_types.is_empty()
    }
}

/// A fully resolved residue (or group) definition.
///
/// All sub-groups are flattened: every atom carries its qualified attribute path, bonds
/// refer to atom indices, and charge, type and PDB maps are keyed by index. Templates are
/// produced by [`crate::core::database::resolve`] and are immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueTemplate {
    /// Database key of the definition (the file stem).
    pub name: String,
    /// Human readable name.
    pub display_name: String,
    pub(crate) atoms: Vec<AtomDef>,
    pub(crate) atom_index: HashMap<String, usize>,
    pub(crate) bonds: Vec<Bond<usize>>,
    pub(crate) pdb_entries: Vec<PdbEntry>,
    /// Whether `pdb_entries` come from the definition's own `pdb_map` rather than from
    /// its sub-groups.
    pub(crate) declares_pdb_codes: bool,
    pub(crate) pdb_alternatives: BTreeMap<String, String>,
    pub(crate) parameters: BTreeMap<String, ParameterSet>,
    pub(crate) chain_links: Option<ChainLinks>,
    pub(crate) net_charge: Option<f64>,
}

impl ResidueTemplate {
    pub(crate) fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            atoms: Vec::new(),
            atom_index: HashMap::new(),
            bonds: Vec::new(),
            pdb_entries: Vec::new(),
            declares_pdb_codes: false,
            pdb_alternatives: BTreeMap::new(),
            parameters: BTreeMap::new(),
            chain_links: None,
            net_charge: None,
        }
    }

    /// Appends an atom and returns its index. Returns `None` if the path is already taken.
    pub(crate) fn push_atom(&mut self, path: &str, element: &str) -> Option<usize> {
        if self.atom_index.contains_key(path) {
            return None;
        }
        let index = self.atoms.len();
        self.atoms.push(AtomDef::new(path, element));
        self.atom_index.insert(path.to_string(), index);
        Some(index)
    }

    /// Adds a bond. Returns `false` if the bond already exists.
    pub(crate) fn push_bond(&mut self, bond: Bond<usize>) -> bool {
        if self.bonds.contains(&bond) {
            return false;
        }
        self.bonds.push(bond);
        true
    }

    pub(crate) fn parameter_set_mut(&mut self, name: &str) -> &mut ParameterSet {
        self.parameters.entry(name.to_string()).or_default()
    }

    pub fn atoms(&self) -> &[AtomDef] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&AtomDef> {
        self.atoms.get(index)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Index of the atom with the given attribute path (e.g. `"sidechain.C_beta"`).
    pub fn atom_index(&self, path: &str) -> Option<usize> {
        self.atom_index.get(path).copied()
    }

    pub fn atom_by_path(&self, path: &str) -> Option<&AtomDef> {
        self.atom_index(path).and_then(|i| self.atoms.get(i))
    }

    pub fn bonds(&self) -> &[Bond<usize>] {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Whether the two attribute paths are bonded. Unknown paths are never bonded.
    pub fn has_bond(&self, path1: &str, path2: &str) -> bool {
        match (self.atom_index(path1), self.atom_index(path2)) {
            (Some(a), Some(b)) => self.bonds.contains(&Bond::new(a, b)),
            _ => false,
        }
    }

    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        self.bonds.iter().filter_map(|b| b.partner(index)).collect()
    }

    pub fn pdb_entries(&self) -> &[PdbEntry] {
        &self.pdb_entries
    }

    /// PDB residue names under which this template is known, in declaration order.
    pub fn pdb_codes(&self) -> impl Iterator<Item = &str> {
        self.pdb_entries.iter().map(|e| e.residue.as_str())
    }

    /// PDB residue names the definition declares itself. A template that only inherits
    /// the names of its sub-groups has none.
    pub fn declared_pdb_codes(&self) -> impl Iterator<Item = &str> {
        self.pdb_entries
            .iter()
            .filter(|_| self.declares_pdb_codes)
            .map(|e| e.residue.as_str())
    }

    /// Alternative PDB atom names mapped to their standard names.
    pub fn pdb_alternatives(&self) -> &BTreeMap<String, String> {
        &self.pdb_alternatives
    }

    /// The PDB atom name of an atom according to the first PDB entry.
    pub fn pdb_name_of(&self, index: usize) -> Option<&str> {
        self.pdb_entries.first().and_then(|e| e.name_of(index))
    }

    /// Looks up an atom by PDB atom name in the first PDB entry, resolving alternative
    /// names. Matching is whitespace and case insensitive.
    pub fn find_by_pdb_name(&self, pdb_name: &str) -> Option<usize> {
        self.find_by_pdb_name_in(self.pdb_entries.first()?, pdb_name)
    }

    /// Like [`Self::find_by_pdb_name`] but within the entry for a specific PDB residue name.
    pub fn find_by_pdb_name_for(&self, residue: &str, pdb_name: &str) -> Option<usize> {
        let residue = normalize_pdb_name(residue);
        let entry = self
            .pdb_entries
            .iter()
            .find(|e| normalize_pdb_name(&e.residue) == residue)?;
        self.find_by_pdb_name_in(entry, pdb_name)
    }

    fn find_by_pdb_name_in(&self, entry: &PdbEntry, pdb_name: &str) -> Option<usize> {
        let wanted = normalize_pdb_name(pdb_name);
        let lookup = |name: &str| {
            entry
                .atoms
                .iter()
                .find(|(k, _)| normalize_pdb_name(k) == name)
                .map(|(_, idx)| *idx)
        };
        lookup(&wanted).or_else(|| {
            self.pdb_alternatives
                .iter()
                .find(|(alias, _)| normalize_pdb_name(alias) == wanted)
                .and_then(|(_, standard)| lookup(&normalize_pdb_name(standard)))
        })
    }

    pub fn parameter_set(&self, name: &str) -> Option<&ParameterSet> {
        self.parameters.get(name)
    }

    pub fn parameter_sets(&self) -> impl Iterator<Item = (&str, &ParameterSet)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn chain_links(&self) -> Option<ChainLinks> {
        self.chain_links
    }

    /// Declared net charge, if the definition states one.
    pub fn net_charge(&self) -> Option<f64> {
        self.net_charge
    }

    /// Number of connected components of the bond graph (0 for an empty template).
    pub fn connected_components(&self) -> usize {
        let n = self.atoms.len();
        let mut adjacency = vec![Vec::new(); n];
        for bond in &self.bonds {
            let (a, b) = bond.atoms();
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let mut seen = vec![false; n];
        let mut components = 0;
        for start in 0..n {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for &next in &adjacency[current] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        components
    }
}
