use crate::core::models::chain::ChainType;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::Bond;
use crate::core::utils::identifiers::normalize_pdb_name;
use serde::Serialize;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, HashMap};

/// An atom instantiated from a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyAtom {
    /// Attribute path inside the residue (`sidechain.C_beta`).
    pub path: String,
    pub element: String,
    pub pdb_name: Option<String>,
    pub charge: Option<f64>,
    pub atom_type: Option<String>,
    /// Position of the owning residue in the chain.
    pub residue: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyResidue {
    /// Name of the template the residue was built from.
    pub template: String,
    /// PDB residue name used for this residue, if the template has one.
    pub pdb_code: Option<String>,
    atoms: Vec<AtomId>,
    atom_map: HashMap<String, AtomId>,
    pdb_atoms: HashMap<String, AtomId>,
    pdb_alternatives: HashMap<String, String>,
}

impl TopologyResidue {
    fn new(template: &str, pdb_code: Option<&str>) -> Self {
        Self {
            template: template.to_string(),
            pdb_code: pdb_code.map(str::to_string),
            atoms: Vec::new(),
            atom_map: HashMap::new(),
            pdb_atoms: HashMap::new(),
            pdb_alternatives: HashMap::new(),
        }
    }

    /// Atoms of the residue in template order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

/// A bonded molecular graph assembled from residue templates.
///
/// Atoms live in a slot map; adjacency is cached per atom so that neighbour queries used
/// by fragment analysis do not scan the bond list.
#[derive(Debug, Clone, Default)]
pub struct MolecularTopology {
    name: String,
    chain_type: ChainType,
    atoms: SlotMap<AtomId, TopologyAtom>,
    residues: Vec<TopologyResidue>,
    bonds: Vec<Bond<AtomId>>,
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularTopology {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub(crate) fn set_chain_type(&mut self, chain_type: ChainType) {
        self.chain_type = chain_type;
    }

    /// Appends an empty residue and returns its position.
    pub fn add_residue(&mut self, template: &str, pdb_code: Option<&str>) -> usize {
        self.residues.push(TopologyResidue::new(template, pdb_code));
        self.residues.len() - 1
    }

    /// Registers an alternative PDB atom name for a residue.
    pub fn add_pdb_alternative(&mut self, residue: usize, alias: &str, standard: &str) -> Option<()> {
        let residue = self.residues.get_mut(residue)?;
        residue
            .pdb_alternatives
            .insert(normalize_pdb_name(alias), normalize_pdb_name(standard));
        Some(())
    }

    /// Adds an atom to an existing residue.
    ///
    /// Returns `None` if the residue does not exist or already has an atom with this path.
    pub fn add_atom(&mut self, atom: TopologyAtom) -> Option<AtomId> {
        let residue = self.residues.get(atom.residue)?;
        if residue.atom_map.contains_key(&atom.path) {
            return None;
        }

        let residue_index = atom.residue;
        let path = atom.path.clone();
        let pdb_name = atom.pdb_name.as_deref().map(normalize_pdb_name);

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());

        let residue = &mut self.residues[residue_index];
        residue.atoms.push(atom_id);
        residue.atom_map.insert(path, atom_id);
        if let Some(pdb_name) = pdb_name {
            residue.pdb_atoms.entry(pdb_name).or_insert(atom_id);
        }
        Some(atom_id)
    }

    /// Adds a bond between two atoms. Adding an existing bond succeeds without creating a
    /// duplicate; unknown atoms and self-bonds yield `None`.
    pub fn add_bond(&mut self, atom1: AtomId, atom2: AtomId) -> Option<()> {
        if atom1 == atom2 || !self.atoms.contains_key(atom1) || !self.atoms.contains_key(atom2) {
            return None;
        }
        if self.are_bonded(atom1, atom2) {
            return Some(());
        }
        self.bonds.push(Bond::new(atom1, atom2));
        self.bond_adjacency[atom1].push(atom2);
        self.bond_adjacency[atom2].push(atom1);
        Some(())
    }

    pub fn atom(&self, id: AtomId) -> Option<&TopologyAtom> {
        self.atoms.get(id)
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atoms.contains_key(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &TopologyAtom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue(&self, index: usize) -> Option<&TopologyResidue> {
        self.residues.get(index)
    }

    pub fn residues(&self) -> &[TopologyResidue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn bonds(&self) -> &[Bond<AtomId>] {
        &self.bonds
    }

    pub fn neighbors(&self, id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(id).map(Vec::as_slice)
    }

    pub fn are_bonded(&self, atom1: AtomId, atom2: AtomId) -> bool {
        self.bond_adjacency
            .get(atom1)
            .is_some_and(|n| n.contains(&atom2))
    }

    /// Finds an atom by residue position and attribute path.
    pub fn find_atom(&self, residue: usize, path: &str) -> Option<AtomId> {
        self.residues.get(residue)?.atom_map.get(path).copied()
    }

    /// Finds an atom by residue position and PDB atom name, resolving alternative names.
    pub fn find_atom_by_pdb_name(&self, residue: usize, pdb_name: &str) -> Option<AtomId> {
        let residue = self.residues.get(residue)?;
        let wanted = normalize_pdb_name(pdb_name);
        residue.pdb_atoms.get(&wanted).copied().or_else(|| {
            residue
                .pdb_alternatives
                .get(&wanted)
                .and_then(|standard| residue.pdb_atoms.get(standard))
                .copied()
        })
    }

    /// Sum of the charges of all atoms that carry one.
    pub fn total_charge(&self) -> f64 {
        self.atoms_iter().filter_map(|(_, a)| a.charge).sum()
    }

    /// Atoms without a charge or an atom type.
    pub fn unparameterized_atoms(&self) -> Vec<AtomId> {
        self.atoms_iter()
            .filter(|(_, a)| a.charge.is_none() || a.atom_type.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Serializable snapshot with atoms numbered consecutively in residue order.
    pub fn to_document(&self) -> TopologyDocument {
        let mut serials: HashMap<AtomId, usize> = HashMap::with_capacity(self.atoms.len());
        let mut residues = Vec::with_capacity(self.residues.len());

        for (index, residue) in self.residues.iter().enumerate() {
            let mut atoms = Vec::with_capacity(residue.atoms.len());
            for &atom_id in &residue.atoms {
                let Some(atom) = self.atoms.get(atom_id) else {
                    continue;
                };
                let serial = serials.len() + 1;
                serials.insert(atom_id, serial);
                atoms.push(AtomRecord {
                    serial,
                    path: atom.path.clone(),
                    element: atom.element.clone(),
                    pdb_name: atom.pdb_name.clone(),
                    charge: atom.charge,
                    atom_type: atom.atom_type.clone(),
                });
            }
            residues.push(ResidueRecord {
                index: index + 1,
                template: residue.template.clone(),
                pdb_code: residue.pdb_code.clone(),
                atoms,
            });
        }

        let mut bonds: Vec<[usize; 2]> = self
            .bonds
            .iter()
            .filter_map(|b| {
                let (a, b) = b.atoms();
                let (sa, sb) = (*serials.get(&a)?, *serials.get(&b)?);
                Some([sa.min(sb), sa.max(sb)])
            })
            .collect();
        bonds.sort_unstable();

        TopologyDocument {
            name: self.name.clone(),
            chain_type: self.chain_type.to_string(),
            atom_count: serials.len(),
            total_charge: self.total_charge(),
            bonds,
            residues,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopologyDocument {
    pub name: String,
    pub chain_type: String,
    pub atom_count: usize,
    pub total_charge: f64,
    pub bonds: Vec<[usize; 2]>,
    pub residues: Vec<ResidueRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResidueRecord {
    pub index: usize,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb_code: Option<String>,
    pub atoms: Vec<AtomRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AtomRecord {
    pub serial: usize,
    pub path: String,
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom_type: Option<String>,
}

impl TopologyDocument {
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
