use super::config::{AssemblyConfig, DEFAULT_PARAMETER_SET};
use super::topology::{MolecularTopology, TopologyAtom};
use crate::core::database::library::TemplateLibrary;
use crate::core::models::chain::ChainType;
use crate::core::models::ids::AtomId;
use crate::core::models::residue::ResidueTemplate;
use crate::core::utils::identifiers::normalize_pdb_name;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Which chain link of a residue is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    Previous,
    Next,
}

impl fmt::Display for LinkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSide::Previous => write!(f, "previous"),
            LinkSide::Next => write!(f, "next"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("Sequence contains no residues")]
    EmptySequence,
    #[error("Unknown residue '{name}' at position {position}")]
    UnknownResidue { position: usize, name: String },
    #[error("Residue '{template}' at position {position} has no chain links and cannot be part of a chain")]
    NotPolymer { position: usize, template: String },
    #[error("Residue '{template}' at position {position} is a chain terminus and has no '{side}' link")]
    ChainTerminus {
        position: usize,
        template: String,
        side: LinkSide,
    },
    #[error("Residue '{template}' has no parameter set '{set}'")]
    MissingParameterSet { template: String, set: String },
    #[error("Atom '{atom}' of residue '{template}' at position {position} has no {what} in parameter set '{set}'")]
    MissingParameter {
        position: usize,
        template: String,
        atom: String,
        set: String,
        what: &'static str,
    },
}

/// Builds a bonded chain topology from a residue sequence.
///
/// Each residue is instantiated from its template; consecutive residues are joined by a
/// bond from the `next` link atom of one to the `previous` link atom of the other.
#[derive(Debug, Clone)]
pub struct ChainAssembler<'a> {
    library: &'a TemplateLibrary,
    parameter_set: String,
    require_parameters: bool,
}

struct Placement<'a> {
    template: &'a ResidueTemplate,
    pdb_code: Option<String>,
}

impl<'a> ChainAssembler<'a> {
    pub fn new(library: &'a TemplateLibrary) -> Self {
        Self {
            library,
            parameter_set: DEFAULT_PARAMETER_SET.to_string(),
            require_parameters: false,
        }
    }

    pub fn from_config(library: &'a TemplateLibrary, config: &AssemblyConfig) -> Self {
        Self::new(library)
            .with_parameter_set(&config.parameter_set)
            .require_parameters(config.require_parameters)
    }

    pub fn with_parameter_set(mut self, name: &str) -> Self {
        self.parameter_set = name.to_string();
        self
    }

    pub fn require_parameters(mut self, required: bool) -> Self {
        self.require_parameters = required;
        self
    }

    pub fn assemble<S: AsRef<str>>(
        &self,
        sequence: &[S],
        chain_name: &str,
    ) -> Result<MolecularTopology, AssemblyError> {
        if sequence.is_empty() {
            return Err(AssemblyError::EmptySequence);
        }

        let placements = sequence
            .iter()
            .enumerate()
            .map(|(i, name)| self.place(i + 1, name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.check_links(&placements)?;
        for (i, placement) in placements.iter().enumerate() {
            self.check_parameters(i + 1, placement.template)?;
        }

        let mut topology = MolecularTopology::new(chain_name);
        let mut previous_next: Option<AtomId> = None;

        for placement in &placements {
            let ids = self.instantiate(&mut topology, placement);
            let links = placement.template.chain_links().unwrap_or_default();

            if let (Some(prev_atom), Some(link)) = (previous_next, links.previous) {
                topology.add_bond(prev_atom, ids[link]);
            }
            previous_next = links.next.map(|i| ids[i]);
        }

        let chain_type = ChainType::infer(placements.iter().filter_map(|p| p.pdb_code.as_deref()));
        topology.set_chain_type(chain_type);

        debug!(
            "Assembled chain '{}' ({}): {} residues, {} atoms, {} bonds.",
            chain_name,
            chain_type,
            topology.residue_count(),
            topology.atom_count(),
            topology.bonds().len()
        );
        Ok(topology)
    }

    /// Template lookup by template name, then by PDB residue name.
    fn place(&self, position: usize, name: &str) -> Result<Placement<'a>, AssemblyError> {
        if let Some(template) = self.library.get(name) {
            return Ok(Placement {
                template,
                pdb_code: template.declared_pdb_codes().next().map(str::to_string),
            });
        }
        if let Some(template) = self.library.by_pdb_name(name) {
            return Ok(Placement {
                template,
                pdb_code: Some(normalize_pdb_name(name)),
            });
        }
        Err(AssemblyError::UnknownResidue {
            position,
            name: name.to_string(),
        })
    }

    fn check_links(&self, placements: &[Placement<'_>]) -> Result<(), AssemblyError> {
        if placements.len() < 2 {
            return Ok(());
        }
        let last = placements.len() - 1;
        for (i, placement) in placements.iter().enumerate() {
            let template = placement.template;
            let links = template
                .chain_links()
                .ok_or_else(|| AssemblyError::NotPolymer {
                    position: i + 1,
                    template: template.name.clone(),
                })?;
            let terminus = |side| AssemblyError::ChainTerminus {
                position: i + 1,
                template: template.name.clone(),
                side,
            };
            if i > 0 && links.previous.is_none() {
                return Err(terminus(LinkSide::Previous));
            }
            if i < last && links.next.is_none() {
                return Err(terminus(LinkSide::Next));
            }
        }
        Ok(())
    }

    fn check_parameters(
        &self,
        position: usize,
        template: &ResidueTemplate,
    ) -> Result<(), AssemblyError> {
        let set = template
            .parameter_set(&self.parameter_set)
            .ok_or_else(|| AssemblyError::MissingParameterSet {
                template: template.name.clone(),
                set: self.parameter_set.clone(),
            })?;
        if !self.require_parameters {
            return Ok(());
        }

        let missing = |index: usize, what: &'static str| AssemblyError::MissingParameter {
            position,
            template: template.name.clone(),
            atom: template
                .atom(index)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            set: self.parameter_set.clone(),
            what,
        };
        let n = template.atom_count();
        if let Some(&index) = set.missing_charges(n).first() {
            return Err(missing(index, "charge"));
        }
        if let Some(&index) = set.missing_atom_types(n).first() {
            return Err(missing(index, "atom type"));
        }
        Ok(())
    }

    /// Adds one residue with its internal bonds; returns atom ids in template order.
    fn instantiate(&self, topology: &mut MolecularTopology, placement: &Placement<'_>) -> Vec<AtomId> {
        let template = placement.template;
        let residue = topology.add_residue(&template.name, placement.pdb_code.as_deref());
        let entry = placement.pdb_code.as_deref().and_then(|code| {
            template
                .pdb_entries()
                .iter()
                .find(|e| normalize_pdb_name(&e.residue) == code)
        });
        let parameters = template.parameter_set(&self.parameter_set);

        let mut ids = Vec::with_capacity(template.atom_count());
        for (index, atom) in template.atoms().iter().enumerate() {
            let atom = TopologyAtom {
                path: atom.name.clone(),
                element: atom.element.clone(),
                pdb_name: entry.and_then(|e| e.name_of(index)).map(str::to_string),
                charge: parameters.and_then(|p| p.charge(index)),
                atom_type: parameters.and_then(|p| p.atom_type(index)).map(str::to_string),
                residue,
            };
            if let Some(id) = topology.add_atom(atom) {
                ids.push(id);
            }
        }
        for bond in template.bonds() {
            let (a, b) = bond.atoms();
            topology.add_bond(ids[a], ids[b]);
        }
        for (alias, standard) in template.pdb_alternatives() {
            topology.add_pdb_alternative(residue, alias, standard);
        }
        ids
    }
}
