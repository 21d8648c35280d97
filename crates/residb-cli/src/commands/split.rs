use crate::cli::SplitArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, AtomReference};
use residb::core::database::registry::ResidueDatabase;
use residb::core::models::ids::AtomId;
use residb::engine::config::{AssemblyConfigBuilder, DEFAULT_PARAMETER_SET, parse_sequence};
use residb::engine::error::EngineError;
use residb::engine::fragments::{self, FragmentPair};
use residb::engine::progress::ProgressReporter;
use residb::engine::topology::MolecularTopology;
use residb::workflows;
use std::collections::BTreeSet;
use tracing::info;

pub fn run(args: SplitArgs, db: &ResidueDatabase) -> Result<()> {
    let config = AssemblyConfigBuilder::new()
        .sequence(parse_sequence(&args.sequence))
        .parameter_set(
            args.parameter_set
                .as_deref()
                .unwrap_or(DEFAULT_PARAMETER_SET),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let result = workflows::build::run(db, &config, &ProgressReporter::new())?;
    let topology = &result.topology;

    let atoms = args
        .atoms
        .iter()
        .map(|text| {
            let reference =
                parser::parse_atom_reference(text).map_err(|e| CliError::Argument(e.to_string()))?;
            locate(topology, &reference)
        })
        .collect::<Result<Vec<_>>>()?;

    let pair = split(topology, &atoms)?;
    info!(
        first = pair.first.len(),
        second = pair.second.len(),
        smaller = pair.smaller().len(),
        "Split '{}'.",
        args.atoms.join(" ")
    );

    println!("Side of {} ({} atoms):", args.atoms[0], pair.first.len());
    println!("  {}", labels(topology, &pair.first));
    println!(
        "Side of {} ({} atoms):",
        args.atoms[args.atoms.len() - 1],
        pair.second.len()
    );
    println!("  {}", labels(topology, &pair.second));
    Ok(())
}

/// Resolves a reference by PDB atom name first, then by attribute path.
fn locate(topology: &MolecularTopology, reference: &AtomReference) -> Result<AtomId> {
    let index = reference.residue_index();
    if index >= topology.residue_count() {
        return Err(CliError::Argument(format!(
            "Residue position {} is outside the chain (1-{}).",
            reference.position,
            topology.residue_count()
        )));
    }
    topology
        .find_atom_by_pdb_name(index, &reference.atom)
        .or_else(|| topology.find_atom(index, &reference.atom))
        .ok_or_else(|| {
            CliError::Argument(format!(
                "Residue {} has no atom named '{}'.",
                reference.position, reference.atom
            ))
        })
}

fn split(topology: &MolecularTopology, atoms: &[AtomId]) -> Result<FragmentPair> {
    let pair = match *atoms {
        [a, b] => fragments::bond_length(topology, a, b),
        [a, b, c] => fragments::bond_angle(topology, a, b, c),
        [a, b, c, d] => fragments::dihedral(topology, a, b, c, d),
        _ => {
            return Err(CliError::Argument(format!(
                "Expected 2 to 4 atoms, got {}.",
                atoms.len()
            )));
        }
    };
    Ok(pair.map_err(EngineError::from)?)
}

fn labels(topology: &MolecularTopology, atoms: &BTreeSet<AtomId>) -> String {
    let mut labels: Vec<(usize, String)> = atoms
        .iter()
        .filter_map(|&id| topology.atom(id))
        .map(|atom| {
            let name = atom.pdb_name.as_deref().unwrap_or(&atom.path);
            (atom.residue, format!("{}:{}", atom.residue + 1, name))
        })
        .collect();
    labels.sort();
    labels
        .into_iter()
        .map(|(_, label)| label)
        .collect::<Vec<_>>()
        .join(" ")
}
