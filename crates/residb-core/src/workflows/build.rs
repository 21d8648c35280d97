use crate::core::database::library::TemplateLibrary;
use crate::core::database::registry::ResidueDatabase;
use crate::core::models::chain::ChainType;
use crate::engine::assembly::ChainAssembler;
use crate::engine::config::AssemblyConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::topology::MolecularTopology;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct BuildResult {
    pub topology: MolecularTopology,
    pub chain_type: ChainType,
    /// Sum of the atom charges of the assembled chain.
    pub net_charge: f64,
    /// Template name of every residue, in chain order.
    pub residue_names: Vec<String>,
}

#[instrument(skip_all, name = "build_workflow", fields(chain = %config.chain_name))]
pub fn run(
    db: &ResidueDatabase,
    config: &AssemblyConfig,
    reporter: &ProgressReporter,
) -> Result<BuildResult, EngineError> {
    let library = reporter.phase("Building template library", || {
        info!("Resolving {} residue definitions.", db.residue_names().len());
        TemplateLibrary::build(db)
    })?;

    let topology = reporter.phase("Assembling chain", || {
        info!(
            residues = config.sequence.len(),
            parameter_set = %config.parameter_set,
            "Assembling chain '{}'.",
            config.chain_name
        );
        ChainAssembler::from_config(&library, config)
            .assemble(config.sequence.as_slice(), &config.chain_name)
    })?;

    let unparameterized = topology.unparameterized_atoms().len();
    if unparameterized > 0 {
        let message = format!(
            "{} atom(s) have no charge or atom type in parameter set '{}'.",
            unparameterized, config.parameter_set
        );
        warn!("{}", message);
        reporter.report(Progress::Message(message));
    }

    let result = BuildResult {
        chain_type: topology.chain_type(),
        net_charge: topology.total_charge(),
        residue_names: topology
            .residues()
            .iter()
            .map(|r| r.template.clone())
            .collect(),
        topology,
    };

    info!(
        atoms = result.topology.atom_count(),
        bonds = result.topology.bonds().len(),
        net_charge = result.net_charge,
        "Build complete."
    );
    Ok(result)
}
