use super::format_charge;
use crate::cli::BuildArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use anyhow::Context;
use residb::core::database::registry::ResidueDatabase;
use residb::engine::progress::ProgressReporter;
use residb::workflows::{self, build::BuildResult};
use std::path::Path;
use tracing::info;

pub fn run(args: BuildArgs, db: &ResidueDatabase, progress: &CliProgressHandler) -> Result<()> {
    let config = build_config(&args)?;
    info!(
        "Building chain '{}' from {} residue(s).",
        config.chain_name,
        config.sequence.len()
    );

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let result = workflows::build::run(db, &config, &reporter)?;

    print!("{}", summarize(&result));

    if let Some(path) = &args.output {
        write_topology(&result, path)?;
        println!("Topology written to: {}", path.display());
    }
    Ok(())
}

fn summarize(result: &BuildResult) -> String {
    let topology = &result.topology;
    let mut text = format!(
        "Chain '{}' ({}): {} residue(s), {} atoms, {} bonds, net charge {}\n",
        topology.name(),
        result.chain_type,
        topology.residue_count(),
        topology.atom_count(),
        topology.bonds().len(),
        format_charge(Some(result.net_charge))
    );
    let residues = topology.residues().iter().zip(&result.residue_names);
    for (index, (residue, template)) in residues.enumerate() {
        text.push_str(&format!(
            "  {:>4}  {:<6} {:<28} {:>4} atoms\n",
            index + 1,
            residue.pdb_code.as_deref().unwrap_or("-"),
            template,
            residue.atom_count()
        ));
    }
    text
}

fn write_topology(result: &BuildResult, path: &Path) -> Result<()> {
    let document = result
        .topology
        .to_document()
        .to_toml_string()
        .context("Failed to serialize the assembled topology")?;
    std::fs::write(path, document)?;
    info!("Topology written to {:?}.", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;
    use residb::engine::error::EngineError;

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["residb", "build"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Build(args) => args,
            _ => panic!("Expected 'build' subcommand"),
        }
    }

    #[test]
    fn build_writes_a_topology_document() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("chain.toml");
        let db = ResidueDatabase::builtin().unwrap();

        run(
            build_args(&["-s", "NALA-GLY-CALA", "-o", out.to_str().unwrap()]),
            &db,
            &CliProgressHandler::hidden(),
        )
        .unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let value: toml::Value = toml::from_str(&content).unwrap();
        assert_eq!(value["name"].as_str(), Some("A"));
        assert_eq!(value["chain_type"].as_str(), Some("Protein"));
        assert_eq!(value["atom_count"].as_integer(), Some(30));
        assert_eq!(value["bonds"].as_array().map(Vec::len), Some(29));
        assert_eq!(value["residues"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn summary_lists_every_residue() {
        let db = ResidueDatabase::builtin().unwrap();
        let config = build_config(&build_args(&["-s", "DA5 DA DA3", "--chain-name", "D"])).unwrap();
        let result = workflows::build::run(&db, &config, &ProgressReporter::new()).unwrap();
        let text = summarize(&result);
        assert!(text.starts_with("Chain 'D' (DNA): 3 residue(s)"));
        assert!(text.contains("net charge -2.0000"));
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().nth(1).unwrap().contains("deoxyadenosine_5ter"));
        assert!(text.lines().nth(3).unwrap().contains("deoxyadenosine_3ter"));
    }

    #[test]
    fn unknown_residues_surface_as_engine_errors() {
        let db = ResidueDatabase::builtin().unwrap();
        let result = run(
            build_args(&["-s", "NALA-XYZ"]),
            &db,
            &CliProgressHandler::hidden(),
        );
        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::Assembly { .. }))
        ));
    }
}
