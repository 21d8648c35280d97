use super::format_charge;
use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use residb::core::database::library::TemplateLibrary;
use residb::core::database::registry::ResidueDatabase;
use residb::core::database::resolve::resolve;
use residb::core::io::csv::write_template_csv_to_path;
use residb::core::models::residue::ResidueTemplate;
use residb::engine::config::DEFAULT_PARAMETER_SET;
use residb::engine::error::EngineError;
use std::fmt;
use tracing::{debug, info};

pub fn run(args: ShowArgs, db: &ResidueDatabase) -> Result<()> {
    let template = find_template(db, &args.name)?;
    let parameter_set = args
        .parameter_set
        .as_deref()
        .unwrap_or(DEFAULT_PARAMETER_SET);
    info!(
        "Showing template '{}' with parameter set '{}'.",
        template.name, parameter_set
    );

    print!(
        "{}",
        TemplateView {
            template: &template,
            parameter_set,
        }
    );

    if let Some(path) = &args.csv {
        write_template_csv_to_path(&template, parameter_set, path)?;
        println!("\nAtom table written to: {}", path.display());
    }
    Ok(())
}

/// Finds a definition by database name, falling back to the PDB residue codes of the
/// complete residues.
fn find_template(db: &ResidueDatabase, name: &str) -> Result<ResidueTemplate> {
    if db.contains(name) {
        return Ok(resolve(db, name).map_err(EngineError::from)?);
    }
    debug!("'{}' is not a definition name, trying PDB residue codes.", name);
    let library = TemplateLibrary::build(db).map_err(EngineError::from)?;
    library.by_pdb_name(name).cloned().ok_or_else(|| {
        CliError::Argument(format!(
            "No definition or PDB residue named '{}'. Run 'residb list --all' to see what is available.",
            name
        ))
    })
}

struct TemplateView<'a> {
    template: &'a ResidueTemplate,
    parameter_set: &'a str,
}

impl fmt::Display for TemplateView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.template;
        let path_of = |index: usize| t.atom(index).map_or("?", |a| a.name.as_str());

        writeln!(f, "{} ({})", t.name, t.display_name)?;

        let codes: Vec<&str> = t.pdb_codes().collect();
        if !codes.is_empty() {
            writeln!(f, "  PDB codes:      {}", codes.join(", "))?;
        }
        if let Some(links) = t.chain_links() {
            writeln!(
                f,
                "  Chain links:    previous {}, next {}",
                links.previous.map_or("-", path_of),
                links.next.map_or("-", path_of)
            )?;
        }
        if let Some(charge) = t.net_charge() {
            writeln!(f, "  Net charge:     {}", format_charge(Some(charge)))?;
        }
        let sets: Vec<&str> = t.parameter_sets().map(|(name, _)| name).collect();
        writeln!(
            f,
            "  Parameter sets: {}",
            if sets.is_empty() {
                "-".to_string()
            } else {
                sets.join(", ")
            }
        )?;

        let set = t.parameter_set(self.parameter_set);
        writeln!(f)?;
        writeln!(
            f,
            "  Atoms ({}, parameter set '{}'):",
            t.atom_count(),
            self.parameter_set
        )?;
        writeln!(
            f,
            "  {:>4}  {:<32} {:<4} {:<6} {:>9} {:<6}",
            "IDX", "PATH", "EL", "PDB", "CHARGE", "TYPE"
        )?;
        for (index, atom) in t.atoms().iter().enumerate() {
            writeln!(
                f,
                "  {:>4}  {:<32} {:<4} {:<6} {:>9} {:<6}",
                index,
                atom.name,
                atom.element,
                t.pdb_name_of(index).unwrap_or("-"),
                format_charge(set.and_then(|s| s.charge(index))),
                set.and_then(|s| s.atom_type(index)).unwrap_or("-")
            )?;
        }

        writeln!(f)?;
        writeln!(f, "  Bonds ({}):", t.bond_count())?;
        for bond in t.bonds() {
            let (a, b) = bond.atoms();
            writeln!(f, "    {} - {}", path_of(a), path_of(b))?;
        }

        if !t.pdb_alternatives().is_empty() {
            writeln!(f)?;
            writeln!(f, "  PDB alternative names:")?;
            for (alias, standard) in t.pdb_alternatives() {
                writeln!(f, "    {} -> {}", alias, standard)?;
            }
        }
        Ok(())
    }
}
