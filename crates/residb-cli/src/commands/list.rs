use super::format_charge;
use crate::cli::ListArgs;
use crate::error::Result;
use residb::core::database::registry::ResidueDatabase;
use residb::core::database::resolve::Resolver;
use residb::engine::config::DEFAULT_PARAMETER_SET;
use residb::engine::error::EngineError;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug)]
struct ListRow {
    name: String,
    kind: &'static str,
    pdb_codes: String,
    atoms: usize,
    bonds: usize,
    charge: Option<f64>,
}

pub fn run(args: ListArgs, db: &ResidueDatabase) -> Result<()> {
    let rows = collect_rows(db, args.all)?;
    info!("Listing {} definition(s).", rows.len());

    if rows.is_empty() {
        println!("No definitions found.");
        return Ok(());
    }

    println!(
        "{:<28} {:<9} {:<16} {:>6} {:>6} {:>9}",
        "NAME", "KIND", "PDB", "ATOMS", "BONDS", "CHARGE"
    );
    for row in &rows {
        println!(
            "{:<28} {:<9} {:<16} {:>6} {:>6} {:>9}",
            row.name,
            row.kind,
            row.pdb_codes,
            row.atoms,
            row.bonds,
            format_charge(row.charge)
        );
    }
    Ok(())
}

fn collect_rows(db: &ResidueDatabase, all: bool) -> Result<Vec<ListRow>> {
    let residues: HashSet<&str> = db.residue_names().into_iter().collect();
    let mut resolver = Resolver::new(db);
    let mut rows = Vec::new();

    for name in db.names() {
        let is_residue = residues.contains(name);
        if !all && !is_residue {
            continue;
        }
        let template = resolver.resolve(name).map_err(EngineError::from)?;
        let charge = template.net_charge().or_else(|| {
            template
                .parameter_set(DEFAULT_PARAMETER_SET)
                .filter(|set| set.is_complete(template.atom_count()))
                .map(|set| set.total_charge())
        });
        let pdb_codes = template.pdb_codes().collect::<Vec<_>>().join(",");
        rows.push(ListRow {
            name: name.to_string(),
            kind: if is_residue { "residue" } else { "fragment" },
            pdb_codes: if pdb_codes.is_empty() {
                "-".to_string()
            } else {
                pdb_codes
            },
            atoms: template.atom_count(),
            bonds: template.bond_count(),
            charge,
        });
    }
    Ok(rows)
}
