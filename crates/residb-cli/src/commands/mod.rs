pub mod build;
pub mod list;
pub mod show;
pub mod split;
pub mod validate;

use crate::cli::DatabaseArgs;
use crate::error::Result;
use residb::core::database::registry::ResidueDatabase;
use tracing::info;

/// Opens the residue database selected by the global `--db`/`--no-builtin` options.
pub fn open_database(args: &DatabaseArgs) -> Result<ResidueDatabase> {
    let db = ResidueDatabase::open(args.db_dir.as_deref(), !args.no_builtin)?;
    info!(
        definitions = db.len(),
        user_dir = ?args.db_dir,
        "Residue database opened."
    );
    Ok(db)
}

fn format_charge(charge: Option<f64>) -> String {
    charge.map_or_else(|| "-".to_string(), |c| format!("{:+.4}", c))
}
