use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use residb::core::database::registry::ResidueDatabase;
use residb::core::database::validate::ValidationReport;
use residb::engine::progress::ProgressReporter;
use residb::workflows;
use tracing::{info, warn};

pub fn run(args: ValidateArgs, db: &ResidueDatabase, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let report = workflows::validate::run(db, &reporter);

    for issue in report.issues() {
        println!("{}", issue);
    }
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    println!(
        "Checked {} definition(s): {} error(s), {} warning(s).",
        report.checked(),
        errors,
        warnings
    );

    outcome(&report, args.strict)
}

fn outcome(report: &ValidationReport, strict: bool) -> Result<()> {
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if errors > 0 || (strict && warnings > 0) {
        warn!(errors, warnings, strict, "Database validation failed.");
        return Err(CliError::Validation { errors, warnings });
    }
    info!("Database is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use residb::core::database::validate::validate_database;

    #[test]
    fn builtin_database_passes_strict_validation() {
        let db = ResidueDatabase::builtin().unwrap();
        let result = run(
            ValidateArgs { strict: true },
            &db,
            &CliProgressHandler::hidden(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn errors_fail_validation() {
        let db = ResidueDatabase::from_sources([(
            "broken",
            r#"
            atoms = [{ name = "C", element = "C" }]
            bonds = [["C", "X"]]
            "#,
        )])
        .unwrap();
        let report = validate_database(&db);
        assert!(matches!(
            outcome(&report, false),
            Err(CliError::Validation { errors: 1, .. })
        ));
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let db = ResidueDatabase::from_sources([(
            "pair",
            r#"
            atoms = [
                { name = "A", element = "C" },
                { name = "B", element = "C" },
            ]
            "#,
        )])
        .unwrap();
        let report = validate_database(&db);
        assert_eq!(report.errors().count(), 0);
        assert!(report.warnings().count() > 0);
        assert!(outcome(&report, false).is_ok());
        assert!(matches!(
            outcome(&report, true),
            Err(CliError::Validation { errors: 0, .. })
        ));
    }
}
