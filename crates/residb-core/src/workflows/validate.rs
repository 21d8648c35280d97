use crate::core::database::registry::ResidueDatabase;
use crate::core::database::validate::{ValidationReport, validate_database_with};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, trace};

#[instrument(skip_all, name = "validate_workflow")]
pub fn run(db: &ResidueDatabase, reporter: &ProgressReporter) -> ValidationReport {
    reporter.report(Progress::PhaseStart {
        name: "Validating definitions",
    });
    info!(definitions = db.len(), "Validating residue database.");

    reporter.report(Progress::TaskStart {
        total_steps: db.len() as u64,
    });
    let report = validate_database_with(db, |name| {
        trace!("Checked '{}'.", name);
        reporter.report(Progress::TaskIncrement);
    });
    reporter.report(Progress::TaskFinish);

    info!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "Validation complete."
    );
    reporter.report(Progress::PhaseFinish);
    report
}
