use super::registry::ResidueDatabase;
use super::resolve::{ResolveError, Resolver};
use crate::core::models::residue::ResidueTemplate;
use crate::core::utils::identifiers::normalize_pdb_name;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Largest accepted deviation between a parameter set's charge sum and the declared net
/// charge, in elementary charges.
pub const NET_CHARGE_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IssueKind {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("PDB alias '{alias}' points to '{target}', which is not a PDB atom name")]
    DanglingAlias { alias: String, target: String },
    #[error("PDB alias '{alias}' shadows a standard PDB atom name")]
    ShadowingAlias { alias: String },
    #[error(
        "Charges of parameter set '{set}' sum to {actual:.4}, but the declared net charge is {expected:.4}"
    )]
    NetChargeMismatch {
        set: String,
        expected: f64,
        actual: f64,
    },
    #[error("Parameter set '{set}' has no charge for: {}", .atoms.join(", "))]
    MissingCharges { set: String, atoms: Vec<String> },
    #[error("Parameter set '{set}' has no atom type for: {}", .atoms.join(", "))]
    MissingAtomTypes { set: String, atoms: Vec<String> },
    #[error("Bond graph splits into {components} disconnected fragments")]
    Disconnected { components: usize },
    #[error("PDB residue name '{code}' is also claimed by: {}", .others.join(", "))]
    DuplicatePdbCode { code: String, others: Vec<String> },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Resolve(_)
            | IssueKind::DanglingAlias { .. }
            | IssueKind::ShadowingAlias { .. }
            | IssueKind::NetChargeMismatch { .. } => Severity::Error,
            IssueKind::MissingCharges { .. }
            | IssueKind::MissingAtomTypes { .. }
            | IssueKind::Disconnected { .. }
            | IssueKind::DuplicatePdbCode { .. } => Severity::Warning,
        }
    }
}

/// A problem found in one definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub template: String,
    pub kind: IssueKind,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.template, self.kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<Issue>,
    checked: usize,
}

impl ValidationReport {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
    }

    /// `true` when no error was found. Warnings do not invalidate a database.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Number of definitions that were checked.
    pub fn checked(&self) -> usize {
        self.checked
    }

    fn push(&mut self, template: &str, kind: IssueKind) {
        self.issues.push(Issue {
            template: template.to_string(),
            kind,
        });
    }
}

/// Resolves and checks every definition of `db`.
pub fn validate_database(db: &ResidueDatabase) -> ValidationReport {
    validate_database_with(db, |_| {})
}

/// Like [`validate_database`], calling `on_checked` with each definition name once it has
/// been checked.
pub fn validate_database_with(
    db: &ResidueDatabase,
    mut on_checked: impl FnMut(&str),
) -> ValidationReport {
    let mut resolver = Resolver::new(db);
    let mut report = ValidationReport::default();
    let residues: HashSet<&str> = db.residue_names().into_iter().collect();
    let mut pdb_claims: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for name in db.names() {
        match resolver.resolve(name) {
            Ok(template) => {
                for kind in check_template(&template) {
                    report.push(name, kind);
                }
                if residues.contains(name) {
                    for code in template.declared_pdb_codes() {
                        pdb_claims
                            .entry(normalize_pdb_name(code))
                            .or_default()
                            .push(name.to_string());
                    }
                }
            }
            Err(e) => report.push(name, IssueKind::Resolve(e)),
        }
        report.checked += 1;
        on_checked(name);
    }

    for (code, claimants) in pdb_claims {
        if claimants.len() < 2 {
            continue;
        }
        for (i, name) in claimants.iter().enumerate() {
            let others = claimants
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, n)| n.clone())
                .collect();
            report.push(
                name,
                IssueKind::DuplicatePdbCode {
                    code: code.clone(),
                    others,
                },
            );
        }
    }

    report
}

/// Integrity checks on a single resolved template.
pub fn check_template(template: &ResidueTemplate) -> Vec<IssueKind> {
    let mut issues = Vec::new();
    check_aliases(template, &mut issues);
    check_parameters(template, &mut issues);

    let components = template.connected_components();
    if template.atom_count() > 1 && components > 1 {
        issues.push(IssueKind::Disconnected { components });
    }
    issues
}

fn check_aliases(template: &ResidueTemplate, issues: &mut Vec<IssueKind>) {
    let standard: HashSet<String> = template
        .pdb_entries()
        .iter()
        .flat_map(|e| e.atoms.keys())
        .map(|n| normalize_pdb_name(n))
        .collect();

    for (alias, target) in template.pdb_alternatives() {
        if standard.contains(&normalize_pdb_name(alias)) {
            issues.push(IssueKind::ShadowingAlias {
                alias: alias.clone(),
            });
        } else if !standard.contains(&normalize_pdb_name(target)) {
            issues.push(IssueKind::DanglingAlias {
                alias: alias.clone(),
                target: target.clone(),
            });
        }
    }
}

fn check_parameters(template: &ResidueTemplate, issues: &mut Vec<IssueKind>) {
    let n = template.atom_count();
    let paths = |indices: Vec<usize>| -> Vec<String> {
        indices
            .into_iter()
            .filter_map(|i| template.atom(i).map(|a| a.name.clone()))
            .collect()
    };

    for (set_name, set) in template.parameter_sets() {
        if set.is_empty() {
            continue;
        }
        let missing_charges = set.missing_charges(n);
        let missing_types = set.missing_atom_types(n);

        if !missing_charges.is_empty() {
            issues.push(IssueKind::MissingCharges {
                set: set_name.to_string(),
                atoms: paths(missing_charges),
            });
        } else if let Some(expected) = template.net_charge() {
            let actual = set.total_charge();
            if (actual - expected).abs() > NET_CHARGE_TOLERANCE {
                issues.push(IssueKind::NetChargeMismatch {
                    set: set_name.to_string(),
                    expected,
                    actual,
                });
            }
        }

        if !missing_types.is_empty() {
            issues.push(IssueKind::MissingAtomTypes {
                set: set_name.to_string(),
                atoms: paths(missing_types),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(sources: &[(&str, &str)]) -> ResidueDatabase {
        ResidueDatabase::from_sources(sources.iter().copied()).unwrap()
    }

    const DIATOMIC: &str = r#"
        net_charge = 0.0
        atoms = [
            { name = "A", element = "C" },
            { name = "B", element = "O" },
        ]
        bonds = [["A", "B"]]

        [[pdb_map]]
        residue = "DIA"
        atoms = { CA = "A", OB = "B" }

        [pdb_alternative]
        O1 = "OB"

        [parameters.amber.charges]
        A = 0.25
        B = -0.25

        [parameters.amber.atom_types]
        A = "C"
        B = "O"
    "#;

    fn kinds(report: &ValidationReport, template: &str) -> Vec<IssueKind> {
        report
            .issues()
            .iter()
            .filter(|i| i.template == template)
            .map(|i| i.kind.clone())
            .collect()
    }

    #[test]
    fn a_consistent_definition_has_no_issues() {
        let report = validate_database(&db(&[("diatomic", DIATOMIC)]));
        assert!(report.is_valid());
        assert!(report.issues().is_empty());
        assert_eq!(report.checked(), 1);
    }

    #[test]
    fn resolve_failures_are_collected_not_fatal() {
        let report = validate_database(&db(&[
            ("diatomic", DIATOMIC),
            ("broken", r#"groups = [{ name = "x", group = "missing" }]"#),
        ]));
        assert!(!report.is_valid());
        assert_eq!(report.checked(), 2);
        assert_eq!(report.errors().count(), 1);
        assert!(matches!(
            &kinds(&report, "broken")[0],
            IssueKind::Resolve(ResolveError::UnknownGroup { .. })
        ));
    }

    #[test]
    fn net_charge_mismatch_is_an_error() {
        let source = DIATOMIC.replace("net_charge = 0.0", "net_charge = 1.0");
        let report = validate_database(&db(&[("diatomic", &source)]));
        assert!(!report.is_valid());
        assert!(matches!(
            &kinds(&report, "diatomic")[0],
            IssueKind::NetChargeMismatch { expected, .. } if *expected == 1.0
        ));
    }

    #[test]
    fn partial_parameter_sets_are_warnings() {
        let source = DIATOMIC
            .replace("B = -0.25", "")
            .replace("net_charge = 0.0", "net_charge = 5.0");
        let report = validate_database(&db(&[("diatomic", &source)]));
        assert!(report.is_valid());
        assert_eq!(
            kinds(&report, "diatomic"),
            vec![IssueKind::MissingCharges {
                set: "amber".into(),
                atoms: vec!["B".into()]
            }]
        );
    }

    #[test]
    fn alias_problems_are_errors() {
        let dangling = DIATOMIC.replace("O1 = \"OB\"", "O1 = \"XX\"");
        let shadowing = DIATOMIC
            .replace("O1 = \"OB\"", "CA = \"OB\"")
            .replace("residue = \"DIA\"", "residue = \"DIS\"");
        let report = validate_database(&db(&[("dangling", &dangling), ("shadowing", &shadowing)]));

        assert_eq!(
            kinds(&report, "dangling"),
            vec![IssueKind::DanglingAlias {
                alias: "O1".into(),
                target: "XX".into()
            }]
        );
        assert_eq!(
            kinds(&report, "shadowing"),
            vec![IssueKind::ShadowingAlias { alias: "CA".into() }]
        );
    }

    #[test]
    fn disconnected_templates_are_warnings() {
        let source = DIATOMIC.replace("bonds = [[\"A\", \"B\"]]", "");
        let report = validate_database(&db(&[("diatomic", &source)]));
        assert!(report.is_valid());
        assert_eq!(
            kinds(&report, "diatomic"),
            vec![IssueKind::Disconnected { components: 2 }]
        );
    }

    #[test]
    fn duplicate_pdb_codes_are_reported_for_every_claimant() {
        let report = validate_database(&db(&[("first", DIATOMIC), ("second", DIATOMIC)]));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 2);
        assert_eq!(
            kinds(&report, "first"),
            vec![IssueKind::DuplicatePdbCode {
                code: "DIA".into(),
                others: vec!["second".into()]
            }]
        );
    }

    #[test]
    fn duplicate_codes_of_reused_residues_are_reported() {
        let wrapper = r#"
            groups = [{ name = "inner", group = "first" }]
            chain_links = { next = "inner.B" }
        "#;
        let report = validate_database(&db(&[
            ("first", DIATOMIC),
            ("second", DIATOMIC),
            ("wrapper", wrapper),
        ]));
        assert_eq!(
            kinds(&report, "first"),
            vec![IssueKind::DuplicatePdbCode {
                code: "DIA".into(),
                others: vec!["second".into()]
            }]
        );
        assert!(kinds(&report, "wrapper").is_empty());
    }

    #[test]
    fn progress_callback_sees_every_definition() {
        let db = db(&[("a", DIATOMIC), ("b", "")]);
        let mut seen = Vec::new();
        validate_database_with(&db, |name| seen.push(name.to_string()));
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn issue_display_includes_severity_and_template() {
        let issue = Issue {
            template: "x".into(),
            kind: IssueKind::Disconnected { components: 3 },
        };
        assert_eq!(
            issue.to_string(),
            "[warning] x: Bond graph splits into 3 disconnected fragments"
        );
    }

    #[test]
    fn builtin_database_is_clean() {
        let db = ResidueDatabase::builtin().unwrap();
        let report = validate_database(&db);
        let problems: Vec<String> = report.issues().iter().map(|i| i.to_string()).collect();
        assert!(problems.is_empty(), "unexpected issues: {problems:#?}");
        assert_eq!(report.checked(), db.len());
    }
}
