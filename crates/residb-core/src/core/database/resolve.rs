use super::registry::ResidueDatabase;
use super::schema::GroupDefinition;
use crate::core::models::residue::{ChainLinks, PdbEntry, ResidueTemplate};
use crate::core::models::topology::Bond;
use crate::core::utils::identifiers::{is_valid_identifier, join_path};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Unknown group '{name}'{}", referrer_suffix(.referenced_by))]
    UnknownGroup {
        name: String,
        referenced_by: Option<String>,
    },
    #[error("Group reference cycle: {cycle}")]
    Cycle { cycle: String },
    #[error("Invalid identifier '{name}' in group '{group}'")]
    InvalidIdentifier { group: String, name: String },
    #[error("Atom '{name}' is declared more than once in group '{group}'")]
    DuplicateAtom { group: String, name: String },
    #[error("Name '{name}' is used by more than one atom or sub-group in group '{group}'")]
    NameClash { group: String, name: String },
    #[error("Unresolved atom path '{path}' in {context} of group '{group}'")]
    UnresolvedPath {
        group: String,
        context: String,
        path: String,
    },
    #[error("Atom '{atom}' is bonded to itself in group '{group}'")]
    SelfBond { group: String, atom: String },
    #[error("Bond '{atom1}'-'{atom2}' is declared more than once in group '{group}'")]
    DuplicateBond {
        group: String,
        atom1: String,
        atom2: String,
    },
}

fn referrer_suffix(referenced_by: &Option<String>) -> String {
    referenced_by
        .as_ref()
        .map(|r| format!(" referenced by '{r}'"))
        .unwrap_or_default()
}

impl ResolveError {
    /// The definition in which the problem was found.
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::UnknownGroup { referenced_by, .. } => referenced_by.as_deref(),
            Self::Cycle { .. } => None,
            Self::InvalidIdentifier { group, .. }
            | Self::DuplicateAtom { group, .. }
            | Self::NameClash { group, .. }
            | Self::UnresolvedPath { group, .. }
            | Self::SelfBond { group, .. }
            | Self::DuplicateBond { group, .. } => Some(group),
        }
    }
}

/// Resolves a single definition into a flat template.
pub fn resolve(db: &ResidueDatabase, name: &str) -> Result<ResidueTemplate, ResolveError> {
    Resolver::new(db).resolve(name)
}

/// Resolves definitions of one database, caching every template it produces.
///
/// Sub-groups shared by many residues (`peptide`, `deoxyribose`) are flattened only once.
pub struct Resolver<'a> {
    db: &'a ResidueDatabase,
    cache: HashMap<String, ResidueTemplate>,
}

impl<'a> Resolver<'a> {
    pub fn new(db: &'a ResidueDatabase) -> Self {
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, name: &str) -> Result<ResidueTemplate, ResolveError> {
        let mut stack = Vec::new();
        self.resolve_with_stack(name, &mut stack)
    }

    fn resolve_with_stack(
        &mut self,
        name: &str,
        stack: &mut Vec<String>,
    ) -> Result<ResidueTemplate, ResolveError> {
        if let Some(template) = self.cache.get(name) {
            return Ok(template.clone());
        }

        if let Some(pos) = stack.iter().position(|s| s == name) {
            let mut cycle: Vec<&str> = stack[pos..].iter().map(String::as_str).collect();
            cycle.push(name);
            return Err(ResolveError::Cycle {
                cycle: cycle.join(" -> "),
            });
        }

        let db = self.db;
        let definition = db.get(name).ok_or_else(|| ResolveError::UnknownGroup {
            name: name.to_string(),
            referenced_by: stack.last().cloned(),
        })?;

        stack.push(name.to_string());
        let result = self.flatten(name, definition, stack);
        stack.pop();

        let template = result?;
        trace!(
            "Resolved '{}' ({} atoms, {} bonds).",
            name,
            template.atom_count(),
            template.bond_count()
        );
        self.cache.insert(name.to_string(), template.clone());
        Ok(template)
    }

    fn flatten(
        &mut self,
        name: &str,
        definition: &GroupDefinition,
        stack: &mut Vec<String>,
    ) -> Result<ResidueTemplate, ResolveError> {
        check_local_names(name, definition)?;

        let display_name = definition.name.as_deref().unwrap_or(name);
        let mut template = ResidueTemplate::new(name, display_name);
        template.net_charge = definition.net_charge;

        for atom in &definition.atoms {
            template.push_atom(&atom.name, &atom.element);
        }

        let mut inherited_entries: Vec<PdbEntry> = Vec::new();
        let mut inherited_aliases: Vec<(String, String)> = Vec::new();

        for instance in &definition.groups {
            let child = self.resolve_with_stack(&instance.group, stack)?;
            let offset = template.atom_count();

            for atom in child.atoms() {
                template.push_atom(&join_path(&instance.name, &atom.name), &atom.element);
            }
            for bond in child.bonds() {
                template.push_bond(bond.map(|i| i + offset));
            }
            for (set_name, set) in child.parameter_sets() {
                let target = template.parameter_set_mut(set_name);
                for (&atom, &charge) in &set.charges {
                    target.charges.insert(atom + offset, charge);
                }
                for (&atom, atom_type) in &set.atom_types {
                    target.atom_types.insert(atom + offset, atom_type.clone());
                }
            }
            for entry in child.pdb_entries() {
                let mut shifted = PdbEntry::new(&entry.residue);
                for (pdb_name, &atom) in &entry.atoms {
                    shifted.atoms.insert(pdb_name.clone(), atom + offset);
                }
                inherited_entries.push(shifted);
            }
            inherited_aliases.extend(
                child
                    .pdb_alternatives()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        for [path1, path2] in &definition.bonds {
            let a = lookup(&template, name, "bonds", path1)?;
            let b = lookup(&template, name, "bonds", path2)?;
            if a == b {
                return Err(ResolveError::SelfBond {
                    group: name.to_string(),
                    atom: path1.clone(),
                });
            }
            if !template.push_bond(Bond::new(a, b)) {
                return Err(ResolveError::DuplicateBond {
                    group: name.to_string(),
                    atom1: path1.clone(),
                    atom2: path2.clone(),
                });
            }
        }

        for (set_name, spec) in &definition.parameters {
            let context = format!("parameters.{set_name}.charges");
            let charges = spec
                .charges
                .iter()
                .map(|(path, &charge)| Ok((lookup(&template, name, &context, path)?, charge)))
                .collect::<Result<Vec<_>, ResolveError>>()?;
            let context = format!("parameters.{set_name}.atom_types");
            let atom_types = spec
                .atom_types
                .iter()
                .map(|(path, t)| Ok((lookup(&template, name, &context, path)?, t.clone())))
                .collect::<Result<Vec<_>, ResolveError>>()?;

            let target = template.parameter_set_mut(set_name);
            target.charges.extend(charges);
            target.atom_types.extend(atom_types);
        }

        let mut entries = Vec::with_capacity(definition.pdb_map.len());
        for spec in &definition.pdb_map {
            let context = format!("pdb_map '{}'", spec.residue);
            let mut entry = PdbEntry::new(&spec.residue);
            for (pdb_name, path) in &spec.atoms {
                let atom = lookup(&template, name, &context, path)?;
                entry.atoms.insert(pdb_name.clone(), atom);
            }
            entries.push(entry);
        }
        template.declares_pdb_codes = !entries.is_empty();
        template.pdb_entries = merge_pdb_entries(entries, inherited_entries);

        template.pdb_alternatives = definition.pdb_alternative.clone();
        for (alias, standard) in inherited_aliases {
            template.pdb_alternatives.entry(alias).or_insert(standard);
        }

        if let Some(links) = &definition.chain_links {
            let resolve_link = |path: &Option<String>| {
                path.as_deref()
                    .map(|p| lookup(&template, name, "chain_links", p))
                    .transpose()
            };
            let previous = resolve_link(&links.previous)?;
            let next = resolve_link(&links.next)?;
            template.chain_links = Some(ChainLinks { previous, next });
        }

        Ok(template)
    }
}

fn check_local_names(group: &str, definition: &GroupDefinition) -> Result<(), ResolveError> {
    let mut atom_names = HashSet::new();
    for atom in &definition.atoms {
        if !is_valid_identifier(&atom.name) {
            return Err(ResolveError::InvalidIdentifier {
                group: group.to_string(),
                name: atom.name.clone(),
            });
        }
        if !atom_names.insert(atom.name.as_str()) {
            return Err(ResolveError::DuplicateAtom {
                group: group.to_string(),
                name: atom.name.clone(),
            });
        }
    }

    let mut instance_names = HashSet::new();
    for instance in &definition.groups {
        if !is_valid_identifier(&instance.name) {
            return Err(ResolveError::InvalidIdentifier {
                group: group.to_string(),
                name: instance.name.clone(),
            });
        }
        if atom_names.contains(instance.name.as_str())
            || !instance_names.insert(instance.name.as_str())
        {
            return Err(ResolveError::NameClash {
                group: group.to_string(),
                name: instance.name.clone(),
            });
        }
    }
    Ok(())
}

fn lookup(
    template: &ResidueTemplate,
    group: &str,
    context: &str,
    path: &str,
) -> Result<usize, ResolveError> {
    template
        .atom_index(path)
        .ok_or_else(|| ResolveError::UnresolvedPath {
            group: group.to_string(),
            context: context.to_string(),
            path: path.to_string(),
        })
}

/// Combines a definition's own PDB entries with the ones inherited from its sub-groups.
///
/// With own entries, every inherited atom name is added to each of them unless the PDB
/// name or the atom is already mapped there. Without own entries, inherited entries are
/// kept, with same-named entries of different sub-groups combined.
fn merge_pdb_entries(own: Vec<PdbEntry>, inherited: Vec<PdbEntry>) -> Vec<PdbEntry> {
    if own.is_empty() {
        let mut result: Vec<PdbEntry> = Vec::new();
        for entry in inherited {
            match result.iter_mut().find(|e| e.residue == entry.residue) {
                Some(existing) => merge_into(existing, &entry),
                None => result.push(entry),
            }
        }
        return result;
    }

    let mut result = own;
    for entry in &mut result {
        for other in &inherited {
            merge_into(entry, other);
        }
    }
    result
}

fn merge_into(entry: &mut PdbEntry, other: &PdbEntry) {
    for (pdb_name, &atom) in &other.atoms {
        if entry.atoms.contains_key(pdb_name) || entry.atoms.values().any(|&a| a == atom) {
            continue;
        }
        entry.atoms.insert(pdb_name.clone(), atom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(sources: &[(&str, &str)]) -> ResidueDatabase {
        ResidueDatabase::from_sources(sources.iter().copied()).unwrap()
    }

    const METHYL: &str = r#"
        atoms = [
            { name = "C", element = "C" },
            { name = "H1", element = "H" },
            { name = "H2", element = "H" },
            { name = "H3", element = "H" },
        ]
        bonds = [["C", "H1"], ["C", "H2"], ["C", "H3"]]

        [[pdb_map]]
        residue = "methyl"
        atoms = { C = "C", H1 = "H1", H2 = "H2", H3 = "H3" }

        [pdb_alternative]
        HM = "H1"

        [parameters.amber.charges]
        C = -0.3
        H1 = 0.1
        H2 = 0.1
        H3 = 0.1
    "#;

    const ETHANE: &str = r#"
        name = "ethane"
        net_charge = 0.0
        groups = [
            { name = "left", group = "methyl" },
            { name = "right", group = "methyl" },
        ]
        bonds = [["left.C", "right.C"]]
        chain_links = { next = "right.C" }

        [[pdb_map]]
        residue = "ETH"
        atoms = { C1 = "left.C", C2 = "right.C" }

        [pdb_alternative]
        HM = "C1"

        [parameters.amber.charges]
        "left.C" = -0.2
    "#;

    #[test]
    fn resolve_flattens_sub_groups_with_qualified_paths() {
        let db = db(&[("methyl", METHYL), ("ethane", ETHANE)]);
        let t = resolve(&db, "ethane").unwrap();

        assert_eq!(t.display_name, "ethane");
        assert_eq!(t.atom_count(), 8);
        assert_eq!(t.atoms()[0].name, "left.C");
        assert_eq!(t.atoms()[4].name, "right.C");
        assert_eq!(t.bond_count(), 7);
        assert!(t.has_bond("left.C", "right.C"));
        assert!(t.has_bond("right.H2", "right.C"));
        assert_eq!(t.connected_components(), 1);
        assert_eq!(
            t.chain_links(),
            Some(ChainLinks {
                previous: None,
                next: Some(4)
            })
        );
    }

    #[test]
    fn resolve_lets_parent_parameters_override_inherited_ones() {
        let db = db(&[("methyl", METHYL), ("ethane", ETHANE)]);
        let t = resolve(&db, "ethane").unwrap();
        let amber = t.parameter_set("amber").unwrap();
        assert_eq!(amber.charge(0), Some(-0.2));
        assert_eq!(amber.charge(4), Some(-0.3));
        assert_eq!(amber.charge(5), Some(0.1));
    }

    #[test]
    fn resolve_merges_inherited_pdb_names_without_overriding_parent() {
        let db = db(&[("methyl", METHYL), ("ethane", ETHANE)]);
        let t = resolve(&db, "ethane").unwrap();

        assert_eq!(t.pdb_codes().collect::<Vec<_>>(), vec!["ETH"]);
        assert_eq!(t.declared_pdb_codes().collect::<Vec<_>>(), vec!["ETH"]);
        assert_eq!(t.find_by_pdb_name("C1"), Some(0));
        assert_eq!(t.find_by_pdb_name("C2"), Some(4));
        // "C" would map both carbons; both are already named by the parent.
        assert_eq!(t.find_by_pdb_name("C"), None);
        // "H1" is claimed by the left methyl first.
        assert_eq!(t.find_by_pdb_name("H1"), Some(1));
        assert_eq!(t.pdb_alternatives().get("HM").map(String::as_str), Some("C1"));
    }

    #[test]
    fn resolve_inherits_child_entries_when_parent_has_none() {
        let db = db(&[
            ("methyl", METHYL),
            ("wrapper", r#"groups = [{ name = "m", group = "methyl" }]"#),
        ]);
        let t = resolve(&db, "wrapper").unwrap();
        assert_eq!(t.display_name, "wrapper");
        assert_eq!(t.pdb_codes().collect::<Vec<_>>(), vec!["methyl"]);
        assert_eq!(t.declared_pdb_codes().count(), 0);
        assert_eq!(t.find_by_pdb_name("HM"), Some(1));
        assert_eq!(t.atom_index("m.H3"), Some(3));
        assert!(t.chain_links().is_none());
    }

    #[test]
    fn resolve_supports_nested_paths() {
        let db = db(&[
            ("methyl", METHYL),
            ("wrapper", r#"groups = [{ name = "m", group = "methyl" }]"#),
            (
                "outer",
                r#"
                atoms = [{ name = "X", element = "Cl" }]
                groups = [{ name = "w", group = "wrapper" }]
                bonds = [["X", "w.m.C"]]
                "#,
            ),
        ]);
        let t = resolve(&db, "outer").unwrap();
        assert_eq!(t.atoms()[0].name, "X");
        assert!(t.has_bond("X", "w.m.C"));
        assert_eq!(t.atom_by_path("w.m.H2").unwrap().element, "H");
    }

    #[test]
    fn resolve_reports_unknown_groups_with_referrer() {
        let db = db(&[("a", r#"groups = [{ name = "x", group = "missing" }]"#)]);
        assert_eq!(
            resolve(&db, "a"),
            Err(ResolveError::UnknownGroup {
                name: "missing".into(),
                referenced_by: Some("a".into())
            })
        );
        assert_eq!(
            resolve(&db, "nothing"),
            Err(ResolveError::UnknownGroup {
                name: "nothing".into(),
                referenced_by: None
            })
        );
    }

    #[test]
    fn resolve_detects_reference_cycles() {
        let db = db(&[
            ("a", r#"groups = [{ name = "x", group = "b" }]"#),
            ("b", r#"groups = [{ name = "y", group = "a" }]"#),
            ("c", r#"groups = [{ name = "z", group = "c" }]"#),
        ]);
        assert_eq!(
            resolve(&db, "a"),
            Err(ResolveError::Cycle {
                cycle: "a -> b -> a".into()
            })
        );
        assert_eq!(
            resolve(&db, "c"),
            Err(ResolveError::Cycle {
                cycle: "c -> c".into()
            })
        );
    }

    #[test]
    fn resolve_rejects_name_problems() {
        let db = db(&[
            ("methyl", METHYL),
            ("bad_id", r#"atoms = [{ name = "C'", element = "C" }]"#),
            (
                "dup",
                r#"atoms = [{ name = "C", element = "C" }, { name = "C", element = "C" }]"#,
            ),
            (
                "clash",
                r#"
                atoms = [{ name = "m", element = "C" }]
                groups = [{ name = "m", group = "methyl" }]
                "#,
            ),
        ]);
        assert!(matches!(
            resolve(&db, "bad_id"),
            Err(ResolveError::InvalidIdentifier { name, .. }) if name == "C'"
        ));
        assert!(matches!(
            resolve(&db, "dup"),
            Err(ResolveError::DuplicateAtom { name, .. }) if name == "C"
        ));
        assert!(matches!(
            resolve(&db, "clash"),
            Err(ResolveError::NameClash { name, .. }) if name == "m"
        ));
    }

    #[test]
    fn resolve_rejects_unresolved_paths_in_every_section() {
        let cases = [
            (r#"bonds = [["m.C", "m.Q"]]"#, "bonds"),
            ("[parameters.amber.charges]\n\"m.Q\" = 0.0", "parameters.amber.charges"),
            ("[parameters.amber.atom_types]\n\"m.Q\" = \"CT\"", "parameters.amber.atom_types"),
            ("[[pdb_map]]\nresidue = \"R\"\natoms = { Q = \"m.Q\" }", "pdb_map 'R'"),
            (r#"chain_links = { previous = "m.Q" }"#, "chain_links"),
        ];
        for (body, expected_context) in cases {
            let source = format!("groups = [{{ name = \"m\", group = \"methyl\" }}]\n{body}");
            let db = db(&[("methyl", METHYL), ("r", &source)]);
            match resolve(&db, "r") {
                Err(ResolveError::UnresolvedPath { context, path, .. }) => {
                    assert_eq!(context, expected_context);
                    assert_eq!(path, "m.Q");
                }
                other => panic!("unexpected result for {expected_context}: {other:?}"),
            }
        }
    }

    #[test]
    fn resolve_rejects_self_and_duplicate_bonds() {
        let db = db(&[
            ("methyl", METHYL),
            (
                "selfbond",
                r#"
                atoms = [{ name = "C", element = "C" }]
                bonds = [["C", "C"]]
                "#,
            ),
            (
                "twice",
                r#"
                groups = [{ name = "m", group = "methyl" }]
                bonds = [["m.H1", "m.C"]]
                "#,
            ),
        ]);
        assert!(matches!(
            resolve(&db, "selfbond"),
            Err(ResolveError::SelfBond { atom, .. }) if atom == "C"
        ));
        assert!(matches!(
            resolve(&db, "twice"),
            Err(ResolveError::DuplicateBond { .. })
        ));
    }

    #[test]
    fn errors_name_the_failing_definition() {
        let db = db(&[
            ("broken", r#"bonds = [["A", "B"]]"#),
            ("user", r#"groups = [{ name = "b", group = "broken" }]"#),
        ]);
        let err = resolve(&db, "user").unwrap_err();
        assert_eq!(err.group(), Some("broken"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn resolver_caches_shared_groups() {
        let db = db(&[("methyl", METHYL), ("ethane", ETHANE)]);
        let mut resolver = Resolver::new(&db);
        let ethane = resolver.resolve("ethane").unwrap();
        let methyl = resolver.resolve("methyl").unwrap();
        assert_eq!(ethane.atom_count(), 2 * methyl.atom_count());
    }

    #[test]
    fn builtin_alanine_resolves() {
        let db = ResidueDatabase::builtin().unwrap();
        let ala = resolve(&db, "alanine").unwrap();

        assert_eq!(ala.atom_count(), 10);
        assert_eq!(ala.bond_count(), 9);
        assert!(ala.has_bond("peptide.C_alpha", "sidechain.C_beta"));
        assert_eq!(ala.pdb_codes().collect::<Vec<_>>(), vec!["ALA"]);
        assert_eq!(ala.find_by_pdb_name("CB"), ala.atom_index("sidechain.C_beta"));
        assert_eq!(ala.find_by_pdb_name("OT1"), ala.atom_index("peptide.O"));

        let amber = ala.parameter_set("amber").unwrap();
        assert!(amber.is_complete(ala.atom_count()));
        assert!(amber.total_charge().abs() < 1e-3);
        assert_eq!(
            amber.atom_type(ala.atom_index("sidechain.C_beta").unwrap()),
            Some("CT")
        );
    }

    #[test]
    fn builtin_glycine_prefers_its_own_pdb_names() {
        let db = ResidueDatabase::builtin().unwrap();
        let gly = resolve(&db, "glycine").unwrap();

        let h_alpha = gly.atom_index("peptide.H_alpha").unwrap();
        let h_alpha_3 = gly.atom_index("H_alpha_3").unwrap();
        assert_eq!(gly.atom_count(), 7);
        assert_eq!(gly.find_by_pdb_name("HA2"), Some(h_alpha));
        assert_eq!(gly.find_by_pdb_name("HA3"), Some(h_alpha_3));
        assert_eq!(gly.find_by_pdb_name("HA"), Some(h_alpha));
        assert_eq!(gly.find_by_pdb_name("HA1"), Some(h_alpha_3));
        assert_eq!(gly.pdb_name_of(h_alpha), Some("HA2"));
    }

    #[test]
    fn builtin_histidine_epsilon_has_two_pdb_codes() {
        let db = ResidueDatabase::builtin().unwrap();
        let hie = resolve(&db, "histidine_epsilon").unwrap();
        assert_eq!(hie.pdb_codes().collect::<Vec<_>>(), vec!["HIE", "HIS"]);
        assert_eq!(
            hie.find_by_pdb_name_for("HIS", "NE2"),
            hie.find_by_pdb_name_for("HIE", "NE2")
        );
        assert!(hie.find_by_pdb_name_for("HIS", "NE2").is_some());
    }

    #[test]
    fn builtin_nucleotides_resolve_with_chain_links() {
        let db = ResidueDatabase::builtin().unwrap();
        let da = resolve(&db, "deoxyadenosine").unwrap();
        assert_eq!(da.atom_count(), 32);
        assert_eq!(da.bond_count(), 34);
        let links = da.chain_links().unwrap();
        assert_eq!(links.previous, da.atom_index("phosphate.P"));
        assert_eq!(links.next, da.atom_index("sugar.O3_prime"));
        assert_eq!(da.find_by_pdb_name("O5'"), da.atom_index("sugar.O5_prime"));

        let da5 = resolve(&db, "deoxyadenosine_5ter").unwrap();
        assert_eq!(da5.chain_links().unwrap().previous, None);
        let da3 = resolve(&db, "deoxyadenosine_3ter").unwrap();
        assert_eq!(da3.chain_links().unwrap().next, None);
    }
}
