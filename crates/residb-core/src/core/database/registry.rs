use super::builtin::{builtin_names, builtin_source};
use super::schema::GroupDefinition;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// File extension of definition files inside a database directory.
pub const DEFINITION_EXTENSION: &str = "toml";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Definition '{name}' is defined more than once")]
    DuplicateDefinition { name: String },
}

/// Collection of unresolved group and residue definitions, keyed by name.
///
/// A database is a flat namespace: every definition can be instantiated by every other
/// definition through its name. Composition is only performed on demand by
/// [`super::resolve::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResidueDatabase {
    definitions: BTreeMap<String, GroupDefinition>,
}

impl ResidueDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the definitions compiled into the library.
    pub fn builtin() -> Result<Self, DatabaseError> {
        let sources = builtin_names()
            .into_iter()
            .filter_map(|name| builtin_source(name).map(|src| (name, src)));
        let db = Self::from_sources(sources)?;
        debug!("Loaded {} built-in definitions.", db.len());
        Ok(db)
    }

    /// Builds a database from `(name, toml source)` pairs.
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, DatabaseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut db = Self::new();
        for (name, source) in sources {
            let definition =
                GroupDefinition::from_toml(source).map_err(|e| DatabaseError::Toml {
                    path: name.to_string(),
                    source: e,
                })?;
            if db.definitions.contains_key(name) {
                return Err(DatabaseError::DuplicateDefinition {
                    name: name.to_string(),
                });
            }
            db.definitions.insert(name.to_string(), definition);
        }
        Ok(db)
    }

    /// Loads every `*.toml` file of a directory; the file stem becomes the definition name.
    ///
    /// Files are read in sorted path order so that error reporting is deterministic.
    pub fn load_dir(path: &Path) -> Result<Self, DatabaseError> {
        let io_error = |p: &Path, e: std::io::Error| DatabaseError::Io {
            path: p.to_string_lossy().to_string(),
            source: e,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| io_error(path, e))? {
            let entry = entry.map_err(|e| io_error(path, e))?;
            let file_path = entry.path();
            if file_path.is_file()
                && file_path.extension().and_then(|e| e.to_str()) == Some(DEFINITION_EXTENSION)
            {
                files.push(file_path);
            }
        }
        files.sort();

        let mut db = Self::new();
        for file_path in files {
            let Some(name) = file_path.file_stem().and_then(|s| s.to_str()) else {
                warn!(
                    "Skipping definition file with a non UTF-8 name: {}",
                    file_path.display()
                );
                continue;
            };
            let content =
                std::fs::read_to_string(&file_path).map_err(|e| io_error(&file_path, e))?;
            let definition =
                GroupDefinition::from_toml(&content).map_err(|e| DatabaseError::Toml {
                    path: file_path.to_string_lossy().to_string(),
                    source: e,
                })?;
            db.definitions.insert(name.to_string(), definition);
        }

        debug!(
            "Loaded {} definitions from '{}'.",
            db.len(),
            path.display()
        );
        Ok(db)
    }

    /// Opens the database a front end works with: the built-in definitions (unless
    /// `include_builtin` is false) overlaid with the definitions of `user_dir`.
    pub fn open(user_dir: Option<&Path>, include_builtin: bool) -> Result<Self, DatabaseError> {
        let mut db = if include_builtin {
            Self::builtin()?
        } else {
            Self::new()
        };
        if let Some(dir) = user_dir {
            db.merge(Self::load_dir(dir)?);
        }
        if db.is_empty() {
            warn!("Residue database is empty.");
        }
        Ok(db)
    }

    /// Adds a definition. Returns the definition previously stored under `name`, if any.
    pub fn insert(&mut self, name: &str, definition: GroupDefinition) -> Option<GroupDefinition> {
        self.definitions.insert(name.to_string(), definition)
    }

    /// Overlays `other` on this database; definitions of `other` replace same-named ones.
    pub fn merge(&mut self, other: ResidueDatabase) {
        for (name, definition) in other.definitions {
            if self.definitions.insert(name.clone(), definition).is_some() {
                debug!("Definition '{}' overridden by user database.", name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&GroupDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Definition names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupDefinition)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Names of definitions that no other definition instantiates, in sorted order.
    ///
    /// These are the complete residues and molecules; everything else is a reusable
    /// fragment.
    pub fn root_names(&self) -> Vec<&str> {
        let referenced: HashSet<&str> = self
            .definitions
            .values()
            .flat_map(|d| d.referenced_groups())
            .collect();
        self.names().filter(|n| !referenced.contains(n)).collect()
    }

    /// Names of definitions that are residues in their own right, in sorted order.
    ///
    /// Every root definition qualifies, as does every definition with chain links or
    /// with a PDB residue name of its own, whether or not another definition reuses it.
    /// A `pdb_map` residue equal to the instance name the definition is used under only
    /// names the fragment inside its parent and does not count.
    pub fn residue_names(&self) -> Vec<&str> {
        let mut instance_names: HashMap<&str, HashSet<&str>> = HashMap::new();
        for definition in self.definitions.values() {
            for instance in &definition.groups {
                instance_names
                    .entry(instance.group.as_str())
                    .or_default()
                    .insert(instance.name.as_str());
            }
        }

        let roots: HashSet<&str> = self.root_names().into_iter().collect();
        self.definitions
            .iter()
            .filter(|(name, d)| {
                let used_as = instance_names.get(name.as_str());
                roots.contains(name.as_str())
                    || d.chain_links.is_some()
                    || d.pdb_map.iter().any(|entry| {
                        used_as.is_none_or(|names| !names.contains(entry.residue.as_str()))
                    })
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const METHYL: &str = r#"
        atoms = [
            { name = "C", element = "C" },
            { name = "H1", element = "H" },
        ]
        bonds = [["C", "H1"]]
    "#;

    const ETHYL: &str = r#"
        groups = [
            { name = "a", group = "methyl" },
            { name = "b", group = "methyl" },
        ]
        bonds = [["a.C", "b.C"]]
    "#;

    #[test]
    fn from_sources_parses_every_definition() {
        let db = ResidueDatabase::from_sources([("methyl", METHYL), ("ethyl", ETHYL)]).unwrap();
        assert_eq!(db.len(), 2);
        assert!(db.contains("methyl"));
        assert_eq!(db.names().collect::<Vec<_>>(), vec!["ethyl", "methyl"]);
    }

    #[test]
    fn from_sources_rejects_duplicate_names() {
        let result = ResidueDatabase::from_sources([("methyl", METHYL), ("methyl", METHYL)]);
        assert!(matches!(
            result,
            Err(DatabaseError::DuplicateDefinition { name }) if name == "methyl"
        ));
    }

    #[test]
    fn from_sources_reports_the_offending_definition() {
        let result = ResidueDatabase::from_sources([("broken", "atoms = ")]);
        assert!(matches!(result, Err(DatabaseError::Toml { path, .. }) if path == "broken"));
    }

    #[test]
    fn root_names_excludes_referenced_fragments() {
        let db = ResidueDatabase::from_sources([("methyl", METHYL), ("ethyl", ETHYL)]).unwrap();
        assert_eq!(db.root_names(), vec!["ethyl"]);
    }

    #[test]
    fn residue_names_keep_reused_chain_residues() {
        let dimer = r#"
            groups = [
                { name = "first", group = "alanine" },
                { name = "second", group = "glycine" },
            ]
            bonds = [["first.peptide.C", "second.peptide.N"]]
        "#;
        let mut db = ResidueDatabase::builtin().unwrap();
        db.merge(ResidueDatabase::from_sources([("ala_gly", dimer)]).unwrap());

        let roots = db.root_names();
        assert!(!roots.contains(&"alanine"));
        let residues = db.residue_names();
        assert!(residues.contains(&"alanine"));
        assert!(residues.contains(&"glycine"));
        assert!(residues.contains(&"ala_gly"));
        assert!(!residues.contains(&"peptide"));
    }

    #[test]
    fn residue_names_keep_reused_molecules_with_their_own_pdb_name() {
        let methyl = format!("{METHYL}\n[[pdb_map]]\nresidue = \"MET1\"\natoms = {{ C1 = \"C\" }}\n");
        let db =
            ResidueDatabase::from_sources([("methyl", methyl.as_str()), ("ethyl", ETHYL)]).unwrap();
        assert_eq!(db.residue_names(), vec!["ethyl", "methyl"]);

        let fragment = METHYL.to_string() + "\n[[pdb_map]]\nresidue = \"a\"\natoms = { C1 = \"C\" }\n";
        let single = r#"groups = [{ name = "a", group = "methyl" }]"#;
        let db =
            ResidueDatabase::from_sources([("methyl", fragment.as_str()), ("single", single)])
                .unwrap();
        assert_eq!(db.residue_names(), vec!["single"]);
    }

    #[test]
    fn load_dir_reads_only_toml_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("methyl.toml"), METHYL).unwrap();
        fs::write(dir.path().join("ethyl.toml"), ETHYL).unwrap();
        fs::write(dir.path().join("README.md"), "not a definition").unwrap();

        let db = ResidueDatabase::load_dir(dir.path()).unwrap();
        assert_eq!(db.names().collect::<Vec<_>>(), vec!["ethyl", "methyl"]);
    }

    #[test]
    fn load_dir_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let result = ResidueDatabase::load_dir(&dir.path().join("absent"));
        assert!(matches!(result, Err(DatabaseError::Io { .. })));
    }

    #[test]
    fn load_dir_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.toml"), "this is not toml").unwrap();
        let result = ResidueDatabase::load_dir(dir.path());
        assert!(matches!(result, Err(DatabaseError::Toml { path, .. }) if path.ends_with("bad.toml")));
    }

    #[test]
    fn merge_overrides_existing_definitions() {
        let mut db = ResidueDatabase::from_sources([("methyl", METHYL)]).unwrap();
        let user = ResidueDatabase::from_sources([
            ("methyl", "atoms = [{ name = \"C\", element = \"CH3\" }]"),
            ("ethyl", ETHYL),
        ])
        .unwrap();

        db.merge(user);

        assert_eq!(db.len(), 2);
        assert_eq!(db.get("methyl").unwrap().atoms[0].element, "CH3");
    }

    #[test]
    fn insert_returns_replaced_definition() {
        let mut db = ResidueDatabase::new();
        assert!(db.insert("x", GroupDefinition::default()).is_none());
        assert!(db.insert("x", GroupDefinition::default()).is_some());
        assert!(!db.is_empty());
    }

    #[test]
    fn open_overlays_user_definitions_on_builtin_ones() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("methyl.toml"), METHYL).unwrap();

        let db = ResidueDatabase::open(Some(dir.path()), true).unwrap();
        assert!(db.contains("methyl"));
        assert!(db.contains("alanine"));

        let db = ResidueDatabase::open(Some(dir.path()), false).unwrap();
        assert_eq!(db.len(), 1);

        let db = ResidueDatabase::open(None, false).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn builtin_database_loads() {
        let db = ResidueDatabase::builtin().unwrap();
        assert!(db.contains("peptide"));
        assert!(db.contains("deoxyadenosine"));
        let roots = db.root_names();
        assert!(roots.contains(&"alanine"));
        assert!(roots.contains(&"histidine_plus"));
        assert!(!roots.contains(&"peptide"));
        assert!(!roots.contains(&"adenine"));
    }
}
