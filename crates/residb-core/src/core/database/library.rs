use super::registry::ResidueDatabase;
use super::resolve::{ResolveError, Resolver};
use crate::core::models::residue::ResidueTemplate;
use crate::core::utils::identifiers::normalize_pdb_name;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Resolved residue templates of a database, indexed by name and by PDB residue name.
///
/// Entries are the definitions [`ResidueDatabase::residue_names`] reports: complete
/// molecules and every chain residue, including ones reused by larger definitions.
/// Fragments such as `peptide` are resolved as parts of the residues that use them.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, ResidueTemplate>,
    pdb_index: HashMap<String, String>,
}

impl TemplateLibrary {
    pub fn build(db: &ResidueDatabase) -> Result<Self, ResolveError> {
        let mut resolver = Resolver::new(db);
        let mut library = Self::default();

        for name in db.residue_names() {
            let template = resolver.resolve(name)?;
            library.insert(template);
        }

        debug!(
            "Template library built with {} templates and {} PDB residue names.",
            library.templates.len(),
            library.pdb_index.len()
        );
        Ok(library)
    }

    /// Adds a template and indexes the PDB residue names it declares itself. Names
    /// already claimed by another template keep pointing at that template.
    pub fn insert(&mut self, template: ResidueTemplate) {
        for code in template.declared_pdb_codes() {
            let key = normalize_pdb_name(code);
            match self.pdb_index.get(&key) {
                Some(owner) if owner != &template.name => warn!(
                    "PDB residue name '{}' of '{}' is already used by '{}'; keeping '{}'.",
                    code, template.name, owner, owner
                ),
                Some(_) => {}
                None => {
                    self.pdb_index.insert(key, template.name.clone());
                }
            }
        }
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&ResidueTemplate> {
        self.templates.get(name)
    }

    /// Looks up a template by PDB residue name (case insensitive).
    pub fn by_pdb_name(&self, code: &str) -> Option<&ResidueTemplate> {
        self.pdb_index
            .get(&normalize_pdb_name(code))
            .and_then(|name| self.templates.get(name))
    }

    /// Looks up by template name first, then by PDB residue name.
    pub fn lookup(&self, name: &str) -> Option<&ResidueTemplate> {
        self.get(name).or_else(|| self.by_pdb_name(name))
    }

    /// Templates in name order.
    pub fn templates(&self) -> impl Iterator<Item = &ResidueTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
