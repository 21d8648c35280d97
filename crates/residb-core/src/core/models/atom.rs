use crate::core::utils::identifiers::{is_hydrogen_tag, local_name};
use std::fmt;

/// An atom declared by a residue template.
///
/// The name is the fully qualified attribute path of the atom inside the template
/// (e.g. `"sidechain.C_beta"` for an atom contributed by the `sidechain` group, or
/// `"H5T"` for an atom declared directly by the template). The element tag is carried
/// verbatim from the definition file and may be a plain element symbol (`"C"`) or a
/// united-atom label (`"CH2"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomDef {
    /// Fully qualified attribute path of the atom.
    pub name: String,
    /// Element or united-atom tag.
    pub element: String,
}

impl AtomDef {
    pub fn new(name: &str, element: &str) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
        }
    }

    /// The last component of the attribute path (`"C_beta"` for `"sidechain.C_beta"`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn is_hydrogen(&self) -> bool {
        is_hydrogen_tag(&self.element)
    }
}

impl fmt::Display for AtomDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.element)
    }
}
