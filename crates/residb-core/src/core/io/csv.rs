use crate::core::models::residue::ResidueTemplate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvExportError {
    #[error("Template '{template}' has no parameter set named '{set}'")]
    UnknownParameterSet { template: String, set: String },
    #[error("CSV writing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// One exported row: a template atom with its naming and parameters.
#[derive(Debug, Serialize)]
struct AtomRow<'a> {
    index: usize,
    path: &'a str,
    element: &'a str,
    pdb_name: Option<&'a str>,
    charge: Option<f64>,
    atom_type: Option<&'a str>,
}

/// Writes the atom table of a template as CSV, one row per atom in template order.
///
/// Charge and atom type come from `parameter_set`; cells without a value are left empty.
/// The PDB name is taken from the template's first PDB entry.
pub fn write_template_csv<W: Write>(
    template: &ResidueTemplate,
    parameter_set: &str,
    writer: W,
) -> Result<(), CsvExportError> {
    write_rows(template, parameter_set, writer, "<writer>")
}

pub fn write_template_csv_to_path(
    template: &ResidueTemplate,
    parameter_set: &str,
    path: &Path,
) -> Result<(), CsvExportError> {
    let display = path.to_string_lossy().to_string();
    let file = std::fs::File::create(path).map_err(|e| CsvExportError::Csv {
        path: display.clone(),
        source: e.into(),
    })?;
    write_rows(template, parameter_set, file, &display)
}

fn write_rows<W: Write>(
    template: &ResidueTemplate,
    parameter_set: &str,
    writer: W,
    path: &str,
) -> Result<(), CsvExportError> {
    let set = template
        .parameter_set(parameter_set)
        .ok_or_else(|| CsvExportError::UnknownParameterSet {
            template: template.name.clone(),
            set: parameter_set.to_string(),
        })?;

    let csv_error = |e: csv::Error| CsvExportError::Csv {
        path: path.to_string(),
        source: e,
    };

    let mut wtr = csv::Writer::from_writer(writer);
    for (index, atom) in template.atoms().iter().enumerate() {
        wtr.serialize(AtomRow {
            index,
            path: &atom.name,
            element: &atom.element,
            pdb_name: template.pdb_name_of(index),
            charge: set.charge(index),
            atom_type: set.atom_type(index),
        })
        .map_err(csv_error)?;
    }
    wtr.flush().map_err(|e| csv_error(e.into()))?;
    Ok(())
}
