//! Export of residue templates to tabular formats.

pub mod csv;
