//! # Core Module
//!
//! Stateless foundation of the library: the residue data model, the definition database
//! and the helpers shared by both.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Atoms, bonds, resolved residue templates and chain types
//! - **Definition Database** ([`database`]) - TOML schema, built-in data, composition,
//!   validation and the template library
//! - **Export** ([`io`]) - CSV tables of template atoms and parameters
//! - **Utilities** ([`utils`]) - Attribute paths and PDB naming helpers

pub mod database;
pub mod io;
pub mod models;
pub mod utils;
