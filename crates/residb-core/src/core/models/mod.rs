//! # Core Models Module
//!
//! Plain data structures describing residue templates and the pieces they are made of.
//!
//! ## Overview
//!
//! A residue definition is a small, static table: atoms with element tags, bonds between
//! them, per-force-field charges and atom types, PDB naming, and the atoms used to link
//! the residue into a polymer chain. The types in this module hold the *resolved* form of
//! such a definition, after all reusable groups have been flattened into a single atom
//! list addressed by dotted attribute paths.
//!
//! ## Key Components
//!
//! - [`atom`] - Template atoms (`AtomDef`) with qualified names and element tags
//! - [`topology`] - Unordered covalent bonds
//! - [`residue`] - Resolved templates, PDB entries, parameter sets and chain links
//! - [`chain`] - Polymer classification of assembled chains
//! - [`ids`] - Slot-map keys for atoms of assembled topologies
//!
//! ## Usage
//!
//! ```ignore
//! use residb::core::database::registry::ResidueDatabase;
//! use residb::core::database::resolve::resolve;
//!
//! let db = ResidueDatabase::builtin()?;
//! let alanine = resolve(&db, "alanine")?;
//! let c_beta = alanine.atom_index("sidechain.C_beta").unwrap();
//! assert!(alanine.has_bond("peptide.C_alpha", "sidechain.C_beta"));
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod topology;
