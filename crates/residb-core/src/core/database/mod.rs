//! # Residue Database Module
//!
//! Loading, composition and integrity checking of residue definitions.
//!
//! ## Overview
//!
//! Definitions are stored one per TOML file ([`schema`]). A [`registry::ResidueDatabase`]
//! holds them unresolved, either from the definitions compiled into the library
//! ([`builtin`]) or from a directory on disk. [`resolve`] flattens a definition and all
//! the groups it instantiates into a [`crate::core::models::residue::ResidueTemplate`].
//! [`validate`] runs every cross-reference check over a whole database, and [`library`]
//! indexes the resolved residues by name and PDB residue name.

pub mod builtin;
pub mod library;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod validate;
