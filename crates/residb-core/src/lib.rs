//! # ResiDB Core Library
//!
//! A declarative database of molecular residue definitions (amino acid and nucleotide
//! fragments) with AMBER charges, force-field atom types and PDB naming, and the machinery
//! to compose, check and assemble them into bonded polymer chains.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ResidueTemplate`), the TOML
//!   definition format, the built-in database, group composition and validation.
//!
//! - **[`engine`]: The Logic Core.** Builds `MolecularTopology` graphs from templates
//!   (`ChainAssembler`) and analyses them (`fragments`).
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as validating a database
//!   or building a chain from a sequence, with logging and progress reporting.
//!
//! ## Example
//!
//! ```no_run
//! use residb::core::database::registry::ResidueDatabase;
//! use residb::engine::config::AssemblyConfigBuilder;
//! use residb::engine::progress::ProgressReporter;
//! use residb::workflows;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = ResidueDatabase::builtin()?;
//! let config = AssemblyConfigBuilder::new()
//!     .sequence(["NALA", "GLY", "CALA"])
//!     .build()?;
//! let result = workflows::build::run(&db, &config, &ProgressReporter::new())?;
//! println!("{} atoms, net charge {:.3}", result.topology.atom_count(), result.net_charge);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
