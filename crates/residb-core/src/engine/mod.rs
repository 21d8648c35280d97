//! # Engine Module
//!
//! Stateful operations built on the core data model: turning residue templates into a
//! bonded molecular graph and analysing that graph.
//!
//! ## Architecture
//!
//! - **Topology** ([`topology`]) - Slot-map backed store of assembled atoms, residues and bonds
//! - **Chain Assembly** ([`assembly`]) - Instantiates templates in sequence order and links them
//! - **Fragment Analysis** ([`fragments`]) - Splits a topology at a bond, angle or dihedral
//! - **Configuration** ([`config`]) - Assembly settings and their builder
//! - **Progress Monitoring** ([`progress`]) - Callback based progress reporting for front ends
//! - **Error Handling** ([`error`]) - Aggregate error type of engine and workflow operations

pub mod assembly;
pub mod config;
pub mod error;
pub mod fragments;
pub mod progress;
pub mod topology;
