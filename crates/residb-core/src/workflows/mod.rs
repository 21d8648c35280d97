//! # Workflows Module
//!
//! High-level entry points that tie the database and the engine together. Front ends
//! such as the command line tool call these instead of composing the lower layers.
//!
//! - **Validation Workflow** ([`validate`]) - Checks every definition of a database and
//!   reports progress per definition
//! - **Build Workflow** ([`build`]) - Builds the template library and assembles a chain
//!   from a configured sequence

pub mod build;
pub mod validate;
