use super::assembly::AssemblyError;
use super::config::ConfigError;
use super::fragments::FragmentError;
use crate::core::database::resolve::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to resolve residue definitions: {source}")]
    Resolve {
        #[from]
        source: ResolveError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Chain assembly failed: {source}")]
    Assembly {
        #[from]
        source: AssemblyError,
    },

    #[error("Fragment analysis failed: {source}")]
    Fragment {
        #[from]
        source: FragmentError,
    },
}
