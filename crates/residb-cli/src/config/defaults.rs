use residb::engine::config::{DEFAULT_CHAIN_NAME, DEFAULT_PARAMETER_SET};

pub struct DefaultsConfig {
    pub parameter_set: String,
    pub require_parameters: bool,
    pub chain_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            parameter_set: DEFAULT_PARAMETER_SET.to_string(),
            require_parameters: false,
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
        }
    }
}
