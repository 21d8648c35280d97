use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSequence};
use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use residb::engine::config::{AssemblyConfig, AssemblyConfigBuilder, parse_sequence};
use tracing::debug;

pub fn build_config(args: &BuildArgs) -> Result<AssemblyConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;
    debug!("Build configuration after file and --set values: {:?}", file_config);

    let sequence = match &args.sequence {
        Some(text) => Some(parse_sequence(text)),
        None => file_config.sequence.map(FileSequence::into_residues),
    };
    let parameter_set = args
        .parameter_set
        .clone()
        .or(file_config.parameter_set)
        .unwrap_or(defaults.parameter_set);
    let require_parameters = args.require_parameters
        || file_config
            .require_parameters
            .unwrap_or(defaults.require_parameters);
    let chain_name = args
        .chain_name
        .clone()
        .or(file_config.chain_name)
        .unwrap_or(defaults.chain_name);

    let mut builder = AssemblyConfigBuilder::new()
        .parameter_set(parameter_set)
        .require_parameters(require_parameters)
        .chain_name(chain_name);
    if let Some(sequence) = sequence {
        builder = builder.sequence(sequence);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "sequence" => config.sequence = Some(FileSequence::Text(value.to_string())),
            "parameter-set" => config.parameter_set = Some(value.to_string()),
            "chain-name" => config.chain_name = Some(value.to_string()),
            "require-parameters" => {
                config.require_parameters = Some(
                    parser::parse_bool(key, value).map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("build.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["residb", "build"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Build(args) => args,
            _ => panic!("Expected 'build' subcommand"),
        }
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn defaults_apply_when_only_a_sequence_is_given() {
        let config = build_config(&build_args(&["-s", "NALA-GLY-CALA"])).unwrap();
        assert_eq!(config.sequence, vec!["NALA", "GLY", "CALA"]);
        assert_eq!(config.parameter_set, "amber");
        assert_eq!(config.chain_name, "A");
        assert!(!config.require_parameters);
    }

    #[test]
    fn file_values_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            sequence = ["DA5", "DA", "DA3"]
            chain-name = "D"
            require-parameters = true
            "#,
        );
        let config = build_config(&build_args(&["-c", path_arg(&path)])).unwrap();
        assert_eq!(config.sequence, vec!["DA5", "DA", "DA3"]);
        assert_eq!(config.chain_name, "D");
        assert!(config.require_parameters);
    }

    #[test]
    fn set_values_override_the_file_and_flags_override_both() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            sequence = "NALA CALA"
            chain-name = "D"
            parameter-set = "amber"
            "#,
        );
        let config = build_config(&build_args(&[
            "-c",
            path_arg(&path),
            "-S",
            "chain-name=E",
            "-S",
            "sequence=NGLY-CGLY",
            "--chain-name",
            "F",
        ]))
        .unwrap();
        assert_eq!(config.sequence, vec!["NGLY", "CGLY"]);
        assert_eq!(config.chain_name, "F");

        let config = build_config(&build_args(&[
            "-c",
            path_arg(&path),
            "-s",
            "GLY",
            "-S",
            "chain-name=E",
        ]))
        .unwrap();
        assert_eq!(config.sequence, vec!["GLY"]);
        assert_eq!(config.chain_name, "E");
    }

    #[test]
    fn missing_sequence_is_a_configuration_error() {
        let result = build_config(&build_args(&[]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("sequence")));
    }

    #[test]
    fn unsupported_or_malformed_set_values_are_rejected() {
        let result = build_config(&build_args(&["-s", "GLY", "-S", "threads=4"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("threads")));

        let result = build_config(&build_args(&["-s", "GLY", "-S", "chain-name"]));
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = build_config(&build_args(&["-s", "GLY", "-S", "require-parameters=maybe"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
