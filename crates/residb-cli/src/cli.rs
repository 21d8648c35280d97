use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ResiDB CLI - Inspect, validate and assemble residue templates (atoms, bonds, AMBER charges, force-field types and PDB names) for proteins and nucleic acids.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Where residue definitions are loaded from.
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Directory of additional `*.toml` definitions. Definitions here replace
    /// built-in definitions of the same name.
    #[arg(long = "db", global = true, value_name = "DIR")]
    pub db_dir: Option<PathBuf>,

    /// Do not load the built-in definitions.
    #[arg(long, global = true)]
    pub no_builtin: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the residue templates (or all definitions) of the database.
    List(ListArgs),
    /// Show the atoms, bonds, charges and PDB names of one template.
    Show(ShowArgs),
    /// Check every definition of the database for consistency.
    Validate(ValidateArgs),
    /// Assemble a linear chain from a residue sequence.
    Build(BuildArgs),
    /// Split an assembled chain at a bond, angle or dihedral.
    Split(SplitArgs),
}

/// Arguments for the `list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include reusable fragments, not only complete residues.
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the `show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Template name or PDB residue code (e.g., 'alanine' or 'ALA').
    #[arg(required = true, value_name = "NAME")]
    pub name: String,

    /// Parameter set used for the charge and atom type columns.
    #[arg(short, long, value_name = "NAME")]
    pub parameter_set: Option<String>,

    /// Also write the atom table to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Residue sequence, e.g. 'NALA-GLY-CALA' or 'DA5 DA DA3'.
    #[arg(short, long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// Path to a build configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the parameter set used for charges and atom types.
    #[arg(short, long, value_name = "NAME")]
    pub parameter_set: Option<String>,

    /// Fail if any atom lacks a charge or atom type.
    #[arg(long)]
    pub require_parameters: bool,

    /// Override the name given to the assembled chain.
    #[arg(long, value_name = "NAME")]
    pub chain_name: Option<String>,

    /// Write the assembled topology to a TOML file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S parameter-set=amber
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `split` subcommand.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Residue sequence of the chain to analyse.
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Two to four consecutive bonded atoms as RESIDUE:ATOM, where RESIDUE is the
    /// 1-based position in the sequence and ATOM a PDB name or attribute path
    /// (e.g., '1:C 2:N').
    #[arg(required = true, num_args(2..=4), value_name = "ATOM")]
    pub atoms: Vec<String>,

    /// Parameter set used for the assembled chain.
    #[arg(short, long, value_name = "NAME")]
    pub parameter_set: Option<String>,
}
