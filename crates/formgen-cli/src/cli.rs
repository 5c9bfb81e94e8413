//! CLI argument definitions for the form generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use formgen_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "formgen",
    version,
    about = "Block form generator - Lay out form fields and write screen descriptors",
    long_about = "Resolve the layout of form fields from JSON descriptions.\n\n\
                  Writes the block form XML, its properties file and, when a\n\
                  function name is configured, the screen XML."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the descriptors of one form.
    Generate(GenerateArgs),

    /// List the built-in static panels.
    Panels,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Folder containing the JSON input documents.
    ///
    /// May be omitted when the configuration file sets `input_dir`.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output root; files go to <DIR>/<FORM_ID>/ (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Form to generate (overrides FORM_ID and the detected form).
    #[arg(long = "form-id", value_name = "ID")]
    pub form_id: Option<String>,

    /// Function name; enables the screen XML.
    #[arg(long = "function-name", value_name = "NAME")]
    pub function_name: Option<String>,

    /// Parent form of the generated block form.
    #[arg(long = "father-id", value_name = "ID")]
    pub father_id: Option<String>,

    /// Resolve and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            form_id: self.form_id.clone(),
            function_name: self.function_name.clone(),
            father_id: self.father_id.clone(),
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
