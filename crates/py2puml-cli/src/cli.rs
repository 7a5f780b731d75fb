//! Command-line interface for the py2puml utility
//!
//! Provides `generate` (directory to PlantUML) and `describe` (one file to a
//! text/JSON/YAML report).

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use py2puml::core::logging::init_logging;
use py2puml::diagnostics::ErrorLog;
use py2puml::orchestrator::Orchestrator;
use py2puml::report::ReportFormat;
use py2puml::Py2PumlConfig;

/// py2puml - Generate PlantUML class diagrams from Python sources
#[derive(Parser)]
#[command(name = "py2puml")]
#[command(about = "Generate PlantUML class diagrams and structure reports from Python code")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a PlantUML class diagram for a directory of Python files
    Generate {
        /// Directory containing Python sources
        directory: PathBuf,

        /// Output file for the PlantUML text (use - for stdout)
        output: PathBuf,

        /// Do not skip files matched by .gitignore
        #[arg(long)]
        no_gitignore: bool,

        /// Diagram title
        #[arg(long)]
        title: Option<String>,

        /// Configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Describe the structure of a single Python file
    Describe {
        /// Python file to describe
        file: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Text)]
        format: FormatChoice,

        /// Leave documentation out of the report
        #[arg(long)]
        no_docs: bool,

        /// Output file for the report (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Report formats accepted by `describe`
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Text,
    Json,
    Yaml,
}

impl From<FormatChoice> for ReportFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Text => ReportFormat::Text,
            FormatChoice::Json => ReportFormat::Json,
            FormatChoice::Yaml => ReportFormat::Yaml,
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct Py2PumlApp;

impl Py2PumlApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // flags win over PY2PUML_LOG_LEVEL / RUST_LOG; --verbose implies info
        let level = cli
            .log_level
            .map(|l| l.as_str())
            .or(if cli.verbose { Some("info") } else { None });
        if let Err(e) = init_logging(level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("py2puml v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                directory,
                output,
                no_gitignore,
                title,
                config,
            } => self.generate_command(
                &directory,
                &output,
                no_gitignore,
                title,
                config.as_deref(),
                cli.verbose,
            ),
            Commands::Describe {
                file,
                format,
                no_docs,
                output,
                config,
            } => self.describe_command(
                &file,
                format,
                !no_docs,
                output,
                config.as_deref(),
                cli.verbose,
            ),
        }
    }

    /// Load the configuration file if one was given
    pub fn load_config(&self, path: Option<&Path>) -> Result<Py2PumlConfig> {
        match path {
            Some(path) => Py2PumlConfig::load(path)
                .map_err(|e| anyhow!("Failed to load config '{}': {}", path.display(), e)),
            None => Ok(Py2PumlConfig::default()),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        directory: &Path,
        output: &Path,
        no_gitignore: bool,
        title: Option<String>,
        config: Option<&Path>,
        verbose: bool,
    ) -> Result<()> {
        if !directory.exists() {
            bail!("Directory not found: {}", directory.display());
        }
        if !directory.is_dir() {
            bail!("Path is not a directory: {}", directory.display());
        }

        let mut config = self.load_config(config)?;
        if no_gitignore {
            config.scan.use_gitignore = false;
        }
        if title.is_some() {
            config.render.title = title;
        }

        info!(directory = %directory.display(), "Generating diagram");
        let outcome = Orchestrator::new(config).generate(directory)?;
        if verbose {
            eprintln!("Processed {} Python files", outcome.files_processed);
        }

        self.write_output(Some(output), &outcome.diagram)?;
        if !is_stdout(output) {
            println!("PlantUML code has been saved to {}", output.display());
        }
        print_warnings(&outcome.errors);
        Ok(())
    }

    /// Handle the describe command
    fn describe_command(
        &self,
        file: &Path,
        format: FormatChoice,
        include_docs: bool,
        output: Option<PathBuf>,
        config: Option<&Path>,
        verbose: bool,
    ) -> Result<()> {
        if file.exists() && !file.is_file() {
            bail!("Path is not a file: {}", file.display());
        }
        let config = self.load_config(config)?;

        info!(file = %file.display(), format = ?format, "Describing file");
        let outcome = Orchestrator::new(config).describe(file, include_docs, format.into())?;
        if verbose {
            eprintln!(
                "Described {} classes, {} functions",
                outcome.description.summary.classes, outcome.description.summary.functions
            );
        }

        self.write_output(output.as_deref(), &outcome.report)?;
        print_warnings(&outcome.errors);
        Ok(())
    }

    /// Write output to file or stdout
    ///
    /// Missing parent directories of an output file are created.
    pub fn write_output(&self, output: Option<&Path>, content: &str) -> Result<()> {
        match output {
            Some(path) if !is_stdout(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        anyhow!("Cannot create output directory {}: {}", parent.display(), e)
                    })?;
                }
                fs::write(path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                debug!(path = %path.display(), bytes = content.len(), "Wrote output");
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    writeln!(stdout)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Warning block printed to stderr after a run with recorded failures
pub fn format_warnings(errors: &ErrorLog) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let mut text = format!(
        "Warning: {} errors occurred during processing:\n",
        errors.len()
    );
    for message in errors.messages() {
        text.push_str("  - ");
        text.push_str(message);
        text.push('\n');
    }
    Some(text)
}

fn print_warnings(errors: &ErrorLog) {
    if let Some(text) = format_warnings(errors) {
        eprint!("\n{}", text);
    }
}
