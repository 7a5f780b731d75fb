//! Run orchestration
//!
//! Drives one generate or describe invocation:
//! Scanner → read → decode → Extractor → classify → Database → Renderer
//!
//! Failures of a single file are recorded in the run's [`ErrorLog`] and the
//! run moves on to the next file. Only an unreadable root is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{debug, info, span, trace, warn, Level};

use crate::classify::{classify_module, package_name};
use crate::core::{
    Database, ExtractedModule, Extractor, Py2PumlConfig, Py2PumlError, Renderer,
};
use crate::diagnostics::{annotate, ErrorKind, ErrorLog, ErrorRecord};
use crate::extract::PythonExtractor;
use crate::plantuml::{DiagramDatabase, ModulePackage, PlantUmlRenderer};
use crate::report::{FileDescription, ReportFormat, ReportFormatter};
use crate::scan::SourceScanner;

/// Result of a generate run
#[derive(Debug)]
pub struct GenerateOutcome {
    /// PlantUML document text
    pub diagram: String,
    pub errors: ErrorLog,
    pub files_processed: usize,
}

/// Result of a describe run
#[derive(Debug)]
pub struct DescribeOutcome {
    /// Formatted report text
    pub report: String,
    pub description: FileDescription,
    pub errors: ErrorLog,
}

/// What came out of reading and extracting one file
struct LoadedFile {
    source: Option<String>,
    module: Option<ExtractedModule>,
    error: Option<Py2PumlError>,
}

/// Coordinates scanning, extraction, classification and output
pub struct Orchestrator {
    config: Py2PumlConfig,
    extractor: Box<dyn Extractor>,
}

impl Orchestrator {
    /// Create an orchestrator using the tree-sitter Python extractor
    pub fn new(config: Py2PumlConfig) -> Self {
        Self {
            config,
            extractor: Box::new(PythonExtractor::new()),
        }
    }

    /// Replace the extractor
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &Py2PumlConfig {
        &self.config
    }

    /// Generate a PlantUML class diagram for every Python file below `root`
    pub fn generate(&self, root: impl AsRef<Path>) -> Result<GenerateOutcome> {
        let root = root.as_ref();
        let generate_span = span!(Level::INFO, "generate", root = %root.display());
        let _enter = generate_span.enter();

        info!(extractor = self.extractor.name(), "Starting diagram generation");

        let files = SourceScanner::new(self.config.scan.clone()).collect(root)?;
        debug!(file_count = files.len(), "Scan completed");

        let mut errors = ErrorLog::new();
        let mut database = DiagramDatabase::new(root);

        for path in &files {
            let file_span = span!(Level::DEBUG, "file", path = %path.display());
            let _file_enter = file_span.enter();

            let loaded = self.load(path);
            let package = package_name(root, path);
            let module = classify_module(
                &loaded.module.unwrap_or_default(),
                path,
                &package,
                &self.config,
            );
            trace!(
                package = %package,
                classes = module.classes.len(),
                functions = module.functions.len(),
                "Classified module"
            );

            let mut node = ModulePackage::new(module);
            if let Some(error) = loaded.error {
                let record = annotate(path, &error);
                warn!(kind = %record.kind(), "{}", record.messages().join("; "));
                errors.record(record.clone());
                node = node.with_errors(record);
            }
            if let Err(err) = database.add_package(node) {
                let record = ErrorRecord::new(
                    path,
                    ErrorKind::Other,
                    format!("Unexpected error reading {}: {}", path.display(), err),
                );
                warn!(kind = %record.kind(), "{}", record.messages().join("; "));
                errors.record(record);
            }
        }

        let renderer = PlantUmlRenderer::new(self.config.render.clone());
        let diagram = renderer.render(&database)?;

        info!(
            files = files.len(),
            packages = database.node_count(),
            edges = database.edge_count(),
            errors = errors.len(),
            "Diagram generation completed"
        );

        Ok(GenerateOutcome {
            diagram,
            errors,
            files_processed: files.len(),
        })
    }

    /// Describe a single file in the requested format
    pub fn describe(
        &self,
        path: impl AsRef<Path>,
        include_docs: bool,
        format: ReportFormat,
    ) -> Result<DescribeOutcome> {
        let path = path.as_ref();
        let describe_span = span!(Level::INFO, "describe", path = %path.display(), %format);
        let _enter = describe_span.enter();

        if !path.exists() {
            bail!("File not found: {}", path.display());
        }

        let loaded = self.load(path);
        let package = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let module = classify_module(
            &loaded.module.unwrap_or_default(),
            path,
            &package,
            &self.config,
        );

        let mut errors = ErrorLog::new();
        if let Some(error) = loaded.error {
            let record = annotate(path, &error);
            warn!(kind = %record.kind(), "{}", record.messages().join("; "));
            errors.record(record);
        }

        let description = FileDescription::build(
            path,
            loaded.source.as_deref().unwrap_or(""),
            &module,
            include_docs,
            errors.get(path),
        );
        let report = ReportFormatter::new().format(&description, format)?;
        info!(bytes = report.len(), "Description completed");

        Ok(DescribeOutcome {
            report,
            description,
            errors,
        })
    }

    /// Read, decode and extract one file, keeping whatever survived a failure
    fn load(&self, path: &Path) -> LoadedFile {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                return LoadedFile {
                    source: None,
                    module: None,
                    error: Some(err.into()),
                }
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(err) => {
                return LoadedFile {
                    source: None,
                    module: None,
                    error: Some(err.into()),
                }
            }
        };
        trace!(bytes = source.len(), "Read source");

        match self.extractor.extract(&source) {
            Ok(module) => LoadedFile {
                source: Some(source),
                module: Some(module),
                error: None,
            },
            Err(failure) => LoadedFile {
                source: Some(source),
                module: failure.partial,
                error: Some(failure.error),
            },
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(Py2PumlConfig::default())
    }
}

/// Files that would be processed for `root` under `config`
pub fn list_sources(root: impl AsRef<Path>, config: &Py2PumlConfig) -> Result<Vec<PathBuf>> {
    Ok(SourceScanner::new(config.scan.clone()).collect(root)?)
}
