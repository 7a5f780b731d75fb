//! py2puml - Python source structure to PlantUML class diagrams
//!
//! Extracts classes, methods, attributes, properties and inheritance from
//! Python sources and renders them as PlantUML class-diagram text, or as a
//! structured per-file report (text, JSON or YAML).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use py2puml::generate;
//!
//! let outcome = generate("src").unwrap();
//! println!("{}", outcome.diagram);
//! for message in outcome.errors.messages() {
//!     eprintln!("{}", message);
//! }
//! ```
//!
//! # Advanced Usage
//!
//! The pipeline stages can be driven individually:
//!
//! ```rust
//! use py2puml::prelude::*;
//!
//! let source = "class Dog(Animal):\n    def speak(self) -> str:\n        return 'woof'\n";
//! let module = PythonExtractor::new().extract(source).unwrap();
//!
//! let config = Py2PumlConfig::default();
//! let dog = classify_class(&module.classes[0], &config);
//! assert_eq!(dog.methods[0].full_signature(), "speak() -> str");
//! ```

pub mod classify;
pub mod core;
pub mod diagnostics;
pub mod extract;
pub mod orchestrator;
pub mod plantuml;
pub mod report;
pub mod scan;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{
        classify_class, classify_member, classify_module, PropertyResolver, StyleClassifier,
    };
    pub use crate::core::{
        AccessMode, ClassifiedClass, ClassifiedMember, Database, ExtractedModule, Extractor,
        Modifier, Py2PumlConfig, Py2PumlError, RawClass, RawMember, Renderer, Stereotype,
        Visibility,
    };
    pub use crate::diagnostics::{annotate, ErrorKind, ErrorLog, ErrorRecord};
    pub use crate::extract::PythonExtractor;
    pub use crate::orchestrator::{DescribeOutcome, GenerateOutcome, Orchestrator};
    pub use crate::plantuml::{DiagramDatabase, ModulePackage, PlantUmlRenderer};
    pub use crate::report::{FileDescription, ReportFormat, ReportFormatter};
    pub use crate::scan::SourceScanner;
}

/// Generate a PlantUML diagram for every Python file below `root` with the
/// default configuration
///
/// Per-file failures are returned in the outcome's error log; only an
/// unreadable root is an error.
pub fn generate(root: impl AsRef<std::path::Path>) -> anyhow::Result<orchestrator::GenerateOutcome> {
    orchestrator::Orchestrator::default().generate(root)
}

/// Describe one Python file with the default configuration
///
/// # Example
/// ```rust,no_run
/// use py2puml::{describe, report::ReportFormat};
///
/// let outcome = describe("models.py", ReportFormat::Json).unwrap();
/// println!("{}", outcome.report);
/// ```
pub fn describe(
    path: impl AsRef<std::path::Path>,
    format: report::ReportFormat,
) -> anyhow::Result<orchestrator::DescribeOutcome> {
    orchestrator::Orchestrator::default().describe(path, true, format)
}
