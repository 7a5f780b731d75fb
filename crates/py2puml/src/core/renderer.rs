//! Core renderer trait for diagram output

use anyhow::Result;

use super::Database;

/// Core trait for diagram renderers
///
/// Converts the contents of a [`Database`] into output text.
///
/// # Example
/// ```
/// use py2puml::core::Renderer;
/// use py2puml::plantuml::{DiagramDatabase, PlantUmlRenderer};
///
/// let db = DiagramDatabase::new("src");
/// let renderer = PlantUmlRenderer::default();
/// let output = renderer.render(&db).unwrap();
/// assert!(output.starts_with("@startuml"));
/// ```
pub trait Renderer<D: Database>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram database into the output format
    fn render(&self, database: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
