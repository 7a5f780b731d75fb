//! PlantUML diagram output
//!
//! [`DiagramDatabase`] collects classified modules; [`PlantUmlRenderer`]
//! turns them into `@startuml` ... `@enduml` text.

mod database;
mod renderer;

pub use database::{DiagramDatabase, ModulePackage};
pub use renderer::PlantUmlRenderer;
