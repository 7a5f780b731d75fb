//! Core abstractions shared by every stage of the pipeline
//!
//! The structural model, configuration, error type and the traits at the
//! seams between extraction, storage and rendering.

mod config;
mod database;
mod error;
mod extractor;
pub mod logging;
mod model;
mod renderer;
mod text;
mod types;

pub use config::*;
pub use database::*;
pub use error::*;
pub use extractor::*;
pub use logging::*;
pub use model::*;
pub use renderer::*;
pub use text::*;
pub use types::*;
