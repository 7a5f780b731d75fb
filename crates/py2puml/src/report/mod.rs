//! File description reports

mod formatter;
mod model;

pub use formatter::{ReportFormat, ReportFormatter};
pub use model::*;
