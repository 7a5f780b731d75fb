//! Source extractors

mod python;

pub use python::PythonExtractor;
