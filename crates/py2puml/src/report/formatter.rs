//! Report formatting: text, JSON and YAML

use std::fmt::{self, Write};
use std::str::FromStr;

use tracing::debug;

use super::model::{ClassReport, FileDescription, FunctionReport};
use crate::core::{Modifier, Py2PumlError};

/// Output format of a file description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = Py2PumlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" => Ok(ReportFormat::Yaml),
            _ => Err(Py2PumlError::unsupported_format(s)),
        }
    }
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["text", "json", "yaml"]
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a [`FileDescription`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(
        &self,
        description: &FileDescription,
        kind: ReportFormat,
    ) -> Result<String, Py2PumlError> {
        debug!(file = %description.file, format = %kind, "Formatting report");
        match kind {
            ReportFormat::Text => self
                .format_text(description)
                .map_err(|e| Py2PumlError::serialization_error(e.to_string())),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(description)?),
            ReportFormat::Yaml => Ok(serde_yaml::to_string(description)?),
        }
    }

    fn format_text(&self, d: &FileDescription) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "File: {}", d.file)?;
        writeln!(
            out,
            "Summary: {} lines, {} classes, {} functions, {} variables",
            d.summary.lines, d.summary.classes, d.summary.functions, d.summary.variables
        )?;
        writeln!(out)?;

        if !d.classes.is_empty() {
            writeln!(out, "Classes:")?;
            for class in &d.classes {
                write_class(&mut out, class)?;
                writeln!(out)?;
            }
        }

        if !d.functions.is_empty() {
            writeln!(out, "Functions:")?;
            for function in &d.functions {
                write_function(&mut out, function, "  ")?;
            }
            writeln!(out)?;
        }

        if !d.variables.is_empty() {
            writeln!(out, "Variables:")?;
            for var in &d.variables {
                writeln!(out, "  {} {}", var.visibility, var.name)?;
                if let Some(type_name) = &var.type_name {
                    writeln!(out, "    Type: {}", type_name)?;
                }
            }
            writeln!(out)?;
        }

        if let Some(errors) = &d.errors {
            writeln!(out, "Errors:")?;
            for message in errors {
                writeln!(out, "  - {}", message)?;
            }
            writeln!(out)?;
        }

        Ok(out)
    }
}

fn write_class(out: &mut String, class: &ClassReport) -> fmt::Result {
    writeln!(out, "  {} ({})", class.name, class.stereotype)?;
    if !class.bases.is_empty() {
        writeln!(out, "    Bases: {}", class.bases.join(", "))?;
    }
    if let Some(doc) = &class.documentation {
        writeln!(out, "    Documentation: {}", doc)?;
    }

    if !class.fields.is_empty() {
        writeln!(out, "    Fields:")?;
        for field in &class.fields {
            writeln!(out, "      {} {}", field.visibility, field.name)?;
            if let Some(type_name) = &field.type_name {
                writeln!(out, "        Type: {}", type_name)?;
            }
        }
    }

    if !class.properties.is_empty() {
        writeln!(out, "    Properties:")?;
        for property in &class.properties {
            writeln!(
                out,
                "      {} {} {{{}}}",
                property.visibility, property.name, property.access
            )?;
            if let Some(type_name) = &property.type_name {
                writeln!(out, "        Type: {}", type_name)?;
            }
            if let Some(doc) = &property.documentation {
                writeln!(out, "        Documentation: {}", doc)?;
            }
        }
    }

    if !class.methods.is_empty() {
        writeln!(out, "    Methods:")?;
        for method in &class.methods {
            write_function(out, method, "      ")?;
        }
    }
    Ok(())
}

fn write_function(out: &mut String, function: &FunctionReport, indent: &str) -> fmt::Result {
    let mut tags = String::new();
    if function.modifiers.contains(&Modifier::Abstract) {
        tags.push_str("{abstract} ");
    } else if !function.modifiers.is_empty() {
        tags.push_str("{static} ");
    }
    if function.is_async {
        tags.push_str("async ");
    }
    writeln!(
        out,
        "{}{} {}{}",
        indent, function.visibility, tags, function.signature
    )?;
    if let Some(doc) = &function.documentation {
        writeln!(out, "{}  Documentation: {}", indent, doc)?;
    }
    Ok(())
}
