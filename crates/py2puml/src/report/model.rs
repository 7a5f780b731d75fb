//! Serializable file description

use std::path::Path;

use serde::Serialize;

use crate::core::{
    AccessMode, ClassifiedClass, ClassifiedMember, ClassifiedModule, Modifier, PropertyDescriptor,
    RawVariable, Stereotype, Visibility,
};
use crate::diagnostics::ErrorRecord;

/// Structured description of one source file
///
/// Field order is the key order of the JSON and YAML output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDescription {
    pub file: String,
    pub summary: Summary,
    pub classes: Vec<ClassReport>,
    pub functions: Vec<FunctionReport>,
    pub variables: Vec<VariableReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub lines: usize,
    pub classes: usize,
    pub functions: usize,
    pub variables: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub name: String,
    pub stereotype: Stereotype,
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    pub documentation: Option<String>,
    pub fields: Vec<FieldReport>,
    pub properties: Vec<PropertyReport>,
    pub methods: Vec<FunctionReport>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyReport {
    pub name: String,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub access: AccessMode,
    pub documentation: Option<String>,
}

/// A method or a top-level function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub visibility: Visibility,
    pub signature: String,
    pub return_type: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub is_async: bool,
    pub documentation: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReport {
    pub name: String,
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub line: usize,
}

impl FileDescription {
    /// Describe a classified module.
    ///
    /// With `include_docs` false every documentation value is `None`.
    pub fn build(
        path: &Path,
        source: &str,
        module: &ClassifiedModule,
        include_docs: bool,
        errors: Option<&ErrorRecord>,
    ) -> Self {
        let docs = |doc: &Option<String>| if include_docs { doc.clone() } else { None };

        let classes: Vec<ClassReport> = module
            .classes
            .iter()
            .map(|cls| ClassReport::build(cls, &docs))
            .collect();
        let functions: Vec<FunctionReport> = module
            .functions
            .iter()
            .map(|f| FunctionReport::build(f, &docs))
            .collect();
        let variables: Vec<VariableReport> =
            module.variables.iter().map(VariableReport::from).collect();

        Self {
            file: path.display().to_string(),
            summary: Summary {
                lines: source.lines().count(),
                classes: classes.len(),
                functions: functions.len(),
                variables: variables.len(),
            },
            classes,
            functions,
            variables,
            errors: errors.map(|record| record.messages().to_vec()),
        }
    }
}

impl ClassReport {
    fn build(cls: &ClassifiedClass, docs: &dyn Fn(&Option<String>) -> Option<String>) -> Self {
        Self {
            name: cls.name.clone(),
            stereotype: cls.stereotype(),
            bases: cls.bases.clone(),
            decorators: cls.decorators.clone(),
            documentation: docs(&cls.documentation),
            fields: cls.fields.iter().map(FieldReport::from).collect(),
            properties: cls
                .properties
                .iter()
                .map(|p| PropertyReport::build(p, docs))
                .collect(),
            methods: cls
                .methods
                .iter()
                .map(|m| FunctionReport::build(m, docs))
                .collect(),
            line: cls.source_line,
        }
    }
}

impl From<&ClassifiedMember> for FieldReport {
    fn from(field: &ClassifiedMember) -> Self {
        Self {
            name: field.name().to_string(),
            visibility: field.visibility,
            type_name: field.member.annotation.clone(),
        }
    }
}

impl PropertyReport {
    fn build(
        property: &PropertyDescriptor,
        docs: &dyn Fn(&Option<String>) -> Option<String>,
    ) -> Self {
        Self {
            name: property.name.clone(),
            visibility: property.visibility,
            type_name: property.annotation.clone(),
            access: property.access,
            documentation: docs(&property.documentation),
        }
    }
}

impl FunctionReport {
    fn build(member: &ClassifiedMember, docs: &dyn Fn(&Option<String>) -> Option<String>) -> Self {
        Self {
            name: member.name().to_string(),
            visibility: member.visibility,
            signature: member.full_signature(),
            return_type: member.member.return_annotation.clone(),
            modifiers: member.modifiers.iter().copied().collect(),
            is_async: member.member.is_async,
            documentation: docs(&member.member.documentation),
            line: member.member.source_line,
        }
    }
}

impl From<&RawVariable> for VariableReport {
    fn from(var: &RawVariable) -> Self {
        Self {
            name: var.name.clone(),
            visibility: var.visibility(),
            type_name: var.annotation.clone(),
            line: var.source_line,
        }
    }
}
