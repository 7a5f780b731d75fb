//! Python structure extraction on top of tree-sitter
//!
//! Walks the concrete syntax tree of a module and collects top-level classes,
//! functions and variables. Nested classes and functions are not collected.

use tracing::{debug, span, trace, Level};
use tree_sitter::{Node, Parser};

use crate::core::{
    BodyShape, ExtractedModule, ExtractionFailure, Extractor, Parameter, Py2PumlError, RawClass,
    RawMember, RawVariable,
};

/// Extracts classes, functions and variables from Python source
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }

    fn parser(&self) -> Result<Parser, Py2PumlError> {
        let mut parser = Parser::new();
        parser
            .set_language(tree_sitter_python::language())
            .map_err(|e| Py2PumlError::extraction_error(e.to_string()))?;
        Ok(parser)
    }
}

impl Extractor for PythonExtractor {
    fn extract(&self, source: &str) -> Result<ExtractedModule, ExtractionFailure> {
        let extract_span = span!(Level::DEBUG, "extract_python", source_len = source.len());
        let _enter = extract_span.enter();

        let mut parser = self.parser().map_err(ExtractionFailure::new)?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            ExtractionFailure::new(Py2PumlError::extraction_error(
                "parser produced no syntax tree",
            ))
        })?;
        let root = tree.root_node();

        let walker = Walker { source };
        let module = walker.module(root);

        if root.has_error() {
            let (message, line, column) = first_error(root)
                .map(|node| {
                    let pos = node.start_position();
                    let message = if node.is_missing() {
                        format!("expected '{}'", node.kind())
                    } else {
                        "invalid syntax".to_string()
                    };
                    (message, pos.row + 1, pos.column + 1)
                })
                .unwrap_or_else(|| ("invalid syntax".to_string(), 1, 1));
            debug!(line, column, "Syntax error, keeping partial module");
            return Err(ExtractionFailure::with_partial(
                Py2PumlError::syntax_error(message, line, column),
                module,
            ));
        }

        trace!(
            classes = module.classes.len(),
            functions = module.functions.len(),
            variables = module.variables.len(),
            "Extracted module"
        );
        Ok(module)
    }

    fn name(&self) -> &'static str {
        "tree-sitter-python"
    }
}

/// First error or missing node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    (0..node.child_count()).filter_map(|i| node.child(i)).collect()
}

/// Named children without comments
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

struct Walker<'s> {
    source: &'s str,
}

impl<'s> Walker<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Node text with whitespace runs collapsed
    fn flat_text(&self, node: Node<'_>) -> String {
        self.text(node).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn module(&self, root: Node<'_>) -> ExtractedModule {
        let mut module = ExtractedModule::new();

        for statement in named_children(root) {
            // statements damaged by a syntax error are dropped
            if statement.is_error() || statement.has_error() {
                continue;
            }
            match statement.kind() {
                "class_definition" => module.classes.push(self.class(statement, Vec::new())),
                "function_definition" => module.functions.push(self.function(statement, Vec::new())),
                "decorated_definition" => {
                    let decorators = self.decorators(statement);
                    match statement.child_by_field_name("definition") {
                        Some(def) if def.kind() == "class_definition" => {
                            module.classes.push(self.class(def, decorators))
                        }
                        Some(def) if def.kind() == "function_definition" => {
                            module.functions.push(self.function(def, decorators))
                        }
                        _ => {}
                    }
                }
                "expression_statement" => {
                    for (name, annotation, line) in self.assigned_names(statement) {
                        let mut var = RawVariable::new(name);
                        var.annotation = annotation;
                        var.source_line = line;
                        module.variables.push(var);
                    }
                }
                _ => {}
            }
        }
        module
    }

    fn class(&self, node: Node<'_>, decorators: Vec<String>) -> RawClass {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let mut class = RawClass::new(name);
        class.decorators = decorators;
        class.source_line = line_of(node);

        if let Some(arguments) = node.child_by_field_name("superclasses") {
            class.bases = named_children(arguments)
                .into_iter()
                .filter(|arg| matches!(arg.kind(), "identifier" | "attribute"))
                .map(|arg| self.flat_text(arg).replace(' ', ""))
                .collect();
        }

        let Some(body) = node.child_by_field_name("body") else {
            return class;
        };
        class.documentation = self.docstring(body);

        let mut instance_vars = Vec::new();
        for statement in named_children(body) {
            match statement.kind() {
                "function_definition" => {
                    let method = self.function(statement, Vec::new());
                    if method.name == "__init__" {
                        instance_vars = self.instance_variables(statement, &method);
                    }
                    class.members.push(method);
                }
                "decorated_definition" => {
                    let decorators = self.decorators(statement);
                    if let Some(def) = statement
                        .child_by_field_name("definition")
                        .filter(|d| d.kind() == "function_definition")
                    {
                        class.members.push(self.function(def, decorators));
                    }
                }
                "expression_statement" => {
                    for (name, annotation, line) in self.assigned_names(statement) {
                        let mut field = RawMember::field(name).with_line(line);
                        field.annotation = annotation;
                        class.members.push(field);
                    }
                }
                _ => {}
            }
        }

        for var in instance_vars {
            let known = class
                .members
                .iter()
                .any(|m| m.kind.is_attribute() && m.name == var.name);
            if !known {
                class.members.push(var);
            }
        }
        class
    }

    /// `self.<name> = ...` statements directly in the body of `__init__`
    fn instance_variables(&self, node: Node<'_>, init: &RawMember) -> Vec<RawMember> {
        let receiver = init
            .parameters
            .first()
            .map(|p| p.name.as_str())
            .unwrap_or("self");
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut vars: Vec<RawMember> = Vec::new();
        for statement in named_children(body) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(assignment) = named_children(statement)
                .into_iter()
                .find(|n| n.kind() == "assignment")
            else {
                continue;
            };
            let Some(left) = assignment.child_by_field_name("left") else {
                continue;
            };
            if left.kind() != "attribute" {
                continue;
            }
            let object = left.child_by_field_name("object").map(|n| self.text(n));
            let attribute = left.child_by_field_name("attribute").map(|n| self.text(n));
            if let (Some(object), Some(attribute)) = (object, attribute) {
                if object == receiver && !vars.iter().any(|v| v.name == attribute) {
                    let mut var = RawMember::variable(attribute).with_line(line_of(statement));
                    var.annotation = assignment
                        .child_by_field_name("type")
                        .map(|t| self.flat_text(t));
                    vars.push(var);
                }
            }
        }
        trace!(count = vars.len(), "Instance variables from __init__");
        vars
    }

    fn function(&self, node: Node<'_>, decorators: Vec<String>) -> RawMember {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let mut member = RawMember::method(name).with_line(line_of(node));
        member.decorators = decorators;
        member.is_async = node.child(0).map(|c| c.kind() == "async").unwrap_or(false);
        member.return_annotation = node
            .child_by_field_name("return_type")
            .map(|t| self.flat_text(t));

        if let Some(params) = node.child_by_field_name("parameters") {
            member.parameters = named_children(params)
                .into_iter()
                .filter_map(|p| self.parameter(p))
                .collect();
        }
        if let Some(body) = node.child_by_field_name("body") {
            member.documentation = self.docstring(body);
            member.body = self.body_shape(body);
        }
        member
    }

    fn parameter(&self, node: Node<'_>) -> Option<Parameter> {
        let annotation = || {
            node.child_by_field_name("type")
                .map(|t| self.flat_text(t))
        };
        match node.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                Some(Parameter::new(self.flat_text(node)))
            }
            "typed_parameter" => {
                let name = named_children(node)
                    .into_iter()
                    .find(|n| n.kind() != "type")
                    .map(|n| self.flat_text(n))?;
                let mut param = Parameter::new(name);
                param.annotation = annotation();
                Some(param)
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = node.child_by_field_name("name").map(|n| self.flat_text(n))?;
                let mut param = Parameter::new(name).with_default();
                param.annotation = annotation();
                Some(param)
            }
            _ => None,
        }
    }

    /// Normalised decorator text: `@a.b(x)` becomes `a.b`
    fn decorators(&self, node: Node<'_>) -> Vec<String> {
        named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "decorator")
            .filter_map(|d| named_children(d).into_iter().next())
            .map(|expr| self.decorator_name(expr))
            .collect()
    }

    fn decorator_name(&self, expr: Node<'_>) -> String {
        match expr.kind() {
            "call" => expr
                .child_by_field_name("function")
                .map(|f| self.decorator_name(f))
                .unwrap_or_else(|| self.flat_text(expr)),
            "attribute" | "identifier" => self.flat_text(expr).replace(' ', ""),
            _ => self.flat_text(expr),
        }
    }

    /// Names bound by a simple assignment statement
    fn assigned_names(&self, statement: Node<'_>) -> Vec<(String, Option<String>, usize)> {
        let Some(assignment) = named_children(statement)
            .into_iter()
            .find(|n| n.kind() == "assignment")
        else {
            return Vec::new();
        };
        let Some(left) = assignment.child_by_field_name("left") else {
            return Vec::new();
        };
        let annotation = assignment
            .child_by_field_name("type")
            .map(|t| self.flat_text(t));
        let line = line_of(statement);

        match left.kind() {
            "identifier" => vec![(self.text(left).to_string(), annotation, line)],
            "pattern_list" | "tuple_pattern" | "list_pattern" => named_children(left)
                .into_iter()
                .filter(|n| n.kind() == "identifier")
                .map(|n| (self.text(n).to_string(), None, line))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn docstring(&self, body: Node<'_>) -> Option<String> {
        let first = named_children(body).into_iter().next()?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let inner = named_children(first);
        match inner.as_slice() {
            [string] if string.kind() == "string" => {
                let cleaned = clean_docstring(strip_string_literal(self.text(*string)));
                (!cleaned.is_empty()).then_some(cleaned)
            }
            _ => None,
        }
    }

    fn body_shape(&self, body: Node<'_>) -> BodyShape {
        let mut statements = named_children(body);
        if statements
            .first()
            .map(|s| self.is_string_statement(*s))
            .unwrap_or(false)
        {
            statements.remove(0);
        }

        let is_filler = |s: &Node<'_>| {
            s.kind() == "pass_statement"
                || (s.kind() == "expression_statement"
                    && named_children(*s)
                        .iter()
                        .all(|n| n.kind() == "ellipsis"))
        };
        if statements.iter().all(is_filler) {
            return BodyShape::Empty;
        }
        if let [only] = statements.as_slice() {
            if only.kind() == "raise_statement" {
                return BodyShape::RaiseOnly;
            }
        }

        let inner_functions: Vec<&str> = statements
            .iter()
            .filter_map(|s| match s.kind() {
                "function_definition" => Some(*s),
                "decorated_definition" => s
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition"),
                _ => None,
            })
            .filter_map(|f| f.child_by_field_name("name"))
            .map(|n| self.text(n))
            .collect();
        let returns_inner = statements
            .iter()
            .filter(|s| s.kind() == "return_statement")
            .filter_map(|s| named_children(*s).into_iter().next())
            .any(|value| value.kind() == "identifier" && inner_functions.contains(&self.text(value)));
        if returns_inner {
            BodyShape::ReturnsInnerFunction
        } else {
            BodyShape::Other
        }
    }

    fn is_string_statement(&self, node: Node<'_>) -> bool {
        node.kind() == "expression_statement"
            && matches!(named_children(node).as_slice(), [s] if s.kind() == "string")
    }
}

/// Drop the prefix letters and quotes of a string literal
fn strip_string_literal(literal: &str) -> &str {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    body
}

/// Trim a docstring and remove the common indentation of its continuation lines
fn clean_docstring(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut out = vec![first];
    for line in rest {
        // indent counts characters; the slice needs bytes
        let skip: usize = line
            .chars()
            .take(indent)
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        out.push(line[skip..].trim_end().to_string());
    }
    out.join("\n").trim().to_string()
}
