//! PlantUML renderer
//!
//! Renders a [`DiagramDatabase`] to PlantUML class-diagram text.

use std::fmt::Write;

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::database::{DiagramDatabase, ModulePackage};
use crate::core::{
    element_id, element_ref, escape_member_text, escape_note_line, escape_quoted, wrap_label,
    BodyShape, ClassifiedClass, ClassifiedMember, Database, Modifier, PropertyDescriptor,
    RenderOptions, Renderer,
};

const INDENT: &str = "  ";
const GLOBALS_MARKER: &str = "<< (V,#AAAAFF) >>";
const FUNCTION_MARKER: &str = "<< (F,#DDDD00) >>";

/// PlantUML class-diagram renderer
#[derive(Debug, Clone, Default)]
pub struct PlantUmlRenderer {
    options: RenderOptions,
}

impl PlantUmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn render_package(&self, out: &mut String, package: &ModulePackage) -> Result<()> {
        let module = &package.module;
        let color = if package.is_failed() {
            &self.options.error_color
        } else {
            &self.options.package_color
        };
        writeln!(
            out,
            "package \"{}\" <<Frame>> {} {{",
            escape_quoted(&module.package),
            color
        )?;

        if !module.variables.is_empty() {
            writeln!(
                out,
                "{}class \"Global Variables\" as {} {} {{",
                INDENT,
                element_id(&module.package, "globals"),
                GLOBALS_MARKER
            )?;
            for var in &module.variables {
                let line = match &var.annotation {
                    Some(annotation) => format!("{}: {}", var.name, annotation),
                    None => var.name.clone(),
                };
                writeln!(
                    out,
                    "{}{}{} {}",
                    INDENT,
                    INDENT,
                    var.visibility().glyph(),
                    escape_member_text(&line)
                )?;
            }
            writeln!(out, "{}}}", INDENT)?;
        }

        for (i, function) in module.functions.iter().enumerate() {
            if self.options.hide_decorator_functions
                && function.member.body == BodyShape::ReturnsInnerFunction
            {
                trace!(function = %function.name(), "Hiding decorator factory");
                continue;
            }
            writeln!(
                out,
                "{}class \"{}\" as {} {} {{",
                INDENT,
                escape_quoted(&function.full_signature()),
                element_id(&module.package, &format!("fn{}_{}", i, function.name())),
                FUNCTION_MARKER
            )?;
            writeln!(out, "{}}}", INDENT)?;
        }

        for class in &module.classes {
            self.render_class(out, class)?;
        }

        writeln!(out, "}}")?;

        if let Some(record) = &package.errors {
            writeln!(
                out,
                "note right of \"{}\" {}",
                escape_quoted(&module.package),
                self.options.note_color
            )?;
            writeln!(out, "{}Errors:", INDENT)?;
            for message in record.messages() {
                let lines = wrap_label(message, self.options.note_wrap_width);
                for (n, line) in lines.iter().enumerate() {
                    let bullet = if n == 0 { "- " } else { "  " };
                    writeln!(out, "{}{}{}", INDENT, bullet, escape_note_line(line))?;
                }
            }
            writeln!(out, "end note")?;
        }
        Ok(())
    }

    fn render_class(&self, out: &mut String, class: &ClassifiedClass) -> Result<()> {
        let mut header = format!(
            "{}{} \"{}\"",
            INDENT,
            class.style.keyword,
            escape_quoted(&class.display_name)
        );
        if class.display_name != class.name {
            write!(header, " as {}", element_ref(&class.name))?;
        }
        if let Some(marker) = class.style.marker() {
            write!(header, " {}", marker)?;
        }
        writeln!(out, "{} {{", header)?;

        let body_indent = format!("{}{}", INDENT, INDENT);
        for field in &class.fields {
            writeln!(out, "{}{}", body_indent, field_line(field))?;
        }
        for property in &class.properties {
            writeln!(out, "{}{}", body_indent, property_line(property))?;
        }
        if class.has_attributes() && !class.methods.is_empty() {
            writeln!(out, "{}--", body_indent)?;
        }
        for method in &class.methods {
            writeln!(out, "{}{}", body_indent, method_line(method))?;
        }
        writeln!(out, "{}}}", INDENT)?;

        if self.options.docstring_notes {
            if let Some(excerpt) = class.documentation.as_deref().and_then(first_line) {
                writeln!(
                    out,
                    "{}note top of \"{}\" : {}",
                    INDENT,
                    escape_quoted(&class.name),
                    escape_note_line(excerpt)
                )?;
            }
        }
        Ok(())
    }
}

impl Renderer<DiagramDatabase> for PlantUmlRenderer {
    type Output = String;

    fn render(&self, database: &DiagramDatabase) -> Result<String> {
        let render_span = span!(
            Level::INFO,
            "render_plantuml",
            packages = database.node_count(),
            edges = database.edge_count()
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        writeln!(out, "@startuml")?;

        if database.is_empty() {
            writeln!(
                out,
                "title No Python files found in {}",
                escape_quoted(&database.root().display().to_string())
            )?;
            writeln!(out, "@enduml")?;
            debug!("Rendered empty diagram");
            return Ok(out);
        }

        if let Some(title) = &self.options.title {
            writeln!(out, "title {}", escape_quoted(title))?;
        }

        for package in database.nodes() {
            self.render_package(&mut out, package)?;
        }

        for edge in database.edges() {
            writeln!(
                out,
                "{} <|-- {}",
                element_ref(&edge.parent),
                element_ref(&edge.child)
            )?;
        }

        writeln!(out, "@enduml")?;
        debug!(bytes = out.len(), "Rendered diagram");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn format(&self) -> &'static str {
        "puml"
    }
}

/// `<glyph> <name>[: <type>]`
fn field_line(field: &ClassifiedMember) -> String {
    let text = match &field.member.annotation {
        Some(annotation) => format!("{}: {}", field.name(), annotation),
        None => field.name().to_string(),
    };
    format!("{} {}", field.visibility.glyph(), escape_member_text(&text))
}

/// `<glyph> <name>[: <type>] {<access>}`
fn property_line(property: &PropertyDescriptor) -> String {
    let text = match &property.annotation {
        Some(annotation) => format!("{}: {}", property.name, annotation),
        None => property.name.clone(),
    };
    format!(
        "{} {} {{{}}}",
        property.visibility.glyph(),
        escape_member_text(&text),
        property.access
    )
}

/// `<glyph> [{abstract}|{static}] <signature>[ -> <ret>]`
fn method_line(method: &ClassifiedMember) -> String {
    let modifier = if method.has(Modifier::Abstract) {
        "{abstract} "
    } else if method.is_class_level() {
        "{static} "
    } else {
        ""
    };
    format!(
        "{} {}{}",
        method.visibility.glyph(),
        modifier,
        escape_member_text(&method.full_signature())
    )
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_class, classify_member};
    use crate::core::{
        ClassifiedModule, Parameter, Py2PumlConfig, RawClass, RawMember, RawVariable,
    };
    use crate::diagnostics::{ErrorKind, ErrorRecord};

    fn render_one(classes: Vec<RawClass>) -> String {
        let config = Py2PumlConfig::default();
        let mut module = ClassifiedModule::empty("zoo.py", "zoo");
        module.classes = classes.iter().map(|c| classify_class(c, &config)).collect();
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module)).unwrap();
        PlantUmlRenderer::default().render(&db).unwrap()
    }

    #[test]
    fn test_renderer_metadata() {
        let renderer = PlantUmlRenderer::default();
        assert_eq!(renderer.name(), "plantuml");
        assert_eq!(renderer.format(), "puml");
        assert!(!renderer.version().is_empty());
    }

    #[test]
    fn test_render_empty_scan() {
        let db = DiagramDatabase::new("proj");
        let output = PlantUmlRenderer::default().render(&db).unwrap();
        assert_eq!(
            output,
            "@startuml\ntitle No Python files found in proj\n@enduml\n"
        );
    }

    #[test]
    fn test_render_inheritance() {
        let output = render_one(vec![
            RawClass::new("Animal").with_member(
                RawMember::method("speak").with_parameter(Parameter::new("self")),
            ),
            RawClass::new("Dog").with_base("Animal"),
        ]);

        assert!(output.starts_with("@startuml\n"));
        assert!(output.ends_with("@enduml\n"));
        assert!(output.contains("package \"zoo\" <<Frame>> #F0F0FF {"));
        assert!(output.contains("  class \"Animal\" {\n    + speak()\n  }"));
        assert!(output.contains("  class \"Dog\" {\n  }"));
        assert!(output.contains("Animal <|-- Dog\n"));
    }

    #[test]
    fn test_render_fields_properties_and_separator() {
        let output = render_one(vec![RawClass::new("Account")
            .with_member(RawMember::field("_owner").with_annotation("str"))
            .with_member(
                RawMember::method("balance")
                    .with_decorator("property")
                    .with_return("int"),
            )
            .with_member(
                RawMember::method("deposit")
                    .with_parameter(Parameter::new("self"))
                    .with_parameter(Parameter::new("amount").with_annotation("int"))
                    .with_return("None"),
            )]);

        let expected = "  class \"Account\" {\n    # _owner: str\n    + balance: int {read only}\n    --\n    + deposit(amount: int) -> None\n  }\n";
        assert!(output.contains(expected), "{}", output);
    }

    #[test]
    fn test_render_modifiers() {
        let output = render_one(vec![RawClass::new("Shape")
            .with_base("ABC")
            .with_member(
                RawMember::method("area")
                    .with_decorator("staticmethod")
                    .with_decorator("abstractmethod"),
            )
            .with_member(
                RawMember::method("create")
                    .with_decorator("classmethod")
                    .with_parameter(Parameter::new("cls")),
            )]);

        assert!(output.contains("  abstract \"Shape\" << (A,#FFFFFF) >> {"));
        assert!(output.contains("    + {abstract} area()\n"));
        assert!(output.contains("    + {static} create()\n"));
        assert!(output.contains("ABC <|-- Shape\n"));
    }

    #[test]
    fn test_render_decorated_class_uses_alias() {
        let output = render_one(vec![RawClass::new("Handler")
            .with_decorator("register")
            .with_base("Base")]);
        assert!(output.contains("  class \"Handler@register\" as Handler {"));
        assert!(output.contains("Base <|-- Handler\n"));
    }

    #[test]
    fn test_render_failed_package_note() {
        let config = Py2PumlConfig::default();
        let module = ClassifiedModule::empty("bad.py", "bad");
        let record = ErrorRecord::new(
            "bad.py",
            ErrorKind::Syntax,
            "Syntax error in bad.py: invalid syntax (line 1, column 4)",
        );
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module).with_errors(record))
            .unwrap();
        let output = PlantUmlRenderer::new(config.render).render(&db).unwrap();

        assert!(output.contains("package \"bad\" <<Frame>> #FF0000 {\n}\n"));
        assert!(output.contains(
            "note right of \"bad\" #FFDDDD\n  Errors:\n  - Syntax error in bad.py: invalid syntax (line 1, column 4)\nend note\n"
        ));
    }

    #[test]
    fn test_render_globals_and_functions() {
        let config = Py2PumlConfig::default();
        let mut module = ClassifiedModule::empty("util.py", "util");
        module.variables = vec![
            RawVariable::new("MAX_SIZE").with_annotation("int"),
            RawVariable::new("_cache"),
        ];
        module.functions = vec![
            classify_member(
                &RawMember::method("helper")
                    .with_parameter(Parameter::new("x"))
                    .with_return("str"),
                &config.markers,
            ),
            classify_member(
                &RawMember::method("timed").with_body(BodyShape::ReturnsInnerFunction),
                &config.markers,
            ),
        ];
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module)).unwrap();
        let output = PlantUmlRenderer::new(config.render.clone()).render(&db).unwrap();

        assert!(output.contains(
            "  class \"Global Variables\" as util_globals << (V,#AAAAFF) >> {\n    + MAX_SIZE: int\n    # _cache\n  }\n"
        ));
        assert!(output.contains("  class \"helper(x) -> str\" as util_fn0_helper << (F,#DDDD00) >> {\n  }\n"));
        assert!(!output.contains("timed"));

        let mut options = config.render;
        options.hide_decorator_functions = false;
        let output = PlantUmlRenderer::new(options).render(&db).unwrap();
        assert!(output.contains("\"timed()\""));
    }

    #[test]
    fn test_render_title_and_docstring_notes() {
        let config = Py2PumlConfig::default();
        let mut module = ClassifiedModule::empty("m.py", "m");
        module.classes = vec![classify_class(
            &RawClass::new("Doc").with_documentation("\n  First line.\n  Second line."),
            &config,
        )];
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module)).unwrap();

        let mut options = config.render;
        options.title = Some("My \"project\"".to_string());
        options.docstring_notes = true;
        let output = PlantUmlRenderer::new(options).render(&db).unwrap();

        assert!(output.contains("title My 'project'\n"));
        assert!(output.contains("  note top of \"Doc\" : First line.\n"));
    }
}
