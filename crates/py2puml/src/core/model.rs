//! Structural model shared by the extractor, classifiers and renderers
//!
//! `Raw*` types are produced by an [`Extractor`](super::Extractor) and never
//! mutated afterwards. The classified types wrap them with derived data.

use std::collections::BTreeSet;
use std::path::PathBuf;

use super::types::{AccessMode, BodyShape, MemberKind, Modifier, Stereotype, Visibility};

/// A single function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, star-args keep their sigil (`*args`, `**kwargs`)
    pub name: String,
    pub annotation: Option<String>,
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            has_default: false,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// `name` or `name: type`
    pub fn display(&self) -> String {
        match &self.annotation {
            Some(annotation) => format!("{}: {}", self.name, annotation),
            None => self.name.clone(),
        }
    }
}

/// A class member or top-level function as seen in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub name: String,
    pub kind: MemberKind,
    /// Normalised decorator text in declaration order (`x.setter`, `dataclass`)
    pub decorators: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub return_annotation: Option<String>,
    /// Type annotation of a field or variable
    pub annotation: Option<String>,
    pub is_async: bool,
    pub documentation: Option<String>,
    /// 1-based line of the definition
    pub source_line: usize,
    pub body: BodyShape,
}

impl RawMember {
    fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            decorators: Vec::new(),
            parameters: Vec::new(),
            return_annotation: None,
            annotation: None,
            is_async: false,
            documentation: None,
            source_line: 0,
            body: BodyShape::Other,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Method)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Field)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Variable)
    }

    pub fn with_decorator(mut self, decorator: impl Into<String>) -> Self {
        self.decorators.push(decorator.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return(mut self, annotation: impl Into<String>) -> Self {
        self.return_annotation = Some(annotation.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_body(mut self, body: BodyShape) -> Self {
        self.body = body;
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.source_line = line;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }
}

/// A class definition as seen in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClass {
    pub name: String,
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    pub members: Vec<RawMember>,
    pub documentation: Option<String>,
    pub source_line: usize,
}

impl RawClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            decorators: Vec::new(),
            members: Vec::new(),
            documentation: None,
            source_line: 0,
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_decorator(mut self, decorator: impl Into<String>) -> Self {
        self.decorators.push(decorator.into());
        self
    }

    pub fn with_member(mut self, member: RawMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A module-level variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVariable {
    pub name: String,
    pub annotation: Option<String>,
    pub source_line: usize,
}

impl RawVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            source_line: 0,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(&self.name)
    }
}

/// Everything an extractor found in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedModule {
    pub classes: Vec<RawClass>,
    pub functions: Vec<RawMember>,
    pub variables: Vec<RawVariable>,
}

impl ExtractedModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.variables.is_empty()
    }
}

/// A member with its derived visibility, modifiers and display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMember {
    pub member: RawMember,
    pub visibility: Visibility,
    pub modifiers: BTreeSet<Modifier>,
    /// Name plus surviving custom decorators (`name@dec1@dec2`)
    pub display_name: String,
    pub is_property_component: bool,
    pub property_group_key: Option<String>,
}

impl ClassifiedMember {
    pub fn name(&self) -> &str {
        &self.member.name
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_abstract(&self) -> bool {
        self.has(Modifier::Abstract)
    }

    /// Static and class methods both render with the `{static}` modifier
    pub fn is_class_level(&self) -> bool {
        self.has(Modifier::Static) || self.has(Modifier::ClassMethod)
    }

    /// Parameters as shown in a signature.
    ///
    /// The leading `self`/`cls` of a non-static method is dropped.
    pub fn visible_parameters(&self) -> impl Iterator<Item = &Parameter> {
        let skip = match self.member.parameters.first() {
            Some(first)
                if !self.has(Modifier::Static)
                    && (first.name == "self" || first.name == "cls") =>
            {
                1
            }
            _ => 0,
        };
        self.member.parameters.iter().skip(skip)
    }

    /// `display_name(params)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.visible_parameters().map(Parameter::display).collect();
        format!("{}({})", self.display_name, params.join(", "))
    }

    /// Signature plus ` -> <ret>` when annotated
    pub fn full_signature(&self) -> String {
        match &self.member.return_annotation {
            Some(ret) => format!("{} -> {}", self.signature(), ret),
            None => self.signature(),
        }
    }
}

/// A getter/setter/deleter group collapsed into one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub annotation: Option<String>,
    pub access: AccessMode,
    pub documentation: Option<String>,
    pub visibility: Visibility,
    pub source_line: usize,
}

/// Rendering style assigned to a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStyle {
    pub stereotype: Stereotype,
    /// PlantUML keyword (`class`, `abstract`, `interface`)
    pub keyword: String,
    /// Spot letter drawn in the class header circle
    pub spot: Option<char>,
    pub color: Option<String>,
}

impl ClassStyle {
    /// `<< (S,#COLOR) >>` when both spot and colour are set
    pub fn marker(&self) -> Option<String> {
        match (self.spot, &self.color) {
            (Some(spot), Some(color)) => Some(format!("<< ({},{}) >>", spot, color)),
            (None, Some(color)) => Some(format!("<< ({},{}) >>", 'C', color)),
            _ => None,
        }
    }
}

/// A class ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedClass {
    pub name: String,
    pub display_name: String,
    pub bases: Vec<String>,
    /// Class decorators other than data-holder markers
    pub decorators: Vec<String>,
    pub style: ClassStyle,
    pub fields: Vec<ClassifiedMember>,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<ClassifiedMember>,
    pub documentation: Option<String>,
    pub source_line: usize,
}

impl ClassifiedClass {
    pub fn stereotype(&self) -> Stereotype {
        self.style.stereotype
    }

    /// Attribute lines (fields and properties) are present
    pub fn has_attributes(&self) -> bool {
        !self.fields.is_empty() || !self.properties.is_empty()
    }
}

/// One source file after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedModule {
    pub path: PathBuf,
    /// Dotted package name (`pkg.sub.module`)
    pub package: String,
    pub classes: Vec<ClassifiedClass>,
    pub functions: Vec<ClassifiedMember>,
    pub variables: Vec<RawVariable>,
}

impl ClassifiedModule {
    /// A module with no content, used for files that failed to extract
    pub fn empty(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            classes: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
        }
    }
}

/// `child` inherits from `parent`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InheritanceEdge {
    pub child: String,
    pub parent: String,
}

impl InheritanceEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(member: RawMember, modifiers: &[Modifier]) -> ClassifiedMember {
        ClassifiedMember {
            visibility: Visibility::of(&member.name),
            display_name: member.name.clone(),
            modifiers: modifiers.iter().copied().collect(),
            is_property_component: false,
            property_group_key: None,
            member,
        }
    }

    #[test]
    fn test_parameter_display() {
        assert_eq!(Parameter::new("x").display(), "x");
        assert_eq!(Parameter::new("x").with_annotation("int").display(), "x: int");
        assert_eq!(Parameter::new("*args").display(), "*args");
    }

    #[test]
    fn test_signature_drops_self() {
        let member = RawMember::method("speak")
            .with_parameter(Parameter::new("self"))
            .with_parameter(Parameter::new("volume").with_annotation("int"));
        let m = classified(member, &[]);
        assert_eq!(m.signature(), "speak(volume: int)");
    }

    #[test]
    fn test_signature_drops_cls_for_classmethod() {
        let member = RawMember::method("create")
            .with_parameter(Parameter::new("cls"))
            .with_parameter(Parameter::new("name"));
        let m = classified(member, &[Modifier::ClassMethod]);
        assert_eq!(m.signature(), "create(name)");
        assert!(m.is_class_level());
    }

    #[test]
    fn test_signature_keeps_first_param_of_static() {
        let member = RawMember::method("helper").with_parameter(Parameter::new("self"));
        let m = classified(member, &[Modifier::Static]);
        assert_eq!(m.signature(), "helper(self)");
    }

    #[test]
    fn test_style_marker() {
        let style = ClassStyle {
            stereotype: Stereotype::Abstract,
            keyword: "abstract".to_string(),
            spot: Some('A'),
            color: Some("#FFFFFF".to_string()),
        };
        assert_eq!(style.marker(), Some("<< (A,#FFFFFF) >>".to_string()));

        let plain = ClassStyle {
            stereotype: Stereotype::Regular,
            keyword: "class".to_string(),
            spot: None,
            color: None,
        };
        assert_eq!(plain.marker(), None);
    }

    #[test]
    fn test_empty_module() {
        let module = ClassifiedModule::empty("a/b.py", "a.b");
        assert_eq!(module.package, "a.b");
        assert!(module.classes.is_empty());
        assert!(ExtractedModule::new().is_empty());
    }
}
