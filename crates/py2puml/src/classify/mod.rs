//! Classification of extracted structure
//!
//! Turns raw classes and members into their classified forms: member
//! visibility and modifiers, collapsed properties and class stereotypes.

mod member;
mod property;
mod style;

pub use member::*;
pub use property::*;
pub use style::*;

use std::path::Path;

use tracing::trace;

use crate::core::{
    ClassifiedClass, ClassifiedModule, ExtractedModule, Py2PumlConfig, RawClass,
};

/// Classify a class: members, properties and style.
///
/// Fields come first, then properties, then methods; each block keeps
/// declaration order.
pub fn classify_class(raw: &RawClass, config: &Py2PumlConfig) -> ClassifiedClass {
    let markers = &config.markers;
    let classified: Vec<_> = raw
        .members
        .iter()
        .map(|m| classify_member(m, markers))
        .collect();

    let style = StyleClassifier::new(markers.clone(), config.styles.clone())
        .classify_style(raw, &classified);

    let (properties, remaining) = PropertyResolver::new(markers.clone()).resolve(&raw.members);

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for member in &remaining {
        let mut member = classify_member(member, markers);
        // getters never reach here, so a component is a setter or deleter without one
        if member.is_property_component {
            member = classify_orphan_accessor(&member.member, markers);
        }
        if member.member.kind.is_attribute() {
            fields.push(member);
        } else {
            methods.push(member);
        }
    }

    let decorators: Vec<String> = raw
        .decorators
        .iter()
        .filter(|d| !markers.is_data_holder(d))
        .cloned()
        .collect();
    let mut display_name = raw.name.clone();
    for decorator in &decorators {
        display_name.push('@');
        display_name.push_str(decorator);
    }

    trace!(
        class = %raw.name,
        stereotype = %style.stereotype,
        fields = fields.len(),
        properties = properties.len(),
        methods = methods.len(),
        "Classified class"
    );

    ClassifiedClass {
        name: raw.name.clone(),
        display_name,
        bases: raw.bases.clone(),
        decorators,
        style,
        fields,
        properties,
        methods,
        documentation: raw.documentation.clone(),
        source_line: raw.source_line,
    }
}

/// Classify everything extracted from one file
pub fn classify_module(
    module: &ExtractedModule,
    path: &Path,
    package: &str,
    config: &Py2PumlConfig,
) -> ClassifiedModule {
    ClassifiedModule {
        path: path.to_path_buf(),
        package: package.to_string(),
        classes: module
            .classes
            .iter()
            .map(|c| classify_class(c, config))
            .collect(),
        functions: module
            .functions
            .iter()
            .map(|f| classify_member(f, &config.markers))
            .collect(),
        variables: module.variables.clone(),
    }
}

/// Dotted package name for a file relative to the scan root
///
/// # Example
/// ```
/// use std::path::Path;
/// use py2puml::classify::package_name;
///
/// assert_eq!(package_name(Path::new("src"), Path::new("src/pkg/mod.py")), "pkg.mod");
/// ```
pub fn package_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let stem = relative.with_extension("");
    let parts: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessMode, Parameter, RawMember, Stereotype};

    #[test]
    fn test_classify_class_layout() {
        let raw = RawClass::new("Account")
            .with_member(RawMember::field("owner").with_annotation("str"))
            .with_member(
                RawMember::method("balance")
                    .with_decorator("property")
                    .with_return("int"),
            )
            .with_member(
                RawMember::method("deposit")
                    .with_parameter(Parameter::new("self"))
                    .with_parameter(Parameter::new("amount")),
            )
            .with_member(RawMember::variable("_history"));

        let cls = classify_class(&raw, &Py2PumlConfig::default());
        assert_eq!(cls.stereotype(), Stereotype::Regular);

        let fields: Vec<_> = cls.fields.iter().map(|f| f.name()).collect();
        assert_eq!(fields, vec!["owner", "_history"]);
        assert_eq!(cls.properties.len(), 1);
        assert_eq!(cls.properties[0].access, AccessMode::ReadOnly);
        assert_eq!(cls.methods.len(), 1);
        assert_eq!(cls.methods[0].signature(), "deposit(amount)");
    }

    #[test]
    fn test_unmatched_accessors_render_as_methods() {
        let raw = RawClass::new("Record")
            .with_member(RawMember::method("name").with_decorator("property"))
            .with_member(
                RawMember::method("alias")
                    .with_decorator("name.setter")
                    .with_parameter(Parameter::new("self"))
                    .with_parameter(Parameter::new("v")),
            )
            .with_member(
                RawMember::method("ghost")
                    .with_decorator("ghost.setter")
                    .with_parameter(Parameter::new("self"))
                    .with_parameter(Parameter::new("value")),
            );

        let cls = classify_class(&raw, &Py2PumlConfig::default());
        assert_eq!(cls.properties.len(), 1);
        assert_eq!(cls.properties[0].access, AccessMode::ReadOnly);

        let methods: Vec<_> = cls.methods.iter().map(|m| m.signature()).collect();
        assert_eq!(
            methods,
            vec!["alias@name.setter(v)", "ghost@ghost.setter(value)"]
        );
        assert!(cls.methods.iter().all(|m| !m.is_property_component));
    }

    #[test]
    fn test_abstract_property_marks_class_abstract() {
        let raw = RawClass::new("Shape").with_base("Base").with_member(
            RawMember::method("area")
                .with_decorator("property")
                .with_decorator("abstractmethod"),
        );
        let cls = classify_class(&raw, &Py2PumlConfig::default());
        assert_eq!(cls.stereotype(), Stereotype::Abstract);
        assert!(cls.methods.is_empty());
    }

    #[test]
    fn test_class_display_name_drops_data_holder() {
        let raw = RawClass::new("Point")
            .with_decorator("dataclass")
            .with_decorator("total_ordering");
        let cls = classify_class(&raw, &Py2PumlConfig::default());
        assert_eq!(cls.display_name, "Point@total_ordering");
        assert_eq!(cls.stereotype(), Stereotype::DataHolder);
    }

    #[test]
    fn test_package_name() {
        let root = Path::new("/proj");
        assert_eq!(package_name(root, Path::new("/proj/a.py")), "a");
        assert_eq!(package_name(root, Path::new("/proj/x/y/z.py")), "x.y.z");
        assert_eq!(package_name(Path::new("/proj/a.py"), Path::new("/proj/a.py")), "a");
    }
}
