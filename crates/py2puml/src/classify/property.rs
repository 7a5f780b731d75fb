//! Property resolution
//!
//! Collapses getter/setter/deleter method groups into single attributes with
//! an access mode.

use std::collections::HashMap;

use tracing::trace;

use crate::core::{
    AccessMode, BodyShape, MarkerConfig, PropertyDescriptor, RawMember, Visibility,
};

/// Collapses property method groups into [`PropertyDescriptor`]s
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    markers: MarkerConfig,
}

/// Accumulated state for one property group
#[derive(Debug)]
struct Group {
    name: String,
    read: bool,
    write: bool,
    getter_type: Option<String>,
    setter_type: Option<String>,
    documentation: Option<String>,
    source_line: usize,
}

impl Group {
    fn into_descriptor(self) -> PropertyDescriptor {
        PropertyDescriptor {
            visibility: Visibility::of(&self.name),
            access: AccessMode::from_capabilities(self.read, self.write),
            annotation: self.getter_type.or(self.setter_type),
            documentation: self.documentation,
            source_line: self.source_line,
            name: self.name,
        }
    }
}

impl PropertyResolver {
    pub fn new(markers: MarkerConfig) -> Self {
        Self { markers }
    }

    /// Split `members` into property descriptors and the remaining members.
    ///
    /// Descriptors come out in order of each group's first member; remaining
    /// members keep their original order. Setters and deleters whose group has
    /// no earlier getter, or whose name differs from the group key, stay
    /// ordinary members.
    pub fn resolve(&self, members: &[RawMember]) -> (Vec<PropertyDescriptor>, Vec<RawMember>) {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut remaining = Vec::new();

        for member in members {
            if !member.is_method() {
                remaining.push(member.clone());
                continue;
            }

            if self.is_getter(member) {
                let slot = match index.get(&member.name).copied() {
                    Some(slot) => slot,
                    None => {
                        index.insert(member.name.clone(), groups.len());
                        groups.push(Group {
                            name: member.name.clone(),
                            read: false,
                            write: false,
                            getter_type: None,
                            setter_type: None,
                            documentation: None,
                            source_line: member.source_line,
                        });
                        groups.len() - 1
                    }
                };
                let group = &mut groups[slot];
                group.read = member.body != BodyShape::RaiseOnly;
                group.getter_type = member.return_annotation.clone();
                group.documentation = member.documentation.clone();
                trace!(property = %member.name, read = group.read, "Property getter");
                continue;
            }

            match self.accessor_group(member, &index) {
                Some((slot, Accessor::Setter)) => {
                    let group = &mut groups[slot];
                    group.write = true;
                    group.setter_type = value_annotation(member);
                    trace!(property = %member.name, "Property setter");
                }
                Some((_, Accessor::Deleter)) => {
                    trace!(property = %member.name, "Property deleter");
                }
                None => remaining.push(member.clone()),
            }
        }

        let descriptors = groups.into_iter().map(Group::into_descriptor).collect();
        (descriptors, remaining)
    }

    fn is_getter(&self, member: &RawMember) -> bool {
        member.decorators.iter().any(|d| self.markers.is_property(d))
    }

    fn accessor_group(
        &self,
        member: &RawMember,
        index: &HashMap<String, usize>,
    ) -> Option<(usize, Accessor)> {
        member.decorators.iter().find_map(|decorator| {
            let (key, suffix) = decorator.rsplit_once('.')?;
            if key != member.name {
                return None;
            }
            let accessor = match suffix {
                "setter" => Accessor::Setter,
                "deleter" => Accessor::Deleter,
                _ => return None,
            };
            index.get(key).map(|&slot| (slot, accessor))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    Setter,
    Deleter,
}

/// Annotation of a setter's value parameter (the one after `self`)
fn value_annotation(setter: &RawMember) -> Option<String> {
    setter
        .parameters
        .iter()
        .filter(|p| p.name != "self")
        .find_map(|p| p.annotation.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameter;

    fn getter(name: &str) -> RawMember {
        RawMember::method(name)
            .with_decorator("property")
            .with_parameter(Parameter::new("self"))
    }

    fn setter(name: &str) -> RawMember {
        RawMember::method(name)
            .with_decorator(format!("{}.setter", name))
            .with_parameter(Parameter::new("self"))
            .with_parameter(Parameter::new("value"))
    }

    fn deleter(name: &str) -> RawMember {
        RawMember::method(name)
            .with_decorator(format!("{}.deleter", name))
            .with_parameter(Parameter::new("self"))
    }

    #[test]
    fn test_read_write_property() {
        let members = vec![getter("name").with_return("str"), setter("name")];
        let (props, rest) = PropertyResolver::default().resolve(&members);

        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "name");
        assert_eq!(props[0].annotation.as_deref(), Some("str"));
        assert_eq!(props[0].access, AccessMode::ReadWrite);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_only_property() {
        let members = vec![getter("size")];
        let (props, _) = PropertyResolver::default().resolve(&members);
        assert_eq!(props[0].access, AccessMode::ReadOnly);
    }

    #[test]
    fn test_write_only_property() {
        let members = vec![
            getter("password").with_body(BodyShape::RaiseOnly),
            setter("password"),
        ];
        let (props, _) = PropertyResolver::default().resolve(&members);
        assert_eq!(props[0].access, AccessMode::WriteOnly);
    }

    #[test]
    fn test_raise_only_without_setter_is_read_only() {
        let members = vec![getter("broken").with_body(BodyShape::RaiseOnly)];
        let (props, _) = PropertyResolver::default().resolve(&members);
        assert_eq!(props[0].access, AccessMode::ReadOnly);
    }

    #[test]
    fn test_deleter_does_not_change_access() {
        let members = vec![getter("x"), deleter("x")];
        let (props, rest) = PropertyResolver::default().resolve(&members);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].access, AccessMode::ReadOnly);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_orphan_setter_stays_member() {
        let members = vec![setter("ghost"), RawMember::method("run")];
        let (props, rest) = PropertyResolver::default().resolve(&members);
        assert!(props.is_empty());
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].name, "ghost");
    }

    #[test]
    fn test_setter_with_other_name_stays_member() {
        let alias = RawMember::method("alias")
            .with_decorator("name.setter")
            .with_parameter(Parameter::new("self"))
            .with_parameter(Parameter::new("v"));
        let members = vec![getter("name"), alias];

        let (props, rest) = PropertyResolver::default().resolve(&members);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "name");
        assert_eq!(props[0].access, AccessMode::ReadOnly);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "alias");
    }

    #[test]
    fn test_setter_before_getter_is_orphan() {
        let members = vec![setter("late"), getter("late")];
        let (props, rest) = PropertyResolver::default().resolve(&members);
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].access, AccessMode::ReadOnly);
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_setter_annotation_fallback() {
        let mut s = setter("age");
        s.parameters[1] = Parameter::new("value").with_annotation("int");
        let members = vec![getter("age"), s];
        let (props, _) = PropertyResolver::default().resolve(&members);
        assert_eq!(props[0].annotation.as_deref(), Some("int"));
    }

    #[test]
    fn test_getter_documentation() {
        let members = vec![getter("title").with_documentation("The title.")];
        let (props, _) = PropertyResolver::default().resolve(&members);
        assert_eq!(props[0].documentation.as_deref(), Some("The title."));
    }

    #[test]
    fn test_order_preserved() {
        let members = vec![
            RawMember::field("a"),
            getter("second"),
            RawMember::method("m1"),
            getter("first_seen_later"),
            setter("second"),
            RawMember::method("m2"),
        ];
        let (props, rest) = PropertyResolver::default().resolve(&members);

        let names: Vec<_> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first_seen_later"]);
        let rest_names: Vec<_> = rest.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(rest_names, vec!["a", "m1", "m2"]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let members = vec![getter("p"), setter("p"), setter("orphan"), RawMember::method("m")];
        let resolver = PropertyResolver::default();
        let (_, rest) = resolver.resolve(&members);
        let (props_again, rest_again) = resolver.resolve(&rest);
        assert!(props_again.is_empty());
        assert_eq!(rest, rest_again);
    }
}
