//! Member classification: visibility, modifiers and display name

use std::collections::BTreeSet;

use crate::core::{ClassifiedMember, MarkerConfig, Modifier, RawMember, Visibility};

/// Classify a single member against the configured markers.
///
/// Modifier and property decorators are consumed; every other decorator is
/// appended to the display name in declaration order.
///
/// # Example
/// ```
/// use py2puml::classify::classify_member;
/// use py2puml::core::{MarkerConfig, Modifier, RawMember, Visibility};
///
/// let member = RawMember::method("_load")
///     .with_decorator("staticmethod")
///     .with_decorator("lru_cache");
/// let classified = classify_member(&member, &MarkerConfig::default());
///
/// assert_eq!(classified.visibility, Visibility::Protected);
/// assert!(classified.has(Modifier::Static));
/// assert_eq!(classified.display_name, "_load@lru_cache");
/// ```
pub fn classify_member(member: &RawMember, markers: &MarkerConfig) -> ClassifiedMember {
    classify_with(member, markers, false)
}

/// Classify a setter or deleter whose class has no matching getter.
///
/// The member is an ordinary method and its `<name>.setter` or
/// `<name>.deleter` decorator stays in the display name.
pub fn classify_orphan_accessor(member: &RawMember, markers: &MarkerConfig) -> ClassifiedMember {
    classify_with(member, markers, true)
}

fn classify_with(
    member: &RawMember,
    markers: &MarkerConfig,
    keep_accessors: bool,
) -> ClassifiedMember {
    let mut modifiers = BTreeSet::new();
    let mut surviving = Vec::new();
    let mut is_property_component = false;

    let setter = format!("{}.setter", member.name);
    let deleter = format!("{}.deleter", member.name);

    for decorator in &member.decorators {
        if markers.is_static(decorator) {
            modifiers.insert(Modifier::Static);
        } else if markers.is_class_method(decorator) {
            modifiers.insert(Modifier::ClassMethod);
        } else if markers.is_abstract(decorator) {
            modifiers.insert(Modifier::Abstract);
        } else if markers.is_property(decorator) {
            is_property_component = true;
        } else if (*decorator == setter || *decorator == deleter) && !keep_accessors {
            is_property_component = true;
        } else {
            surviving.push(decorator.as_str());
        }
    }

    let mut display_name = member.name.clone();
    for decorator in surviving {
        display_name.push('@');
        display_name.push_str(decorator);
    }

    ClassifiedMember {
        member: member.clone(),
        visibility: Visibility::of(&member.name),
        modifiers,
        display_name,
        is_property_component,
        property_group_key: is_property_component.then(|| member.name.clone()),
    }
}
