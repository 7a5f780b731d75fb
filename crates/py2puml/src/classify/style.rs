//! Class style classification

use crate::core::{ClassStyle, ClassifiedMember, MarkerConfig, RawClass, Stereotype, StyleTable};

/// Assigns a stereotype and its rendering style to a class
#[derive(Debug, Clone, Default)]
pub struct StyleClassifier {
    markers: MarkerConfig,
    styles: StyleTable,
}

impl StyleClassifier {
    pub fn new(markers: MarkerConfig, styles: StyleTable) -> Self {
        Self { markers, styles }
    }

    /// Pick the stereotype for a class. First match wins:
    ///
    /// 1. a data-holder decorator
    /// 2. an abstract base, or any abstract member
    /// 3. no members and no bases (interface)
    /// 4. regular
    pub fn stereotype(&self, cls: &RawClass, members: &[ClassifiedMember]) -> Stereotype {
        if cls.decorators.iter().any(|d| self.markers.is_data_holder(d)) {
            Stereotype::DataHolder
        } else if cls.bases.iter().any(|b| self.markers.is_abstract_base(b))
            || members.iter().any(ClassifiedMember::is_abstract)
        {
            Stereotype::Abstract
        } else if cls.members.is_empty() && cls.bases.is_empty() {
            Stereotype::Interface
        } else {
            Stereotype::Regular
        }
    }

    pub fn classify_style(&self, cls: &RawClass, members: &[ClassifiedMember]) -> ClassStyle {
        self.styles.style_for(self.stereotype(cls, members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_member;
    use crate::core::RawMember;

    fn classified(cls: &RawClass) -> Vec<ClassifiedMember> {
        let markers = MarkerConfig::default();
        cls.members
            .iter()
            .map(|m| classify_member(m, &markers))
            .collect()
    }

    fn stereotype(cls: &RawClass) -> Stereotype {
        StyleClassifier::default().stereotype(cls, &classified(cls))
    }

    #[test]
    fn test_data_holder_wins() {
        let cls = RawClass::new("Point")
            .with_decorator("dataclass")
            .with_base("ABC")
            .with_member(RawMember::field("x"));
        assert_eq!(stereotype(&cls), Stereotype::DataHolder);
    }

    #[test]
    fn test_abstract_base() {
        let cls = RawClass::new("Shape").with_base("abc.ABC");
        assert_eq!(stereotype(&cls), Stereotype::Abstract);
    }

    #[test]
    fn test_abstract_member() {
        let cls = RawClass::new("Shape")
            .with_base("Base")
            .with_member(RawMember::method("area").with_decorator("abstractmethod"));
        assert_eq!(stereotype(&cls), Stereotype::Abstract);
    }

    #[test]
    fn test_empty_class_is_interface() {
        let cls = RawClass::new("Marker");
        assert_eq!(stereotype(&cls), Stereotype::Interface);
    }

    #[test]
    fn test_abstract_base_without_members_is_abstract() {
        let cls = RawClass::new("Plugin").with_base("ABC");
        assert_eq!(stereotype(&cls), Stereotype::Abstract);
    }

    #[test]
    fn test_regular() {
        let cls = RawClass::new("Dog").with_base("Animal");
        assert_eq!(stereotype(&cls), Stereotype::Regular);

        let cls = RawClass::new("Cat").with_member(RawMember::method("meow"));
        assert_eq!(stereotype(&cls), Stereotype::Regular);
    }

    #[test]
    fn test_style_lookup() {
        let cls = RawClass::new("Point").with_decorator("dataclasses.dataclass");
        let style = StyleClassifier::default().classify_style(&cls, &[]);
        assert_eq!(style.stereotype, Stereotype::DataHolder);
        assert_eq!(style.keyword, "class");
        assert_eq!(style.marker().as_deref(), Some("<< (D,#90EE90) >>"));
    }
}
