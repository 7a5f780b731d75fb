//! Core type definitions for structure classification
//!
//! This module contains the small closed vocabularies used throughout py2puml:
//! member visibility, modifier tags, member kinds, property access modes and
//! class stereotypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visibility of a class member, derived purely from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// `name`
    Public,
    /// `_name`
    Protected,
    /// `__name`
    Private,
    /// `__name__`
    Dunder,
}

impl Visibility {
    /// Derive visibility from a member name.
    ///
    /// Checked in order: dunder, private, protected, public. Every name
    /// resolves to exactly one variant.
    ///
    /// # Example
    /// ```
    /// use py2puml::core::Visibility;
    ///
    /// assert_eq!(Visibility::of("_x"), Visibility::Protected);
    /// assert_eq!(Visibility::of("__x"), Visibility::Private);
    /// assert_eq!(Visibility::of("__x__"), Visibility::Dunder);
    /// assert_eq!(Visibility::of("x"), Visibility::Public);
    /// ```
    pub fn of(name: &str) -> Self {
        if name.starts_with("__") && name.ends_with("__") {
            Visibility::Dunder
        } else if name.starts_with("__") {
            Visibility::Private
        } else if name.starts_with('_') {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    /// PlantUML glyph for this visibility
    pub fn glyph(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Protected => '#',
            Visibility::Private => '-',
            Visibility::Dunder => '~',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '#' => Some(Visibility::Protected),
            '-' => Some(Visibility::Private),
            '~' => Some(Visibility::Dunder),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Dunder => "dunder",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier tags derived from decorators
///
/// Tags are independent flags: a member may be both `Abstract` and `Static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    ClassMethod,
    Abstract,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Static => write!(f, "static"),
            Modifier::ClassMethod => write!(f, "classmethod"),
            Modifier::Abstract => write!(f, "abstract"),
        }
    }
}

/// What kind of member the extractor found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A `def` inside the class body (or a top-level function)
    #[default]
    Method,
    /// A name declared in the class body
    Field,
    /// An instance attribute assigned through `self.<name>` in `__init__`
    Variable,
}

impl MemberKind {
    /// Fields and instance variables both render as attribute lines
    pub fn is_attribute(&self) -> bool {
        matches!(self, MemberKind::Field | MemberKind::Variable)
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Method => write!(f, "method"),
            MemberKind::Field => write!(f, "field"),
            MemberKind::Variable => write!(f, "variable"),
        }
    }
}

/// Coarse shape of a function body
///
/// Only the shapes that drive a classification rule are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BodyShape {
    /// Only `pass`, `...` and/or a docstring
    Empty,
    /// A single unconditional `raise` (a leading docstring is ignored)
    RaiseOnly,
    /// Defines a nested function and returns it by name
    ReturnsInnerFunction,
    #[default]
    Other,
}

/// Access mode of a resolved property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    #[serde(rename = "read write")]
    ReadWrite,
    #[serde(rename = "read only")]
    ReadOnly,
    #[serde(rename = "write only")]
    WriteOnly,
}

impl AccessMode {
    /// Combine read and write capability into an access mode.
    ///
    /// A property with neither capability (a raising getter and no setter)
    /// is reported as read-only.
    pub fn from_capabilities(read: bool, write: bool) -> Self {
        match (read, write) {
            (true, true) => AccessMode::ReadWrite,
            (false, true) => AccessMode::WriteOnly,
            _ => AccessMode::ReadOnly,
        }
    }

    pub fn can_read(&self) -> bool {
        matches!(self, AccessMode::ReadWrite | AccessMode::ReadOnly)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, AccessMode::ReadWrite | AccessMode::WriteOnly)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::ReadWrite => write!(f, "read write"),
            AccessMode::ReadOnly => write!(f, "read only"),
            AccessMode::WriteOnly => write!(f, "write only"),
        }
    }
}

/// Rendering category of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stereotype {
    #[default]
    Regular,
    Abstract,
    DataHolder,
    Interface,
}

impl Stereotype {
    /// Key used for this stereotype in the style table
    pub fn as_str(&self) -> &'static str {
        match self {
            Stereotype::Regular => "regular",
            Stereotype::Abstract => "abstract",
            Stereotype::DataHolder => "data-holder",
            Stereotype::Interface => "interface",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["regular", "abstract", "data-holder", "interface"]
    }
}

impl FromStr for Stereotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" | "class" => Ok(Stereotype::Regular),
            "abstract" => Ok(Stereotype::Abstract),
            "data-holder" | "dataclass" => Ok(Stereotype::DataHolder),
            "interface" => Ok(Stereotype::Interface),
            _ => Err(format!("Unknown stereotype: {}", s)),
        }
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_from_name() {
        assert_eq!(Visibility::of("x"), Visibility::Public);
        assert_eq!(Visibility::of("_x"), Visibility::Protected);
        assert_eq!(Visibility::of("__x"), Visibility::Private);
        assert_eq!(Visibility::of("__x__"), Visibility::Dunder);
        assert_eq!(Visibility::of("__init__"), Visibility::Dunder);
        assert_eq!(Visibility::of("__"), Visibility::Dunder);
        assert_eq!(Visibility::of("___"), Visibility::Dunder);
        assert_eq!(Visibility::of("__x_"), Visibility::Private);
        assert_eq!(Visibility::of("_"), Visibility::Protected);
        assert_eq!(Visibility::of(""), Visibility::Public);
    }

    #[test]
    fn test_visibility_glyphs() {
        assert_eq!(Visibility::Public.glyph(), '+');
        assert_eq!(Visibility::Protected.glyph(), '#');
        assert_eq!(Visibility::Private.glyph(), '-');
        assert_eq!(Visibility::Dunder.glyph(), '~');

        assert_eq!(Visibility::from_glyph('~'), Some(Visibility::Dunder));
        assert_eq!(Visibility::from_glyph('x'), None);
    }

    #[test]
    fn test_access_mode_from_capabilities() {
        assert_eq!(AccessMode::from_capabilities(true, true), AccessMode::ReadWrite);
        assert_eq!(AccessMode::from_capabilities(true, false), AccessMode::ReadOnly);
        assert_eq!(AccessMode::from_capabilities(false, true), AccessMode::WriteOnly);
        assert_eq!(AccessMode::from_capabilities(false, false), AccessMode::ReadOnly);

        assert!(AccessMode::ReadWrite.can_read());
        assert!(AccessMode::ReadWrite.can_write());
        assert!(!AccessMode::WriteOnly.can_read());
        assert!(!AccessMode::ReadOnly.can_write());
    }

    #[test]
    fn test_access_mode_display() {
        assert_eq!(AccessMode::ReadWrite.to_string(), "read write");
        assert_eq!(AccessMode::ReadOnly.to_string(), "read only");
        assert_eq!(AccessMode::WriteOnly.to_string(), "write only");
    }

    #[test]
    fn test_access_mode_serializes_like_display() {
        for mode in [AccessMode::ReadWrite, AccessMode::ReadOnly, AccessMode::WriteOnly] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode));
            let back: AccessMode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, mode);
        }
    }

    #[test]
    fn test_stereotype_parsing() {
        assert_eq!("regular".parse::<Stereotype>(), Ok(Stereotype::Regular));
        assert_eq!("DATACLASS".parse::<Stereotype>(), Ok(Stereotype::DataHolder));
        assert_eq!("interface".parse::<Stereotype>(), Ok(Stereotype::Interface));
        assert!("enum".parse::<Stereotype>().is_err());
    }

    #[test]
    fn test_stereotype_display() {
        assert_eq!(Stereotype::Regular.to_string(), "regular");
        assert_eq!(Stereotype::Abstract.to_string(), "abstract");
        assert_eq!(Stereotype::DataHolder.to_string(), "data-holder");
        assert_eq!(Stereotype::Interface.to_string(), "interface");
    }

    #[test]
    fn test_member_kind_attribute() {
        assert!(MemberKind::Field.is_attribute());
        assert!(MemberKind::Variable.is_attribute());
        assert!(!MemberKind::Method.is_attribute());
    }

    #[test]
    fn test_modifier_ordering_is_stable() {
        let mut tags = vec![Modifier::Abstract, Modifier::Static, Modifier::ClassMethod];
        tags.sort();
        assert_eq!(
            tags,
            vec![Modifier::Static, Modifier::ClassMethod, Modifier::Abstract]
        );
    }
}
