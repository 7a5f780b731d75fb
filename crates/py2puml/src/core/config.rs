//! Run configuration
//!
//! Marker sets, the stereotype style table and rendering/scanning options.
//! Every section has serde defaults, so a config file only needs the keys it
//! overrides.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::Py2PumlError;
use super::model::ClassStyle;
use super::types::Stereotype;

/// Top-level configuration for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Py2PumlConfig {
    pub markers: MarkerConfig,
    pub styles: StyleTable,
    pub render: RenderOptions,
    pub scan: ScanOptions,
}

impl Py2PumlConfig {
    /// Load a config file. `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, Py2PumlError> {
        let text = fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        debug!(path = %path.display(), yaml = is_yaml, "Loading config");

        let config: Self = if is_yaml {
            serde_yaml::from_str(&text).map_err(|e| {
                Py2PumlError::config_error(format!("{}: {}", path.display(), e))
            })?
        } else {
            serde_json::from_str(&text).map_err(|e| {
                Py2PumlError::config_error(format!("{}: {}", path.display(), e))
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject style entries that name an unknown stereotype
    pub fn validate(&self) -> Result<(), Py2PumlError> {
        for key in self.styles.0.keys() {
            key.parse::<Stereotype>()
                .map_err(Py2PumlError::config_error)?;
        }
        Ok(())
    }
}

/// Decorator and base-class literals that drive classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub static_method: Vec<String>,
    pub class_method: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_method: Vec<String>,
    pub property: Vec<String>,
    pub data_holder: Vec<String>,
    pub abstract_base: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            static_method: owned(&["staticmethod"]),
            class_method: owned(&["classmethod"]),
            abstract_method: owned(&["abstractmethod", "abstractproperty"]),
            property: owned(&["property", "cached_property"]),
            data_holder: owned(&["dataclass", "attr.s", "attrs.define", "attrs.frozen"]),
            abstract_base: owned(&["ABC", "abc.ABC"]),
        }
    }
}

impl MarkerConfig {
    /// True when `text` matches any literal in `set`.
    ///
    /// A literal matches when it is equal to `text`, or when it has no dot and
    /// equals the last dotted segment of `text`.
    ///
    /// # Example
    /// ```
    /// use py2puml::core::MarkerConfig;
    ///
    /// let set = vec!["abstractmethod".to_string()];
    /// assert!(MarkerConfig::matches(&set, "abc.abstractmethod"));
    /// assert!(!MarkerConfig::matches(&set, "abstractmethod.extra"));
    /// ```
    pub fn matches(set: &[String], text: &str) -> bool {
        let last = text.rsplit('.').next().unwrap_or(text);
        set.iter()
            .any(|literal| literal == text || (!literal.contains('.') && literal == last))
    }

    pub fn is_static(&self, decorator: &str) -> bool {
        Self::matches(&self.static_method, decorator)
    }

    pub fn is_class_method(&self, decorator: &str) -> bool {
        Self::matches(&self.class_method, decorator)
    }

    pub fn is_abstract(&self, decorator: &str) -> bool {
        Self::matches(&self.abstract_method, decorator)
    }

    pub fn is_property(&self, decorator: &str) -> bool {
        Self::matches(&self.property, decorator)
    }

    pub fn is_data_holder(&self, decorator: &str) -> bool {
        Self::matches(&self.data_holder, decorator)
    }

    pub fn is_abstract_base(&self, base: &str) -> bool {
        Self::matches(&self.abstract_base, base)
    }
}

/// Keyword, spot letter and colour for one stereotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    pub keyword: String,
    #[serde(default)]
    pub spot: Option<char>,
    #[serde(default)]
    pub color: Option<String>,
}

impl StyleSpec {
    fn new(keyword: &str, spot: Option<char>, color: Option<&str>) -> Self {
        Self {
            keyword: keyword.to_string(),
            spot,
            color: color.map(str::to_string),
        }
    }
}

/// Style table keyed by stereotype name
///
/// Entries given in a config file replace the default entry of the same key;
/// missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleTable(BTreeMap<String, StyleSpec>);

impl Default for StyleTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert("regular".to_string(), StyleSpec::new("class", None, None));
        table.insert(
            "abstract".to_string(),
            StyleSpec::new("abstract", Some('A'), Some("#FFFFFF")),
        );
        table.insert(
            "data-holder".to_string(),
            StyleSpec::new("class", Some('D'), Some("#90EE90")),
        );
        table.insert(
            "interface".to_string(),
            StyleSpec::new("interface", Some('I'), Some("#FFFFFF")),
        );
        Self(table)
    }
}

impl<'de> Deserialize<'de> for StyleTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let overrides = BTreeMap::<String, StyleSpec>::deserialize(deserializer)?;
        let mut table = Self::default();
        table.0.extend(overrides);
        Ok(table)
    }
}

impl StyleTable {
    /// Style for a stereotype, falling back to a plain `class`
    pub fn style_for(&self, stereotype: Stereotype) -> ClassStyle {
        let spec = self
            .0
            .get(stereotype.as_str())
            .or_else(|| self.0.get(Stereotype::Regular.as_str()));
        match spec {
            Some(spec) => ClassStyle {
                stereotype,
                keyword: spec.keyword.clone(),
                spot: spec.spot,
                color: spec.color.clone(),
            },
            None => ClassStyle {
                stereotype,
                keyword: "class".to_string(),
                spot: None,
                color: None,
            },
        }
    }

    pub fn set(&mut self, stereotype: Stereotype, spec: StyleSpec) {
        self.0.insert(stereotype.as_str().to_string(), spec);
    }
}

/// Options that affect diagram text but not classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub package_color: String,
    pub error_color: String,
    pub note_color: String,
    pub note_wrap_width: usize,
    pub docstring_notes: bool,
    pub hide_decorator_functions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            package_color: "#F0F0FF".to_string(),
            error_color: "#FF0000".to_string(),
            note_color: "#FFDDDD".to_string(),
            note_wrap_width: 100,
            docstring_notes: false,
            hide_decorator_functions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub use_gitignore: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            use_gitignore: true,
        }
    }
}
