//! Diagram database
//!
//! Stores one package per source file plus the inheritance edges between
//! classes, in the order they were added.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::debug;

use crate::core::{ClassifiedModule, Database, InheritanceEdge};
use crate::diagnostics::ErrorRecord;

/// A source file as drawn in the diagram
#[derive(Debug, Clone)]
pub struct ModulePackage {
    pub module: ClassifiedModule,
    /// Present when processing the file failed
    pub errors: Option<ErrorRecord>,
}

impl ModulePackage {
    pub fn new(module: ClassifiedModule) -> Self {
        Self {
            module,
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: ErrorRecord) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn name(&self) -> &str {
        &self.module.package
    }

    pub fn is_failed(&self) -> bool {
        self.errors.is_some()
    }
}

/// Packages and inheritance edges for one diagram
#[derive(Debug, Clone)]
pub struct DiagramDatabase {
    root: PathBuf,
    packages: Vec<ModulePackage>,
    index: HashMap<String, usize>,
    edges: Vec<InheritanceEdge>,
}

impl DiagramDatabase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            packages: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Directory the diagram was generated from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Add a package and one edge per base of each of its classes.
    ///
    /// A package whose dotted name is already taken (`a/b.py` next to
    /// `a.b.py`) is renamed `a.b (2)`, `a.b (3)` and so on. Edges follow
    /// class order, then base order. Repeated bases produce repeated edges.
    pub fn add_package(&mut self, mut package: ModulePackage) -> Result<()> {
        let name = self.unique_name(package.name());
        if name != package.name() {
            debug!(package = %package.name(), renamed = %name, "Package name collision");
            package.module.package = name;
        }

        let edges: Vec<InheritanceEdge> = package
            .module
            .classes
            .iter()
            .flat_map(|cls| {
                cls.bases
                    .iter()
                    .map(move |base| InheritanceEdge::new(cls.name.clone(), base.clone()))
            })
            .collect();

        self.add_node(package)?;
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.index.contains_key(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", name, n))
            .find(|candidate| !self.index.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    pub fn packages(&self) -> &[ModulePackage] {
        &self.packages
    }

    pub fn get_package(&self, name: &str) -> Option<&ModulePackage> {
        self.index.get(name).map(|&slot| &self.packages[slot])
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn edge_list(&self) -> &[InheritanceEdge] {
        &self.edges
    }
}

impl Database for DiagramDatabase {
    type Node = ModulePackage;
    type Edge = InheritanceEdge;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        if self.index.contains_key(node.name()) {
            bail!("Duplicate package: {}", node.name());
        }
        self.index.insert(node.name().to_string(), self.packages.len());
        self.packages.push(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.edges.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.get_package(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.packages.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.packages.clear();
        self.index.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.packages.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_class;
    use crate::core::{Py2PumlConfig, RawClass};
    use crate::diagnostics::ErrorKind;

    fn module(package: &str, classes: Vec<RawClass>) -> ClassifiedModule {
        let config = Py2PumlConfig::default();
        let mut module = ClassifiedModule::empty(format!("{}.py", package), package);
        module.classes = classes.iter().map(|c| classify_class(c, &config)).collect();
        module
    }

    #[test]
    fn test_edges_in_class_then_base_order() {
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module(
            "zoo",
            vec![
                RawClass::new("Dog").with_base("Animal").with_base("Pet"),
                RawClass::new("Cat").with_base("Animal"),
            ],
        )))
        .unwrap();

        let edges: Vec<_> = db
            .edges()
            .map(|e| (e.child.as_str(), e.parent.as_str()))
            .collect();
        assert_eq!(
            edges,
            vec![("Dog", "Animal"), ("Dog", "Pet"), ("Cat", "Animal")]
        );
    }

    #[test]
    fn test_duplicate_bases_are_kept() {
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module(
            "m",
            vec![RawClass::new("C").with_base("B").with_base("B")],
        )))
        .unwrap();
        assert_eq!(db.edge_count(), 2);
    }

    #[test]
    fn test_package_lookup() {
        let mut db = DiagramDatabase::new("src");
        let failed = ModulePackage::new(module("bad", vec![]))
            .with_errors(ErrorRecord::new("bad.py", ErrorKind::Syntax, "boom"));
        db.add_package(failed).unwrap();
        db.add_package(ModulePackage::new(module("good", vec![])))
            .unwrap();

        assert_eq!(db.node_count(), 2);
        assert!(db.get_node("bad").map(|p| p.is_failed()).unwrap_or(false));
        assert!(!db.get_node("good").map(|p| p.is_failed()).unwrap_or(true));
        assert!(db.get_node("other").is_none());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut db = DiagramDatabase::new("src");
        db.add_node(ModulePackage::new(module("a", vec![]))).unwrap();
        assert!(db.add_node(ModulePackage::new(module("a", vec![]))).is_err());
    }

    #[test]
    fn test_colliding_package_names_are_suffixed() {
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module("a.b", vec![RawClass::new("X")])))
            .unwrap();
        db.add_package(ModulePackage::new(module("a.b", vec![RawClass::new("Y")])))
            .unwrap();
        db.add_package(ModulePackage::new(module("a.b", vec![]))).unwrap();

        let names: Vec<&str> = db.nodes().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a.b", "a.b (2)", "a.b (3)"]);
        assert_eq!(db.get_package("a.b (2)").unwrap().module.classes[0].name, "Y");
    }

    #[test]
    fn test_clear() {
        let mut db = DiagramDatabase::new("src");
        db.add_package(ModulePackage::new(module(
            "a",
            vec![RawClass::new("X").with_base("Y")],
        )))
        .unwrap();
        db.clear();
        assert!(db.is_empty());
        assert_eq!(db.edge_count(), 0);
    }
}
