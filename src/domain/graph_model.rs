//! Graph Model
//!
//! The deduplicated node/link/category graph handed to the HTML view.
//! Field names match what the page script reads: `nodes[].name`,
//! `nodes[].category`, `links[].source`, `links[].target`, `categories[].name`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A unique function in the filtered graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    /// Index into [`GraphModel::categories`].
    pub category: usize,
}

/// A unique directed call between two function nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

/// A package (or type owner) grouping of function nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<FunctionNode>,
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
}

/// A broken reference inside a [`GraphModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    DuplicateNode(String),
    DuplicateLink(Link),
    DanglingLink(Link),
    CategoryOutOfRange { node: String, category: usize },
}

impl GraphModel {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.categories.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Check uniqueness and referential integrity. Returns every violation found.
    pub fn integrity_violations(&self) -> Vec<IntegrityViolation> {
        let mut violations = Vec::new();

        let mut names = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !names.insert(node.name.as_str()) {
                violations.push(IntegrityViolation::DuplicateNode(node.name.clone()));
            }
            if node.category >= self.categories.len() {
                violations.push(IntegrityViolation::CategoryOutOfRange {
                    node: node.name.clone(),
                    category: node.category,
                });
            }
        }

        let mut links = HashSet::with_capacity(self.links.len());
        for link in &self.links {
            if !links.insert(link) {
                violations.push(IntegrityViolation::DuplicateLink(link.clone()));
            }
            if !names.contains(link.source.as_str()) || !names.contains(link.target.as_str()) {
                violations.push(IntegrityViolation::DanglingLink(link.clone()));
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, category: usize) -> FunctionNode {
        FunctionNode {
            name: name.to_string(),
            category,
        }
    }

    fn link(source: &str, target: &str) -> Link {
        Link {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let model = GraphModel {
            nodes: vec![node("pkg.A", 0)],
            links: vec![link("pkg.A", "pkg.A")],
            categories: vec![Category {
                name: "pkg".to_string(),
            }],
        };
        assert_eq!(
            model.to_json().unwrap(),
            r#"{"nodes":[{"name":"pkg.A","category":0}],"links":[{"source":"pkg.A","target":"pkg.A"}],"categories":[{"name":"pkg"}]}"#
        );
    }

    #[test]
    fn test_empty_model_json() {
        let model = GraphModel::default();
        assert!(model.is_empty());
        assert_eq!(model.to_json().unwrap(), r#"{"nodes":[],"links":[],"categories":[]}"#);
    }

    #[test]
    fn test_integrity_violations() {
        let model = GraphModel {
            nodes: vec![node("pkg.A", 0), node("pkg.A", 3)],
            links: vec![link("pkg.A", "pkg.Z"), link("pkg.A", "pkg.Z")],
            categories: vec![Category {
                name: "pkg".to_string(),
            }],
        };
        let violations = model.integrity_violations();
        assert!(violations.contains(&IntegrityViolation::DuplicateNode("pkg.A".to_string())));
        assert!(violations.contains(&IntegrityViolation::CategoryOutOfRange {
            node: "pkg.A".to_string(),
            category: 3
        }));
        assert!(violations.contains(&IntegrityViolation::DuplicateLink(link("pkg.A", "pkg.Z"))));
        assert!(violations.contains(&IntegrityViolation::DanglingLink(link("pkg.A", "pkg.Z"))));
    }
}
