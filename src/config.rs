//! Run configuration.
//!
//! Values come from an optional TOML file; command-line flags are applied on
//! top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::accumulator::CategoryOrder;
use crate::domain::relevance::{KeywordFilter, MatchScope, RelevanceFilter, TargetFilter};
use crate::error::{Result, VizError};
use crate::infrastructure::Algorithm;

pub const DEFAULT_OUTPUT: &str = "callgraph.html";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VizConfig {
    /// Where the HTML page is written.
    pub output: PathBuf,
    pub algorithm: Algorithm,
    pub category_order: CategoryOrder,
    pub match_scope: MatchScope,
    /// Switches to the single-keyword policy when set.
    pub keyword: Option<String>,
    pub stop_at_first_miss: bool,
    /// Custom page template; the bundled one is used otherwise.
    pub template: Option<PathBuf>,
    /// Pre-computed edge list read instead of running the analysis.
    pub edges: Option<PathBuf>,
    /// Module directory the analysis runs in.
    pub module_dir: Option<PathBuf>,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            algorithm: Algorithm::default(),
            category_order: CategoryOrder::default(),
            match_scope: MatchScope::default(),
            keyword: None,
            stop_at_first_miss: false,
            template: None,
            edges: None,
            module_dir: None,
        }
    }
}

impl VizConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| VizError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| VizError::io(path, e))?;
        Self::from_toml_str(&text).map_err(|e| match e {
            VizError::Config(msg) => VizError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// The relevance policy this configuration selects for `targets`.
    pub fn relevance_filter(&self, targets: &[String]) -> Box<dyn RelevanceFilter> {
        match &self.keyword {
            Some(keyword) => Box::new(
                KeywordFilter::new(keyword.clone(), self.match_scope)
                    .stop_at_first_miss(self.stop_at_first_miss),
            ),
            None => Box::new(TargetFilter::new(targets.iter().cloned(), self.match_scope)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::callgraph::CallEdge;

    #[test]
    fn test_defaults() {
        let config = VizConfig::from_toml_str("").unwrap();
        assert_eq!(config, VizConfig::default());
        assert_eq!(config.output, PathBuf::from("callgraph.html"));
        assert_eq!(config.category_order, CategoryOrder::Alphabetical);
        assert_eq!(config.match_scope, MatchScope::Edge);
        assert_eq!(config.algorithm, Algorithm::Vta);
    }

    #[test]
    fn test_parse_full() {
        let config = VizConfig::from_toml_str(
            r#"
            output = "out/graph.html"
            algorithm = "rta"
            category_order = "first-seen"
            match_scope = "callee"
            keyword = "bookmark"
            stop_at_first_miss = true
            template = "page.html"
            edges = "edges.tsv"
            module_dir = "../service"
            "#,
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("out/graph.html"));
        assert_eq!(config.algorithm, Algorithm::Rta);
        assert_eq!(config.category_order, CategoryOrder::FirstSeen);
        assert_eq!(config.match_scope, MatchScope::Callee);
        assert_eq!(config.keyword.as_deref(), Some("bookmark"));
        assert!(config.stop_at_first_miss);
        assert_eq!(config.template, Some(PathBuf::from("page.html")));
        assert_eq!(config.edges, Some(PathBuf::from("edges.tsv")));
        assert_eq!(config.module_dir, Some(PathBuf::from("../service")));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = VizConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, VizError::Config(_)));
    }

    #[test]
    fn test_relevance_filter_selection() {
        let targets = vec!["pkg".to_string()];
        let edge = CallEdge::new("main.main", "pkg.A");

        let config = VizConfig::default();
        let filter = config.relevance_filter(&targets);
        assert!(filter.is_relevant(&edge));
        assert!(!filter.stops_at_first_miss());

        let config = VizConfig {
            keyword: Some("bookmark".to_string()),
            stop_at_first_miss: true,
            ..VizConfig::default()
        };
        let filter = config.relevance_filter(&targets);
        assert!(!filter.is_relevant(&edge));
        assert!(filter.stops_at_first_miss());
    }
}
