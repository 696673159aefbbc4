//! Relevance Filters
//!
//! Predicates selecting which call-graph edges make it into the visual graph.

use serde::{Deserialize, Serialize};

use crate::domain::callgraph::CallEdge;

/// Where a needle is searched for on an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchScope {
    /// The whole edge text, `caller --> callee`.
    #[default]
    Edge,
    Caller,
    Callee,
    /// Caller and callee must each contain a needle.
    Both,
}

impl MatchScope {
    /// Parse from CLI input.
    pub fn from_str(s: &str) -> Option<MatchScope> {
        match s.to_lowercase().as_str() {
            "edge" => Some(MatchScope::Edge),
            "caller" => Some(MatchScope::Caller),
            "callee" => Some(MatchScope::Callee),
            "both" | "endpoints" => Some(MatchScope::Both),
            _ => None,
        }
    }

    fn matches(self, edge: &CallEdge<'_>, hit: impl Fn(&str) -> bool) -> bool {
        match self {
            MatchScope::Edge => hit(edge.to_string().as_str()),
            MatchScope::Caller => hit(edge.caller()),
            MatchScope::Callee => hit(edge.callee()),
            MatchScope::Both => hit(edge.caller()) && hit(edge.callee()),
        }
    }
}

/// Decides whether an edge belongs in the output graph.
pub trait RelevanceFilter {
    fn is_relevant(&self, edge: &CallEdge<'_>) -> bool;

    /// When true, scanning a node's outgoing edges stops at the first
    /// irrelevant one.
    fn stops_at_first_miss(&self) -> bool {
        false
    }
}

impl<F> RelevanceFilter for F
where
    F: Fn(&CallEdge<'_>) -> bool,
{
    fn is_relevant(&self, edge: &CallEdge<'_>) -> bool {
        self(edge)
    }
}

/// Keeps edges mentioning any of the target substrings (OR across targets).
#[derive(Debug, Clone)]
pub struct TargetFilter {
    targets: Vec<String>,
    scope: MatchScope,
}

impl TargetFilter {
    pub fn new<I, S>(targets: I, scope: MatchScope) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            scope,
        }
    }
}

impl RelevanceFilter for TargetFilter {
    fn is_relevant(&self, edge: &CallEdge<'_>) -> bool {
        self.scope.matches(edge, |text| {
            self.targets.iter().any(|t| text.contains(t.as_str()))
        })
    }
}

/// Keeps edges mentioning one fixed keyword.
///
/// With `stop_at_first_miss` the accumulator abandons a node's remaining
/// edges after the first miss. That is only correct when the analysis lists
/// relevant edges of a node contiguously, which it does not promise.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keyword: String,
    scope: MatchScope,
    stop_at_first_miss: bool,
}

impl KeywordFilter {
    pub fn new(keyword: impl Into<String>, scope: MatchScope) -> Self {
        Self {
            keyword: keyword.into(),
            scope,
            stop_at_first_miss: false,
        }
    }

    pub fn stop_at_first_miss(mut self, stop: bool) -> Self {
        self.stop_at_first_miss = stop;
        self
    }
}

impl RelevanceFilter for KeywordFilter {
    fn is_relevant(&self, edge: &CallEdge<'_>) -> bool {
        self.scope
            .matches(edge, |text| text.contains(self.keyword.as_str()))
    }

    fn stops_at_first_miss(&self) -> bool {
        self.stop_at_first_miss
    }
}
