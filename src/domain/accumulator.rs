//! Graph Accumulator
//!
//! Filters a raw call graph down to relevant edges and folds them into a
//! deduplicated [`GraphModel`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::callgraph::{CallEdge, CallGraph};
use crate::domain::graph_model::{Category, FunctionNode, GraphModel, Link};
use crate::domain::relevance::RelevanceFilter;
use crate::domain::symbol::declaring_scope;

/// How category indices are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryOrder {
    /// Numbered in first-seen order; nodes listed in observation order.
    FirstSeen,
    /// Sorted by name; nodes grouped by category, observation order within.
    #[default]
    Alphabetical,
}

impl CategoryOrder {
    /// Parse from CLI input.
    pub fn from_str(s: &str) -> Option<CategoryOrder> {
        match s.to_lowercase().as_str() {
            "first-seen" | "first_seen" | "seen" => Some(CategoryOrder::FirstSeen),
            "alphabetical" | "alpha" | "name" => Some(CategoryOrder::Alphabetical),
            _ => None,
        }
    }
}

/// Single-pass aggregation state. One instance per build.
#[derive(Debug, Default)]
pub struct GraphAccumulator {
    order: CategoryOrder,
    // symbol -> bucket it was filed under
    funcs: HashMap<String, usize>,
    // observation order of symbols
    observed: Vec<String>,
    buckets: Vec<String>,
    bucket_ids: HashMap<String, usize>,
    seen_links: HashSet<Link>,
    links: Vec<Link>,
}

impl GraphAccumulator {
    pub fn new(order: CategoryOrder) -> Self {
        Self {
            order,
            ..Default::default()
        }
    }

    /// Filter `graph` with `filter` and aggregate the survivors.
    pub fn build(graph: &CallGraph, filter: &dyn RelevanceFilter, order: CategoryOrder) -> GraphModel {
        let mut acc = Self::new(order);
        let stop_early = filter.stops_at_first_miss();
        let mut considered = 0usize;

        for node in graph.nodes() {
            for edge in node.out_edges() {
                considered += 1;
                if filter.is_relevant(&edge) {
                    acc.add_edge(&edge);
                } else if stop_early {
                    break;
                }
            }
        }

        debug!(
            considered,
            kept = acc.links.len(),
            functions = acc.observed.len(),
            "call graph filtered"
        );
        acc.finish()
    }

    /// Record one relevant edge.
    pub fn add_edge(&mut self, edge: &CallEdge<'_>) {
        self.keep_func(edge.caller());
        self.keep_func(edge.callee());

        let link = Link {
            source: edge.caller().to_string(),
            target: edge.callee().to_string(),
        };
        if !self.seen_links.contains(&link) {
            self.seen_links.insert(link.clone());
            self.links.push(link);
        }
    }

    fn keep_func(&mut self, symbol: &str) {
        if self.funcs.contains_key(symbol) {
            return;
        }

        let scope = declaring_scope(symbol);
        let bucket = match self.bucket_ids.get(scope) {
            Some(&id) => id,
            None => {
                let id = self.buckets.len();
                self.buckets.push(scope.to_string());
                self.bucket_ids.insert(scope.to_string(), id);
                id
            }
        };

        self.funcs.insert(symbol.to_string(), bucket);
        self.observed.push(symbol.to_string());
    }

    /// Assign final category indices and produce the model.
    pub fn finish(self) -> GraphModel {
        let Self {
            order,
            funcs,
            observed,
            buckets,
            links,
            ..
        } = self;

        // rank[bucket] = final category index
        let rank: Vec<usize> = match order {
            CategoryOrder::FirstSeen => (0..buckets.len()).collect(),
            CategoryOrder::Alphabetical => {
                let mut sorted: Vec<usize> = (0..buckets.len()).collect();
                sorted.sort_by(|&a, &b| buckets[a].cmp(&buckets[b]));
                let mut rank = vec![0; buckets.len()];
                for (pos, bucket) in sorted.into_iter().enumerate() {
                    rank[bucket] = pos;
                }
                rank
            }
        };

        let mut nodes: Vec<FunctionNode> = observed
            .into_iter()
            .map(|name| {
                let category = rank[funcs[&name]];
                FunctionNode { name, category }
            })
            .collect();
        if order == CategoryOrder::Alphabetical {
            // stable: observation order survives within a category
            nodes.sort_by_key(|n| n.category);
        }

        let mut categories = vec![Category { name: String::new() }; buckets.len()];
        for (bucket, name) in buckets.into_iter().enumerate() {
            categories[rank[bucket]] = Category { name };
        }

        GraphModel {
            nodes,
            links,
            categories,
        }
    }
}
