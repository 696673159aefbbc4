// Call graph structures consumed from the external analysis.
// Represents function-level "may call" relationships.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

/// A node in the call graph.
#[derive(Debug, Clone)]
pub struct CallGraphNode {
    pub id: String,           // fully-qualified function symbol
    pub callees: Vec<String>, // symbols this node calls, in analysis order
}

impl CallGraphNode {
    /// Outgoing edges of this node, in the order the analysis reported them.
    pub fn out_edges(&self) -> impl Iterator<Item = CallEdge<'_>> {
        self.callees.iter().map(move |callee| CallEdge {
            caller: &self.id,
            callee,
        })
    }
}

/// One observed caller -> callee relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallEdge<'a> {
    caller: &'a str,
    callee: &'a str,
}

impl<'a> CallEdge<'a> {
    pub fn new(caller: &'a str, callee: &'a str) -> Self {
        Self { caller, callee }
    }

    pub fn caller(&self) -> &'a str {
        self.caller
    }

    pub fn callee(&self) -> &'a str {
        self.callee
    }
}

/// Textual form used for substring relevance checks: `caller --> callee`.
impl fmt::Display for CallEdge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.caller, self.callee)
    }
}

/// The call graph itself. Nodes keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    nodes: Vec<CallGraphNode>,
    index: HashMap<String, usize>,
}

impl CallGraph {
    /// Nodes sharing an id are merged, callees appended in order.
    pub fn new(nodes: Vec<CallGraphNode>) -> Self {
        let mut graph = CallGraph::default();
        for node in nodes {
            let idx = graph.node_index(&node.id);
            for callee in node.callees {
                graph.node_index(&callee);
                graph.nodes[idx].callees.push(callee);
            }
        }
        graph
    }

    pub fn nodes(&self) -> &[CallGraphNode] {
        &self.nodes
    }

    /// Record `caller -> callee`, creating either node on first mention.
    pub fn add_edge(&mut self, caller_id: &str, callee_id: &str) {
        if caller_id.is_empty() || callee_id.is_empty() {
            warn!(caller = caller_id, callee = callee_id, "skipping edge with empty symbol");
            return;
        }
        let caller = self.node_index(caller_id);
        self.node_index(callee_id);
        self.nodes[caller].callees.push(callee_id.to_string());
    }

    fn node_index(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(CallGraphNode {
            id: id.to_string(),
            callees: Vec::new(),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    pub fn node(&self, id: &str) -> Option<&CallGraphNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Every edge of every node, node by node.
    pub fn edges(&self) -> impl Iterator<Item = CallEdge<'_>> {
        self.nodes.iter().flat_map(|n| n.out_edges())
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.callees.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, S)> for CallGraph {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        let mut graph = CallGraph::default();
        for (caller, callee) in iter {
            graph.add_edge(caller.as_ref(), callee.as_ref());
        }
        graph
    }
}
