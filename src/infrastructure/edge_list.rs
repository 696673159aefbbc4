use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use super::go_callgraph::parse_edge_lines;
use crate::domain::callgraph::CallGraph;
use crate::error::{Result, VizError};
use crate::ports::CallGraphSource;

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    caller: String,
    callee: String,
}

/// Reads a previously saved call graph instead of running the analysis.
///
/// `.json` files hold `[{"caller": ..., "callee": ...}]`; anything else is
/// read as the tab-separated listing the `callgraph` tool prints.
pub struct EdgeListLoader {
    path: PathBuf,
}

impl EdgeListLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}

impl CallGraphSource for EdgeListLoader {
    /// The entry is already baked into the file and is not consulted.
    fn load(&self, _entry: &str) -> Result<CallGraph> {
        let text = fs::read_to_string(&self.path).map_err(|e| VizError::io(&self.path, e))?;
        let origin = self.path.display().to_string();

        let graph = if self.is_json() {
            let records: Vec<EdgeRecord> = serde_json::from_str(&text).map_err(|e| VizError::MalformedEdge {
                origin: origin.clone(),
                line: e.line(),
                content: e.to_string(),
            })?;
            let mut graph = CallGraph::default();
            for (idx, record) in records.iter().enumerate() {
                let (caller, callee) = (record.caller.trim(), record.callee.trim());
                if caller.is_empty() || callee.is_empty() {
                    // records are numbered from 1, like TSV lines
                    return Err(VizError::MalformedEdge {
                        origin,
                        line: idx + 1,
                        content: format!("{caller} --> {callee}"),
                    });
                }
                graph.add_edge(caller, callee);
            }
            graph
        } else {
            parse_edge_lines(&text, &origin)?
        };

        info!(
            path = %origin,
            functions = graph.nodes().len(),
            edges = graph.edge_count(),
            "call graph loaded from file"
        );
        Ok(graph)
    }
}
