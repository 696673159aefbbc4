use std::path::Path;

use crate::domain::callgraph::CallGraph;
use crate::domain::graph_model::GraphModel;
use crate::error::Result;

pub mod html_exporter;

/// Produces a whole-program call graph for an entry package.
pub trait CallGraphSource {
    fn load(&self, entry: &str) -> Result<CallGraph>;
}

/// Persists a finished graph model.
pub trait GraphExporter {
    fn export(&self, model: &GraphModel, path: &Path) -> Result<()>;
}
