// Application layer: load -> aggregate -> export.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::accumulator::{CategoryOrder, GraphAccumulator};
use crate::domain::graph_model::GraphModel;
use crate::domain::relevance::RelevanceFilter;
use crate::error::Result;
use crate::ports::{CallGraphSource, GraphExporter};

/// The main usecase: analyze an entry package and export its visual graph.
pub struct VisualizeUsecase<'a> {
    pub source: &'a dyn CallGraphSource,
    pub exporter: &'a dyn GraphExporter,
}

impl<'a> VisualizeUsecase<'a> {
    pub fn run(
        &self,
        entry: &str,
        filter: &dyn RelevanceFilter,
        order: CategoryOrder,
        output: &Path,
    ) -> Result<GraphModel> {
        let cg = self.source.load(entry)?;
        let model = GraphAccumulator::build(&cg, filter, order);

        let violations = model.integrity_violations();
        if !violations.is_empty() {
            warn!(count = violations.len(), first = ?violations[0], "graph model integrity violated");
        }
        if model.is_empty() {
            warn!(entry, "no call edges matched the relevance filter");
        }
        info!(
            nodes = model.nodes.len(),
            links = model.links.len(),
            categories = model.categories.len(),
            "graph model built"
        );

        self.exporter.export(&model, output)?;
        Ok(model)
    }
}
