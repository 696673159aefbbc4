// Infrastructure implementations for Callgraph Viz.

pub mod edge_list;
pub mod go_callgraph;

pub use edge_list::EdgeListLoader;
pub use go_callgraph::{Algorithm, GoCallgraphRunner};
