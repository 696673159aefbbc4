pub mod accumulator;
pub mod callgraph;
pub mod graph_model;
pub mod relevance;
pub mod symbol;
