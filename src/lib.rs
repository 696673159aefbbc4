// Main library entry point for Callgraph Viz.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use error::{Result, VizError};
