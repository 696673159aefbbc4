//! Go Call Graph Runner.
//!
//! Runs the `callgraph` tool from golang.org/x/tools over an entry package
//! and reads its tab-separated caller/callee listing into a CallGraph.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::callgraph::CallGraph;
use crate::error::{Result, VizError};
use crate::ports::CallGraphSource;

pub const CALLGRAPH_PROGRAM: &str = "callgraph";

/// One edge per line: caller symbol, tab, callee symbol.
pub const EDGE_FORMAT: &str = "{{.Caller}}\t{{.Callee}}";

const INSTALL_HINT: &str =
    "Install it with: go install golang.org/x/tools/cmd/callgraph@latest";

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

/// Call graph construction algorithm offered by the tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Static,
    Cha,
    Rta,
    /// Variable type analysis; whole-program and needs a main package.
    #[default]
    Vta,
}

impl Algorithm {
    /// Parse from CLI input.
    pub fn from_str(s: &str) -> Option<Algorithm> {
        match s.to_lowercase().as_str() {
            "static" => Some(Algorithm::Static),
            "cha" => Some(Algorithm::Cha),
            "rta" => Some(Algorithm::Rta),
            "vta" => Some(Algorithm::Vta),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Static => "static",
            Algorithm::Cha => "cha",
            Algorithm::Rta => "rta",
            Algorithm::Vta => "vta",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Call graph source backed by the external `callgraph` binary.
#[derive(Debug, Clone, Default)]
pub struct GoCallgraphRunner {
    algorithm: Algorithm,
    work_dir: Option<PathBuf>,
}

impl GoCallgraphRunner {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            work_dir: None,
        }
    }

    /// Directory holding the module to analyze (defaults to the current one).
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn command_spec(&self, entry: &str) -> CommandSpec {
        CommandSpec {
            work_dir: self.work_dir.clone(),
            ..build_command_spec(self.algorithm, entry)
        }
    }
}

impl CallGraphSource for GoCallgraphRunner {
    fn load(&self, entry: &str) -> Result<CallGraph> {
        check_tool_available()?;

        let spec = self.command_spec(entry);
        info!(entry, algorithm = %self.algorithm, "running call graph analysis");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.work_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .map_err(|e| VizError::io(Path::new(&spec.program), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VizError::Analysis {
                entry: entry.to_string(),
                message: format!(
                    "{} exited with {:?}: {}",
                    spec.program,
                    output.status.code(),
                    stderr.trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let graph = parse_edge_lines(&stdout, CALLGRAPH_PROGRAM)?;
        info!(
            functions = graph.nodes().len(),
            edges = graph.edge_count(),
            "call graph loaded"
        );
        Ok(graph)
    }
}

/// Parse `caller<TAB>callee` lines. Blank lines are skipped; `origin` names
/// the input in errors.
pub fn parse_edge_lines(text: &str, origin: &str) -> Result<CallGraph> {
    let mut graph = CallGraph::default();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((caller, callee)) if !caller.trim().is_empty() && !callee.trim().is_empty() => {
                graph.add_edge(caller.trim(), callee.trim());
            }
            _ => {
                return Err(VizError::MalformedEdge {
                    origin: origin.to_string(),
                    line: idx + 1,
                    content: line.to_string(),
                })
            }
        }
    }
    Ok(graph)
}

// ═══════════════════════════════════════════════════════════════════════════
// Internal Implementation
// ═══════════════════════════════════════════════════════════════════════════

fn check_tool_available() -> Result<()> {
    match Command::new(CALLGRAPH_PROGRAM).arg("-help").output() {
        // the tool prints usage and exits non-zero on -help; running at all is enough
        Ok(_) => {
            debug!(program = CALLGRAPH_PROGRAM, "analysis tool found");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VizError::ToolNotFound {
            program: CALLGRAPH_PROGRAM.to_string(),
            hint: INSTALL_HINT,
        }),
        Err(e) => Err(VizError::io(Path::new(CALLGRAPH_PROGRAM), e)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the command that would be run, without running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: Option<PathBuf>,
}

pub fn build_command_spec(algorithm: Algorithm, entry: &str) -> CommandSpec {
    CommandSpec {
        program: CALLGRAPH_PROGRAM.to_string(),
        args: vec![
            format!("-algo={}", algorithm.name()),
            format!("-format={}", EDGE_FORMAT),
            entry.to_string(),
        ],
        work_dir: None,
    }
}
