//! HTML Exporter
//!
//! Splices a serialized GraphModel into an HTML page template and writes it.

use std::fs;
use std::io::Write;
use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::info;

use crate::domain::graph_model::GraphModel;
use crate::error::{Result, VizError};
use crate::ports::GraphExporter;

/// Bundled force-directed view.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../assets/graph.html");

pub const START_MARKER: &str = "//start-sub";
pub const END_MARKER: &str = "//end-sub";

/// A page template holding exactly one `//start-sub ... //end-sub` region.
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    source: String,
    placeholder: Regex,
}

impl HtmlTemplate {
    /// Fails with [`VizError::MarkersNotFound`] if the region is absent.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let placeholder = Regex::new(&format!(
            "(?s){}.*{}",
            regex::escape(START_MARKER),
            regex::escape(END_MARKER)
        ))?;
        if !placeholder.is_match(&source) {
            return Err(VizError::MarkersNotFound);
        }
        Ok(Self {
            source,
            placeholder,
        })
    }

    /// The page shipped with the binary.
    pub fn bundled() -> Result<Self> {
        Self::new(DEFAULT_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| VizError::io(path, e))?;
        Self::new(source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the marker region, markers included, with `payload` verbatim.
    pub fn splice(&self, payload: &str) -> String {
        self.placeholder
            .replace(&self.source, NoExpand(payload))
            .into_owned()
    }
}

pub struct HtmlExporter {
    template: HtmlTemplate,
}

impl HtmlExporter {
    pub fn new(template: HtmlTemplate) -> Self {
        Self { template }
    }

    /// Render the full page in memory.
    pub fn render_to_string(&self, model: &GraphModel) -> Result<String> {
        let payload = model.to_json()?;
        Ok(self.template.splice(&script_safe(&payload)))
    }
}

/// Escape characters that could end or break an inline `<script>` block.
/// The output is still valid JSON and a valid JavaScript literal.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

impl GraphExporter for HtmlExporter {
    /// Writes through a temp file in the target directory and renames it
    /// into place, so a failure never leaves a partial page behind.
    fn export(&self, model: &GraphModel, path: &Path) -> Result<()> {
        let html = self.render_to_string(model)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| VizError::io(dir, e))?;
        tmp.write_all(html.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| VizError::io(tmp.path(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(|e| VizError::io(tmp.path(), e))?;
        }

        tmp.persist(path).map_err(|e| VizError::io(path, e.error))?;

        info!(
            path = %path.display(),
            bytes = html.len(),
            nodes = model.nodes.len(),
            links = model.links.len(),
            "graph page written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accumulator::{CategoryOrder, GraphAccumulator};
    use crate::domain::callgraph::CallGraph;
    use crate::domain::graph_model::{Category, FunctionNode, Link};
    use crate::domain::relevance::{MatchScope, TargetFilter};

    #[test]
    fn test_splice_replaces_region() {
        let template = HtmlTemplate::new("<head>//start-sub PLACEHOLDER //end-sub<tail>").unwrap();
        assert_eq!(template.splice(r#"{"nodes":[]}"#), r#"<head>{"nodes":[]}<tail>"#);
    }

    #[test]
    fn test_splice_spans_lines() {
        let template =
            HtmlTemplate::new("const data = //start-sub\n{ demo: true,\n  more: 1 }\n//end-sub;\n").unwrap();
        assert_eq!(template.splice("{}"), "const data = {};\n");
    }

    #[test]
    fn test_payload_dollar_signs_are_literal() {
        let template = HtmlTemplate::new("a//start-sub x //end-subb").unwrap();
        assert_eq!(template.splice(r#"{"name":"$1 ${x}"}"#), r#"a{"name":"$1 ${x}"}b"#);
    }

    #[test]
    fn test_missing_markers_is_error() {
        assert!(matches!(HtmlTemplate::new("<html></html>"), Err(VizError::MarkersNotFound)));
        assert!(matches!(
            HtmlTemplate::new("//end-sub before //start-sub"),
            Err(VizError::MarkersNotFound)
        ));
    }

    #[test]
    fn test_default_template_is_valid() {
        let template = HtmlTemplate::bundled().unwrap();
        assert!(template.source().contains(START_MARKER));
        let page = HtmlExporter::new(template).render_to_string(&GraphModel::default()).unwrap();
        assert!(page.contains(r#"{"nodes":[],"links":[],"categories":[]}"#));
        assert!(!page.contains(START_MARKER));
        assert!(!page.contains(END_MARKER));
    }

    #[test]
    fn test_symbols_cannot_close_the_script_block() {
        let callee = r#"pkg.F[struct{X int "</script><script>alert(1)</script>"}]"#;
        let graph: CallGraph = [("main.main", callee), ("pkg.G", "pkg.H\u{2028}&co")]
            .into_iter()
            .collect();
        let model = GraphAccumulator::build(
            &graph,
            &TargetFilter::new(["pkg"], MatchScope::Edge),
            CategoryOrder::FirstSeen,
        );

        let template = HtmlTemplate::bundled().unwrap();
        let closing = template.source().matches("</script>").count();
        let page = HtmlExporter::new(template).render_to_string(&model).unwrap();

        assert_eq!(page.matches("</script>").count(), closing);
        assert!(!page.contains("<script>alert"));
        assert!(!page.contains('\u{2028}'));
        assert!(page.contains(r"\u003c/script\u003e"));
    }

    #[test]
    fn test_escaped_payload_is_same_json() {
        let model = GraphModel {
            nodes: vec![FunctionNode {
                name: "a<b>&c\u{2029}".to_string(),
                category: 0,
            }],
            links: vec![],
            categories: vec![Category {
                name: "a".to_string(),
            }],
        };
        let exporter = HtmlExporter::new(HtmlTemplate::new("//start-sub//end-sub").unwrap());
        let page = exporter.render_to_string(&model).unwrap();
        assert_eq!(page, r#"{"nodes":[{"name":"a\u003cb\u003e\u0026c\u2029","category":0}],"links":[],"categories":[{"name":"a"}]}"#);
        assert_eq!(serde_json::from_str::<GraphModel>(&page).unwrap(), model);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("graph.html");
        fs::write(&out, "stale").unwrap();

        let model = GraphModel {
            nodes: vec![FunctionNode {
                name: "pkg.A".to_string(),
                category: 0,
            }],
            links: vec![Link {
                source: "pkg.A".to_string(),
                target: "pkg.A".to_string(),
            }],
            categories: vec![Category {
                name: "pkg".to_string(),
            }],
        };
        let exporter = HtmlExporter::new(HtmlTemplate::new("<p>//start-sub//end-sub</p>").unwrap());
        exporter.export(&model, &out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, format!("<p>{}</p>", model.to_json().unwrap()));
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no/such/dir/graph.html");
        let err = HtmlExporter::new(HtmlTemplate::bundled().unwrap())
            .export(&GraphModel::default(), &out)
            .unwrap_err();
        assert!(matches!(err, VizError::Io { .. }));
        assert!(!out.exists());
    }
}
