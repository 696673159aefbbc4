// Command-line entry point for Callgraph Viz.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use callgraph_viz::application::VisualizeUsecase;
use callgraph_viz::config::VizConfig;
use callgraph_viz::domain::accumulator::CategoryOrder;
use callgraph_viz::domain::relevance::MatchScope;
use callgraph_viz::infrastructure::{Algorithm, EdgeListLoader, GoCallgraphRunner};
use callgraph_viz::ports::html_exporter::{HtmlExporter, HtmlTemplate};
use callgraph_viz::ports::CallGraphSource;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target package(s); edges mentioning any of them are kept
    #[arg(required = true, value_name = "PACKAGE")]
    targets: Vec<String>,

    /// Output HTML file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Package to analyze (defaults to the first target)
    #[arg(long)]
    entry: Option<String>,

    /// Read a saved edge list (TSV or .json) instead of running the analysis
    #[arg(long, value_name = "FILE")]
    edges: Option<PathBuf>,

    /// Directory of the Go module to analyze
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Call graph algorithm (static, cha, rta, vta)
    #[arg(long)]
    algo: Option<String>,

    /// Category ordering (alphabetical, first-seen)
    #[arg(long)]
    order: Option<String>,

    /// What a target is matched against (edge, caller, callee, both)
    #[arg(long = "match")]
    match_scope: Option<String>,

    /// Keep only edges containing this keyword (ignores targets for filtering)
    #[arg(long)]
    keyword: Option<String>,

    /// With --keyword, stop scanning a function's calls at the first miss
    #[arg(long, default_value_t = false)]
    stop_at_first_miss: bool,

    /// Custom HTML template with a //start-sub ... //end-sub region
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    /// Layer command-line flags over the file configuration.
    fn apply(&self, mut config: VizConfig) -> Result<VizConfig> {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(edges) = &self.edges {
            config.edges = Some(edges.clone());
        }
        if let Some(dir) = &self.dir {
            config.module_dir = Some(dir.clone());
        }
        if let Some(algo) = &self.algo {
            config.algorithm = Algorithm::from_str(algo)
                .ok_or_else(|| anyhow!("Unknown algorithm: {algo}. Use 'static', 'cha', 'rta' or 'vta'"))?;
        }
        if let Some(order) = &self.order {
            config.category_order = CategoryOrder::from_str(order)
                .ok_or_else(|| anyhow!("Unknown category order: {order}. Use 'alphabetical' or 'first-seen'"))?;
        }
        if let Some(scope) = &self.match_scope {
            config.match_scope = MatchScope::from_str(scope)
                .ok_or_else(|| anyhow!("Unknown match scope: {scope}. Use 'edge', 'caller', 'callee' or 'both'"))?;
        }
        if let Some(keyword) = &self.keyword {
            config.keyword = Some(keyword.clone());
        }
        if self.stop_at_first_miss {
            config.stop_at_first_miss = true;
        }
        if let Some(template) = &self.template {
            config.template = Some(template.clone());
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => VizConfig::load(path).context("Failed to load configuration")?,
        None => VizConfig::default(),
    };
    let config = cli.apply(file_config)?;

    // Resolve the template before the (slow) analysis so a bad one fails fast.
    let template = match &config.template {
        Some(path) => HtmlTemplate::from_file(path)
            .with_context(|| format!("Failed to load template {}", path.display()))?,
        None => HtmlTemplate::bundled().context("Bundled template is invalid")?,
    };

    let source: Box<dyn CallGraphSource> = match &config.edges {
        Some(path) => Box::new(EdgeListLoader::new(path)),
        None => {
            let runner = GoCallgraphRunner::new(config.algorithm);
            match &config.module_dir {
                Some(dir) => Box::new(runner.in_dir(dir)),
                None => Box::new(runner),
            }
        }
    };
    let exporter = HtmlExporter::new(template);
    let filter = config.relevance_filter(&cli.targets);
    let entry = cli.entry.as_deref().unwrap_or(&cli.targets[0]);

    let usecase = VisualizeUsecase {
        source: source.as_ref(),
        exporter: &exporter,
    };
    let model = usecase
        .run(entry, filter.as_ref(), config.category_order, &config.output)
        .with_context(|| format!("Failed to visualize {entry}"))?;

    println!(
        "Call graph written to {} ({} functions, {} calls, {} packages)",
        config.output.display(),
        model.nodes.len(),
        model.links.len(),
        model.categories.len()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
