use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use tracing::info;

use lakeview_algebra::{Algebra, Input};
use lakeview_core::catalog::CatalogLoader;
use lakeview_core::config::{expand_path, Config};
use lakeview_core::{Drs, NodeTriple, Relation, Scope};
use lakeview_graph::InMemoryGraph;
use lakeview_text::TantivyKeywordStore;

const USAGE: &str = "Usage: lakeview [explain] <command> [args...]

Commands:
  search <keyword> [source|field|content] [max_results]
  neighbors <node> <relation>
  traverse <node> <relation> [max_hops]
  paths <relation> <node> [<node>] [max_hops]

A node is a numeric id or a `database:source:field` triple. With three
arguments, `paths` reads the last one as max_hops unless it is a triple.
Relations: SCHEMA_SIM, CONTENT_SIM, PKFK, ...";

type Engine = Algebra<InMemoryGraph, TantivyKeywordStore>;

fn parse_args() -> (bool, String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let explain = args.first().is_some_and(|a| a == "explain");
    if explain {
        args.remove(0);
    }
    if args.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (explain, cmd, args)
}

fn node_arg(arg: &str) -> Input {
    match arg.split(':').collect::<Vec<_>>().as_slice() {
        [database, source, field] => Input::Triple(NodeTriple::new(*database, *source, *field)),
        _ => Input::Text(arg.to_string()),
    }
}

fn required<'a>(args: &'a [String], i: usize, what: &str) -> anyhow::Result<&'a str> {
    args.get(i).map(String::as_str).ok_or_else(|| anyhow!("missing <{}>\n\n{}", what, USAGE))
}

fn optional_usize(args: &[String], i: usize, default: usize) -> anyhow::Result<usize> {
    match args.get(i) {
        Some(v) => v.parse().with_context(|| format!("'{}' is not a number", v)),
        None => Ok(default),
    }
}

fn build_engine(config: &Config) -> anyhow::Result<Engine> {
    let catalog_dir: String = config.get("catalog.dir").unwrap_or_else(|_| "data/catalog".to_string());
    let catalog_dir = expand_path(catalog_dir);
    let catalog = CatalogLoader::new()
        .load_directory(&catalog_dir)
        .with_context(|| format!("loading catalog from {}", catalog_dir.display()))?;

    let graph = InMemoryGraph::from_catalog(&catalog)?;
    let store = match config.get::<String>("index.dir") {
        Ok(dir) => TantivyKeywordStore::create_in_dir(PathBuf::from(expand_path(dir)))?,
        Err(_) => TantivyKeywordStore::in_memory()?,
    };
    let indexed = store.index_catalog(&catalog)?;
    info!(dir = %catalog_dir.display(), columns = catalog.columns.len(), indexed, "catalog loaded");
    Ok(Algebra::with_settings(graph, store, config.algebra()?))
}

fn run(engine: &Engine, cmd: &str, args: &[String]) -> anyhow::Result<Drs> {
    let settings = engine.settings();
    let drs = match cmd {
        "search" => {
            let keyword = required(args, 0, "keyword")?;
            let scope: Scope = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(Scope::Content);
            let max_results = optional_usize(args, 2, settings.max_results)?;
            engine.keyword_search(keyword, scope, max_results)?
        }
        "neighbors" => {
            let node = node_arg(required(args, 0, "node")?);
            let relation: Relation = required(args, 1, "relation")?.parse()?;
            engine.neighbor_search(node, relation, None)?
        }
        "traverse" => {
            let node = node_arg(required(args, 0, "node")?);
            let relation: Relation = required(args, 1, "relation")?.parse()?;
            let max_hops = optional_usize(args, 2, settings.max_hops)?;
            engine.traverse(node, relation, max_hops)?
        }
        "paths" => {
            let relation: Relation = required(args, 0, "relation")?.parse()?;
            let a = node_arg(required(args, 1, "node")?);
            // a trailing number is the hop budget, not a node id
            let (b, hops_at) = match (args.get(2), args.get(3)) {
                (Some(b), Some(_)) => (Some(node_arg(b)), 3),
                (Some(b), None) if b.contains(':') => (Some(node_arg(b)), 3),
                _ => (None, 2),
            };
            let max_hops = optional_usize(args, hops_at, settings.max_hops)?;
            engine.paths(relation, a, b, max_hops)?
        }
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    };
    Ok(drs)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (explain, cmd, args) = parse_args();
    let engine = build_engine(&config)?;
    let drs = run(&engine, &cmd, &args)?;

    if explain {
        print!("{}", drs.explain());
    } else {
        println!("{}", serde_json::to_string_pretty(&drs)?);
    }
    Ok(())
}
