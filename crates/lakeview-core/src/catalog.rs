//! Profiled lake catalog: the columns and typed edges the reference facades
//! are built from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{Hit, NodeTriple, Relation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    pub database: String,
    pub source: String,
    pub field: String,
    /// Sample values, indexed for content lookups.
    #[serde(default)]
    pub values: Vec<String>,
}

impl CatalogColumn {
    pub fn triple(&self) -> NodeTriple {
        NodeTriple::new(self.database.clone(), self.source.clone(), self.field.clone())
    }

    pub fn hit(&self) -> Hit {
        Hit::from_triple(&self.triple(), 0.0)
    }
}

fn default_score() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEdge {
    pub from: NodeTriple,
    pub to: NodeTriple,
    pub relation: Relation,
    #[serde(default = "default_score")]
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub columns: Vec<CatalogColumn>,
    #[serde(default)]
    pub edges: Vec<CatalogEdge>,
}

impl Catalog {
    pub fn merge(&mut self, other: Catalog) {
        self.columns.extend(other.columns);
        self.edges.extend(other.edges);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.edges.is_empty()
    }
}

#[derive(Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self { Self }

    pub fn load_file(&self, path: &Path) -> Result<Catalog> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing catalog {}", path.display()))
    }

    /// Concatenate every `*.json` catalog under `dir`, in path order.
    pub fn load_directory(&self, dir: &Path) -> Result<Catalog> {
        let files = self.list_json_files(dir);
        let mut catalog = Catalog::default();
        if files.is_empty() {
            info!(dir = %dir.display(), "no catalog files found");
            return Ok(catalog);
        }
        for (file_index, path) in files.iter().enumerate() {
            debug!(file = %path.display(), "loading catalog {}/{}", file_index + 1, files.len());
            catalog.merge(self.load_file(path)?);
        }
        info!(files = files.len(), columns = catalog.columns.len(), edges = catalog.edges.len(), "catalog loaded");
        Ok(catalog)
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
            .map(|e| e.path().to_path_buf())
            .collect();
        json_files.sort();
        json_files
    }
}
