use std::collections::HashSet;
use std::path::PathBuf;

use tantivy::collector::TopDocs;
use tantivy::query::{QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{doc, Index, IndexWriter, TantivyDocument, Term};
use tracing::{debug, info};

use lakeview_core::catalog::Catalog;
use lakeview_core::error::{Error, Result};
use lakeview_core::{Hit, KeywordField, NodeId, NodeTriple};

use crate::tantivy_utils::{self, build_schema, register_tokenizer};

const WRITER_BUDGET: usize = 50_000_000;

/// Tantivy index over the schema elements of the lake.
pub struct KeywordIndex {
	index: Index,
	nid: Field,
	db_name: Field,
	source_name: Field,
	column_name: Field,
	source_text: Field,
	column_text: Field,
	content: Field,
}

impl KeywordIndex {
	pub fn in_memory() -> Result<Self> {
		Self::with_index(Index::create_in_ram(build_schema()))
	}

	/// Fresh on-disk index; an existing directory is wiped first.
	pub fn create_in_dir(index_dir: PathBuf) -> Result<Self> {
		if index_dir.exists() { std::fs::remove_dir_all(&index_dir).map_err(Error::backend)?; }
		std::fs::create_dir_all(&index_dir).map_err(Error::backend)?;
		let index = Index::create_in_dir(&index_dir, build_schema()).map_err(Error::backend)?;
		Self::with_index(index)
	}

	fn with_index(index: Index) -> Result<Self> {
		register_tokenizer(&index);
		let schema = index.schema();
		let field = |name: &str| schema.get_field(name).map_err(Error::backend);
		Ok(Self {
			nid: field(tantivy_utils::NID)?,
			db_name: field(tantivy_utils::DB_NAME)?,
			source_name: field(tantivy_utils::SOURCE_NAME)?,
			column_name: field(tantivy_utils::COLUMN_NAME)?,
			source_text: field(tantivy_utils::SOURCE_TEXT)?,
			column_text: field(tantivy_utils::COLUMN_TEXT)?,
			content: field(tantivy_utils::CONTENT)?,
			index,
		})
	}

	/// Index every column named by the catalog, including edge endpoints.
	/// Returns the number of documents written.
	pub fn index_catalog(&self, catalog: &Catalog) -> Result<usize> {
		let mut writer: IndexWriter = self.index.writer(WRITER_BUDGET).map_err(Error::backend)?;
		let mut seen: HashSet<NodeId> = HashSet::new();
		let mut count = 0usize;
		let columns = catalog.columns.iter().map(|c| (c.triple(), c.values.join(" ")));
		let endpoints = catalog.edges.iter().flat_map(|e| [(e.from.clone(), String::new()), (e.to.clone(), String::new())]);
		for (triple, content) in columns.chain(endpoints) {
			if !seen.insert(triple.id()) { continue; }
			writer.add_document(self.document(&triple, &content)).map_err(Error::backend)?;
			count += 1;
		}
		writer.commit().map_err(Error::backend)?;
		info!(documents = count, "keyword index committed");
		Ok(count)
	}

	fn document(&self, triple: &NodeTriple, content: &str) -> TantivyDocument {
		doc!(
			self.nid => triple.id().0,
			self.db_name => triple.database.clone(),
			self.source_name => triple.source.clone(),
			self.column_name => triple.field.clone(),
			self.source_text => triple.source.clone(),
			self.column_text => triple.field.clone(),
			self.content => content.to_string(),
		)
	}

	fn text_field(&self, kind: KeywordField) -> Field {
		match kind {
			KeywordField::Table => self.source_text,
			KeywordField::Schema => self.column_text,
			KeywordField::Text => self.content,
		}
	}

	/// Top `limit` hits for `keyword` in the given field, best first.
	pub fn search(&self, keyword: &str, kind: KeywordField, limit: usize) -> Result<Vec<Hit>> {
		if limit == 0 { return Ok(Vec::new()); }
		let searcher = self.index.reader().map_err(Error::backend)?.searcher();
		let qp = QueryParser::for_index(&self.index, vec![self.text_field(kind)]);
		let q = qp.parse_query(keyword).map_err(|e| Error::InvalidArgument(format!("bad keyword '{}': {}", keyword, e)))?;
		let top_docs = searcher.search(&q, &TopDocs::with_limit(limit)).map_err(Error::backend)?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr).map_err(Error::backend)?;
			hits.push(self.hit_from(&doc, score)?);
		}
		debug!(keyword, ?kind, found = hits.len(), "keyword search");
		Ok(hits)
	}

	/// Stored `(source, column)` names of a node.
	pub fn readable_name(&self, id: NodeId) -> Result<(String, String)> {
		let searcher = self.index.reader().map_err(Error::backend)?.searcher();
		let q = TermQuery::new(Term::from_field_u64(self.nid, id.0), IndexRecordOption::Basic);
		let top = searcher.search(&q, &TopDocs::with_limit(1)).map_err(Error::backend)?;
		let (_, addr) = top.into_iter().next().ok_or_else(|| Error::NotFound(format!("node {}", id)))?;
		let doc: TantivyDocument = searcher.doc(addr).map_err(Error::backend)?;
		Ok((self.stored_str(&doc, self.source_name), self.stored_str(&doc, self.column_name)))
	}

	fn hit_from(&self, doc: &TantivyDocument, score: f32) -> Result<Hit> {
		let nid = doc.get_first(self.nid).and_then(|v| v.as_u64()).ok_or_else(|| Error::Backend("document without nid".into()))?;
		Ok(Hit::new(
			NodeId(nid),
			self.stored_str(doc, self.db_name),
			self.stored_str(doc, self.source_name),
			self.stored_str(doc, self.column_name),
			score,
		))
	}

	fn stored_str(&self, doc: &TantivyDocument, field: Field) -> String {
		doc.get_first(field).and_then(|v| v.as_str()).unwrap_or("").to_string()
	}
}
