use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const TOKENIZER: &str = "lake_text";

pub const NID: &str = "nid";
pub const DB_NAME: &str = "db_name";
pub const SOURCE_NAME: &str = "source_name";
pub const COLUMN_NAME: &str = "column_name";
pub const SOURCE_TEXT: &str = "source_text";
pub const COLUMN_TEXT: &str = "column_text";
pub const CONTENT: &str = "content";

/// One document per column. Names are stored verbatim and indexed again
/// through the tokenizer so `customer_id` matches `customer`.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_u64_field(NID, INDEXED | STORED | FAST);
	schema_builder.add_text_field(DB_NAME, STRING | STORED);
	schema_builder.add_text_field(SOURCE_NAME, STRING | STORED);
	schema_builder.add_text_field(COLUMN_NAME, STRING | STORED);
	let name_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqs);
	schema_builder.add_text_field(SOURCE_TEXT, TextOptions::default().set_indexing_options(name_indexing.clone()));
	schema_builder.add_text_field(COLUMN_TEXT, TextOptions::default().set_indexing_options(name_indexing));
	let content_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	schema_builder.add_text_field(CONTENT, TextOptions::default().set_indexing_options(content_indexing));
	schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
	let stop_words = vec![
		"a","an","and","are","as","at","be","by","for","from","in","is","it","of","on","or","the","to","with",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(TOKENIZER, tokenizer);
}
