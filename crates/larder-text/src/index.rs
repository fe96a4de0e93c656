//! In-memory TF-IDF index with cosine ranking.
//!
//! Weights use smoothed idf, `ln((1 + n) / (1 + df)) + 1`, on raw term counts.
//! Rows are L2-normalized at fit time so cosine similarity is a sparse dot.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tantivy::tokenizer::TextAnalyzer;

use larder_core::config::SearchConfig;
use larder_core::types::{RankedResult, RecipeMeta};
use larder_core::{Error, Result};

use crate::analyzer::{build_analyzer, english_analyzer, tokenize};

/// Sparse row sorted by column, L2-normalized (or empty).
type SparseRow = Vec<(usize, f32)>;

struct Fitted {
	vocabulary: HashMap<String, usize>,
	idf: Vec<f32>,
	rows: Vec<SparseRow>,
	documents: Vec<String>,
	metadata: Vec<RecipeMeta>,
}

pub struct TfidfIndex {
	analyzer: TextAnalyzer,
	state: Option<Fitted>,
}

impl Default for TfidfIndex {
	fn default() -> Self { Self::new() }
}

impl TfidfIndex {
	pub fn new() -> Self { Self { analyzer: english_analyzer(), state: None } }

	pub fn with_stop_words<I, S>(stop_words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { analyzer: build_analyzer(stop_words), state: None }
	}

	/// Unfitted index using `search.stop_words`, or the English list.
	pub fn from_config(config: &SearchConfig) -> Self {
		match &config.stop_words {
			Some(words) => Self::with_stop_words(words.iter().cloned()),
			None => Self::new(),
		}
	}

	/// Builds vocabulary and weights, replacing any previous fit.
	pub fn fit(&mut self, documents: Vec<String>, metadata: Vec<RecipeMeta>) -> Result<()> {
		if documents.len() != metadata.len() {
			return Err(Error::Misaligned { documents: documents.len(), metadata: metadata.len() });
		}

		let counts: Vec<BTreeMap<String, usize>> = documents
			.iter()
			.map(|d| term_counts(tokenize(&mut self.analyzer, d)))
			.collect();

		let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
		for doc in &counts {
			for term in doc.keys() { *document_frequency.entry(term.as_str()).or_default() += 1; }
		}

		let n = documents.len() as f32;
		let mut vocabulary = HashMap::with_capacity(document_frequency.len());
		let mut idf = Vec::with_capacity(document_frequency.len());
		for (column, (term, df)) in document_frequency.into_iter().enumerate() {
			vocabulary.insert(term.to_string(), column);
			idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
		}

		let rows = counts
			.iter()
			.map(|doc| {
				let mut row: SparseRow = doc.iter().map(|(term, &tf)| {
					let column = vocabulary[term.as_str()];
					(column, tf as f32 * idf[column])
				}).collect();
				row.sort_unstable_by_key(|&(column, _)| column);
				normalize(&mut row);
				row
			})
			.collect();

		tracing::debug!(documents = documents.len(), vocabulary = vocabulary.len(), "fitted tf-idf index");
		self.state = Some(Fitted { vocabulary, idf, rows, documents, metadata });
		Ok(())
	}

	/// Top `top_k` documents by cosine similarity to `query`, best first.
	///
	/// Equal scores keep corpus order. Unknown query terms are ignored.
	pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<RankedResult>> {
		let state = self.state.as_ref().ok_or(Error::NotInitialized)?;

		let mut analyzer = self.analyzer.clone();
		// column order keeps the norm's summation order fixed across calls
		let mut query_vec: BTreeMap<usize, f32> = BTreeMap::new();
		for term in tokenize(&mut analyzer, query) {
			if let Some(&column) = state.vocabulary.get(&term) {
				*query_vec.entry(column).or_default() += state.idf[column];
			}
		}
		let norm = query_vec.values().map(|w| w * w).sum::<f32>().sqrt();

		let mut scored: Vec<(usize, f32)> = state
			.rows
			.iter()
			.enumerate()
			.map(|(i, row)| {
				if norm == 0.0 { return (i, 0.0); }
				let dot: f32 = row.iter().filter_map(|(c, w)| query_vec.get(c).map(|q| q * w)).sum();
				(i, (dot / norm).clamp(0.0, 1.0))
			})
			.collect();
		// stable: ties keep insertion order
		scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
		scored.truncate(top_k);

		Ok(scored
			.into_iter()
			.map(|(i, score)| RankedResult {
				meta: state.metadata[i].clone(),
				score,
				document: state.documents[i].clone(),
			})
			.collect())
	}

	pub fn is_fitted(&self) -> bool { self.state.is_some() }

	pub fn len(&self) -> usize { self.state.as_ref().map_or(0, |s| s.documents.len()) }

	pub fn is_empty(&self) -> bool { self.len() == 0 }

	pub fn vocabulary_len(&self) -> usize { self.state.as_ref().map_or(0, |s| s.vocabulary.len()) }
}

fn term_counts(terms: Vec<String>) -> BTreeMap<String, usize> {
	let mut counts = BTreeMap::new();
	for t in terms { *counts.entry(t).or_default() += 1; }
	counts
}

fn normalize(row: &mut SparseRow) {
	let norm = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
	if norm > 0.0 { for (_, w) in row.iter_mut() { *w /= norm; } }
}
