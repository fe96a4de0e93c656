//! Offline retrieval quality: macro-averaged precision@k and recall@k.

use std::collections::HashSet;

use larder_core::types::EvalQuery;
use larder_core::Result;

use crate::index::TfidfIndex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalReport {
	pub k: usize,
	pub queries: usize,
	pub precision: f64,
	pub recall: f64,
}

/// Fraction of the first `k` predictions that are relevant; 0 when none were made.
pub fn precision_at_k(predicted: &[String], gold: &[String], k: usize) -> f64 {
	let top = &predicted[..k.min(predicted.len())];
	if top.is_empty() { return 0.0; }
	let hits = top.iter().filter(|p| gold.contains(p)).count();
	hits as f64 / top.len() as f64
}

/// Fraction of gold ids found in the first `k` predictions; 0 when there is no gold.
pub fn recall_at_k(predicted: &[String], gold: &[String], k: usize) -> f64 {
	if gold.is_empty() { return 0.0; }
	let top: HashSet<&String> = predicted.iter().take(k).collect();
	let hits = gold.iter().filter(|g| top.contains(g)).count();
	hits as f64 / gold.len() as f64
}

/// Scores `index` against every query. `on_query` fires after each one.
pub fn evaluate_with<F: FnMut()>(index: &TfidfIndex, queries: &[EvalQuery], k: usize, mut on_query: F) -> Result<EvalReport> {
	let (mut precision, mut recall) = (0.0, 0.0);
	for item in queries {
		let predicted: Vec<String> = index.search(&item.query, k)?.into_iter().map(|r| r.meta.id).collect();
		precision += precision_at_k(&predicted, &item.relevant_recipe_ids, k);
		recall += recall_at_k(&predicted, &item.relevant_recipe_ids, k);
		on_query();
	}
	if queries.is_empty() {
		tracing::warn!("evaluation set is empty; reporting zero metrics");
		return Ok(EvalReport { k, queries: 0, precision: 0.0, recall: 0.0 });
	}
	let n = queries.len() as f64;
	Ok(EvalReport { k, queries: queries.len(), precision: precision / n, recall: recall / n })
}

pub fn evaluate(index: &TfidfIndex, queries: &[EvalQuery], k: usize) -> Result<EvalReport> {
	evaluate_with(index, queries, k, || {})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

	#[test]
	fn one_hit_in_five() {
		let pred = ids(&["r1", "r2", "r3", "r4", "r5"]);
		let gold = ids(&["r1"]);
		assert!((precision_at_k(&pred, &gold, 5) - 0.2).abs() < 1e-12);
		assert!((recall_at_k(&pred, &gold, 5) - 1.0).abs() < 1e-12);
	}

	#[test]
	fn short_prediction_list_divides_by_its_length() {
		let pred = ids(&["r1", "r9"]);
		let gold = ids(&["r1", "r2"]);
		assert!((precision_at_k(&pred, &gold, 5) - 0.5).abs() < 1e-12);
		assert!((recall_at_k(&pred, &gold, 5) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn degenerate_inputs_are_zero() {
		assert_eq!(precision_at_k(&[], &ids(&["r1"]), 5), 0.0);
		assert_eq!(recall_at_k(&ids(&["r1"]), &[], 5), 0.0);
	}

	#[test]
	fn hits_beyond_k_do_not_count() {
		let pred = ids(&["r2", "r1"]);
		let gold = ids(&["r1"]);
		assert_eq!(precision_at_k(&pred, &gold, 1), 0.0);
		assert_eq!(recall_at_k(&pred, &gold, 1), 0.0);
	}
}
