//! larder-text
//!
//! Lexical retrieval over the recipe corpus: a tantivy analyzer chain feeding
//! an in-memory TF-IDF index, plus precision/recall evaluation helpers.

pub mod analyzer;
pub mod eval;
pub mod index;

pub use eval::{evaluate, EvalReport};
pub use index::TfidfIndex;
