//! Domain types shared by the index, the generator backends and the agent.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type RecipeId = String;

/// A structured recipe as stored in the collection file.
///
/// `id` and `title` are required; list fields default to empty and the
/// numeric/categorical fields are optional (rendered as `unknown`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub time_minutes: Option<u32>,
    #[serde(default)]
    pub cost_level: Option<String>,
}

/// Lightweight record kept alongside each indexed document, same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMeta {
    pub id: RecipeId,
    pub title: String,
}

/// One search hit: metadata, cosine similarity and the full document text.
///
/// `score` is in `[0, 1]`; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub meta: RecipeMeta,
    pub score: f32,
    pub document: String,
}

/// A labelled query from the evaluation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalQuery {
    pub query: String,
    pub relevant_recipe_ids: Vec<RecipeId>,
}

/// Caller-supplied constraints, rendered in insertion order.
///
/// Values are free text; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    entries: Vec<(String, String)>,
}

impl Constraints {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Replaces the value of an existing key in place, otherwise appends.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Constraints {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut constraints = Self::new();
        for (k, v) in iter { constraints.insert(k, v); }
        constraints
    }
}

/// Which decoding family a generator backend uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Try `Seq2Seq` first, fall back to `Causal`.
    #[default]
    Auto,
    /// Encoder-decoder conditional generation.
    Seq2Seq,
    /// Decoder-only continuation; the prompt echo is stripped from output.
    Causal,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Seq2Seq => "seq2seq",
            Self::Causal => "causal",
        };
        f.write_str(name)
    }
}

/// Immutable generation settings, fixed for the lifetime of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model_id: String,
    pub model_dir: Option<String>,
    pub max_new_tokens: usize,
    pub max_input_tokens: usize,
    pub temperature: f64,
    pub seed: u64,
    pub device: Option<String>,
    pub backend: BackendKind,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model_id: "google/flan-t5-small".to_string(),
            model_dir: None,
            max_new_tokens: 64,
            max_input_tokens: 512,
            temperature: 0.2,
            seed: 299_792_458,
            device: None,
            backend: BackendKind::Auto,
        }
    }
}
