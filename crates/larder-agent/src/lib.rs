//! Two-phase recommendation: reformulate the request into a search query,
//! retrieve recipes, then answer grounded in what was retrieved.

pub mod prompts;

use std::path::Path;
use std::sync::Mutex;

use larder_core::config::AppConfig;
use larder_core::corpus::{build_corpus, load_recipes};
use larder_core::traits::Generator;
use larder_core::types::{Constraints, RankedResult};
use larder_core::{Error, Result};
use larder_llm::get_default_generator;
use larder_text::TfidfIndex;

use crate::prompts::{build_final_answer_prompt, build_search_action_prompt};

pub const DEFAULT_TOP_K: usize = 5;

/// Everything a single `recommend` call produced, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub user_request: String,
    pub search_query: String,
    pub retrieved: Vec<RankedResult>,
    pub answer: String,
}

pub struct CookingAgent {
    index: TfidfIndex,
    generator: Mutex<Box<dyn Generator>>,
}

impl CookingAgent {
    /// Loads the recipe corpus, fits the index once and loads the model.
    pub fn new(config: &AppConfig, base_dir: &Path) -> Result<Self> {
        let recipes = load_recipes(&config.data.recipes_path(base_dir))?;
        let (documents, metadata) = build_corpus(&recipes);
        let mut index = TfidfIndex::from_config(&config.search);
        index.fit(documents, metadata)?;
        tracing::info!(documents = index.len(), vocabulary = index.vocabulary_len(), "search index ready");

        let generator = get_default_generator(&config.llm)?;
        Ok(Self::from_parts(index, generator))
    }

    pub fn from_parts(index: TfidfIndex, generator: Box<dyn Generator>) -> Self {
        Self { index, generator: Mutex::new(generator) }
    }

    pub fn index(&self) -> &TfidfIndex { &self.index }

    pub fn recommend(&self, query: &str, constraints: &Constraints, top_k: usize) -> Result<String> {
        Ok(self.recommend_with_trace(query, constraints, top_k)?.answer)
    }

    /// Runs reformulate → retrieve → answer. Each step feeds the next; no retries.
    pub fn recommend_with_trace(&self, query: &str, constraints: &Constraints, top_k: usize) -> Result<Recommendation> {
        let user_request = make_user_request(query, constraints);

        let search_query = self.generate(&build_search_action_prompt(&user_request))?;
        let retrieved = self.index.search(&search_query, top_k)?;
        tracing::info!(search_query = %search_query, hits = retrieved.len(), "retrieved grounding context");

        let answer = self.generate(&build_final_answer_prompt(&user_request, &retrieved))?;
        Ok(Recommendation { user_request, search_query, retrieved, answer })
    }

    // The lock is held only for one generation call.
    fn generate(&self, prompt: &str) -> Result<String> {
        let mut generator = self
            .generator
            .lock()
            .map_err(|_| Error::Generation("generator lock poisoned".to_string()))?;
        Ok(generator.generate(prompt)?.trim().to_string())
    }
}

/// `"{query}"`, or `"{query} Constraints: k=v k=v"` when constraints are present.
pub fn make_user_request(query: &str, constraints: &Constraints) -> String {
    let mut parts = vec![query.trim().to_string()];
    if !constraints.is_empty() {
        parts.push("Constraints:".to_string());
        parts.extend(constraints.iter().map(|(k, v)| format!("{k}={v}")));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_constraints_is_trimmed_query() {
        assert_eq!(make_user_request("  vegan dinner \n", &Constraints::new()), "vegan dinner");
    }

    #[test]
    fn constraints_render_in_order() {
        let c = Constraints::new().with("budget", "low").with("diet", "vegan").with("time_minutes_max", 20);
        assert_eq!(
            make_user_request("cheap vegan dinner", &c),
            "cheap vegan dinner Constraints: budget=low diet=vegan time_minutes_max=20"
        );
    }
}
