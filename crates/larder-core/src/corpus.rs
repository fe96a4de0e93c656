//! Recipe collection loading and flattening into indexable text documents.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{EvalQuery, Recipe, RecipeMeta};

pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>> {
    let recipes: Vec<Recipe> = read_json(path)?;
    tracing::info!(path = %path.display(), recipes = recipes.len(), "loaded recipe collection");
    Ok(recipes)
}

pub fn load_eval_queries(path: &Path) -> Result<Vec<EvalQuery>> {
    let queries: Vec<EvalQuery> = read_json(path)?;
    tracing::info!(path = %path.display(), queries = queries.len(), "loaded evaluation queries");
    Ok(queries)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|source| Error::Io { path: path.display().to_string(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| Error::MalformedData { path: path.display().to_string(), source })
}

pub fn recipe_to_document(recipe: &Recipe) -> String {
    let time = recipe.time_minutes.map_or_else(|| "unknown".to_string(), |t| t.to_string());
    let cost = recipe.cost_level.as_deref().unwrap_or("unknown");
    format!(
        "{}. Ingredients: {}. Tags: {}. Time: {} minutes. Cost: {}. Dietary: {}.",
        recipe.title,
        recipe.ingredients.join(", "),
        recipe.tags.join(", "),
        time,
        cost,
        recipe.dietary.join(", "),
    )
}

/// Returns documents and metadata of equal length, aligned by position.
pub fn build_corpus(recipes: &[Recipe]) -> (Vec<String>, Vec<RecipeMeta>) {
    recipes
        .iter()
        .map(|r| (recipe_to_document(r), RecipeMeta { id: r.id.clone(), title: r.title.clone() }))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stir_fry() -> Recipe {
        Recipe {
            id: "r1".into(),
            title: "Vegan Stir Fry".into(),
            ingredients: vec!["tofu".into(), "broccoli".into(), "soy sauce".into()],
            tags: vec!["vegan".into(), "quick".into()],
            dietary: vec!["vegan".into()],
            time_minutes: Some(15),
            cost_level: Some("low".into()),
        }
    }

    #[test]
    fn document_renders_every_field() {
        assert_eq!(
            recipe_to_document(&stir_fry()),
            "Vegan Stir Fry. Ingredients: tofu, broccoli, soy sauce. Tags: vegan, quick. \
             Time: 15 minutes. Cost: low. Dietary: vegan."
        );
    }

    #[test]
    fn missing_optional_fields_render_unknown() {
        let r = Recipe { time_minutes: None, cost_level: None, dietary: vec![], ..stir_fry() };
        let doc = recipe_to_document(&r);
        assert!(doc.contains("Time: unknown minutes."));
        assert!(doc.contains("Cost: unknown."));
        assert!(doc.ends_with("Dietary: ."));
    }

    #[test]
    fn corpus_is_aligned() {
        let other = Recipe { id: "r2".into(), title: "Beef Burger".into(), ..stir_fry() };
        let (docs, meta) = build_corpus(&[stir_fry(), other]);
        assert_eq!(docs.len(), meta.len());
        assert_eq!(meta[1].id, "r2");
        assert!(docs[1].starts_with("Beef Burger."));
    }
}
