use std::fs;
use tempfile::TempDir;

use larder_core::config::Config;
use larder_core::corpus::{build_corpus, load_eval_queries, load_recipes};
use larder_core::types::{BackendKind, Constraints};
use larder_core::Error;

#[test]
fn load_recipes_defaults_optional_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("recipes.json");
    fs::write(
        &path,
        r#"[
            {"id":"r1","title":"Vegan Stir Fry","ingredients":["tofu"],"tags":["vegan"],"dietary":["vegan"],"time_minutes":15,"cost_level":"low"},
            {"id":"r2","title":"Toast"}
        ]"#,
    )
    .unwrap();

    let recipes = load_recipes(&path).expect("load");
    assert_eq!(recipes.len(), 2);
    assert!(recipes[1].ingredients.is_empty());
    assert_eq!(recipes[1].time_minutes, None);

    let (docs, meta) = build_corpus(&recipes);
    assert_eq!(docs.len(), 2);
    assert_eq!(meta[0].title, "Vegan Stir Fry");
}

#[test]
fn recipe_without_title_is_malformed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("recipes.json");
    fs::write(&path, r#"[{"id":"r1"}]"#).unwrap();

    let err = load_recipes(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedData { .. }), "got {err:?}");
}

#[test]
fn missing_file_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_recipes(&tmp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}

#[test]
fn eval_queries_require_gold_ids() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("good.json");
    fs::write(&good, r#"[{"query":"vegan dinner","relevant_recipe_ids":["r1"]}]"#).unwrap();
    let queries = load_eval_queries(&good).expect("load");
    assert_eq!(queries[0].relevant_recipe_ids, vec!["r1".to_string()]);

    let bad = tmp.path().join("bad.json");
    fs::write(&bad, r#"[{"query":"vegan dinner"}]"#).unwrap();
    assert!(matches!(load_eval_queries(&bad), Err(Error::MalformedData { .. })));
}

#[test]
fn config_files_override_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[search]\ntop_k = 3\n\n[llm]\nmodel_id = \"Qwen/Qwen2-0.5B\"\nbackend = \"causal\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[logging]\nlevel = \"debug\"\n").unwrap();

    let settings = Config::load_in(tmp.path(), "test").expect("config").settings().expect("settings");
    assert_eq!(settings.search.top_k, 3);
    assert_eq!(settings.llm.model_id, "Qwen/Qwen2-0.5B");
    assert_eq!(settings.llm.backend, BackendKind::Causal);
    assert_eq!(settings.llm.max_new_tokens, 64, "untouched keys keep defaults");
    assert_eq!(settings.logging.level, "debug");
}

#[test]
fn invalid_config_fails_fast() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[search]\ntop_k = 0\n").unwrap();
    assert!(Config::load_in(tmp.path(), "prod").is_err());
}

#[test]
fn constraints_keep_insertion_order() {
    let c = Constraints::new().with("budget", "low").with("diet", "vegan").with("time_minutes_max", 20);
    let keys: Vec<&str> = c.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["budget", "diet", "time_minutes_max"]);

    let c = c.with("budget", "medium");
    assert_eq!(c.len(), 3);
    assert_eq!(c.iter().next(), Some(("budget", "medium")));
}
