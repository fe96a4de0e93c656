//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge compiled defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (nested keys split on `__`, e.g. `APP_LLM__MODEL_ID`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::types::LlmConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub recipes_path: String,
    pub eval_queries_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            recipes_path: "data/recipes.json".to_string(),
            eval_queries_path: "data/eval_queries.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn recipes_path(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.recipes_path) }

    pub fn eval_queries_path(&self, base: &Path) -> PathBuf { resolve_with_base(base, &self.eval_queries_path) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
    /// Overrides the built-in English stop word list when set.
    pub stop_words: Option<Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self { Self { top_k: 5, stop_words: None } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), format: "pretty".to_string() } }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_in(Path::new("."), &env_name)
    }

    /// Loads config files from `base_dir` for the given environment name.
    pub fn load_in(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn settings(&self) -> anyhow::Result<AppConfig> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.top_k == 0 {
            anyhow::bail!("search.top_k must be at least 1");
        }
        if self.llm.max_new_tokens == 0 {
            anyhow::bail!("llm.max_new_tokens must be at least 1");
        }
        if !self.llm.temperature.is_finite() || self.llm.temperature < 0.0 {
            anyhow::bail!("llm.temperature must be a non-negative number, got {}", self.llm.temperature);
        }
        if self.llm.model_id.trim().is_empty() {
            anyhow::bail!("llm.model_id must not be empty");
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
