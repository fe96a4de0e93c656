use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use larder_core::types::LlmConfig;

/// Local directory holding `config.json`, `tokenizer.json` and weights.
///
/// Order: `llm.model_dir`, `APP_MODEL_DIR`, `models/<model name>`, `../models/<model name>`.
pub fn resolve_model_dir(config: &LlmConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.model_dir {
        let p = larder_core::config::expand_path(dir);
        if p.exists() { return Ok(p); }
        return Err(anyhow!("Configured model_dir {} does not exist", p.display()));
    }
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() { return Ok(p); }
    }
    let name = config.model_id.rsplit('/').next().unwrap_or(&config.model_id);
    for root in ["models", "../models"] {
        let p = Path::new(root).join(name);
        if p.exists() { return Ok(p); }
    }
    Err(anyhow!("Could not locate a local directory for model '{}'", config.model_id))
}

pub fn load_tokenizer(model_dir: &Path) -> Result<Tokenizer> {
    let tokenizer_path = model_dir.join("tokenizer.json");
    Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))
}

pub fn load_json_config<T: serde::de::DeserializeOwned>(model_dir: &Path) -> Result<T> {
    let config_path = model_dir.join("config.json");
    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", config_path.display()))
}

/// Prefers `model.safetensors`, falls back to a pickled `pytorch_model.bin`.
pub fn load_var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let dtype = DType::F32;
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], dtype, device)? };
        return Ok(vb);
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&weights_path)
        .with_context(|| format!("Failed to read weights from {}", weights_path.display()))?;
    let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, dtype, device))
}
