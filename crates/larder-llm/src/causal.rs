use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::qwen2::{Config as Qwen2Config, ModelForCausalLM};
use std::path::Path;
use tokenizers::Tokenizer;

use larder_core::traits::Generator;
use larder_core::types::LlmConfig;

use crate::tokenize::{decode_completion, encode_truncated};
use crate::weights::{load_json_config, load_tokenizer, load_var_builder};

const EOS_CANDIDATES: [&str; 3] = ["<|endoftext|>", "<|im_end|>", "</s>"];

/// Decoder-only continuation (Qwen2 family). The prompt echo is stripped.
pub struct CausalGenerator {
    model: ModelForCausalLM,
    tokenizer: Tokenizer,
    device: Device,
    sampler: LogitsProcessor,
    eos_token_id: Option<u32>,
    max_new_tokens: usize,
    max_input_tokens: usize,
}

impl CausalGenerator {
    pub fn load(model_dir: &Path, config: &LlmConfig, device: &Device) -> Result<Self> {
        let tokenizer = load_tokenizer(model_dir)?;
        let model_config: Qwen2Config = load_json_config(model_dir)?;
        let vb = load_var_builder(model_dir, device)?;
        let model = ModelForCausalLM::new(&model_config, vb)?;
        let eos_token_id = EOS_CANDIDATES.iter().find_map(|t| tokenizer.token_to_id(t));
        Ok(Self {
            model,
            tokenizer,
            device: device.clone(),
            sampler: LogitsProcessor::new(config.seed, Some(config.temperature), None),
            eos_token_id,
            max_new_tokens: config.max_new_tokens,
            max_input_tokens: config.max_input_tokens,
        })
    }

    fn run(&mut self, prompt: &str) -> Result<String> {
        let mut tokens = encode_truncated(&self.tokenizer, prompt, self.max_input_tokens)?;
        if tokens.is_empty() { return Err(anyhow!("Prompt encoded to zero tokens")); }
        let prompt_len = tokens.len();
        self.model.clear_kv_cache();
        for step in 0..self.max_new_tokens {
            let context_size = if step > 0 { 1 } else { tokens.len() };
            let start_pos = tokens.len() - context_size;
            let input = Tensor::new(&tokens[start_pos..], &self.device)?.unsqueeze(0)?;
            let logits = self.model.forward(&input, start_pos)?;
            let logits = logits.squeeze(0)?.squeeze(0)?.to_dtype(DType::F32)?;
            let next = self.sampler.sample(&logits)?;
            if Some(next) == self.eos_token_id { break; }
            tokens.push(next);
        }
        self.model.clear_kv_cache();

        decode_completion(&self.tokenizer, prompt, &tokens[prompt_len..])
    }
}

impl Generator for CausalGenerator {
    fn generate(&mut self, prompt: &str) -> larder_core::Result<String> {
        self.run(prompt).map_err(|e| larder_core::Error::Generation(format!("{e:#}")))
    }
}
