use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use std::path::Path;
use tokenizers::Tokenizer;

use larder_core::traits::Generator;
use larder_core::types::LlmConfig;

use crate::tokenize::{decode, encode_truncated};
use crate::weights::{load_json_config, load_tokenizer, load_var_builder};

/// Encoder-decoder conditional generation (T5 family).
pub struct Seq2SeqGenerator {
    model: T5ForConditionalGeneration,
    model_config: T5Config,
    tokenizer: Tokenizer,
    device: Device,
    sampler: LogitsProcessor,
    max_new_tokens: usize,
    max_input_tokens: usize,
}

impl Seq2SeqGenerator {
    pub fn load(model_dir: &Path, config: &LlmConfig, device: &Device) -> Result<Self> {
        let tokenizer = load_tokenizer(model_dir)?;
        let model_config: T5Config = load_json_config(model_dir)?;
        let vb = load_var_builder(model_dir, device)?;
        let model = T5ForConditionalGeneration::load(vb, &model_config)?;
        Ok(Self {
            model,
            model_config,
            tokenizer,
            device: device.clone(),
            sampler: LogitsProcessor::new(config.seed, Some(config.temperature), None),
            max_new_tokens: config.max_new_tokens,
            max_input_tokens: config.max_input_tokens,
        })
    }

    fn run(&mut self, prompt: &str) -> Result<String> {
        let input_ids = encode_truncated(&self.tokenizer, prompt, self.max_input_tokens)?;
        let input = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        self.model.clear_kv_cache();
        let encoder_output = self.model.encode(&input)?;

        let start = self.model_config.decoder_start_token_id.unwrap_or(self.model_config.pad_token_id);
        let mut output_ids = vec![u32::try_from(start).map_err(|_| anyhow!("decoder start token out of range"))?];
        for step in 0..self.max_new_tokens {
            let decoder_input = if step == 0 || !self.model_config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };
            let logits = self.model.decode(&decoder_input, &encoder_output)?.squeeze(0)?;
            let next = self.sampler.sample(&logits)?;
            if next as usize == self.model_config.eos_token_id { break; }
            output_ids.push(next);
        }
        self.model.clear_kv_cache();

        Ok(decode(&self.tokenizer, &output_ids[1..])?.trim().to_string())
    }
}

impl Generator for Seq2SeqGenerator {
    fn generate(&mut self, prompt: &str) -> larder_core::Result<String> {
        self.run(prompt).map_err(|e| larder_core::Error::Generation(format!("{e:#}")))
    }
}
