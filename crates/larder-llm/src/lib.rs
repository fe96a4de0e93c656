//! Text generation backends on candle.
//!
//! Two decoding families share the `Generator` trait: encoder-decoder
//! (`Seq2SeqGenerator`) and decoder-only (`CausalGenerator`). `load_generator`
//! picks one from `LlmConfig::backend`; `auto` probes seq2seq first.

pub mod causal;
pub mod device;
pub mod fake;
pub mod seq2seq;
pub mod tokenize;
pub mod weights;

use larder_core::traits::Generator;
use larder_core::types::{BackendKind, LlmConfig};
use larder_core::{Error, Result};

pub use causal::CausalGenerator;
pub use fake::FakeGenerator;
pub use seq2seq::Seq2SeqGenerator;
pub use tokenize::strip_prompt_echo;

/// Builds the configured backend, or the fake when `APP_USE_FAKE_GENERATOR` is set.
pub fn get_default_generator(config: &LlmConfig) -> Result<Box<dyn Generator>> {
    let use_fake = std::env::var("APP_USE_FAKE_GENERATOR").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake {
        tracing::info!("using fake generator");
        return Ok(Box::new(FakeGenerator::new(config.max_new_tokens)));
    }
    load_generator(config)
}

/// Loads model weights for `config.model_id`.
///
/// With `BackendKind::Auto`, a seq2seq load failure is logged and the causal
/// variant is tried; if both fail the error names both causes.
pub fn load_generator(config: &LlmConfig) -> Result<Box<dyn Generator>> {
    let generation = |e: anyhow::Error| Error::Generation(format!("{e:#}"));
    let model_dir = weights::resolve_model_dir(config).map_err(generation)?;
    let device = device::select_device(config.device.as_deref()).map_err(generation)?;
    tracing::info!(model = %config.model_id, dir = %model_dir.display(), backend = %config.backend, "loading generator");

    match config.backend {
        BackendKind::Seq2Seq => Ok(Box::new(Seq2SeqGenerator::load(&model_dir, config, &device).map_err(generation)?)),
        BackendKind::Causal => Ok(Box::new(CausalGenerator::load(&model_dir, config, &device).map_err(generation)?)),
        BackendKind::Auto => match Seq2SeqGenerator::load(&model_dir, config, &device) {
            Ok(g) => {
                tracing::info!(backend = %BackendKind::Seq2Seq, "generator ready");
                Ok(Box::new(g))
            }
            Err(seq2seq_err) => {
                tracing::warn!(error = %format!("{seq2seq_err:#}"), "seq2seq load failed; trying causal");
                match CausalGenerator::load(&model_dir, config, &device) {
                    Ok(g) => {
                        tracing::info!(backend = %BackendKind::Causal, "generator ready");
                        Ok(Box::new(g))
                    }
                    Err(causal_err) => Err(Error::Generation(format!(
                        "no backend could load '{}': seq2seq: {:#}; causal: {:#}",
                        config.model_id, seq2seq_err, causal_err
                    ))),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_dir_is_generation_error() {
        let config = LlmConfig { model_dir: Some("/definitely/not/a/model/dir".into()), ..LlmConfig::default() };
        let err = load_generator(&config).err().expect("load must fail");
        assert!(matches!(err, Error::Generation(_)));
    }
}
