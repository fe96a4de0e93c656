use anyhow::{anyhow, Result};
use tokenizers::Tokenizer;

/// Encodes `text`, keeping at most the first `max_len` ids.
pub fn encode_truncated(tokenizer: &Tokenizer, text: &str, max_len: usize) -> Result<Vec<u32>> {
    let enc = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let mut ids = enc.get_ids().to_vec();
    if ids.len() > max_len { ids.truncate(max_len); }
    Ok(ids)
}

pub fn decode(tokenizer: &Tokenizer, ids: &[u32]) -> Result<String> {
    tokenizer.decode(ids, true).map_err(|e| anyhow!("Detokenization failed: {}", e))
}

/// Decodes only the tokens produced after the (possibly truncated) prompt.
pub fn decode_completion(tokenizer: &Tokenizer, prompt: &str, generated: &[u32]) -> Result<String> {
    Ok(strip_prompt_echo(prompt, &decode(tokenizer, generated)?))
}

/// Removes a verbatim prompt echo from a decoder-only completion, then trims.
pub fn strip_prompt_echo(prompt: &str, text: &str) -> String {
    text.strip_prefix(prompt).unwrap_or(text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn word_tokenizer() -> Tokenizer {
        let json = r#"{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {"type": "Whitespace"},
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {"[UNK]": 0, "you": 1, "are": 2, "a": 3, "cook": 4, "tofu": 5, "rice": 6},
                "unk_token": "[UNK]"
            }
        }"#;
        Tokenizer::from_str(json).expect("tokenizer")
    }

    #[test]
    fn truncated_prompt_does_not_leak_into_completion() {
        let tokenizer = word_tokenizer();
        let prompt = "you are a cook";
        let mut tokens = encode_truncated(&tokenizer, prompt, 2).expect("encode");
        assert_eq!(tokens, [1, 2]);
        let prompt_len = tokens.len();
        tokens.extend([5, 6]);

        let answer = decode_completion(&tokenizer, prompt, &tokens[prompt_len..]).expect("decode");
        assert_eq!(answer, "tofu rice");
    }

    #[test]
    fn strips_only_a_leading_echo() {
        assert_eq!(strip_prompt_echo("Search query:", "Search query: vegan tofu "), "vegan tofu");
        assert_eq!(strip_prompt_echo("Search query:", "vegan tofu"), "vegan tofu");
        assert_eq!(strip_prompt_echo("Q:", "A: Q: x"), "A: Q: x");
    }
}
