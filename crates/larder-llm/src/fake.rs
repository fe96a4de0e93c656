use larder_core::traits::Generator;

const CONTEXT_MARKER: &str = "Context recipes:\n";
const REQUEST_MARKER: &str = "User request: ";

/// Deterministic offline stand-in for a model.
///
/// Answer prompts (those with a context block) yield the first context line;
/// anything else yields the user request. Output is capped at `max_words`.
pub struct FakeGenerator {
    max_words: usize,
}

impl FakeGenerator {
    pub fn new(max_words: usize) -> Self { Self { max_words } }
}

impl Generator for FakeGenerator {
    fn generate(&mut self, prompt: &str) -> larder_core::Result<String> {
        let line = match prompt.split_once(CONTEXT_MARKER) {
            Some((_, context)) => context.lines().next().unwrap_or(""),
            None => prompt
                .rsplit_once(REQUEST_MARKER)
                .and_then(|(_, rest)| rest.lines().next())
                .unwrap_or(""),
        };
        let line = line.trim_start_matches("- ");
        Ok(line.split_whitespace().take(self.max_words).collect::<Vec<_>>().join(" "))
    }
}
