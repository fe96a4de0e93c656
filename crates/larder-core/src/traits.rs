use crate::error::Result;

/// Text generation backend: prompt in, trimmed completion out.
///
/// Output may differ between calls for the same prompt (sampling). Backends
/// hold mutable inference state, so callers serialize access.
pub trait Generator: Send {
    fn generate(&mut self, prompt: &str) -> Result<String>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, prompt: &str) -> Result<String> { (**self).generate(prompt) }
}
