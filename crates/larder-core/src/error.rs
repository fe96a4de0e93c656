use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Search index not built. Call fit() first.")]
    NotInitialized,

    #[error("Corpus misaligned: {documents} documents but {metadata} metadata records")]
    Misaligned { documents: usize, metadata: usize },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {source}")]
    MalformedData {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
