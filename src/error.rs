use thiserror::Error;

/// Errors raised while reading corpora, training, tagging or sampling.
#[derive(Debug, Error)]
pub enum Error {
    /// A corpus token is not of the form `word_TAG`.
    #[error("invalid token at line {line}: {token:?}")]
    InvalidToken { line: usize, token: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoding was requested with no candidate tags.
    #[error("tag vocabulary is empty")]
    EmptyVocabulary,

    /// The transition table has no contexts, the model was never trained.
    #[error("model is empty, train it on a non-empty corpus first")]
    EmptyModel,

    /// Evaluation over a data set without a single token.
    #[error("no data to evaluate")]
    NoData,

    /// The sampler walked more than `limit` steps without reaching a terminal context.
    #[error("generation exceeded {limit} steps")]
    GenerationLimit { limit: usize },

    #[error("invalid parameter {name}={value}")]
    InvalidParameter { name: String, value: String },

    /// A sampled tag has no emission distribution, the tables do not belong together.
    #[error("tag {tag:?} has no emission distribution")]
    MissingEmission { tag: String },

    /// A tagger returned a different number of tags than it was given words.
    #[error("sequence length mismatch: {expected} references, {actual} predictions")]
    LengthMismatch { expected: usize, actual: usize },

    /// Every tag path through the lattice has zero probability.
    #[error("no tag path with non-zero probability")]
    NoPath,
}

pub type Result<T> = std::result::Result<T, Error>;
