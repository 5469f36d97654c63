// src/error.rs
use serde::Serialize;
use thiserror::Error;

/// Why a single raw phoneme could not be turned into a symbol.
/// Collected per position; never aborts a word.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenError {
    #[error("unknown phoneme `{code}`")]
    UnknownPhoneme { code: String },
    #[error("consonant `{code}` cannot carry a stress digit")]
    StressOnConsonant { code: String },
    #[error("malformed phoneme token `{raw}`")]
    Malformed { raw: String },
}

/// Pronunciation lookup and lexicon loading failures.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("'{word}' is not in the pronunciation dictionary")]
    NotFound { word: String },
    #[error("no pronunciation dictionary configured")]
    MissingSource,
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot error while {context}: {source}")]
    Snapshot {
        context: &'static str,
        #[source]
        source: bincode::Error,
    },
}

impl LexiconError {
    pub(crate) fn not_found(word: impl Into<String>) -> Self {
        Self::NotFound { word: word.into() }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn snapshot(context: &'static str, source: bincode::Error) -> Self {
        Self::Snapshot { context, source }
    }
}

/// Audio backend failures. Always downgraded to warnings by the renderer.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech synthesis unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("{program} exited with status {code:?}")]
    Failed { program: String, code: Option<i32> },
    #[error("I/O error during synthesis: {0}")]
    Io(#[from] std::io::Error),
}

/// Violations found by the feature table self-validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("phoneme {0} has no table entry")]
    Missing(String),
    #[error("phoneme {0} appears more than once")]
    DuplicateCode(String),
    #[error("phoneme {0} has a feature vector of the wrong category")]
    CategoryMismatch(String),
    #[error("phonemes {first} and {second} share a feature vector")]
    DuplicateFeatures { first: String, second: String },
    #[error("phonemes {first} and {second} share glyph `{glyph}`")]
    DuplicateGlyph {
        first: String,
        second: String,
        glyph: String,
    },
    #[error("offglide of {nucleus} is not spelled with the glyph of {target}")]
    OffglideMismatch { nucleus: String, target: String },
    #[error("tokens {first} and {second} compose to the same symbol `{glyph}`")]
    ComposedCollision {
        first: String,
        second: String,
        glyph: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
