// src/lib.rs

pub mod audio;
pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod lexicon;
pub mod persistence;

pub use crate::core::composer::compose;
pub use crate::core::converter::{transliterate, transliterate_str, Diagnostic, Transliteration};
pub use crate::core::engine::{AltEnglishEngine, SentenceReport, WordReport};
pub use crate::core::features::FeatureTable;
pub use crate::core::types::{Phoneme, PhonemeToken, Stress, Symbol};
pub use crate::error::{LexiconError, SynthesisError, TokenError};
pub use crate::lexicon::{CmuDict, PronunciationSource};

/// Builds and validates the feature table, for callers that want the check
/// up front instead of on first use.
pub fn self_check() -> Result<usize, error::TableError> {
    FeatureTable::build().map(|table| table.len())
}
