// src/core/converter.rs
use serde::Serialize;
use std::str::FromStr;

use crate::core::composer::compose_with;
use crate::core::features::FeatureTable;
use crate::core::types::{Phoneme, PhonemeToken, Stress, Symbol};
use crate::error::TokenError;

/// A position whose raw token could not be composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: usize,
    pub raw: String,
    pub error: TokenError,
}

/// Symbols for one phoneme sequence, aligned one-to-one with the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transliteration {
    pub symbols: Vec<Symbol>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Transliteration {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True when every position resolved to a real symbol.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Codes that were not in the inventory, in input order.
    pub fn unknown_codes(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|diag| match &diag.error {
                TokenError::UnknownPhoneme { code } => Some(code.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Symbols separated by single spaces.
    pub fn to_display_string(&self) -> String {
        self.symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PhonemeToken {
    /// Parses a CMUdict-style token such as `AE1`, `ng` or `IH0`.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        Self::parse_with(FeatureTable::global(), raw)
    }

    pub fn parse_with(table: &FeatureTable, raw: &str) -> Result<Self, TokenError> {
        let trimmed = raw.trim();
        let malformed = || TokenError::Malformed { raw: trimmed.to_string() };

        let (base, digit) = match trimmed.char_indices().last() {
            Some((idx, c)) if c.is_ascii_digit() => (&trimmed[..idx], Some(c)),
            Some(_) => (trimmed, None),
            None => return Err(malformed()),
        };
        if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed());
        }
        let stress = match digit {
            Some(d) => Some(Stress::from_digit(d).ok_or_else(malformed)?),
            None => None,
        };

        let entry = table.lookup(base)?;
        match (entry.phoneme, stress) {
            (Phoneme::Consonant(c), None) => Ok(PhonemeToken::Consonant(c)),
            (Phoneme::Consonant(c), Some(_)) => Err(TokenError::StressOnConsonant {
                code: c.code().to_string(),
            }),
            (Phoneme::Vowel(vowel), stress) => Ok(PhonemeToken::Vowel {
                vowel,
                stress: stress.unwrap_or_default(),
            }),
        }
    }
}

impl FromStr for PhonemeToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhonemeToken::parse(s)
    }
}

/// Transliterates one phoneme sequence against the process-wide table.
pub fn transliterate<S: AsRef<str>>(phonemes: &[S]) -> Transliteration {
    transliterate_with(FeatureTable::global(), phonemes)
}

/// Splits a line such as `"DH IH1 S"` on whitespace and transliterates it.
pub fn transliterate_str(line: &str) -> Transliteration {
    let phonemes: Vec<&str> = line.split_ascii_whitespace().collect();
    transliterate(&phonemes)
}

/// Never fails as a whole: an unresolved position gets a placeholder symbol
/// and a diagnostic, so `symbols[i]` always belongs to `phonemes[i]`.
pub fn transliterate_with<S: AsRef<str>>(table: &FeatureTable, phonemes: &[S]) -> Transliteration {
    let mut symbols = Vec::with_capacity(phonemes.len());
    let mut diagnostics = Vec::new();

    for (position, raw) in phonemes.iter().enumerate() {
        let raw = raw.as_ref();
        let composed = PhonemeToken::parse_with(table, raw)
            .and_then(|token| compose_with(table, &token));
        match composed {
            Ok(symbol) => symbols.push(symbol),
            Err(error) => {
                tracing::debug!(position, raw, %error, "unresolved phoneme");
                symbols.push(Symbol::placeholder(raw));
                diagnostics.push(Diagnostic {
                    position,
                    raw: raw.to_string(),
                    error,
                });
            }
        }
    }

    Transliteration { symbols, diagnostics }
}
