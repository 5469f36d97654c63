// src/core/composer.rs
use crate::core::features::FeatureTable;
use crate::core::modifiers::{offglide_modifier, stress_modifier};
use crate::core::types::{PhonemeToken, Symbol};
use crate::error::TokenError;

/// Composes one token against the process-wide table.
pub fn compose(token: &PhonemeToken) -> Result<Symbol, TokenError> {
    compose_with(FeatureTable::global(), token)
}

/// Base glyph, then stress mark, then offglide. Pure and deterministic.
pub fn compose_with(table: &FeatureTable, token: &PhonemeToken) -> Result<Symbol, TokenError> {
    let phoneme = token.phoneme();
    let entry = table.entry(phoneme).ok_or_else(|| TokenError::UnknownPhoneme {
        code: phoneme.code().to_string(),
    })?;

    let mut text = String::from(entry.glyph);
    if let PhonemeToken::Vowel { vowel, stress } = *token {
        text.push_str(stress_modifier(stress));
        if let Some(fragment) = offglide_modifier(vowel) {
            text.push_str(fragment);
        }
    }
    Ok(Symbol::new(text))
}
