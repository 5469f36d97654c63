// src/core/features.rs
//! The phoneme inventory: one feature vector and one base glyph per phoneme.
//!
//! Glyphs are authored by hand. Consonants are a place shape (`□` labial,
//! `∆` dental, `⊣` alveolar, `Ω` palatal, `⌂` velar, `○` glottal) followed by a
//! manner mark (none for stops, `~` fricative, `+` affricate, `°` nasal,
//! `>` liquid, `>>` glide) and a `·` on voiced obstruents. Vowels are a height
//! shape (`▲` high, `▶` mid, `▼` low), a backness mark (none front, `=`
//! central, `—` back) and a `|` when lax.
//!
//! The feature vectors are glyph coordinates, not a phonetic analysis. Each
//! phoneme needs its own cell, so a few sit where the grid has room: `R` is a
//! glide next to the liquid `L`, and the diphthongs take the cell of their
//! nucleus with tenseness as the tiebreak (`AY` low central tense, `AW` low
//! front lax, which pushes `AE` to tense). The offglide carries the rest.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::core::composer::compose_with;
use crate::core::modifiers::OFFGLIDES;
use crate::core::types::{
    Backness::*, ConsonantFeatures, Consonant, FeatureVector, Height::*, Manner::*, Phoneme,
    PhonemeToken, Place::*, Tenseness::*, Voicing::*, Vowel, VowelFeatures,
};
use crate::core::types::{Backness, Height, Manner, Place, Tenseness, Voicing};
use crate::error::{TableError, TokenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureEntry {
    pub phoneme: Phoneme,
    pub features: FeatureVector,
    pub glyph: &'static str,
}

const fn cons(consonant: Consonant, manner: Manner, place: Place, voicing: Voicing, glyph: &'static str) -> FeatureEntry {
    FeatureEntry {
        phoneme: Phoneme::Consonant(consonant),
        features: FeatureVector::Consonant(ConsonantFeatures { manner, place, voicing }),
        glyph,
    }
}

const fn vow(vowel: Vowel, height: Height, backness: Backness, tenseness: Tenseness, glyph: &'static str) -> FeatureEntry {
    FeatureEntry {
        phoneme: Phoneme::Vowel(vowel),
        features: FeatureVector::Vowel(VowelFeatures { height, backness, tenseness }),
        glyph,
    }
}

pub static INVENTORY: [FeatureEntry; 40] = [
    // labial
    cons(Consonant::P, Stop, Labial, Voiceless, "□"),
    cons(Consonant::B, Stop, Labial, Voiced, "□·"),
    cons(Consonant::M, Nasal, Labial, Voiced, "□°"),
    cons(Consonant::W, Glide, Labial, Voiced, "□>>"),
    cons(Consonant::F, Fricative, Labial, Voiceless, "□~"),
    cons(Consonant::V, Fricative, Labial, Voiced, "□~·"),
    // dental
    cons(Consonant::Th, Fricative, Dental, Voiceless, "∆~"),
    cons(Consonant::Dh, Fricative, Dental, Voiced, "∆~·"),
    // alveolar
    cons(Consonant::T, Stop, Alveolar, Voiceless, "⊣"),
    cons(Consonant::D, Stop, Alveolar, Voiced, "⊣·"),
    cons(Consonant::S, Fricative, Alveolar, Voiceless, "⊣~"),
    cons(Consonant::Z, Fricative, Alveolar, Voiced, "⊣~·"),
    cons(Consonant::N, Nasal, Alveolar, Voiced, "⊣°"),
    cons(Consonant::L, Liquid, Alveolar, Voiced, "⊣>"),
    cons(Consonant::R, Glide, Alveolar, Voiced, "⊣>>"),
    // palatal (postalveolar)
    cons(Consonant::Sh, Fricative, Palatal, Voiceless, "Ω~"),
    cons(Consonant::Zh, Fricative, Palatal, Voiced, "Ω~·"),
    cons(Consonant::Ch, Affricate, Palatal, Voiceless, "Ω+"),
    cons(Consonant::Jh, Affricate, Palatal, Voiced, "Ω+·"),
    cons(Consonant::Y, Glide, Palatal, Voiced, "Ω>>"),
    // velar
    cons(Consonant::K, Stop, Velar, Voiceless, "⌂"),
    cons(Consonant::G, Stop, Velar, Voiced, "⌂·"),
    cons(Consonant::Ng, Nasal, Velar, Voiced, "⌂°"),
    // glottal
    cons(Consonant::Hh, Fricative, Glottal, Voiceless, "○~"),
    // high
    vow(Vowel::Iy, High, Front, Tense, "▲"),
    vow(Vowel::Ih, High, Front, Lax, "▲|"),
    vow(Vowel::Uw, High, Back, Tense, "▲—"),
    vow(Vowel::Uh, High, Back, Lax, "▲—|"),
    // mid
    vow(Vowel::Ey, Mid, Front, Tense, "▶"),
    vow(Vowel::Eh, Mid, Front, Lax, "▶|"),
    vow(Vowel::Ax, Mid, Central, Lax, "▶=|"),
    vow(Vowel::Er, Mid, Central, Tense, "▶="),
    vow(Vowel::Ow, Mid, Back, Tense, "▶—"),
    vow(Vowel::Oy, Mid, Back, Lax, "▶—|"),
    // low
    vow(Vowel::Ae, Low, Front, Tense, "▼"),
    vow(Vowel::Aw, Low, Front, Lax, "▼|"),
    vow(Vowel::Ah, Low, Central, Lax, "▼=|"),
    vow(Vowel::Ay, Low, Central, Tense, "▼="),
    vow(Vowel::Aa, Low, Back, Tense, "▼—"),
    vow(Vowel::Ao, Low, Back, Lax, "▼—|"),
];

/// Read-only index over [`INVENTORY`].
#[derive(Debug)]
pub struct FeatureTable {
    entries: &'static [FeatureEntry],
    by_code: HashMap<&'static str, usize>,
    by_phoneme: HashMap<Phoneme, usize>,
}

static GLOBAL_TABLE: OnceLock<FeatureTable> = OnceLock::new();

impl FeatureTable {
    /// Indexes the inventory and runs the self-validation pass.
    pub fn build() -> Result<Self, TableError> {
        Self::from_entries(&INVENTORY)
    }

    pub(crate) fn from_entries(entries: &'static [FeatureEntry]) -> Result<Self, TableError> {
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_phoneme = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let code = entry.phoneme.code();
            if by_code.insert(code, idx).is_some() {
                return Err(TableError::DuplicateCode(code.to_string()));
            }
            by_phoneme.insert(entry.phoneme, idx);
        }
        let table = Self { entries, by_code, by_phoneme };
        table.validate()?;
        Ok(table)
    }

    /// The process-wide table, built and validated on first use.
    pub fn global() -> &'static FeatureTable {
        GLOBAL_TABLE.get_or_init(|| {
            Self::build().unwrap_or_else(|err| panic!("feature table invariant violated: {err}"))
        })
    }

    /// Looks up a base code such as `NG` or `ae`.
    pub fn lookup(&self, code: &str) -> Result<&FeatureEntry, TokenError> {
        let normalized = code.trim().to_ascii_uppercase();
        self.by_code
            .get(normalized.as_str())
            .map(|&idx| &self.entries[idx])
            .ok_or(TokenError::UnknownPhoneme { code: normalized })
    }

    pub fn entry(&self, phoneme: Phoneme) -> Option<&FeatureEntry> {
        self.by_phoneme.get(&phoneme).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeatureEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self) -> Result<(), TableError> {
        let mut features: HashMap<FeatureVector, Phoneme> = HashMap::new();
        let mut glyphs: HashMap<&str, Phoneme> = HashMap::new();
        for entry in self.entries {
            let category_ok = matches!(
                (entry.phoneme, entry.features),
                (Phoneme::Consonant(_), FeatureVector::Consonant(_))
                    | (Phoneme::Vowel(_), FeatureVector::Vowel(_))
            );
            if !category_ok {
                return Err(TableError::CategoryMismatch(entry.phoneme.code().to_string()));
            }
            if let Some(first) = features.insert(entry.features, entry.phoneme) {
                return Err(TableError::DuplicateFeatures {
                    first: first.code().to_string(),
                    second: entry.phoneme.code().to_string(),
                });
            }
            if let Some(first) = glyphs.insert(entry.glyph, entry.phoneme) {
                return Err(TableError::DuplicateGlyph {
                    first: first.code().to_string(),
                    second: entry.phoneme.code().to_string(),
                    glyph: entry.glyph.to_string(),
                });
            }
        }

        for phoneme in Phoneme::all() {
            if self.entry(phoneme).is_none() {
                return Err(TableError::Missing(phoneme.code().to_string()));
            }
        }

        // Offglide fragments must be spelled with their target's base glyph.
        for glide in OFFGLIDES.iter() {
            let target = self
                .entry(glide.target)
                .ok_or_else(|| TableError::Missing(glide.target.code().to_string()))?;
            if target.glyph != glide.fragment {
                return Err(TableError::OffglideMismatch {
                    nucleus: glide.nucleus.code().to_string(),
                    target: glide.target.code().to_string(),
                });
            }
        }

        let mut composed: HashMap<String, PhonemeToken> = HashMap::new();
        for token in PhonemeToken::all() {
            let symbol = compose_with(self, &token)
                .map_err(|_| TableError::Missing(token.phoneme().code().to_string()))?;
            if let Some(first) = composed.insert(symbol.as_str().to_string(), token) {
                return Err(TableError::ComposedCollision {
                    first: first.to_string(),
                    second: token.to_string(),
                    glyph: symbol.as_str().to_string(),
                });
            }
        }
        Ok(())
    }
}
