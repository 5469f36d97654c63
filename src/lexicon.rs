// File: src/lexicon.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LexiconError;
use crate::persistence::{load_snapshot, save_snapshot};

/// One pronunciation: raw ARPAbet tokens with stress digits, e.g. `["HH", "AH0", "L", "OW1"]`.
pub type Pronunciation = Vec<String>;

/// Anything that can turn a spelled word into pronunciations.
pub trait PronunciationSource: Send + Sync {
    /// Variants in dictionary order. An unknown word is `LexiconError::NotFound`,
    /// never an empty list.
    fn pronunciations(&self, word: &str) -> Result<Vec<Pronunciation>, LexiconError>;
}

/// Picks the first listed variant.
pub fn select_variant(variants: &[Pronunciation]) -> Option<&Pronunciation> {
    variants.first()
}

pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// An in-memory CMU Pronouncing Dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmuDict {
    entries: HashMap<String, Vec<Pronunciation>>,
}

impl CmuDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads either the classic `WORD  P1 P2` layout (`;;;` comments) or the
    /// `cmudict.dict` layout (`word p1 p2 # comment`). `WORD(2)` lines append a
    /// variant to `WORD`.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut dict = Self::new();
        for (line_no, bytes) in reader.split(b'\n').enumerate() {
            let bytes = bytes.map_err(|e| LexiconError::io("reading dictionary", e))?;
            // Older releases are Latin-1; headwords we care about are ASCII.
            let line = String::from_utf8_lossy(&bytes);
            let line = match line.find(" #") {
                Some(idx) => &line[..idx],
                None => &line[..],
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(head) = fields.next() else { continue };
            let phones: Pronunciation = fields.map(str::to_string).collect();
            if phones.is_empty() {
                tracing::warn!(line = line_no + 1, head, "dictionary entry without phones");
                continue;
            }
            dict.insert(strip_variant_suffix(head), phones);
        }
        Ok(dict)
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let file = File::open(path).map_err(|e| LexiconError::io("opening dictionary", e))?;
        let dict = Self::parse(BufReader::new(file))?;
        tracing::info!(path = %path.display(), words = dict.len(), "pronunciation dictionary loaded");
        Ok(dict)
    }

    /// Loads `source`, going through the bincode snapshot when it is current.
    /// A snapshot that cannot be read or refreshed only costs a re-parse.
    pub fn open(source: &Path, snapshot: Option<&Path>) -> Result<Self, LexiconError> {
        let Some(snapshot) = snapshot else {
            return Self::from_path(source);
        };

        if snapshot_is_current(source, snapshot) {
            match load_snapshot(snapshot) {
                Ok(dict) => {
                    tracing::info!(path = %snapshot.display(), words = dict.len(), "dictionary snapshot loaded");
                    return Ok(dict);
                }
                Err(err) => tracing::warn!(%err, "ignoring unreadable dictionary snapshot"),
            }
        }

        let dict = Self::from_path(source)?;
        if let Err(err) = save_snapshot(&dict, snapshot) {
            tracing::warn!(%err, "could not refresh dictionary snapshot");
        }
        Ok(dict)
    }

    pub fn insert(&mut self, word: &str, phones: Pronunciation) {
        self.entries
            .entry(normalize_word(word))
            .or_default()
            .push(phones);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize_word(word))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronunciationSource for CmuDict {
    fn pronunciations(&self, word: &str) -> Result<Vec<Pronunciation>, LexiconError> {
        let key = normalize_word(word);
        match self.entries.get(&key) {
            Some(variants) if !variants.is_empty() => Ok(variants.clone()),
            _ => Err(LexiconError::not_found(word.trim())),
        }
    }
}

fn strip_variant_suffix(head: &str) -> &str {
    match head.find('(') {
        Some(idx) if head.ends_with(')') && idx > 0 => &head[..idx],
        _ => head,
    }
}

fn snapshot_is_current(source: &Path, snapshot: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
    match (modified(source), modified(snapshot)) {
        (Some(src), Some(snap)) => snap >= src,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CLASSIC: &str = "\
;;; # CMUdict  --  Major Version: 0.07
THIS  DH IH1 S
TOMATO  T AH0 M EY1 T OW2
TOMATO(2)  T AH0 M AA1 T OW2
";

    const MODERN: &str = "\
language l ae1 ng g w ih0 jh
this dh ih1 s # common
either iy1 dh er0
either(2) ay1 dh er0
";

    #[test]
    fn parses_classic_layout_with_variants_in_order() {
        let dict = CmuDict::parse(Cursor::new(CLASSIC)).unwrap();
        assert_eq!(dict.len(), 2);
        let variants = dict.pronunciations("Tomato").unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(select_variant(&variants).unwrap()[3], "EY1");
        assert_eq!(variants[1][3], "AA1");
    }

    #[test]
    fn parses_modern_layout_and_strips_comments() {
        let dict = CmuDict::parse(Cursor::new(MODERN)).unwrap();
        assert_eq!(dict.pronunciations("this").unwrap(), vec![vec!["dh", "ih1", "s"]]);
        assert_eq!(dict.pronunciations("either").unwrap().len(), 2);
        assert!(dict.contains(" LANGUAGE "));
    }

    #[test]
    fn keeps_headwords_that_start_with_a_hash() {
        let dict = CmuDict::parse(Cursor::new("#HASH-MARK  HH AE1 M AA2 R K\n")).unwrap();
        assert!(dict.contains("#hash-mark"));
    }

    #[test]
    fn skips_entries_without_phones() {
        let dict = CmuDict::parse(Cursor::new("EMPTY\nOK  OW1 K EY1\n")).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(!dict.contains("empty"));
    }

    #[test]
    fn unknown_word_is_not_found() {
        let dict = CmuDict::parse(Cursor::new(CLASSIC)).unwrap();
        let err = dict.pronunciations("blorftastic").unwrap_err();
        assert!(matches!(err, LexiconError::NotFound { word } if word == "blorftastic"));
    }

    #[test]
    fn variant_suffix_only_strips_trailing_parens() {
        assert_eq!(strip_variant_suffix("READ(1)"), "READ");
        assert_eq!(strip_variant_suffix("(PAREN"), "(PAREN");
        assert_eq!(strip_variant_suffix("PLAIN"), "PLAIN");
    }
}
