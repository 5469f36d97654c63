// File: src/core/text.rs
use regex::Regex;
use std::sync::OnceLock;

/// A slice of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// ASCII letters with at most one inner apostrophe: `don't`, `o'clock`.
    Word(&'a str),
    Space(&'a str),
    /// Any other single character.
    Punct(&'a str),
}

// Every character falls in exactly one alternative, so matches tile the input.
fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|\s+|[^A-Za-z\s]").expect("segment pattern compiles")
    })
}

/// Splits text into words, whitespace runs and single punctuation characters.
/// Concatenating the segments gives back the input.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    segment_pattern()
        .find_iter(text)
        .map(|m| {
            let s = m.as_str();
            match s.chars().next() {
                Some(c) if c.is_ascii_alphabetic() => Segment::Word(s),
                Some(c) if c.is_whitespace() => Segment::Space(s),
                _ => Segment::Punct(s),
            }
        })
        .collect()
}

/// Just the words, in order.
pub fn words(text: &str) -> Vec<&str> {
    segments(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Word(word) => Some(word),
            _ => None,
        })
        .collect()
}
