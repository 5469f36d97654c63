use serde::Serialize;

use crate::audio::{AudioRenderer, AudioReport};
use crate::core::converter::{transliterate, Transliteration};
use crate::core::text::{segments, Segment};
use crate::error::LexiconError;
use crate::lexicon::{select_variant, Pronunciation, PronunciationSource};

/// One word, its chosen pronunciation and the symbols for it.
#[derive(Debug, Clone, Serialize)]
pub struct WordReport {
    pub word: String,
    pub phones: Pronunciation,
    /// How many variants the dictionary listed; the first one is used.
    pub variants: usize,
    pub transliteration: Transliteration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordEntry {
    Found(WordReport),
    NotFound { word: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceReport {
    pub text: String,
    pub words: Vec<WordEntry>,
    /// The sentence with every word replaced by its symbols.
    pub rendered: String,
    pub missing_words: Vec<String>,
    pub unmapped: Vec<String>,
}

impl SentenceReport {
    /// Pronunciations of the words that were found, in order.
    pub fn phone_groups(&self) -> Vec<Pronunciation> {
        self.words
            .iter()
            .filter_map(|entry| match entry {
                WordEntry::Found(report) => Some(report.phones.clone()),
                WordEntry::NotFound { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WordRun {
    pub report: WordReport,
    pub audio: Option<AudioReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceRun {
    pub report: SentenceReport,
    pub audio: Option<AudioReport>,
}

/// Dictionary lookup, transliteration and audio for words and sentences.
pub struct AltEnglishEngine {
    lexicon: Box<dyn PronunciationSource>,
}

impl AltEnglishEngine {
    pub fn new(lexicon: impl PronunciationSource + 'static) -> Self {
        Self {
            lexicon: Box::new(lexicon),
        }
    }

    /// Looks the word up and transliterates its first pronunciation.
    pub fn transliterate_word(&self, word: &str) -> Result<WordReport, LexiconError> {
        let word = word.trim();
        let variants = self.lexicon.pronunciations(word)?;
        let phones = select_variant(&variants)
            .cloned()
            .ok_or_else(|| LexiconError::not_found(word))?;
        if variants.len() > 1 {
            tracing::debug!(word, variants = variants.len(), "using first pronunciation variant");
        }
        Ok(WordReport {
            word: word.to_string(),
            transliteration: transliterate(&phones),
            phones,
            variants: variants.len(),
        })
    }

    /// Transliterates a phoneme sequence given directly, without the dictionary.
    pub fn transliterate_phones(&self, phones: &[String]) -> Transliteration {
        transliterate(phones)
    }

    /// Transliterates every word of `text` on its own. Words missing from the
    /// dictionary become `<?>(word)`; whitespace is kept; punctuation is kept
    /// or blanked.
    pub fn transliterate_sentence(&self, text: &str, preserve_punctuation: bool) -> SentenceReport {
        let mut words = Vec::new();
        let mut rendered = String::new();
        let mut missing_words = Vec::new();
        let mut unmapped = Vec::new();

        for segment in segments(text) {
            match segment {
                Segment::Word(word) => match self.transliterate_word(word) {
                    Ok(report) => {
                        rendered.push_str(&report.transliteration.to_display_string());
                        unmapped.extend(
                            report
                                .transliteration
                                .unknown_codes()
                                .into_iter()
                                .map(str::to_string),
                        );
                        words.push(WordEntry::Found(report));
                    }
                    Err(err) => {
                        if !matches!(err, LexiconError::NotFound { .. }) {
                            tracing::warn!(word, %err, "pronunciation lookup failed");
                        }
                        rendered.push_str(&format!("<?>({word})"));
                        missing_words.push(word.to_string());
                        words.push(WordEntry::NotFound { word: word.to_string() });
                    }
                },
                Segment::Space(space) => rendered.push_str(space),
                Segment::Punct(punct) => {
                    if preserve_punctuation {
                        rendered.push_str(punct);
                    } else {
                        rendered.push(' ');
                    }
                }
            }
        }

        SentenceReport {
            text: text.to_string(),
            words,
            rendered: rendered.trim().to_string(),
            missing_words,
            unmapped,
        }
    }

    /// Transliterates one word and, when a renderer is given, asks for the
    /// spelled and the phoneme-accurate audio. A word missing from the
    /// dictionary returns before any audio request is built.
    pub fn run_word(&self, word: &str, audio: Option<&AudioRenderer>) -> Result<WordRun, LexiconError> {
        let report = self.transliterate_word(word)?;
        let audio = audio.map(|renderer| {
            renderer.render(&report.word, std::slice::from_ref(&report.phones))
        });
        Ok(WordRun { report, audio })
    }

    pub fn run_sentence(
        &self,
        text: &str,
        preserve_punctuation: bool,
        audio: Option<&AudioRenderer>,
    ) -> SentenceRun {
        let report = self.transliterate_sentence(text, preserve_punctuation);
        let audio = audio.map(|renderer| renderer.render(text, &report.phone_groups()));
        SentenceRun { report, audio }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::CmuDict;

    fn engine() -> AltEnglishEngine {
        let mut dict = CmuDict::new();
        dict.insert("this", vec!["DH".into(), "IH1".into(), "S".into()]);
        dict.insert("is", vec!["IH1".into(), "Z".into()]);
        dict.insert("either", vec!["IY1".into(), "DH".into(), "ER0".into()]);
        dict.insert("either", vec!["AY1".into(), "DH".into(), "ER0".into()]);
        dict.insert("odd", vec!["AA1".into(), "QX".into()]);
        AltEnglishEngine::new(dict)
    }

    #[test]
    fn first_variant_wins() {
        let report = engine().transliterate_word("Either").unwrap();
        assert_eq!(report.variants, 2);
        assert_eq!(report.phones[0], "IY1");
        assert_eq!(report.transliteration.symbols[0].as_str(), "▲ˈ");
    }

    #[test]
    fn missing_word_is_not_found() {
        assert!(matches!(
            engine().transliterate_word("zzyzx"),
            Err(LexiconError::NotFound { .. })
        ));
    }

    #[test]
    fn sentence_keeps_spacing_and_marks_missing_words() {
        let report = engine().transliterate_sentence("This is zzyzx!", true);
        assert_eq!(report.rendered, "∆~· ▲|ˈ ⊣~ ▲|ˈ ⊣~· <?>(zzyzx)!");
        assert_eq!(report.missing_words, vec!["zzyzx"]);
        assert_eq!(report.phone_groups().len(), 2);
    }

    #[test]
    fn sentence_can_blank_punctuation() {
        let report = engine().transliterate_sentence("is, is.", false);
        assert_eq!(report.rendered, "▲|ˈ ⊣~·  ▲|ˈ ⊣~·");
    }

    #[test]
    fn sentence_collects_unmapped_phones() {
        let report = engine().transliterate_sentence("odd", true);
        assert_eq!(report.unmapped, vec!["QX"]);
        assert_eq!(report.rendered, "▼—ˈ <?>(QX)");
    }
}
