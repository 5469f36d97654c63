// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consonant phonemes of the ARPAbet inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Consonant {
    P, B, M, W, F, V,
    Th, Dh,
    T, D, S, Z, N, L, R,
    Sh, Zh, Ch, Jh, Y,
    K, G, Ng,
    Hh,
}

/// Vowel phonemes of the ARPAbet inventory, diphthongs included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Vowel {
    Iy, Ih, Uw, Uh,
    Ey, Eh, Ax, Er, Ow, Oy,
    Ae, Aw, Ah, Ay, Aa, Ao,
}

/// A phoneme of the closed inventory, tagged by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phoneme {
    Consonant(Consonant),
    Vowel(Vowel),
}

impl Consonant {
    pub const ALL: [Consonant; 24] = [
        Consonant::P, Consonant::B, Consonant::M, Consonant::W, Consonant::F, Consonant::V,
        Consonant::Th, Consonant::Dh,
        Consonant::T, Consonant::D, Consonant::S, Consonant::Z, Consonant::N, Consonant::L, Consonant::R,
        Consonant::Sh, Consonant::Zh, Consonant::Ch, Consonant::Jh, Consonant::Y,
        Consonant::K, Consonant::G, Consonant::Ng,
        Consonant::Hh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Consonant::P => "P", Consonant::B => "B", Consonant::M => "M",
            Consonant::W => "W", Consonant::F => "F", Consonant::V => "V",
            Consonant::Th => "TH", Consonant::Dh => "DH",
            Consonant::T => "T", Consonant::D => "D", Consonant::S => "S",
            Consonant::Z => "Z", Consonant::N => "N", Consonant::L => "L",
            Consonant::R => "R",
            Consonant::Sh => "SH", Consonant::Zh => "ZH", Consonant::Ch => "CH",
            Consonant::Jh => "JH", Consonant::Y => "Y",
            Consonant::K => "K", Consonant::G => "G", Consonant::Ng => "NG",
            Consonant::Hh => "HH",
        }
    }
}

impl Vowel {
    pub const ALL: [Vowel; 16] = [
        Vowel::Iy, Vowel::Ih, Vowel::Uw, Vowel::Uh,
        Vowel::Ey, Vowel::Eh, Vowel::Ax, Vowel::Er, Vowel::Ow, Vowel::Oy,
        Vowel::Ae, Vowel::Aw, Vowel::Ah, Vowel::Ay, Vowel::Aa, Vowel::Ao,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Vowel::Iy => "IY", Vowel::Ih => "IH", Vowel::Uw => "UW", Vowel::Uh => "UH",
            Vowel::Ey => "EY", Vowel::Eh => "EH", Vowel::Ax => "AX", Vowel::Er => "ER",
            Vowel::Ow => "OW", Vowel::Oy => "OY",
            Vowel::Ae => "AE", Vowel::Aw => "AW", Vowel::Ah => "AH", Vowel::Ay => "AY",
            Vowel::Aa => "AA", Vowel::Ao => "AO",
        }
    }
}

impl Phoneme {
    /// Every phoneme of the inventory, consonants first.
    pub fn all() -> impl Iterator<Item = Phoneme> {
        Consonant::ALL
            .into_iter()
            .map(Phoneme::Consonant)
            .chain(Vowel::ALL.into_iter().map(Phoneme::Vowel))
    }

    /// Canonical uppercase ARPAbet code, without stress digit.
    pub fn code(self) -> &'static str {
        match self {
            Phoneme::Consonant(c) => c.code(),
            Phoneme::Vowel(v) => v.code(),
        }
    }

    pub fn is_vowel(self) -> bool {
        matches!(self, Phoneme::Vowel(_))
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lexical stress, written as the trailing CMUdict digit (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stress {
    #[default]
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    pub const ALL: [Stress; 3] = [Stress::Unstressed, Stress::Primary, Stress::Secondary];

    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }
}

/// One parsed phoneme. Stress only exists on vowels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhonemeToken {
    Consonant(Consonant),
    Vowel { vowel: Vowel, stress: Stress },
}

impl PhonemeToken {
    pub fn phoneme(&self) -> Phoneme {
        match *self {
            PhonemeToken::Consonant(c) => Phoneme::Consonant(c),
            PhonemeToken::Vowel { vowel, .. } => Phoneme::Vowel(vowel),
        }
    }

    pub fn stress(&self) -> Stress {
        match *self {
            PhonemeToken::Consonant(_) => Stress::Unstressed,
            PhonemeToken::Vowel { stress, .. } => stress,
        }
    }

    /// Every token the inventory can produce: each consonant once, each vowel
    /// at every stress level.
    pub fn all() -> impl Iterator<Item = PhonemeToken> {
        Consonant::ALL
            .into_iter()
            .map(PhonemeToken::Consonant)
            .chain(Vowel::ALL.into_iter().flat_map(|vowel| {
                Stress::ALL
                    .into_iter()
                    .map(move |stress| PhonemeToken::Vowel { vowel, stress })
            }))
    }
}

impl fmt::Display for PhonemeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PhonemeToken::Consonant(c) => f.write_str(c.code()),
            PhonemeToken::Vowel { vowel, stress } => {
                let digit = match stress {
                    Stress::Unstressed => '0',
                    Stress::Primary => '1',
                    Stress::Secondary => '2',
                };
                write!(f, "{}{}", vowel.code(), digit)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Manner {
    Stop,
    Fricative,
    Affricate,
    Nasal,
    Liquid,
    Glide,
}

impl Manner {
    /// Stops, fricatives and affricates; only these contrast in voicing.
    pub fn is_obstruent(self) -> bool {
        matches!(self, Manner::Stop | Manner::Fricative | Manner::Affricate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Place {
    Labial,
    Dental,
    Alveolar,
    Palatal,
    Velar,
    Glottal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voicing {
    Voiced,
    Voiceless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Height {
    High,
    Mid,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backness {
    Front,
    Central,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenseness {
    Tense,
    Lax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsonantFeatures {
    pub manner: Manner,
    pub place: Place,
    pub voicing: Voicing,
}

/// For diphthongs these describe the nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VowelFeatures {
    pub height: Height,
    pub backness: Backness,
    pub tenseness: Tenseness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureVector {
    Consonant(ConsonantFeatures),
    Vowel(VowelFeatures),
}

/// A composed AltEnglish symbol for one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Marker for a position whose token could not be resolved.
    pub fn placeholder(raw: &str) -> Self {
        Self(format!("<?>({})", raw.trim().to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn inventory_has_forty_unique_codes() {
        let codes: HashSet<&str> = Phoneme::all().map(Phoneme::code).collect();
        assert_eq!(codes.len(), 40);
        assert!(codes.contains("NG"));
        assert!(codes.contains("AX"));
    }

    #[test]
    fn token_space_counts_vowels_three_times() {
        assert_eq!(PhonemeToken::all().count(), 24 + 16 * 3);
    }

    #[test]
    fn token_display_uses_cmudict_digits() {
        let token = PhonemeToken::Vowel { vowel: Vowel::Ae, stress: Stress::Primary };
        assert_eq!(token.to_string(), "AE1");
        assert_eq!(PhonemeToken::Consonant(Consonant::Ng).to_string(), "NG");
    }

    #[test]
    fn placeholder_uppercases_raw_token() {
        assert_eq!(Symbol::placeholder(" qx1 ").as_str(), "<?>(QX1)");
    }
}
