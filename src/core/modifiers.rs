// src/core/modifiers.rs
use crate::core::types::{Consonant, Phoneme, Stress, Vowel};

pub const PRIMARY_STRESS: &str = "ˈ";
pub const SECONDARY_STRESS: &str = "ˌ";

/// A gliding second component, written with the glyph of the sound it glides to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offglide {
    pub nucleus: Vowel,
    pub target: Phoneme,
    pub fragment: &'static str,
}

/// `ER` is not a diphthong but its r-colouring is written the same way.
pub const OFFGLIDES: [Offglide; 4] = [
    Offglide { nucleus: Vowel::Ay, target: Phoneme::Vowel(Vowel::Iy), fragment: "▲" },
    Offglide { nucleus: Vowel::Aw, target: Phoneme::Vowel(Vowel::Uw), fragment: "▲—" },
    Offglide { nucleus: Vowel::Oy, target: Phoneme::Vowel(Vowel::Ih), fragment: "▲|" },
    Offglide { nucleus: Vowel::Er, target: Phoneme::Consonant(Consonant::R), fragment: "⊣>>" },
];

/// Identity (empty) for unstressed, distinct marks for primary and secondary.
pub fn stress_modifier(stress: Stress) -> &'static str {
    match stress {
        Stress::Unstressed => "",
        Stress::Primary => PRIMARY_STRESS,
        Stress::Secondary => SECONDARY_STRESS,
    }
}

pub fn offglide(vowel: Vowel) -> Option<&'static Offglide> {
    OFFGLIDES.iter().find(|glide| glide.nucleus == vowel)
}

pub fn offglide_modifier(vowel: Vowel) -> Option<&'static str> {
    offglide(vowel).map(|glide| glide.fragment)
}

pub fn offglide_target(vowel: Vowel) -> Option<Phoneme> {
    offglide(vowel).map(|glide| glide.target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstressed_is_identity_and_marks_differ() {
        assert_eq!(stress_modifier(Stress::Unstressed), "");
        assert_ne!(stress_modifier(Stress::Primary), stress_modifier(Stress::Secondary));
        assert!(!stress_modifier(Stress::Primary).is_empty());
        assert!(!stress_modifier(Stress::Secondary).is_empty());
    }

    #[test]
    fn only_gliding_vowels_have_offglides() {
        for vowel in Vowel::ALL {
            let expected = matches!(vowel, Vowel::Ay | Vowel::Aw | Vowel::Oy | Vowel::Er);
            assert_eq!(offglide_modifier(vowel).is_some(), expected, "{}", vowel.code());
        }
        assert_eq!(offglide_target(Vowel::Aw), Some(Phoneme::Vowel(Vowel::Uw)));
    }
}
