//! Unicode and case normalization for grapheme input.
//!
//! Dictionaries and input sentences must agree on a Unicode normal form and
//! on letter case before any lookup can work; everything here is the shared
//! ground the tokenizers and engines stand on.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

/// Regex character-class fragment covering Roman letters plus the Latin-1
/// accented ranges. Used by the any-locale tokenizer and the engines'
/// letter/digit checks.
pub const LATIN_CHARS_ALL: &str = "a-zA-ZÀ-ÖØ-öø-ÿ";

/// Case treatment applied to graphemes before dictionary lookup.
///
/// Phoneme sets are typically lowercase, so folding graphemes to uppercase
/// keeps the two symbol sets disjoint without a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphemeCase {
    /// Fold all graphemes to uppercase (default).
    #[default]
    Upper,
    /// Fold all graphemes to lowercase.
    Lower,
    /// Keep graphemes as written.
    Mixed,
}

impl std::fmt::Display for GraphemeCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphemeCase::Upper => write!(f, "upper"),
            GraphemeCase::Lower => write!(f, "lower"),
            GraphemeCase::Mixed => write!(f, "mixed"),
        }
    }
}

/// Normalize text to Unicode NFC form.
///
/// Composed form keeps accented dictionary keys and accented input
/// byte-identical (`é` as one code point, not `e` + combining acute).
/// Already-normalized text is returned as-is via the quick check.
pub fn normalize_unicode_text(text: &str) -> String {
    match is_nfc_quick(text.chars()) {
        IsNormalized::Yes => text.to_owned(),
        _ => text.nfc().collect(),
    }
}

/// Apply a [`GraphemeCase`] to a word or sentence.
pub fn set_grapheme_case(text: &str, case: GraphemeCase) -> String {
    match case {
        GraphemeCase::Upper => text.to_uppercase(),
        GraphemeCase::Lower => text.to_lowercase(),
        GraphemeCase::Mixed => text.to_owned(),
    }
}

/// Whether a word contains at least one cased character and no lowercase
/// characters. Mirrors Python's `str.isupper`, which the mixed-case
/// dictionary augmentation relies on.
pub fn is_fully_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
