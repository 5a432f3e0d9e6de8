//! Per-locale symbol inventories.
//!
//! These sets define the grapheme, IPA phoneme, and punctuation vocabularies
//! a TTS tokenizer needs for each supported locale. The IPA sets cover the
//! symbols that occur in the NVIDIA IPA dictionaries for each language.

use std::collections::BTreeSet;

use crate::error::{G2pError, G2pResult};
use crate::text::GraphemeCase;

/// Locales with dedicated tokenization and symbol-set support.
pub const SUPPORTED_LOCALES: &[&str] = &["de-DE", "en-US", "es-ES"];

/// Punctuation shared by all supported locales.
const DEFAULT_PUNCTUATION: &[char] = &[
    ',', '.', '!', '?', '-', ':', ';', '/', '"', '(', ')', '[', ']', '{', '}',
];

const GRAPHEMES_EN_US: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const GRAPHEMES_DE_DE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÜẞ";
const GRAPHEMES_ES_ES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZÁÉÍÑÓÚÜ";

const IPA_EN_US: &[char] = &[
    'a', 'b', 'd', 'e', 'f', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'z', 'æ', 'ð', 'ŋ', 'ɐ', 'ɑ', 'ɔ', 'ə', 'ɚ', 'ɛ', 'ɜ', 'ɡ', 'ɪ', 'ɬ', 'ɹ',
    'ɾ', 'ʃ', 'ʊ', 'ʌ', 'ʒ', 'ʔ', 'ʲ', '\u{0303}', '\u{0329}', 'θ', 'ᵻ',
];

const IPA_ES_ES: &[char] = &[
    'a', 'b', 'd', 'e', 'f', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'r', 's', 't', 'u',
    'w', 'x', 'ð', 'ŋ', 'ɛ', 'ɡ', 'ɣ', 'ɪ', 'ɲ', 'ɾ', 'ʃ', 'ʊ', 'ʎ', 'ʒ', 'ʝ', 'β', 'θ',
];

const IPA_DE_DE: &[char] = &[
    'a', 'b', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'r', 's', 't',
    'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ü', 'ç', 'ð', 'ø', 'ŋ', 'œ', 'ɐ', 'ɑ', 'ɒ', 'ɔ',
    'ə', 'ɛ', 'ɜ', 'ɡ', 'ɪ', 'ɹ', 'ɾ', 'ʃ', 'ʊ', 'ʌ', 'ʒ', '\u{0303}', 'θ',
];

/// Check that a locale has tokenization and lexicon support.
///
/// # Errors
/// Returns [`G2pError::UnsupportedLocale`] for anything outside
/// [`SUPPORTED_LOCALES`].
pub fn validate_locale(locale: &str) -> G2pResult<()> {
    if SUPPORTED_LOCALES.contains(&locale) {
        Ok(())
    } else {
        Err(G2pError::UnsupportedLocale(locale.to_string()))
    }
}

/// The grapheme inventory of a locale, folded to the requested case.
/// `Mixed` returns the union of both cases.
pub fn grapheme_character_set(locale: &str, case: GraphemeCase) -> G2pResult<BTreeSet<char>> {
    let base = match locale {
        "en-US" => GRAPHEMES_EN_US,
        "de-DE" => GRAPHEMES_DE_DE,
        "es-ES" => GRAPHEMES_ES_ES,
        other => return Err(G2pError::UnsupportedLocale(other.to_string())),
    };

    let mut set = BTreeSet::new();
    for ch in base.chars() {
        match case {
            GraphemeCase::Upper => set.extend(ch.to_uppercase()),
            GraphemeCase::Lower => set.extend(ch.to_lowercase()),
            GraphemeCase::Mixed => {
                set.extend(ch.to_uppercase());
                set.extend(ch.to_lowercase());
            }
        }
    }
    Ok(set)
}

/// The IPA phoneme inventory of a locale.
pub fn ipa_character_set(locale: &str) -> G2pResult<BTreeSet<char>> {
    let set = match locale {
        "en-US" => IPA_EN_US,
        "de-DE" => IPA_DE_DE,
        "es-ES" => IPA_ES_ES,
        other => return Err(G2pError::UnsupportedLocale(other.to_string())),
    };
    Ok(set.iter().copied().collect())
}

/// The punctuation a locale's text may carry, sorted and duplicate-free.
/// German adds its quotation marks and guillemets, Spanish adds the
/// inverted marks and guillemets.
pub fn ipa_punctuation_list(locale: &str) -> G2pResult<Vec<char>> {
    validate_locale(locale)?;

    let mut punct: BTreeSet<char> = DEFAULT_PUNCTUATION.iter().copied().collect();
    match locale {
        "de-DE" => punct.extend(['«', '»', '‹', '›', '„', '“', '”', '‘', '’']),
        "es-ES" => punct.extend(['«', '»', '¡', '¿']),
        _ => {}
    }
    Ok(punct.into_iter().collect())
}
