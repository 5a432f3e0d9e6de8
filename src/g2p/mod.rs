//! Grapheme-to-phoneme engines.
//!
//! Three engines implement the [`G2p`] trait: [`EnglishG2p`] converts to
//! ARPABET phonemes via a CMUdict dictionary, [`IpaG2p`] converts to IPA for
//! any supported locale, and [`ChineseG2p`] converts hanzi to phonemes via
//! pinyin readings. All of them are dictionary-driven with rule fallbacks;
//! words no rule handles stay in grapheme form so that a model trained on
//! mixed grapheme/phoneme input can still consume them.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::G2pResult;
use crate::text::LATIN_CHARS_ALL;

mod chinese;
mod english;
mod ipa;

pub use chinese::{ChineseG2p, ChineseG2pBuilder, WordSegmenter};
pub use english::{EnglishG2p, EnglishG2pBuilder};
pub use ipa::{IpaG2p, IpaG2pBuilder};

/// A grapheme-to-phoneme engine.
pub trait G2p: Send + Sync {
    /// Convert text into a sequence of phoneme tokens. Tokens the engine
    /// cannot phonemize come out as single graphemes.
    fn convert(&self, text: &str) -> G2pResult<Vec<String>>;
}

/// Hook applied to out-of-vocabulary words. Receives the word (after any
/// case folding the engine does) and returns the tokens to emit for it.
pub type OovHandler = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

static CHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"[{LATIN_CHARS_ALL}\d]")).unwrap());

/// True if the token contains at least one letter or digit. Tokens failing
/// this are punctuation/whitespace runs and always stay as characters.
pub(crate) fn contains_letter_or_digit(token: &str) -> bool {
    CHAR_RE.is_match(token)
}

/// Split a word into one token per character.
pub(crate) fn char_tokens(word: &str) -> Vec<String> {
    word.chars().map(String::from).collect()
}
