//! Text preparation utilities shared by all G2P engines.
//!
//! Provides Unicode normalization, grapheme case folding, and word
//! tokenization with `|...|` passthrough regions.

mod normalize;
mod tokenize;

pub use normalize::{
    GraphemeCase, LATIN_CHARS_ALL, is_fully_uppercase, normalize_unicode_text, set_grapheme_case,
};
pub use tokenize::{Token, any_locale_word_tokenize, english_word_tokenize};
