//! Pronunciation dictionaries and locale symbol inventories.
//!
//! Parsers for the three dictionary formats used by the engines (ARPABET
//! CMUdict, IPA CMUdict, pinyin TSV), the CMUdict fetcher, and the
//! per-locale grapheme/phoneme/punctuation sets used to build TTS tokenizer
//! vocabularies.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::G2pResult;

mod cmudict;
mod ipadict;
mod pinyindict;
mod symbols;

pub use cmudict::{fetch_cmudict, parse_cmudict};
pub use ipadict::parse_ipa_dict;
pub use pinyindict::parse_pinyin_dict;
pub use symbols::{
    SUPPORTED_LOCALES, grapheme_character_set, ipa_character_set, ipa_punctuation_list,
    validate_locale,
};

/// Word to pronunciation variants, each variant a list of phoneme tokens.
/// The first variant of a word is its preferred pronunciation.
pub type PronouncingDictionary = HashMap<String, Vec<Vec<String>>>;

/// Read a one-entry-per-line word list (heteronym files). Lines are
/// trimmed and empty lines skipped.
pub fn parse_lines(path: &Path) -> G2pResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_owned).collect())
}
