//! IPA dictionary parsing in CMUdict format.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{G2pError, G2pResult};
use crate::text::normalize_unicode_text;

use super::PronouncingDictionary;

static ALT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([0-9]+\)").unwrap());

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('À'..='Ö').contains(&c)
        || ('Ø'..='ö').contains(&c)
        || ('ø'..='ÿ').contains(&c)
}

/// Parse an IPA dictionary in CMUdict format, e.g.
/// `Wire  ˈwaɪɚ` / `Wire(1)  ˈwaɪɹ`.
///
/// Unlike the ARPABET format, keys keep their case (the engine folds case
/// according to its own policy), entry words may start with any Latin
/// letter, every line is NFC-normalized, and the pronunciation field is
/// split into single characters: each IPA symbol is one phoneme token.
///
/// # Errors
/// Returns an error if the file cannot be read or yields no entries.
pub fn parse_ipa_dict(path: &Path) -> G2pResult<PronouncingDictionary> {
    let content = fs::read_to_string(path)?;

    let mut dict = PronouncingDictionary::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = normalize_unicode_text(line);
        let Some(first) = line.chars().next() else { continue };
        if !(is_latin_letter(first) || first == '\'') {
            continue;
        }

        let Some((head, tail)) = line.split_once(char::is_whitespace) else {
            warn!("{}:{}: no pronunciation field, skipping entry", path.display(), lineno + 1);
            continue;
        };
        let word = ALT_RE.replace_all(head, "").into_owned();
        let pron: Vec<String> =
            tail.chars().filter(|c| !c.is_whitespace()).map(String::from).collect();
        if pron.is_empty() {
            warn!("{}:{}: empty pronunciation, skipping entry", path.display(), lineno + 1);
            continue;
        }

        dict.entry(word).or_default().push(pron);
    }

    if dict.is_empty() {
        return Err(G2pError::EmptyDictionary(path.to_path_buf()));
    }

    debug!("Loaded {} IPA dictionary words from {}", dict.len(), path.display());
    Ok(dict)
}
