//! Word tokenization for G2P input.
//!
//! Splits a sentence into words, punctuation runs, and `|...|` passthrough
//! regions. A passthrough region carries tokens that are already in phoneme
//! form (e.g. `|EY1 B IY1|`) and must reach the output untouched.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::LATIN_CHARS_ALL;

/// One unit of tokenized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word or punctuation run that the engine may rewrite.
    Changeable(String),
    /// Contents of a `|...|` region, split on whitespace, emitted verbatim.
    Unchanged(Vec<String>),
}

// Three alternatives per pattern: (1) a word with optional internal hyphens
// and apostrophes, (2) a |...| passthrough region, (3) a run of anything
// else. A lone `|` without a closing partner falls into the third group.
static WORDS_RE_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z]+(?:[a-zA-Z\-']*[a-zA-Z]+)*)|(\|[^|]*\|)|([^a-zA-Z|]+|\|)").unwrap()
});

static WORDS_RE_ANY_LOCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"([{L}]+(?:[{L}\-']*[{L}]+)*)|(\|[^|]*\|)|([^{L}|]+|\|)",
        L = LATIN_CHARS_ALL
    ))
    .unwrap()
});

fn tokenize_with(re: &Regex, text: &str, lowercase_words: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    for caps in re.captures_iter(text) {
        if let Some(word) = caps.get(1) {
            let word = if lowercase_words { word.as_str().to_lowercase() } else { word.as_str().to_owned() };
            tokens.push(Token::Changeable(word));
        } else if let Some(region) = caps.get(2) {
            // Strip the enclosing pipes, then split the pre-phonemized tokens.
            let inner = &region.as_str()[1..region.as_str().len() - 1];
            tokens.push(Token::Unchanged(inner.split_whitespace().map(str::to_owned).collect()));
        } else if let Some(punct) = caps.get(3) {
            tokens.push(Token::Changeable(punct.as_str().to_owned()));
        }
    }
    tokens
}

/// Tokenize English text: ASCII-letter words (lowercased), `|...|` regions,
/// and punctuation runs. Digits land in punctuation runs and are resolved by
/// the per-word parser downstream.
pub fn english_word_tokenize(text: &str) -> Vec<Token> {
    tokenize_with(&WORDS_RE_EN, text, true)
}

/// Tokenize text of any Latin-script locale: accented letters count as word
/// characters and the original case is preserved for the engine's own case
/// folding.
pub fn any_locale_word_tokenize(text: &str) -> Vec<Token> {
    tokenize_with(&WORDS_RE_ANY_LOCALE, text, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Changeable(s.to_owned())
    }

    #[test]
    fn test_english_words_and_punctuation() {
        let tokens = english_word_tokenize("Hello, world!");
        assert_eq!(tokens, vec![word("hello"), word(", "), word("world"), word("!")]);
    }

    #[test]
    fn test_apostrophes_and_hyphens_stay_in_word() {
        let tokens = english_word_tokenize("don't mother-in-law");
        assert_eq!(tokens, vec![word("don't"), word(" "), word("mother-in-law")]);
    }

    #[test]
    fn test_unchanged_region_splits_on_spaces() {
        let tokens = english_word_tokenize("say |EY1 B IY1| now");
        assert_eq!(
            tokens,
            vec![
                word("say"),
                word(" "),
                Token::Unchanged(vec!["EY1".into(), "B".into(), "IY1".into()]),
                word(" "),
                word("now"),
            ]
        );
    }

    #[test]
    fn test_unpaired_pipe_is_punctuation() {
        let tokens = english_word_tokenize("a | b");
        assert_eq!(tokens, vec![word("a"), word(" "), word("|"), word(" "), word("b")]);
    }

    #[test]
    fn test_accented_letters_split_by_english_tokenizer() {
        // The English tokenizer only knows ASCII letters
        let tokens = english_word_tokenize("señor");
        assert_eq!(tokens, vec![word("se"), word("ñ"), word("or")]);
    }

    #[test]
    fn test_any_locale_keeps_accents_and_case() {
        let tokens = any_locale_word_tokenize("Señor Müller");
        assert_eq!(tokens, vec![word("Señor"), word(" "), word("Müller")]);
    }

    #[test]
    fn test_digits_fall_into_punctuation_runs() {
        let tokens = english_word_tokenize("route 66");
        assert_eq!(tokens, vec![word("route"), word(" 66")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(english_word_tokenize("").is_empty());
        assert!(any_locale_word_tokenize("").is_empty());
    }

    #[test]
    fn test_full_coverage_outside_markers() {
        // Concatenating all token text must reproduce the input; only words
        // are lowercased, passthrough regions keep their case
        let text = "Ab3 -- c'd, |X Y| ey";
        let mut rebuilt = String::new();
        for token in english_word_tokenize(text) {
            match token {
                Token::Changeable(s) => rebuilt.push_str(&s),
                Token::Unchanged(parts) => {
                    rebuilt.push('|');
                    rebuilt.push_str(&parts.join(" "));
                    rebuilt.push('|');
                }
            }
        }
        assert_eq!(rebuilt, "ab3 -- c'd, |X Y| ey");
    }
}
