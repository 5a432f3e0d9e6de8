//! English ARPABET G2P engine.

use std::collections::HashSet;
use std::path::PathBuf;

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::error::{G2pError, G2pResult};
use crate::lexicon::{PronouncingDictionary, fetch_cmudict, parse_cmudict, parse_lines};
use crate::text::{Token, english_word_tokenize};

use super::{G2p, OovHandler, char_tokens, contains_letter_or_digit};

enum DictSource {
    /// Fetch CMUdict 0.7b into the cache directory.
    Fetch,
    Path(PathBuf),
    Entries(PronouncingDictionary),
}

/// Converts English words to ARPABET phonemes using a CMUdict-format
/// dictionary. Heteronyms, ambiguous words, and out-of-vocabulary words are
/// left in grapheme form (or handed to the OOV hook); plural and possessive
/// forms missing from the dictionary are resolved against their base word.
pub struct EnglishG2p {
    phoneme_dict: PronouncingDictionary,
    heteronyms: HashSet<String>,
    ignore_ambiguous_words: bool,
    phoneme_probability: Option<f64>,
    oov_handler: Option<OovHandler>,
    rng: Mutex<SmallRng>,
}

/// Builder for [`EnglishG2p`]. With no dictionary source set, CMUdict 0.7b
/// is fetched on first use.
pub struct EnglishG2pBuilder {
    dict: DictSource,
    latin1: bool,
    heteronyms_path: Option<PathBuf>,
    heteronym_words: Vec<String>,
    ignore_ambiguous_words: bool,
    phoneme_probability: Option<f64>,
    oov_handler: Option<OovHandler>,
}

impl EnglishG2p {
    pub fn builder() -> EnglishG2pBuilder {
        EnglishG2pBuilder {
            dict: DictSource::Fetch,
            latin1: true,
            heteronyms_path: None,
            heteronym_words: Vec::new(),
            ignore_ambiguous_words: true,
            phoneme_probability: None,
            oov_handler: None,
        }
    }

    fn keep_graphemes(&self) -> bool {
        match self.phoneme_probability {
            Some(p) => self.rng.lock().random::<f64>() > p,
            None => false,
        }
    }

    /// Parse a single word (or punctuation run). Returns the tokens and
    /// whether any rule handled the word; an unhandled word comes back as
    /// characters so the caller can retry its hyphen-split parts.
    fn parse_one_word(&self, word: &str) -> (Vec<String>, bool) {
        if self.keep_graphemes() {
            return (char_tokens(word), true);
        }

        // punctuation or whitespace
        if !contains_letter_or_digit(word) {
            return (char_tokens(word), true);
        }

        // heteronyms stay as graphemes for a downstream disambiguator
        if self.heteronyms.contains(word) {
            return (char_tokens(word), true);
        }

        // `'s` suffix: resolve against the base word
        if let Some(base) = word.strip_suffix("'s")
            && !base.is_empty()
            && !self.phoneme_dict.contains_key(word)
            && let Some(prons) = self.phoneme_dict.get(base)
            && (!self.ignore_ambiguous_words || prons.len() == 1)
        {
            let mut pron = prons[0].clone();
            pron.push("Z".to_string());
            return (pron, true);
        }

        // `s` suffix
        if let Some(base) = word.strip_suffix('s')
            && !base.is_empty()
            && !self.phoneme_dict.contains_key(word)
            && let Some(prons) = self.phoneme_dict.get(base)
            && (!self.ignore_ambiguous_words || prons.len() == 1)
        {
            let mut pron = prons[0].clone();
            pron.push("Z".to_string());
            return (pron, true);
        }

        // dictionary lookup; ambiguous words resolve to their first variant
        // only when allowed
        if let Some(prons) = self.phoneme_dict.get(word)
            && (!self.ignore_ambiguous_words || prons.len() == 1)
        {
            return (prons[0].clone(), true);
        }

        if let Some(handler) = &self.oov_handler {
            return (handler(word), true);
        }

        (char_tokens(word), false)
    }
}

impl G2p for EnglishG2p {
    fn convert(&self, text: &str) -> G2pResult<Vec<String>> {
        let mut prons = Vec::new();

        for token in english_word_tokenize(text) {
            match token {
                Token::Unchanged(words) => prons.extend(words),
                Token::Changeable(word) => {
                    let (mut pron, handled) = self.parse_one_word(&word);

                    // An unhandled hyphenated word may still have known
                    // parts; parse them independently, joined by "-"
                    if !handled && word.contains('-') {
                        pron.clear();
                        for (i, part) in word.split('-').enumerate() {
                            if i > 0 {
                                pron.push("-".to_string());
                            }
                            let (p, _) = self.parse_one_word(part);
                            pron.extend(p);
                        }
                    }

                    prons.extend(pron);
                }
            }
        }

        Ok(prons)
    }
}

impl EnglishG2pBuilder {
    /// Use a CMUdict-format dictionary file instead of fetching CMUdict.
    pub fn phoneme_dict(mut self, path: impl Into<PathBuf>) -> Self {
        self.dict = DictSource::Path(path.into());
        self
    }

    /// Use an in-memory dictionary. Keys are expected lowercased, the way
    /// [`parse_cmudict`] produces them.
    pub fn entries(mut self, dict: PronouncingDictionary) -> Self {
        self.dict = DictSource::Entries(dict);
        self
    }

    /// Whether the dictionary file is Latin-1 encoded (CMUdict 0.7b is).
    /// Defaults to true.
    pub fn latin1(mut self, latin1: bool) -> Self {
        self.latin1 = latin1;
        self
    }

    /// Load the heteronym skip list from a file, one word per line.
    pub fn heteronyms(mut self, path: impl Into<PathBuf>) -> Self {
        self.heteronyms_path = Some(path.into());
        self
    }

    /// Provide heteronyms directly.
    pub fn heteronym_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heteronym_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Skip words with multiple pronunciation variants (leave them as
    /// graphemes) instead of taking the first variant. Defaults to true.
    pub fn ignore_ambiguous_words(mut self, ignore: bool) -> Self {
        self.ignore_ambiguous_words = ignore;
        self
    }

    /// Phonemize each eligible word with this probability, keeping its
    /// graphemes otherwise. Used to augment mixed grapheme/phoneme training
    /// input. `None` (the default) always phonemizes.
    pub fn phoneme_probability(mut self, p: f64) -> Self {
        self.phoneme_probability = Some(p);
        self
    }

    /// Hook for out-of-vocabulary words.
    pub fn oov_handler(mut self, f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.oov_handler = Some(Box::new(f));
        self
    }

    /// # Errors
    /// Returns an error if the dictionary cannot be loaded or the
    /// probability is out of range.
    pub fn build(self) -> G2pResult<EnglishG2p> {
        if let Some(p) = self.phoneme_probability
            && !(0.0..=1.0).contains(&p)
        {
            return Err(G2pError::Config(format!("phoneme probability {p} not in [0.0, 1.0]")));
        }

        let phoneme_dict = match self.dict {
            DictSource::Fetch => {
                let path = fetch_cmudict()?;
                parse_cmudict(&path, self.latin1)?
            }
            DictSource::Path(path) => parse_cmudict(&path, self.latin1)?,
            DictSource::Entries(dict) => dict,
        };

        let mut heteronyms: HashSet<String> = self.heteronym_words.into_iter().collect();
        if let Some(path) = &self.heteronyms_path {
            heteronyms.extend(parse_lines(path)?);
        }

        if self.oov_handler.is_none() {
            warn!(
                "No OOV handler set; words not handled by any rule stay in grapheme form. \
                 This is intended when graphemes and phonemes are both valid model inputs."
            );
        }

        info!(
            "English G2P ready: {} dictionary words, {} heteronyms",
            phoneme_dict.len(),
            heteronyms.len()
        );

        Ok(EnglishG2p {
            phoneme_dict,
            heteronyms,
            ignore_ambiguous_words: self.ignore_ambiguous_words,
            phoneme_probability: self.phoneme_probability,
            oov_handler: self.oov_handler,
            rng: Mutex::new(SmallRng::from_os_rng()),
        })
    }
}
