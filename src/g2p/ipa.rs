//! Multi-locale IPA G2P engine.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tracing::{info, warn};

use crate::error::{G2pError, G2pResult};
use crate::lexicon::{PronouncingDictionary, parse_ipa_dict, parse_lines, validate_locale};
use crate::text::{
    GraphemeCase, LATIN_CHARS_ALL, Token, any_locale_word_tokenize, english_word_tokenize,
    is_fully_uppercase, normalize_unicode_text, set_grapheme_case,
};

use super::{G2p, OovHandler, char_tokens, contains_letter_or_digit};

/// Lexical stress markers, dropped from pronunciations when `use_stresses`
/// is off.
const STRESS_SYMBOLS: [&str; 2] = ["ˈ", "ˌ"];

static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"[^{LATIN_CHARS_ALL}\d]")).unwrap());

enum DictSource {
    Path(PathBuf),
    Entries(PronouncingDictionary),
}

/// Converts words of a supported locale (`en-US`, `de-DE`, `es-ES`) into
/// IPA phonemes.
///
/// The engine derives its phoneme symbol set from the dictionary; with
/// `use_chars` it also registers the (optionally prefixed) grapheme symbols,
/// so a tokenizer built on [`symbols()`](IpaG2p::symbols) accepts everything
/// `convert` can emit. Grapheme case folding keeps the grapheme and phoneme
/// inventories disjoint: IPA is lowercase, so folding words to uppercase
/// (the default) avoids any overlap even without a grapheme prefix.
pub struct IpaG2p {
    phoneme_dict: PronouncingDictionary,
    symbols: BTreeSet<String>,
    locale: String,
    heteronyms: HashSet<String>,
    ignore_ambiguous_words: bool,
    use_chars: bool,
    use_stresses: bool,
    grapheme_case: GraphemeCase,
    grapheme_prefix: String,
    phoneme_probability: Option<f64>,
    oov_handler: Option<OovHandler>,
    rng: Mutex<SmallRng>,
}

/// Builder for [`IpaG2p`].
pub struct IpaG2pBuilder {
    dict: DictSource,
    locale: String,
    heteronyms_path: Option<PathBuf>,
    heteronym_words: Vec<String>,
    ignore_ambiguous_words: bool,
    use_chars: bool,
    use_stresses: bool,
    grapheme_case: GraphemeCase,
    grapheme_prefix: String,
    phoneme_probability: Option<f64>,
    oov_handler: Option<OovHandler>,
}

fn prefixed_chars(word: &str, prefix: &str) -> Vec<String> {
    word.chars().map(|c| format!("{prefix}{c}")).collect()
}

/// NFC-normalize in-memory dictionary entries, words and phoneme tokens
/// both, the same way file parsing does per line.
fn nfc_entries(entries: PronouncingDictionary) -> PronouncingDictionary {
    entries
        .into_iter()
        .map(|(word, prons)| {
            let prons = prons
                .into_iter()
                .map(|pron| pron.iter().map(|s| normalize_unicode_text(s)).collect())
                .collect();
            (normalize_unicode_text(&word), prons)
        })
        .collect()
}

/// Fold dictionary words to the configured case, strip stress markers if
/// asked to, and accumulate the symbol set. Under `Mixed` case every
/// non-uppercase word also gets an all-uppercase twin so uppercase input
/// still resolves.
fn normalize_dict(
    raw: PronouncingDictionary,
    case: GraphemeCase,
    use_chars: bool,
    use_stresses: bool,
    prefix: &str,
) -> (PronouncingDictionary, BTreeSet<String>) {
    // Case folding can merge keys; sort first so the survivor is stable
    let mut entries: Vec<(String, Vec<Vec<String>>)> = raw.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut dict = PronouncingDictionary::new();
    let mut symbols = BTreeSet::new();
    for (word, prons) in entries {
        let word_new = set_grapheme_case(&word, case);

        if use_chars {
            // punctuation can sit at the start, middle, or end of a word
            let word_no_punct = PUNCT_RE.replace_all(&word_new, "");
            symbols.extend(prefixed_chars(&word_no_punct, prefix));
        }

        let prons_new: Vec<Vec<String>> = if use_stresses {
            prons
        } else {
            prons
                .into_iter()
                .map(|pron| {
                    pron.into_iter().filter(|s| !STRESS_SYMBOLS.contains(&s.as_str())).collect()
                })
                .collect()
        };

        for pron in &prons_new {
            symbols.extend(pron.iter().cloned());
        }

        if case == GraphemeCase::Mixed && !is_fully_uppercase(&word_new) {
            dict.insert(word_new.to_uppercase(), prons_new.clone());
        }
        dict.insert(word_new, prons_new);
    }

    (dict, symbols)
}

impl IpaG2p {
    /// Build an engine from a dictionary file in CMUdict IPA format.
    pub fn builder(phoneme_dict: impl Into<PathBuf>) -> IpaG2pBuilder {
        IpaG2pBuilder::new(DictSource::Path(phoneme_dict.into()))
    }

    /// Build an engine from in-memory dictionary entries, e.g.
    /// `{"Wire": [["ˈ", "w", "a", "ɪ", "ɚ"], ["ˈ", "w", "a", "ɪ", "ɹ"]]}`.
    pub fn builder_from_entries(entries: PronouncingDictionary) -> IpaG2pBuilder {
        IpaG2pBuilder::new(DictSource::Entries(entries))
    }

    /// The symbol inventory: every phoneme occurring in the dictionary,
    /// plus every (prefixed) grapheme when `use_chars` is on.
    pub fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    /// Locale the engine was configured with.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Register extra grapheme symbols that do not occur in the dictionary.
    pub fn add_symbols(&mut self, symbols: &str) {
        let symbols = normalize_unicode_text(symbols);
        self.symbols.extend(symbols.chars().map(String::from));
    }

    /// Swap in a different dictionary. The new entries go through the same
    /// normalization as at construction and the symbol set is re-derived,
    /// so the reported vocabulary always matches the active dictionary.
    ///
    /// # Errors
    /// Returns an error if `entries` is empty.
    pub fn replace_dict(&mut self, entries: PronouncingDictionary) -> G2pResult<()> {
        if entries.is_empty() {
            return Err(G2pError::Config("replacement dictionary contains no entries".to_string()));
        }
        self.install_dict(nfc_entries(entries));
        Ok(())
    }

    /// Like [`replace_dict`](IpaG2p::replace_dict), reading the entries from
    /// a dictionary file.
    pub fn replace_dict_from_file(&mut self, path: &Path) -> G2pResult<()> {
        let raw = parse_ipa_dict(path)?;
        self.install_dict(raw);
        Ok(())
    }

    fn install_dict(&mut self, raw: PronouncingDictionary) {
        let (dict, symbols) = normalize_dict(
            raw,
            self.grapheme_case,
            self.use_chars,
            self.use_stresses,
            &self.grapheme_prefix,
        );
        self.phoneme_dict = dict;
        self.symbols = symbols;
    }

    fn prefixed(&self, word: &str) -> Vec<String> {
        prefixed_chars(word, &self.grapheme_prefix)
    }

    fn keep_graphemes(&self) -> bool {
        match self.phoneme_probability {
            Some(p) => self.rng.lock().random::<f64>() > p,
            None => false,
        }
    }

    /// Locate the dictionary entry backing a suffix-stripped base word.
    /// Only applies when the inflected form itself is unknown; tries the
    /// base as-is, then uppercased. Returns the last character of the entry
    /// word and its pronunciation variants.
    fn suffix_base(&self, word: &str, base: &str) -> Option<(char, &[Vec<String>])> {
        if self.phoneme_dict.contains_key(word)
            || self.phoneme_dict.contains_key(&word.to_uppercase())
        {
            return None;
        }

        let (found, prons) = if let Some(prons) = self.phoneme_dict.get(base) {
            (base.to_string(), prons)
        } else {
            let upper = base.to_uppercase();
            let prons = self.phoneme_dict.get(&upper)?;
            (upper, prons)
        };

        if self.ignore_ambiguous_words && prons.len() != 1 {
            return None;
        }
        Some((found.chars().next_back()?, prons))
    }

    fn parse_one_word(&self, word: &str) -> (Vec<String>, bool) {
        let mut word = set_grapheme_case(word, self.grapheme_case);

        // punctuation or whitespace run
        if !contains_letter_or_digit(&word) {
            return (char_tokens(&word), true);
        }

        if self.keep_graphemes() {
            return (self.prefixed(&word), true);
        }

        if self.heteronyms.contains(&word) {
            return (self.prefixed(&word), true);
        }

        // Inflection endings are resolved against the base word for en-US;
        // other locales go straight to the dictionary.
        if self.locale == "en-US" {
            // `'s` suffix: voiceless /s/ after t, /ɪ z/ after s, /z/ else
            if let Some(base) = word.strip_suffix("'s").or_else(|| word.strip_suffix("'S"))
                && !base.is_empty()
                && let Some((ending, prons)) = self.suffix_base(&word, base)
            {
                let mut pron = prons[0].clone();
                match ending {
                    't' | 'T' => pron.push("s".to_string()),
                    's' | 'S' => {
                        pron.push("ɪ".to_string());
                        pron.push("z".to_string());
                    }
                    _ => pron.push("z".to_string()),
                }
                return (pron, true);
            }

            // `s` suffix: voiceless /s/ after t, /z/ else
            if let Some(base) = word.strip_suffix('s').or_else(|| word.strip_suffix('S'))
                && !base.is_empty()
                && let Some((ending, prons)) = self.suffix_base(&word, base)
            {
                let mut pron = prons[0].clone();
                match ending {
                    't' | 'T' => pron.push("s".to_string()),
                    _ => pron.push("z".to_string()),
                }
                return (pron, true);
            }
        }

        if let Some(prons) = self.phoneme_dict.get(&word)
            && (!self.ignore_ambiguous_words || prons.len() == 1)
        {
            return (prons[0].clone(), true);
        }

        // Mixed case keeps the input as-is, so an uppercase dictionary twin
        // may still match
        if self.grapheme_case == GraphemeCase::Mixed && !self.phoneme_dict.contains_key(&word) {
            let upper = word.to_uppercase();
            if let Some(prons) = self.phoneme_dict.get(&upper) {
                if !self.ignore_ambiguous_words || prons.len() == 1 {
                    return (prons[0].clone(), true);
                }
                // the OOV path sees the uppercase form from here on
                word = upper;
            }
        }

        if let Some(handler) = &self.oov_handler {
            return (handler(&word), true);
        }

        (self.prefixed(&word), false)
    }
}

impl G2p for IpaG2p {
    fn convert(&self, text: &str) -> G2pResult<Vec<String>> {
        let text = normalize_unicode_text(text);
        let tokens = if self.locale == "en-US" {
            english_word_tokenize(&text)
        } else {
            any_locale_word_tokenize(&text)
        };

        let mut prons = Vec::new();
        for token in tokens {
            match token {
                Token::Unchanged(words) => {
                    // pre-phonemized regions pass through whole, prefix and all
                    prons.extend(words.into_iter().map(|w| format!("{}{w}", self.grapheme_prefix)));
                }
                Token::Changeable(word) => {
                    let (mut pron, handled) = self.parse_one_word(&word);

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

impl IpaG2pBuilder {
    fn new(dict: DictSource) -> Self {
        Self {
            dict,
            locale: "en-US".to_string(),
            heteronyms_path: None,
            heteronym_words: Vec::new(),
            ignore_ambiguous_words: true,
            use_chars: false,
            use_stresses: true,
            grapheme_case: GraphemeCase::Upper,
            grapheme_prefix: String::new(),
            phoneme_probability: None,
            oov_handler: None,
        }
    }

    /// Locale for tokenization and locale-specific rules. Defaults to
    /// `en-US`.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
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

    /// Skip words with multiple pronunciation variants instead of taking
    /// the first variant. Defaults to true.
    pub fn ignore_ambiguous_words(mut self, ignore: bool) -> Self {
        self.ignore_ambiguous_words = ignore;
        self
    }

    /// Register grapheme symbols in the symbol set, for models that accept
    /// mixed grapheme/phoneme input. Forced on when `phoneme_probability`
    /// is set.
    pub fn use_chars(mut self, use_chars: bool) -> Self {
        self.use_chars = use_chars;
        self
    }

    /// Keep the lexical stress markers `ˈ` and `ˌ` in pronunciations.
    /// Defaults to true.
    pub fn use_stresses(mut self, use_stresses: bool) -> Self {
        self.use_stresses = use_stresses;
        self
    }

    /// Case folding applied to dictionary words and input. Defaults to
    /// `Upper`, which keeps graphemes disjoint from the lowercase IPA set.
    pub fn grapheme_case(mut self, case: GraphemeCase) -> Self {
        self.grapheme_case = case;
        self
    }

    /// Prefix prepended to every grapheme token, e.g. `#`, to keep
    /// graphemes and phonemes distinguishable. Defaults to none.
    pub fn grapheme_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.grapheme_prefix = prefix.into();
        self
    }

    /// Phonemize each eligible word with this probability, keeping its
    /// (prefixed) graphemes otherwise.
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
    /// Returns an error for an unsupported locale, an out-of-range
    /// probability, or a dictionary that cannot be loaded or is empty.
    pub fn build(self) -> G2pResult<IpaG2p> {
        validate_locale(&self.locale)?;

        if let Some(p) = self.phoneme_probability
            && !(0.0..=1.0).contains(&p)
        {
            return Err(G2pError::Config(format!("phoneme probability {p} not in [0.0, 1.0]")));
        }

        let mut use_chars = self.use_chars;
        if !use_chars && self.phoneme_probability.is_some() {
            use_chars = true;
            warn!("phoneme_probability is set, enabling grapheme symbols even though use_chars was off");
        }

        let raw = match self.dict {
            DictSource::Path(path) => parse_ipa_dict(&path)?,
            DictSource::Entries(entries) => {
                if entries.is_empty() {
                    return Err(G2pError::Config(
                        "phoneme dictionary contains no entries".to_string(),
                    ));
                }
                nfc_entries(entries)
            }
        };

        let (phoneme_dict, symbols) = normalize_dict(
            raw,
            self.grapheme_case,
            use_chars,
            self.use_stresses,
            &self.grapheme_prefix,
        );

        let mut heteronyms: Vec<String> = self.heteronym_words;
        if let Some(path) = &self.heteronyms_path {
            heteronyms.extend(parse_lines(path)?);
        }
        let heteronyms: HashSet<String> =
            heteronyms.iter().map(|h| set_grapheme_case(h, self.grapheme_case)).collect();

        if self.oov_handler.is_none() {
            warn!(
                "No OOV handler set; words not handled by any rule stay in grapheme form. \
                 This is intended when graphemes and phonemes are both valid model inputs."
            );
        }

        info!(
            "IPA G2P ready ({}): {} dictionary words, {} symbols, {} heteronyms",
            self.locale,
            phoneme_dict.len(),
            symbols.len(),
            heteronyms.len()
        );

        Ok(IpaG2p {
            phoneme_dict,
            symbols,
            locale: self.locale,
            heteronyms,
            ignore_ambiguous_words: self.ignore_ambiguous_words,
            use_chars,
            use_stresses: self.use_stresses,
            grapheme_case: self.grapheme_case,
            grapheme_prefix: self.grapheme_prefix,
            phoneme_probability: self.phoneme_probability,
            oov_handler: self.oov_handler,
            rng: Mutex::new(SmallRng::from_os_rng()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry(prons: &[&str]) -> Vec<Vec<String>> {
        prons.iter().map(|p| p.chars().map(String::from).collect()).collect()
    }

    fn test_dict() -> PronouncingDictionary {
        let mut dict = HashMap::new();
        dict.insert("Hello".to_string(), entry(&["həˈɫoʊ"]));
        dict.insert("World".to_string(), entry(&["ˈwɝɫd"]));
        dict.insert("Airport".to_string(), entry(&["ˈɛɹˌpɔɹt"]));
        dict.insert("Jones".to_string(), entry(&["ˈdʒoʊnz"]));
        dict.insert("Read".to_string(), entry(&["ˈɹɛd", "ˈɹid"]));
        dict.insert("O'brien".to_string(), entry(&["oʊˈbɹaɪən"]));
        dict
    }

    fn engine() -> IpaG2p {
        IpaG2p::builder_from_entries(test_dict()).build().unwrap()
    }

    fn chars(s: &str) -> Vec<String> {
        s.chars().map(String::from).collect()
    }

    #[test]
    fn test_basic_sentence_upper_folding() {
        let phonemes = engine().convert("Hello world.").unwrap();
        let mut expected = chars("həˈɫoʊ");
        expected.push(" ".to_string());
        expected.extend(chars("ˈwɝɫd"));
        expected.push(".".to_string());
        assert_eq!(phonemes, expected);
    }

    #[test]
    fn test_oov_word_folds_to_upper_graphemes() {
        assert_eq!(engine().convert("zyz").unwrap(), vec!["Z", "Y", "Z"]);
    }

    #[test]
    fn test_possessive_suffix_rules() {
        let g2p = engine();
        // base ends in "t": voiceless /s/
        let mut airport_s = chars("ˈɛɹˌpɔɹt");
        airport_s.push("s".to_string());
        assert_eq!(g2p.convert("airport's").unwrap(), airport_s);

        // base ends in "s": /ɪ z/
        let mut jones_s = chars("ˈdʒoʊnz");
        jones_s.extend(["ɪ".to_string(), "z".to_string()]);
        assert_eq!(g2p.convert("jones's").unwrap(), jones_s);
    }

    #[test]
    fn test_plural_suffix_rule() {
        let mut worlds = chars("ˈwɝɫd");
        worlds.push("z".to_string());
        assert_eq!(engine().convert("worlds").unwrap(), worlds);
    }

    #[test]
    fn test_suffix_rules_defer_to_dictionary_entries() {
        // "does" has its own entry; never derived from "doe" plus /z/
        let mut dict = test_dict();
        dict.insert("Doe".to_string(), entry(&["ˈdoʊ"]));
        dict.insert("Does".to_string(), entry(&["ˈdʌz"]));
        let g2p = IpaG2p::builder_from_entries(dict).build().unwrap();

        assert_eq!(g2p.convert("does").unwrap(), chars("ˈdʌz"));
    }

    #[test]
    fn test_suffix_rules_only_for_en_us() {
        let mut dict = HashMap::new();
        dict.insert("Gato".to_string(), entry(&["ˈgato"]));
        let g2p = IpaG2p::builder_from_entries(dict).locale("es-ES").build().unwrap();
        assert_eq!(g2p.locale(), "es-ES");

        // no plural rule outside en-US: stays graphemes
        assert_eq!(g2p.convert("gatos").unwrap(), vec!["G", "A", "T", "O", "S"]);
    }

    #[test]
    fn test_ambiguous_word_skipped() {
        assert_eq!(engine().convert("read").unwrap(), vec!["R", "E", "A", "D"]);

        let g2p = IpaG2p::builder_from_entries(test_dict())
            .ignore_ambiguous_words(false)
            .build()
            .unwrap();
        assert_eq!(g2p.convert("read").unwrap(), chars("ˈɹɛd"));
    }

    #[test]
    fn test_heteronym_kept_as_prefixed_graphemes() {
        let g2p = IpaG2p::builder_from_entries(test_dict())
            .heteronym_words(["hello"])
            .grapheme_prefix("#")
            .use_chars(true)
            .build()
            .unwrap();
        assert_eq!(g2p.convert("hello").unwrap(), vec!["#H", "#E", "#L", "#L", "#O"]);
    }

    #[test]
    fn test_stress_markers_stripped() {
        let g2p = IpaG2p::builder_from_entries(test_dict()).use_stresses(false).build().unwrap();
        assert_eq!(g2p.convert("hello").unwrap(), chars("həɫoʊ"));
        assert!(!g2p.symbols().contains("ˈ"));
        assert!(!g2p.symbols().contains("ˌ"));
    }

    #[test]
    fn test_mixed_case_registers_uppercase_twin() {
        let g2p = IpaG2p::builder_from_entries(test_dict())
            .grapheme_case(GraphemeCase::Mixed)
            .build()
            .unwrap();
        let expected = chars("həˈɫoʊ");

        assert_eq!(g2p.convert("Hello").unwrap(), expected);
        assert_eq!(g2p.convert("HELLO").unwrap(), expected);
        // lowercase misses the dict but resolves through the uppercase twin
        assert_eq!(g2p.convert("hello").unwrap(), expected);
    }

    #[test]
    fn test_symbols_include_prefixed_graphemes() {
        let g2p = IpaG2p::builder_from_entries(test_dict())
            .use_chars(true)
            .grapheme_prefix("#")
            .build()
            .unwrap();

        assert!(g2p.symbols().contains("#H"));
        assert!(g2p.symbols().contains("ə"));
        // the apostrophe in a word is punctuation, never a grapheme symbol
        assert!(!g2p.symbols().contains("#'"));
    }

    #[test]
    fn test_phoneme_probability_forces_use_chars() {
        let g2p = IpaG2p::builder_from_entries(test_dict()).phoneme_probability(1.0).build().unwrap();

        // graphemes registered even though use_chars was never set
        assert!(g2p.symbols().contains("H"));
        // probability 1.0 still always phonemizes
        assert_eq!(g2p.convert("hello").unwrap(), chars("həˈɫoʊ"));
    }

    #[test]
    fn test_phoneme_probability_zero_keeps_graphemes() {
        let g2p = IpaG2p::builder_from_entries(test_dict())
            .grapheme_prefix("#")
            .phoneme_probability(0.0)
            .build()
            .unwrap();

        // a dictionary word still comes back as prefixed graphemes
        assert_eq!(g2p.convert("hello").unwrap(), vec!["#H", "#E", "#L", "#L", "#O"]);
    }

    #[test]
    fn test_unchanged_region_gets_grapheme_prefix() {
        let g2p = IpaG2p::builder_from_entries(test_dict())
            .use_chars(true)
            .grapheme_prefix("#")
            .build()
            .unwrap();
        let phonemes = g2p.convert("|wɝd| hello").unwrap();

        assert_eq!(phonemes[0], "#wɝd");
        assert_eq!(phonemes[1], " ");
    }

    #[test]
    fn test_hyphen_retry() {
        let phonemes = engine().convert("hello-world").unwrap();
        let mut expected = chars("həˈɫoʊ");
        expected.push("-".to_string());
        expected.extend(chars("ˈwɝɫd"));
        assert_eq!(phonemes, expected);
    }

    #[test]
    fn test_hyphen_retry_keeps_unknown_parts_as_graphemes() {
        let phonemes = engine().convert("hello-zyz").unwrap();
        let mut expected = chars("həˈɫoʊ");
        expected.push("-".to_string());
        expected.extend(chars("ZYZ"));
        assert_eq!(phonemes, expected);
    }

    #[test]
    fn test_input_text_nfc_normalized() {
        let mut dict = HashMap::new();
        dict.insert("Café".to_string(), entry(&["kəfˈeɪ"]));
        let g2p = IpaG2p::builder_from_entries(dict).locale("es-ES").build().unwrap();

        // decomposed input: "Cafe" + combining acute accent
        assert_eq!(g2p.convert("Cafe\u{0301}").unwrap(), chars("kəfˈeɪ"));
    }

    #[test]
    fn test_empty_entries_rejected() {
        assert!(IpaG2p::builder_from_entries(HashMap::new()).build().is_err());
    }

    #[test]
    fn test_unsupported_locale_rejected() {
        let err = IpaG2p::builder_from_entries(test_dict()).locale("fr-FR").build();
        assert!(matches!(err, Err(G2pError::UnsupportedLocale(_))));
    }

    #[test]
    fn test_replace_dict_rederives_symbols() {
        let mut g2p = engine();
        let mut dict = HashMap::new();
        dict.insert("Bye".to_string(), entry(&["baɪ"]));
        g2p.replace_dict(dict).unwrap();

        assert_eq!(g2p.convert("bye").unwrap(), chars("baɪ"));
        // old entries and their symbols are gone
        assert_eq!(g2p.convert("hello").unwrap(), vec!["H", "E", "L", "L", "O"]);
        assert!(!g2p.symbols().contains("ɝ"));
        assert!(g2p.symbols().contains("ɪ"));
    }

    #[test]
    fn test_replace_dict_from_file_renormalizes() {
        use std::io::Write;

        let path = std::env::temp_dir().join("ipa_replace_dict.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all("Bye  baɪ\n".as_bytes()).unwrap();

        let mut g2p = engine();
        g2p.replace_dict_from_file(&path).unwrap();

        // file entries get the same case folding and symbol derivation
        assert_eq!(g2p.convert("bye").unwrap(), chars("baɪ"));
        assert!(g2p.symbols().contains("ɪ"));
        assert!(!g2p.symbols().contains("ɝ"));
    }

    #[test]
    fn test_add_symbols() {
        let mut g2p = engine();
        g2p.add_symbols("äö");
        assert!(g2p.symbols().contains("ä"));
        assert!(g2p.symbols().contains("ö"));
    }

    #[test]
    fn test_es_locale_keeps_accented_words_whole() {
        let mut dict = HashMap::new();
        dict.insert("Señor".to_string(), entry(&["seˈɲoɾ"]));
        let g2p = IpaG2p::builder_from_entries(dict).locale("es-ES").build().unwrap();

        assert_eq!(g2p.convert("señor").unwrap(), chars("seˈɲoɾ"));
    }
}
