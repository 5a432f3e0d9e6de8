//! Chinese pinyin G2P engine.

use std::collections::HashMap;
use std::path::PathBuf;

use pinyin::ToPinyin;
use tracing::{info, warn};

use crate::error::{G2pError, G2pResult};
use crate::lexicon::parse_pinyin_dict;

use super::{G2p, OovHandler};

/// Splits an utterance into words before pinyin conversion. Word context
/// improves polyphone disambiguation for readers that can use it; the
/// default converts the whole utterance in one piece.
pub type WordSegmenter = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

enum DictSource {
    Path(PathBuf),
    Entries(HashMap<String, Vec<String>>),
}

/// Converts Chinese text to phonemes: hanzi become tone-numbered pinyin
/// readings, each reading is mapped through the pinyin dictionary to
/// `#`-prefixed phones plus a `#N` tone token. Non-Chinese characters pass
/// through one character at a time, so bilingual text degrades to letters.
pub struct ChineseG2p {
    phoneme_dict: HashMap<String, Vec<String>>,
    word_segmenter: Option<WordSegmenter>,
    oov_handler: Option<OovHandler>,
}

/// Builder for [`ChineseG2p`].
pub struct ChineseG2pBuilder {
    dict: DictSource,
    word_segmenter: Option<WordSegmenter>,
    oov_handler: Option<OovHandler>,
}

fn tone_token(c: char) -> Option<&'static str> {
    match c {
        '1' => Some("#1"),
        '2' => Some("#2"),
        '3' => Some("#3"),
        '4' => Some("#4"),
        '5' => Some("#5"),
        _ => None,
    }
}

/// Convert one segment to pinyin readings with a trailing tone number
/// ("zhong1"); the neutral tone is written as 5. Characters without a
/// pinyin reading come through unchanged, one token per character.
fn segment_to_pinyin(segment: &str) -> Vec<String> {
    let mut readings = Vec::new();
    for ch in segment.chars() {
        match ch.to_pinyin() {
            Some(py) => {
                let mut reading = py.with_tone_num_end().to_string();
                if !reading.ends_with(|c: char| c.is_ascii_digit()) {
                    reading.push('5');
                }
                readings.push(reading);
            }
            None => readings.push(ch.to_string()),
        }
    }
    readings
}

impl ChineseG2p {
    /// Build an engine from a tab-separated pinyin dictionary file.
    pub fn builder(phoneme_dict: impl Into<PathBuf>) -> ChineseG2pBuilder {
        ChineseG2pBuilder { dict: DictSource::Path(phoneme_dict.into()), word_segmenter: None, oov_handler: None }
    }

    /// Build an engine from in-memory entries, phones already `#`-prefixed
    /// the way [`parse_pinyin_dict`] produces them.
    pub fn builder_from_entries(entries: HashMap<String, Vec<String>>) -> ChineseG2pBuilder {
        ChineseG2pBuilder { dict: DictSource::Entries(entries), word_segmenter: None, oov_handler: None }
    }
}

impl G2p for ChineseG2p {
    fn convert(&self, text: &str) -> G2pResult<Vec<String>> {
        let segments = match &self.word_segmenter {
            Some(segment) => segment(text),
            None => vec![text.to_string()],
        };

        let mut pinyin_seq = Vec::new();
        for segment in &segments {
            pinyin_seq.extend(segment_to_pinyin(segment));
        }

        let mut phonemes = Vec::new();
        for reading in pinyin_seq {
            let Some(last) = reading.chars().next_back() else { continue };
            match tone_token(last) {
                Some(tone) => {
                    let syllable = &reading[..reading.len() - last.len_utf8()];
                    match self.phoneme_dict.get(syllable) {
                        Some(phones) => phonemes.extend(phones.iter().cloned()),
                        None => match &self.oov_handler {
                            Some(handler) => phonemes.extend(handler(syllable)),
                            None => return Err(G2pError::MissingPronunciation(reading.clone())),
                        },
                    }
                    phonemes.push(tone.to_string());
                }
                // not pinyin (letters, punctuation): emit as-is
                None => phonemes.push(reading),
            }
        }

        Ok(phonemes)
    }
}

impl ChineseG2pBuilder {
    /// Word segmentation hook applied before pinyin conversion.
    pub fn word_segmenter(mut self, f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.word_segmenter = Some(Box::new(f));
        self
    }

    /// Hook for pinyin syllables missing from the dictionary. Without it,
    /// a missing syllable fails the conversion.
    pub fn oov_handler(mut self, f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.oov_handler = Some(Box::new(f));
        self
    }

    /// # Errors
    /// Returns an error if the dictionary cannot be loaded or is empty.
    pub fn build(self) -> G2pResult<ChineseG2p> {
        let phoneme_dict = match self.dict {
            DictSource::Path(path) => parse_pinyin_dict(&path)?,
            DictSource::Entries(entries) => {
                if entries.is_empty() {
                    return Err(G2pError::Config(
                        "pinyin dictionary contains no entries".to_string(),
                    ));
                }
                entries
            }
        };

        if self.oov_handler.is_none() {
            warn!("No OOV handler set; a pinyin syllable missing from the dictionary fails the conversion");
        }

        info!("Chinese G2P ready: {} pinyin entries", phoneme_dict.len());

        Ok(ChineseG2p {
            phoneme_dict,
            word_segmenter: self.word_segmenter,
            oov_handler: self.oov_handler,
        })
    }
}
