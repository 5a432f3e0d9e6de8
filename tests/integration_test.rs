//! Integration tests for the phonemizer library.
//!
//! Exercises the dictionary-file paths end to end: fixture dictionaries on
//! disk, engine construction through the builders, and the manifest
//! phonemize/split pipeline.

use std::fs;
use std::path::PathBuf;

use phonemizer::g2p::{ChineseG2p, EnglishG2p, G2p, IpaG2p};
use phonemizer::manifest::{
    self, DEFAULT_DEST_FIELD, ManifestEntry, SplitSpec, read_manifest, write_manifest,
};
use phonemizer::text::GraphemeCase;

fn fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, contents).unwrap();
    path
}

const CMUDICT_FIXTURE: &str = "\
;;; # CMUdict  -- Major Version: 0.07
CAT  K AE1 T
HELLO  HH AH0 L OW1
HELLO(1)  HH EH0 L OW1
WORLD  W ER1 L D
";

const IPA_FIXTURE: &str = "\
hello  həˈɫoʊ
world  ˈwɝɫd
";

const PINYIN_FIXTURE: &str = "ni\tn i\nhao\th ao\n";

/// Test the ARPABET engine built from a dictionary file
#[test]
fn test_arpabet_engine_from_file() {
    let dict = fixture("it_cmudict.txt", CMUDICT_FIXTURE);
    let g2p = EnglishG2p::builder().phoneme_dict(&dict).build().unwrap();

    let tokens = g2p.convert("Cat world.").unwrap();
    assert_eq!(tokens, vec!["K", "AE1", "T", " ", "W", "ER1", "L", "D", "."]);
}

/// Test that ambiguous words fall back to the first file entry when allowed
#[test]
fn test_arpabet_ambiguous_word_uses_first_entry() {
    let dict = fixture("it_cmudict_amb.txt", CMUDICT_FIXTURE);
    let g2p = EnglishG2p::builder()
        .phoneme_dict(&dict)
        .ignore_ambiguous_words(false)
        .build()
        .unwrap();

    let tokens = g2p.convert("hello").unwrap();
    assert_eq!(tokens, vec!["HH", "AH0", "L", "OW1"]);
}

/// Test the IPA engine built from a dictionary file
#[test]
fn test_ipa_engine_from_file() {
    let dict = fixture("it_ipa.txt", IPA_FIXTURE);
    let g2p = IpaG2p::builder(&dict).build().unwrap();

    let tokens = g2p.convert("Hello world!").unwrap();
    assert_eq!(tokens, vec!["h", "ə", "ˈ", "ɫ", "o", "ʊ", " ", "ˈ", "w", "ɝ", "ɫ", "d", "!"]);

    // symbol inventory is derived from the pronunciations
    assert!(g2p.symbols().contains("ɝ"));
    assert!(!g2p.symbols().contains("q"));
}

/// Test that stress stripping applies to both the dictionary and the output
#[test]
fn test_ipa_engine_without_stresses() {
    let dict = fixture("it_ipa_nostress.txt", IPA_FIXTURE);
    let g2p = IpaG2p::builder(&dict).use_stresses(false).build().unwrap();

    let tokens = g2p.convert("hello").unwrap();
    assert_eq!(tokens, vec!["h", "ə", "ɫ", "o", "ʊ"]);
    assert!(!g2p.symbols().contains("ˈ"));
}

/// Test that grapheme-kept words follow the configured case
#[test]
fn test_ipa_engine_oov_keeps_cased_graphemes() {
    let dict = fixture("it_ipa_oov.txt", IPA_FIXTURE);
    let g2p = IpaG2p::builder(&dict)
        .grapheme_case(GraphemeCase::Lower)
        .build()
        .unwrap();

    let tokens = g2p.convert("Zebra").unwrap();
    assert_eq!(tokens, vec!["z", "e", "b", "r", "a"]);
}

/// Test the pinyin engine built from a TSV dictionary file
#[test]
fn test_pinyin_engine_from_file() {
    let dict = fixture("it_pinyin.tsv", PINYIN_FIXTURE);
    let g2p = ChineseG2p::builder(&dict).build().unwrap();

    let tokens = g2p.convert("你好").unwrap();
    assert_eq!(tokens, vec!["#n", "#i", "#3", "#h", "#ao", "#3"]);
}

/// Test the manifest pipeline: read, phonemize, write, read back
#[test]
fn test_manifest_phonemize_round_trip() {
    let input = fixture(
        "it_manifest_in.json",
        "{\"audio_filepath\": \"a.wav\", \"duration\": 1.0, \"text\": \"cat\", \"speaker\": 1}\n\
         {\"audio_filepath\": \"b.wav\", \"duration\": 2.0, \"text\": \"world\"}\n",
    );
    let output = std::env::temp_dir().join("it_manifest_out.json");

    let dict = fixture("it_cmudict_manifest.txt", CMUDICT_FIXTURE);
    let g2p = EnglishG2p::builder().phoneme_dict(&dict).build().unwrap();

    let mut entries = read_manifest(&input).unwrap();
    manifest::phonemize_manifest(&mut entries, &g2p, None, DEFAULT_DEST_FIELD, " ").unwrap();
    write_manifest(&output, &entries).unwrap();

    let back = read_manifest(&output).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0].extra["phoneme_text"], serde_json::json!("K AE1 T"));
    assert_eq!(back[1].extra["phoneme_text"], serde_json::json!("W ER1 L D"));
    // untouched fields survive the trip
    assert_eq!(back[0].extra["speaker"], serde_json::json!(1));
    assert_eq!(back[0].audio_filepath.as_deref(), Some("a.wav"));
    assert_eq!(back[1].duration, Some(2.0));
}

/// Test that manifest splitting is deterministic across runs
#[test]
fn test_manifest_split_determinism() {
    let entries: Vec<ManifestEntry> = (0..30)
        .map(|i| ManifestEntry {
            audio_filepath: Some(format!("{i}.wav")),
            duration: Some(1.0),
            text: Some("cat".to_string()),
            extra: serde_json::Map::new(),
        })
        .collect();

    let spec = SplitSpec { val_size: 0.1, test_size: 0.2, seed: 7 };
    let (train_a, val_a, test_a) = manifest::split_manifest(entries.clone(), spec).unwrap();
    let (train_b, val_b, test_b) = manifest::split_manifest(entries, spec).unwrap();

    assert_eq!((train_a.len(), val_a.len(), test_a.len()), (21, 3, 6));
    assert_eq!(train_a, train_b);
    assert_eq!(val_a, val_b);
    assert_eq!(test_a, test_b);
}
