//! Locale metadata for the `--list-locales` and `--locale-info` flags.
//!
//! Symbol inventories live in [`crate::lexicon`]; this module only maps
//! locale tags to display metadata and pretty-prints the details.

use crate::lexicon::{self, SUPPORTED_LOCALES};
use crate::text::GraphemeCase;

/// Display metadata for a locale.
#[derive(Debug, Clone, Copy)]
pub struct LocaleInfo {
    pub language: &'static str,
    pub engines: &'static str,
}

/// All locales as a compile-time constant slice (sorted by tag for binary search).
const LOCALES: &[(&str, LocaleInfo)] = &[
    ("de-DE", LocaleInfo { language: "German", engines: "ipa" }),
    ("en-US", LocaleInfo { language: "American English", engines: "arpabet, ipa" }),
    ("es-ES", LocaleInfo { language: "Spanish", engines: "ipa" }),
    ("zh-CN", LocaleInfo { language: "Mandarin Chinese", engines: "pinyin" }),
];

/// Get locale metadata by tag using binary search.
pub fn get_locale(tag: &str) -> Option<&'static LocaleInfo> {
    LOCALES.binary_search_by_key(&tag, |(t, _)| t).ok().map(|idx| &LOCALES[idx].1)
}

/// Print all supported locales.
pub fn print_locales() {
    println!("═══════════════════════════════════════════════════");
    println!("  Supported locales");
    println!("═══════════════════════════════════════════════════");
    println!();
    println!("{:<8} {:<20} ENGINES", "LOCALE", "LANGUAGE");
    println!("{}", "─".repeat(50));

    for (tag, info) in LOCALES {
        println!("{:<8} {:<20} {}", tag, info.language, info.engines);
    }

    println!();
    println!("Usage:");
    println!("  ./phonemizer --engine ipa --locale de-DE --phoneme-dict de.txt --text \"...\"");
    println!();
}

/// Print detailed information about a locale, including its grapheme and
/// IPA symbol inventories where the crate ships them.
pub fn print_locale_info(tag: &str) -> anyhow::Result<()> {
    let info = get_locale(tag)
        .ok_or_else(|| anyhow::anyhow!("Locale '{}' not found. Run with --list-locales to see available locales", tag))?;

    println!();
    println!("Locale: {}", tag);
    println!("{}", "─".repeat(40));
    println!("Language:  {}", info.language);
    println!("Engines:   {}", info.engines);

    if SUPPORTED_LOCALES.contains(&tag) {
        let graphemes: String = lexicon::grapheme_character_set(tag, GraphemeCase::Upper)?.into_iter().collect();
        let phonemes: String = lexicon::ipa_character_set(tag)?.into_iter().collect();
        let punctuation: String = lexicon::ipa_punctuation_list(tag)?.into_iter().collect();
        println!("Graphemes: {}", graphemes);
        println!("Phonemes:  {}", phonemes);
        println!("Punctuation: {}", punctuation);
    } else {
        println!("Symbols:   taken from the pinyin dictionary passed via --phoneme-dict");
    }

    println!();
    Ok(())
}
