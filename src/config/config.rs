//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::locales;
use crate::lexicon::validate_locale;
use crate::manifest::DEFAULT_DEST_FIELD;
use crate::text::GraphemeCase;

/// G2P engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// CMUdict-backed ARPABET phonemes (en-US)
    #[default]
    Arpabet,
    /// IPA phonemes with per-locale symbol sets (en-US, de-DE, es-ES)
    Ipa,
    /// Pinyin-initial/final phonemes with tone tokens (zh-CN)
    Pinyin,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Arpabet => write!(f, "arpabet"),
            Engine::Ipa => write!(f, "ipa"),
            Engine::Pinyin => write!(f, "pinyin"),
        }
    }
}

/// Phonemizer application configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "phonemizer")]
#[command(author, version, about = "Grapheme-to-phoneme conversion for TTS datasets", long_about = None)]
pub struct AppConfig {
    /// List all supported locales and exit
    #[arg(long)]
    pub list_locales: bool,

    /// Show detailed information about a specific locale and exit
    #[arg(long)]
    pub locale_info: Option<String>,

    /// Text to phonemize directly (one-shot mode, prints tokens to stdout)
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// Input JSONL manifest to phonemize or split
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Output path: a manifest file, or a directory in --split mode
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// G2P engine to run
    #[arg(long, short = 'e', value_enum, default_value = "arpabet")]
    pub engine: Engine,

    /// Locale tag for the IPA engine
    #[arg(long, short = 'l', env = "PHONEMIZER_LOCALE", default_value = "en-US")]
    pub locale: String,

    /// Pronouncing dictionary file (defaults to a cached CMUdict download
    /// for the ARPABET engine; required for ipa and pinyin)
    #[arg(long, env = "PHONEMIZER_DICT")]
    pub phoneme_dict: Option<PathBuf>,

    /// Heteronyms file, one word per line; listed words keep their graphemes
    #[arg(long)]
    pub heteronyms: Option<PathBuf>,

    /// Phonemize ambiguous dictionary words using their first pronunciation
    /// instead of keeping graphemes
    #[arg(long)]
    pub keep_ambiguous: bool,

    /// Probability of phonemizing a word (the rest keep graphemes, for
    /// mixed grapheme/phoneme training)
    #[arg(long, value_parser = parse_probability)]
    pub phoneme_probability: Option<f64>,

    /// Strip primary and secondary stress marks (IPA engine)
    #[arg(long)]
    pub no_stresses: bool,

    /// Case applied to words kept as graphemes (IPA engine)
    #[arg(long, value_enum, default_value = "upper")]
    pub grapheme_case: GraphemeCase,

    /// Prefix marking grapheme tokens apart from phonemes (IPA engine)
    #[arg(long, default_value = "")]
    pub grapheme_prefix: String,

    /// Separator inserted between phoneme tokens in manifest output
    #[arg(long, default_value = "")]
    pub separator: String,

    /// Manifest field to read text from (defaults to "text")
    #[arg(long)]
    pub field: Option<String>,

    /// Manifest field to write phonemes to
    #[arg(long, default_value = DEFAULT_DEST_FIELD)]
    pub dest_field: String,

    /// Split the input manifest into train/val/test instead of phonemizing
    #[arg(long)]
    pub split: bool,

    /// Validation fraction for --split
    #[arg(long, default_value = "0.1", value_parser = parse_fraction)]
    pub val_size: f64,

    /// Test fraction for --split
    #[arg(long, default_value = "0.2", value_parser = parse_fraction)]
    pub test_size: f64,

    /// Shuffle seed for --split
    #[arg(long, default_value = "100")]
    pub split_seed: u64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        let config = Self::parse();

        // Handle locale listing commands
        if config.list_locales {
            locales::print_locales();
            std::process::exit(0);
        }

        if let Some(ref tag) = config.locale_info {
            match locales::print_locale_info(tag) {
                Ok(_) => std::process::exit(0),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        match (&self.text, &self.input) {
            (None, None) => anyhow::bail!("Nothing to do: pass --text or --input"),
            (Some(_), Some(_)) => anyhow::bail!("--text and --input are mutually exclusive"),
            _ => {}
        }

        if self.split {
            if self.input.is_none() {
                anyhow::bail!("--split operates on a manifest: pass --input");
            }
            if self.output.is_none() {
                anyhow::bail!("--split needs an output directory: pass --output");
            }
            if self.val_size + self.test_size >= 1.0 {
                anyhow::bail!(
                    "--val-size ({}) and --test-size ({}) leave no training data",
                    self.val_size,
                    self.test_size
                );
            }
        } else if self.input.is_some() && self.output.is_none() {
            anyhow::bail!("--input needs an output manifest: pass --output");
        }

        match self.engine {
            Engine::Arpabet => {}
            Engine::Ipa => {
                validate_locale(&self.locale)?;
                if self.phoneme_dict.is_none() {
                    anyhow::bail!("The ipa engine has no built-in dictionary: pass --phoneme-dict");
                }
            }
            Engine::Pinyin => {
                if self.phoneme_dict.is_none() {
                    anyhow::bail!("The pinyin engine has no built-in dictionary: pass --phoneme-dict");
                }
            }
        }

        if let Some(path) = &self.input
            && !path.exists()
        {
            anyhow::bail!("Input manifest not found: {}", path.display());
        }

        if let Some(path) = &self.phoneme_dict
            && !path.exists()
        {
            anyhow::bail!("Phoneme dictionary not found: {}", path.display());
        }

        if let Some(path) = &self.heteronyms
            && !path.exists()
        {
            anyhow::bail!("Heteronyms file not found: {}", path.display());
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Engine: {}", self.engine);
        if self.engine == Engine::Ipa {
            info!("  Locale: {}", self.locale);
            info!("  Grapheme case: {}", self.grapheme_case);
            info!("  Stress marks: {}", if self.no_stresses { "stripped" } else { "kept" });
            if !self.grapheme_prefix.is_empty() {
                info!("  Grapheme prefix: {:?}", self.grapheme_prefix);
            }
        }
        match &self.phoneme_dict {
            Some(path) => info!("  Phoneme dictionary: {}", path.display()),
            None => info!("  Phoneme dictionary: cached CMUdict"),
        }
        if let Some(ref path) = self.heteronyms {
            info!("  Heteronyms file: {}", path.display());
        }
        info!("  Ambiguous words: {}", if self.keep_ambiguous { "first pronunciation" } else { "kept as graphemes" });
        if let Some(p) = self.phoneme_probability {
            info!("  Phoneme probability: {}", p);
        }
        if self.input.is_some() {
            if self.split {
                info!("  Split: val={} test={} seed={}", self.val_size, self.test_size, self.split_seed);
            } else {
                info!("  Source field: {}", self.field.as_deref().unwrap_or("text"));
                info!("  Destination field: {}", self.dest_field);
            }
        }
    }
}

/// Parse and validate a probability value (0.0-1.0).
fn parse_probability(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid float", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("probability must be between 0.0 and 1.0, got {}", value))
    }
}

/// Parse and validate a split fraction (0.0 inclusive to 1.0 exclusive).
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a valid float", s))?;
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("fraction must be at least 0.0 and below 1.0, got {}", value))
    }
}
