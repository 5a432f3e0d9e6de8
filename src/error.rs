//! Error types for the phonemizer library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for G2P operations.
#[derive(Error, Debug)]
pub enum G2pError {
    /// I/O errors (dictionary files, manifests).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors (manifest entries).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dictionary download errors.
    #[error("Download error: {0}")]
    Download(#[from] reqwest::Error),

    /// A dictionary file could not be parsed.
    #[error("Malformed dictionary {path}: {reason}")]
    DictFormat { path: PathBuf, reason: String },

    /// A dictionary yielded no usable entries.
    #[error("Dictionary {0} contains no entries")]
    EmptyDictionary(PathBuf),

    /// The requested locale has no tokenization/lexicon support.
    #[error("Unsupported locale '{0}' (supported: en-US, de-DE, es-ES)")]
    UnsupportedLocale(String),

    /// A pinyin syllable produced by the reading converter is missing from
    /// the pinyin-to-phoneme dictionary.
    #[error("No pronunciation for pinyin '{0}' in the phoneme dictionary")]
    MissingPronunciation(String),

    /// A manifest entry is missing the field selected for phonemization.
    #[error("Manifest entry {line} has no '{field}' field")]
    ManifestField { line: usize, field: String },

    /// A manifest line is not a valid JSON object.
    #[error("Manifest line {line}: {source}")]
    ManifestLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Train/val/test fractions out of range or the split leaves no
    /// training data.
    #[error("Invalid manifest split: {0}")]
    InvalidSplit(String),

    /// Configuration values that cannot be applied (bad probability,
    /// missing dictionary for an engine that requires one).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for G2P operations.
pub type G2pResult<T> = Result<T, G2pError>;
