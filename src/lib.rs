//! Multi-locale grapheme-to-phoneme conversion for TTS text preprocessing.
//!
//! Three dictionary-backed engines cover the supported locales: ARPABET
//! phonemes from CMUdict for English, IPA phonemes with per-locale symbol
//! inventories (en-US, de-DE, es-ES), and pinyin initial/final phonemes with
//! tone tokens for Mandarin. The [`manifest`] module applies an engine to
//! JSONL dataset manifests and produces seeded train/val/test splits.
//!
//! ```
//! use phonemizer::g2p::{EnglishG2p, G2p};
//! use phonemizer::lexicon::PronouncingDictionary;
//!
//! # fn main() -> phonemizer::G2pResult<()> {
//! let mut dict = PronouncingDictionary::new();
//! dict.insert(
//!     "hello".to_string(),
//!     vec![vec!["HH".into(), "AH0".into(), "L".into(), "OW1".into()]],
//! );
//!
//! let g2p = EnglishG2p::builder().entries(dict).build()?;
//! assert_eq!(g2p.convert("Hello?")?, vec!["HH", "AH0", "L", "OW1", "?"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod g2p;
pub mod lexicon;
pub mod manifest;
pub mod text;

pub use error::{G2pError, G2pResult};
pub use g2p::{ChineseG2p, EnglishG2p, G2p, IpaG2p};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
