//! Dataset manifest phonemization and splitting.
//!
//! Manifests are JSONL files, one entry per line, with `audio_filepath`,
//! `duration`, and `text` plus arbitrary extra fields that round-trip
//! untouched. [`phonemize_manifest`] runs a G2P engine over every entry and
//! stores the result in a destination field; [`split_manifest`] produces a
//! seeded train/val/test partition.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{G2pError, G2pResult};
use crate::g2p::G2p;

/// Destination field name for phonemized text.
pub const DEFAULT_DEST_FIELD: &str = "phoneme_text";

/// One manifest line. Unknown fields land in `extra` and are written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Train/val/test split fractions and the shuffle seed. The defaults match
/// the dataset-preparation scripts this replaces: 10% validation, 20% test,
/// seed 100.
#[derive(Debug, Clone, Copy)]
pub struct SplitSpec {
    pub val_size: f64,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitSpec {
    fn default() -> Self {
        Self { val_size: 0.1, test_size: 0.2, seed: 100 }
    }
}

/// Read a JSONL manifest. Blank lines are skipped; a malformed line fails
/// with its line number.
pub fn read_manifest(path: &Path) -> G2pResult<Vec<ManifestEntry>> {
    let reader = BufReader::new(fs::File::open(path)?);

    let mut entries = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line)
            .map_err(|e| G2pError::ManifestLine { line: lineno + 1, source: e })?;
        entries.push(entry);
    }

    debug!("Read {} manifest entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Write a JSONL manifest, creating parent directories as needed.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> G2pResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("Wrote {} manifest entries to {}", entries.len(), path.display());
    Ok(())
}

fn source_text<'a>(entry: &'a ManifestEntry, field: Option<&str>, entry_no: usize) -> G2pResult<&'a str> {
    match field {
        None | Some("text") => match &entry.text {
            Some(text) => Ok(text),
            None => Err(G2pError::ManifestField { line: entry_no, field: "text".to_string() }),
        },
        Some(name) => match entry.extra.get(name) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(G2pError::ManifestField { line: entry_no, field: name.to_string() }),
        },
    }
}

/// Run a G2P engine over every entry and store the joined phoneme tokens
/// in `dest_field`. The source defaults to the `text` field; `separator`
/// is inserted between tokens (the empty string reconstructs plain IPA
/// strings, since whitespace comes through as tokens).
///
/// # Errors
/// Returns an error if an entry is missing the source field or a
/// conversion fails.
pub fn phonemize_manifest(
    entries: &mut [ManifestEntry],
    g2p: &dyn G2p,
    source_field: Option<&str>,
    dest_field: &str,
    separator: &str,
) -> G2pResult<()> {
    if matches!(dest_field, "audio_filepath" | "duration") {
        return Err(G2pError::Config(format!("cannot phonemize into reserved field '{dest_field}'")));
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        let text = source_text(entry, source_field, i + 1)?;
        let phonemes = g2p.convert(text)?.join(separator);
        if dest_field == "text" {
            entry.text = Some(phonemes);
        } else {
            entry.extra.insert(dest_field.to_string(), Value::String(phonemes));
        }
    }

    info!("Phonemized {} manifest entries into '{}'", entries.len(), dest_field);
    Ok(())
}

/// Shuffle entries with a seeded RNG and split them into train/val/test.
/// The same seed always produces the same partition.
///
/// # Errors
/// Returns an error if a fraction is out of `[0, 1)` or the requested
/// split leaves no training data.
pub fn split_manifest(
    mut entries: Vec<ManifestEntry>,
    spec: SplitSpec,
) -> G2pResult<(Vec<ManifestEntry>, Vec<ManifestEntry>, Vec<ManifestEntry>)> {
    if !(0.0..1.0).contains(&spec.val_size) || !(0.0..1.0).contains(&spec.test_size) {
        return Err(G2pError::InvalidSplit(format!(
            "val ({}) and test ({}) fractions must be in [0, 1)",
            spec.val_size, spec.test_size
        )));
    }

    let n = entries.len();
    let n_val = (n as f64 * spec.val_size).round() as usize;
    let n_test = (n as f64 * spec.test_size).round() as usize;
    if n_val + n_test >= n {
        return Err(G2pError::InvalidSplit(format!(
            "{n} entries split into {n_val} val and {n_test} test leaves no training data"
        )));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    entries.shuffle(&mut rng);

    let mut rest = entries.split_off(n - n_val - n_test);
    let test = rest.split_off(n_val);
    let (train, val) = (entries, rest);

    info!("Split manifest: {} train / {} val / {} test", train.len(), val.len(), test.len());
    Ok((train, val, test))
}
