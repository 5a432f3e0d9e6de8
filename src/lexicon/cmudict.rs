//! ARPABET dictionary parsing in CMUdict format, plus the CMUdict fetcher.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{G2pError, G2pResult};

use super::PronouncingDictionary;

/// Upstream copy of CMUdict 0.7b, fetched when no dictionary path is given.
const CMUDICT_URL: &str = "https://raw.githubusercontent.com/Alexir/CMUdict/master/cmudict-0.7b";

/// Alternate pronunciation marker appended to a word, e.g. `READ(1)`.
static ALT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([0-9]+\)").unwrap());

/// Parse a CMUdict-format ARPABET dictionary.
///
/// Entry lines look like `WORD  PH PH PH` with a two-space separator.
/// Variant markers (`WORD(1)`) are folded into the base word so every
/// pronunciation of a word ends up under one key, in file order. Keys are
/// lowercased.
///
/// CMUdict 0.7b itself is Latin-1 encoded, not UTF-8; pass `latin1 = true`
/// for it and for dictionaries derived from it.
///
/// # Errors
/// Returns an error if the file cannot be read, or if `latin1` is false and
/// the file is not valid UTF-8. Malformed entry lines are skipped with a
/// warning rather than failing the whole dictionary.
pub fn parse_cmudict(path: &Path, latin1: bool) -> G2pResult<PronouncingDictionary> {
    let bytes = fs::read(path)?;
    let content: String = if latin1 {
        // Latin-1 maps every byte to the code point of the same value
        bytes.iter().map(|&b| b as char).collect()
    } else {
        String::from_utf8(bytes).map_err(|e| G2pError::DictFormat {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        })?
    };

    let mut dict = PronouncingDictionary::new();
    let mut pronunciations = 0usize;
    for (lineno, line) in content.lines().enumerate() {
        let Some(first) = line.chars().next() else { continue };
        // Entries start with an uppercase letter or an apostrophe; ";;;"
        // comments and the punctuation entries at the top of CMUdict do not
        if !(first.is_ascii_uppercase() || first == '\'') {
            continue;
        }

        let Some((head, tail)) = line.split_once("  ") else {
            warn!("{}:{}: no pronunciation field, skipping entry", path.display(), lineno + 1);
            continue;
        };
        let word = ALT_RE.replace_all(head, "").to_lowercase();
        let pron: Vec<String> = tail.split_whitespace().map(str::to_owned).collect();
        if pron.is_empty() {
            warn!("{}:{}: empty pronunciation, skipping entry", path.display(), lineno + 1);
            continue;
        }

        dict.entry(word).or_default().push(pron);
        pronunciations += 1;
    }

    debug!("Loaded {} pronunciations ({} words) from {}", pronunciations, dict.len(), path.display());
    Ok(dict)
}

/// Directory where fetched dictionaries are cached (~/.phonemizer/dicts).
fn dict_cache_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".phonemizer").join("dicts")
    } else {
        PathBuf::from("dicts")
    }
}

/// Return a local copy of CMUdict 0.7b, downloading it on first use.
///
/// # Errors
/// Returns an error if the download fails or the cache cannot be written.
pub fn fetch_cmudict() -> G2pResult<PathBuf> {
    let path = dict_cache_dir().join("cmudict-0.7b");
    if path.exists() {
        debug!("Using cached CMUdict at {}", path.display());
        return Ok(path);
    }

    warn!("No phoneme dictionary given, fetching CMUdict 0.7b from {}", CMUDICT_URL);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = reqwest::blocking::get(CMUDICT_URL)?.error_for_status()?.bytes()?;
    fs::write(&path, &body)?;
    info!("Cached CMUdict ({} bytes) at {}", body.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(name: &str, content: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_variants_fold_into_one_entry() {
        let path = write_fixture(
            "cmudict_variants.txt",
            b";;; comment header\nREAD  R EH1 D\nREAD(1)  R IY1 D\n'BOUT  B AW1 T\n",
        );
        let dict = parse_cmudict(&path, true).unwrap();

        assert_eq!(dict["read"].len(), 2);
        assert_eq!(dict["read"][0], vec!["R", "EH1", "D"]); // file order kept
        assert_eq!(dict["read"][1], vec!["R", "IY1", "D"]);
        assert_eq!(dict["'bout"][0], vec!["B", "AW1", "T"]);
    }

    #[test]
    fn test_non_letter_lines_skipped() {
        let path = write_fixture(
            "cmudict_skip.txt",
            b")PAREN  P ER0\n;;; note\nlowercase  L OW1\nHELLO  HH AH0 L OW1\n",
        );
        let dict = parse_cmudict(&path, true).unwrap();

        assert_eq!(dict.len(), 1);
        assert!(dict.contains_key("hello"));
    }

    #[test]
    fn test_latin1_decoding() {
        // 0xC9 is 'É' in Latin-1 and invalid UTF-8 on its own
        let path = write_fixture("cmudict_latin1.txt", b"CAF\xC9  K AH0 F EY1\n");
        let dict = parse_cmudict(&path, true).unwrap();

        assert_eq!(dict["café"][0], vec!["K", "AH0", "F", "EY1"]);
    }

    #[test]
    fn test_malformed_line_does_not_fail_parse() {
        let path = write_fixture("cmudict_malformed.txt", b"BROKEN\nHELLO  HH AH0 L OW1\n");
        let dict = parse_cmudict(&path, true).unwrap();

        assert_eq!(dict.len(), 1);
        assert!(dict.contains_key("hello"));
    }
}
