//! Pinyin-to-phoneme dictionary parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{G2pError, G2pResult};

/// Parse a tab-separated pinyin dictionary, e.g. `zhong\tzh ong`.
///
/// Keys are lowercased to match the readings produced by the pinyin
/// converter. Every phone is prefixed with `#` so that phonemes never
/// collide with the single letters emitted for non-Chinese characters.
/// A duplicated pinyin keeps its last definition.
///
/// # Errors
/// Returns an error if the file cannot be read, a line has no tab
/// separator, or the dictionary ends up empty.
pub fn parse_pinyin_dict(path: &Path) -> G2pResult<HashMap<String, Vec<String>>> {
    let content = fs::read_to_string(path)?;

    let mut dict = HashMap::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((pinyin, phones)) = line.split_once('\t') else {
            return Err(G2pError::DictFormat {
                path: path.to_path_buf(),
                reason: format!("line {}: expected tab-separated pinyin and phonemes", lineno + 1),
            });
        };
        let phones: Vec<String> = phones.split_whitespace().map(|p| format!("#{p}")).collect();
        if phones.is_empty() {
            return Err(G2pError::DictFormat {
                path: path.to_path_buf(),
                reason: format!("line {}: pinyin '{}' has no phonemes", lineno + 1, pinyin),
            });
        }
        dict.insert(pinyin.to_lowercase(), phones);
    }

    if dict.is_empty() {
        return Err(G2pError::EmptyDictionary(path.to_path_buf()));
    }

    debug!("Loaded {} pinyin entries from {}", dict.len(), path.display());
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_fixture(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_phones_get_sharp_prefix_and_lower_keys() {
        let path = write_fixture("pinyin_basic.tsv", "ZHONG\tzh ong\nguo\tg uo\n");
        let dict = parse_pinyin_dict(&path).unwrap();

        assert_eq!(dict["zhong"], vec!["#zh", "#ong"]);
        assert_eq!(dict["guo"], vec!["#g", "#uo"]);
    }

    #[test]
    fn test_missing_tab_is_an_error() {
        let path = write_fixture("pinyin_notab.tsv", "zhong zh ong\n");
        let err = parse_pinyin_dict(&path).unwrap_err();

        assert!(matches!(err, G2pError::DictFormat { .. }));
    }
}
