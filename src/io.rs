//! File I/O for log documents and extracted records.

use crate::record::LogRecord;
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Reads a whole log document.
///
/// Invalid UTF-8 sequences are replaced rather than rejected: Gaussian logs are
/// plain ASCII, and stray bytes elsewhere must not prevent the known sections
/// from being found.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Returns true if `path` has one of `extensions`, compared case-insensitively.
///
/// # Examples
///
/// ```
/// use glogread::io::is_log_file;
/// use std::path::Path;
///
/// let exts = vec!["log".to_string(), "out".to_string()];
/// assert!(is_log_file(Path::new("water.LOG"), &exts));
/// assert!(!is_log_file(Path::new("water.gjf"), &exts));
/// ```
pub fn is_log_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Writes a record as pretty-printed JSON.
pub fn write_json(record: &LogRecord, path: &Path) -> Result<()> {
    let json = record
        .to_json()
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
    fs::write(path, json + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Fragment, MullikenCharges};
    use tempfile::TempDir;

    #[test]
    fn test_read_log_lossy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.log");
        fs::write(&path, b" Mulliken charges:\r\n  1  C \xff -0.1\r\n").unwrap();
        let text = read_log(&path).unwrap();
        assert!(text.starts_with(" Mulliken charges:"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_log(&dir.path().join("missing.log")).is_err());
    }

    #[test]
    fn test_is_log_file() {
        let exts = vec!["log".to_string()];
        assert!(is_log_file(Path::new("a.log"), &exts));
        assert!(is_log_file(Path::new("dir/A.LOG"), &exts));
        assert!(!is_log_file(Path::new("a.out"), &exts));
        assert!(!is_log_file(Path::new("log"), &exts));
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut record = LogRecord::new();
        record.merge(Fragment::Mulliken(MullikenCharges {
            elements: vec!["H".to_string()],
            charges: vec![0.5],
            charge_sum: Some(0.5),
        }));
        write_json(&record, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["elements"][0], "H");
        assert_eq!(json["charge_sum"], 0.5);
    }
}
