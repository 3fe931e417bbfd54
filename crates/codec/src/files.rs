//! File helpers for whole-file formats and multi-part output.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::{debug, trace};

use crate::error::{CodecError, Result};

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CodecError::io(path, e))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| CodecError::io(path, e))
}

/// Width of the zero-padded index for `count` parts.
pub fn index_width(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// Path of part `index` (1-based) out of `count`: the prefix followed by
/// the zero-padded index.
pub fn part_path(prefix: &Path, index: usize, count: usize) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!("{index:0width$}", width = index_width(count)));
    PathBuf::from(name)
}

/// Write every part under `prefix`, calling `on_written` after each file.
pub fn write_parts<F>(prefix: &Path, parts: &[Vec<u8>], mut on_written: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path, usize),
{
    let mut paths = Vec::with_capacity(parts.len());
    for (i, part) in parts.iter().enumerate() {
        let path = part_path(prefix, i + 1, parts.len());
        write_file(&path, part)?;
        trace!(path = %path.display(), bytes = part.len(), "wrote part");
        on_written(&path, part.len());
        paths.push(path);
    }
    Ok(paths)
}

/// Split a prefix into the directory to list and the file-name stem.
fn split_prefix(prefix: &Path) -> (PathBuf, String) {
    let raw = prefix.to_string_lossy();
    if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') {
        return (prefix.to_path_buf(), String::new());
    }
    let dir = match prefix.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let stem = prefix
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, stem)
}

/// Find the part files for `prefix`, in lexicographic name order.
///
/// Only entries named exactly `<stem><digits>` are kept.
pub fn discover_parts(prefix: &Path) -> Result<Vec<PathBuf>> {
    let (dir, stem) = split_prefix(prefix);
    let entries = fs::read_dir(&dir).map_err(|e| CodecError::io(&dir, e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CodecError::io(&dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(suffix) = name.strip_prefix(stem.as_str()) else {
            continue;
        };
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            found.push((name.to_owned(), entry.path()));
        }
    }
    found.sort();

    if found.is_empty() {
        return Err(CodecError::io(
            prefix,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no part files match this prefix"),
        ));
    }
    debug!(prefix = %prefix.display(), parts = found.len(), "discovered parts");
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_part_names() {
        let prefix = Path::new("out/chr1_");
        assert_eq!(part_path(prefix, 1, 9), PathBuf::from("out/chr1_1"));
        assert_eq!(part_path(prefix, 3, 12), PathBuf::from("out/chr1_03"));
        assert_eq!(part_path(prefix, 100, 100), PathBuf::from("out/chr1_100"));
        assert_eq!(index_width(0), 1);
    }

    #[test]
    fn test_write_and_discover() {
        let dir = tempdir().unwrap();
        let prefix = dir.path().join("part");
        let parts: Vec<Vec<u8>> = (0..11u8).map(|i| vec![i]).collect();
        let mut written = 0;
        let paths = write_parts(&prefix, &parts, |_, _| written += 1).unwrap();
        assert_eq!(written, 11);

        // Noise that must be ignored.
        fs::write(dir.path().join("part"), b"x").unwrap();
        fs::write(dir.path().join("part01.bak"), b"x").unwrap();
        fs::write(dir.path().join("other01"), b"x").unwrap();

        let found = discover_parts(&prefix).unwrap();
        assert_eq!(found, paths);
        assert!(found[0].ends_with("part01"));
        assert!(found[10].ends_with("part11"));
        assert_eq!(read_file(&found[4]).unwrap(), vec![4]);
    }

    #[test]
    fn test_discover_none() {
        let dir = tempdir().unwrap();
        let err = discover_parts(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_directory_prefix() {
        let dir = tempdir().unwrap();
        let prefix = PathBuf::from(format!("{}/", dir.path().display()));
        write_parts(&prefix, &[vec![1], vec![2]], |_, _| {}).unwrap();
        let found = discover_parts(&prefix).unwrap();
        assert_eq!(found.len(), 2);
    }
}
