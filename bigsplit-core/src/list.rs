use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, Side, SplitError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkFile {
    pub index: u64,
    pub path: PathBuf,
    pub size: u64,
}

/// Chunk files for `base`/`ext` directly inside `dir`, in numeric index order.
pub fn list_chunks(dir: &Path, base: &OsStr, ext: &OsStr) -> Result<Vec<ChunkFile>> {
    let mut out = Vec::new();
    for e in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let e = e.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => SplitError::from_io(Side::Output, &path, io),
                None => SplitError::Unknown(format!("walk {}", path.display())),
            }
        })?;
        if !e.file_type().is_file() {
            continue;
        }
        let Some(index) = parse_index(e.file_name(), base, ext) else {
            continue;
        };
        let size = e
            .metadata()
            .map_err(|err| SplitError::Unknown(format!("stat {}: {err}", e.path().display())))?
            .len();
        out.push(ChunkFile {
            index,
            path: e.into_path(),
            size,
        });
    }
    out.sort_by_key(|c| c.index);
    Ok(out)
}

fn parse_index(name: &OsStr, base: &OsStr, ext: &OsStr) -> Option<u64> {
    let name = name.to_str()?;
    let base = base.to_str()?;
    let ext = ext.to_str()?;
    let digits = name
        .strip_prefix(base)?
        .strip_prefix("_Split")?
        .strip_suffix(ext)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(name: &str) -> Option<u64> {
        parse_index(OsStr::new(name), OsStr::new("log"), OsStr::new(".txt"))
    }

    #[test]
    fn parses_chunk_names() {
        assert_eq!(idx("log_Split1.txt"), Some(1));
        assert_eq!(idx("log_Split10.txt"), Some(10));
        assert_eq!(idx("log_Split.txt"), None);
        assert_eq!(idx("log_Split01.txt"), None);
        assert_eq!(idx("log_Split1.txt.bak"), None);
        assert_eq!(idx("other_Split1.txt"), None);
        assert_eq!(idx("log_Split-1.txt"), None);
    }
}
