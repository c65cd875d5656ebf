// bigsplit_core/src/domain.rs
use std::ffi::{OsStr, OsString};
use std::num::NonZeroU64;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::options::DEFAULT_OUTPUT_DIR_NAME;
use crate::stats::SplitStats;
use crate::status::SplitStatus;

/// One split invocation. Built fresh per run.
#[derive(Clone, Debug)]
pub struct SplitRequest {
    source_path: PathBuf,
    chunk_size: NonZeroU64,
    output_dir: PathBuf,
    base_name: OsString,
    extension: OsString,
}

impl SplitRequest {
    /// Derive base name and extension from `source` and default the output
    /// directory to `<source dir>/SplitFiles`.
    pub fn new(source: impl Into<PathBuf>, chunk_size: NonZeroU64) -> Result<Self> {
        let source_path = source.into();
        let base_name = source_path
            .file_stem()
            .ok_or_else(|| SplitError::not_supported(&source_path, "source has no file name"))?
            .to_os_string();
        let extension = match source_path.extension() {
            Some(ext) => {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            }
            None => OsString::new(),
        };
        let output_dir = source_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_OUTPUT_DIR_NAME);

        Ok(Self {
            source_path,
            chunk_size,
            output_dir,
            base_name,
            extension,
        })
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size.get()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn base_name(&self) -> &OsStr {
        &self.base_name
    }

    /// Extension including its leading dot, or empty.
    pub fn extension(&self) -> &OsStr {
        &self.extension
    }

    pub fn chunk_file_name(&self, index: u64) -> OsString {
        chunk_file_name(&self.base_name, &self.extension, index)
    }

    /// Number of chunk files a source of `total` bytes splits into.
    pub fn chunk_count(&self, total: u64) -> u64 {
        total.div_ceil(self.chunk_size.get())
    }
}

/// `{base}_Split{index}{ext}`, no zero padding.
pub fn chunk_file_name(base: &OsStr, ext: &OsStr, index: u64) -> OsString {
    let mut name = base.to_os_string();
    name.push(format!("_Split{index}"));
    name.push(ext);
    name
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// 1-based
    pub index: u64,
    pub byte_range: Range<u64>,
    pub output_path: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub bytes_processed: u64,
    pub bytes_total: u64,
}

impl Progress {
    /// Whole percent, truncated. Exactly 100 once everything is processed.
    pub fn percent(&self) -> u8 {
        if self.bytes_processed >= self.bytes_total {
            return 100;
        }
        let pct = u128::from(self.bytes_processed) * 100 / u128::from(self.bytes_total);
        pct as u8
    }
}

#[derive(Debug)]
pub enum SplitResult {
    Success(SplitStats),
    Cancelled(SplitStats),
    Failed(SplitError),
}

impl SplitResult {
    pub fn status(&self) -> SplitStatus {
        match self {
            Self::Success(_) => SplitStatus::Success,
            Self::Cancelled(_) => SplitStatus::Cancelled,
            Self::Failed(e) => e.status(),
        }
    }

    pub fn stats(&self) -> Option<&SplitStats> {
        match self {
            Self::Success(s) | Self::Cancelled(s) => Some(s),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SplitError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SplitError> for SplitResult {
    fn from(e: SplitError) -> Self {
        Self::Failed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn names_from_plain_source() {
        let req = SplitRequest::new("/data/movie.mkv", size(10)).unwrap();
        assert_eq!(req.base_name(), "movie");
        assert_eq!(req.extension(), ".mkv");
        assert_eq!(req.output_dir(), Path::new("/data/SplitFiles"));
        assert_eq!(req.chunk_file_name(1), "movie_Split1.mkv");
        assert_eq!(req.chunk_file_name(12), "movie_Split12.mkv");
    }

    #[test]
    fn multi_dot_strips_last_extension_only() {
        let req = SplitRequest::new("/data/backup.tar.gz", size(10)).unwrap();
        assert_eq!(req.base_name(), "backup.tar");
        assert_eq!(req.extension(), ".gz");
        assert_eq!(req.chunk_file_name(3), "backup.tar_Split3.gz");
    }

    #[test]
    fn no_extension() {
        let req = SplitRequest::new("/data/README", size(10)).unwrap();
        assert_eq!(req.extension(), "");
        assert_eq!(req.chunk_file_name(2), "README_Split2");
    }

    #[test]
    fn output_dir_override() {
        let req = SplitRequest::new("/data/a.bin", size(10))
            .unwrap()
            .with_output_dir("/elsewhere");
        assert_eq!(req.output_dir(), Path::new("/elsewhere"));
    }

    #[test]
    fn rejects_path_without_file_name() {
        let err = SplitRequest::new("/", size(10)).unwrap_err();
        assert_eq!(err.status(), SplitStatus::NotSupportedError);
    }

    #[test]
    fn chunk_count_rounds_up() {
        let req = SplitRequest::new("a.bin", size(10)).unwrap();
        assert_eq!(req.chunk_count(0), 0);
        assert_eq!(req.chunk_count(10), 1);
        assert_eq!(req.chunk_count(11), 2);
        assert_eq!(req.chunk_count(25), 3);
    }

    #[test]
    fn lexical_order_diverges_from_numeric_at_ten() {
        let req = SplitRequest::new("a.bin", size(1)).unwrap();
        let mut names: Vec<_> = (1..=10).map(|i| req.chunk_file_name(i)).collect();
        names.sort();
        assert_eq!(names[0], "a_Split1.bin");
        assert_eq!(names[1], "a_Split10.bin");
    }

    #[test]
    fn percent_truncates_and_hits_100() {
        let p = |a, b| Progress {
            bytes_processed: a,
            bytes_total: b,
        };
        assert_eq!(p(0, 3).percent(), 0);
        assert_eq!(p(1, 3).percent(), 33);
        assert_eq!(p(2, 3).percent(), 66);
        assert_eq!(p(999, 1000).percent(), 99);
        assert_eq!(p(1000, 1000).percent(), 100);
        assert_eq!(p(0, 0).percent(), 100);
        assert_eq!(p(u64::MAX - 1, u64::MAX).percent(), 99);
    }
}
