// bigsplit_core/src/fs.rs
use std::ffi::OsStr;
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// A source opened for streaming, with its length taken at open time.
pub struct OpenedSource {
    pub reader: Box<dyn Read + Send>,
    pub len: u64,
}

impl fmt::Debug for OpenedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedSource")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// The filesystem operations the splitter needs. Errors stay raw
/// `io::Error` here; the engine classifies them.
pub trait SplitFs: Send + Sync {
    /// Open a regular file for reading. Anything that is not a regular
    /// file is rejected with `ErrorKind::Unsupported`.
    fn open_read(&self, path: &Path) -> io::Result<OpenedSource>;

    /// Create or truncate a file for writing.
    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn join(&self, dir: &Path, name: &OsStr) -> PathBuf {
        dir.join(name)
    }
}
