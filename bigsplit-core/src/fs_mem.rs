use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::fs::{OpenedSource, SplitFs};

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
    /// Bytes that may still be written before writes fail with `StorageFull`.
    quota: Option<u64>,
}

impl State {
    fn dir_exists(&self, p: &Path) -> bool {
        p.as_os_str().is_empty() || p.parent().is_none() || self.dirs.contains(p)
    }
}

/// In-memory `SplitFs`. Partially written files stay visible after a
/// failed write, like on a real disk.
#[derive(Clone, Debug, Default)]
pub struct MemFs {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> io::Result<MutexGuard<'_, State>> {
    state.lock().map_err(|e| io::Error::other(e.to_string()))
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, creating its parent directories.
    pub fn insert_file(
        &self,
        path: impl Into<PathBuf>,
        data: impl Into<Vec<u8>>,
    ) -> io::Result<()> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        lock(&self.state)?.files.insert(path, data.into());
        Ok(())
    }

    /// Directories under which nothing may be created.
    pub fn set_read_only(&self, dir: impl Into<PathBuf>) -> io::Result<()> {
        let dir = dir.into();
        let mut st = lock(&self.state)?;
        st.dirs.insert(dir.clone());
        st.read_only.insert(dir);
        Ok(())
    }

    pub fn set_write_quota(&self, bytes: u64) -> io::Result<()> {
        lock(&self.state)?.quota = Some(bytes);
        Ok(())
    }

    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().ok()?.files.get(path).cloned()
    }

    pub fn dir_exists(&self, path: &Path) -> bool {
        self.state
            .lock()
            .map(|st| st.dirs.contains(path))
            .unwrap_or(false)
    }

    /// Files directly inside `dir`, in path order.
    pub fn files_in(&self, dir: &Path) -> Vec<PathBuf> {
        match self.state.lock() {
            Ok(st) => st
                .files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl SplitFs for MemFs {
    fn open_read(&self, path: &Path) -> io::Result<OpenedSource> {
        let st = lock(&self.state)?;
        if st.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "source is not a regular file",
            ));
        }
        let data = st
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let len = data.len() as u64;
        Ok(OpenedSource {
            reader: Box::new(Cursor::new(data)),
            len,
        })
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let mut st = lock(&self.state)?;
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !st.dir_exists(parent) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if st.read_only.contains(parent) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if st.dirs.contains(path) {
            return Err(io::Error::from(io::ErrorKind::IsADirectory));
        }
        st.files.insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MemWriter {
            state: Arc::clone(&self.state),
            path: path.to_path_buf(),
        }))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut st = lock(&self.state)?;
        let mut missing: Vec<&Path> = path
            .ancestors()
            .take_while(|p| !st.dir_exists(p))
            .collect();
        missing.reverse();
        for dir in missing {
            if st.files.contains_key(dir) {
                return Err(io::Error::from(io::ErrorKind::NotADirectory));
            }
            if let Some(parent) = dir.parent() {
                if st.read_only.contains(parent) {
                    return Err(io::Error::from(io::ErrorKind::PermissionDenied));
                }
            }
            st.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }
}

struct MemWriter {
    state: Arc<Mutex<State>>,
    path: PathBuf,
}

impl Write for MemWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut st = lock(&self.state)?;
        let n = match st.quota {
            Some(0) if !buf.is_empty() => return Err(io::Error::from(io::ErrorKind::StorageFull)),
            Some(left) => buf.len().min(usize::try_from(left).unwrap_or(usize::MAX)),
            None => buf.len(),
        };
        if let Some(q) = st.quota.as_mut() {
            *q -= n as u64;
        }
        st.files
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
