use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::fs::{OpenedSource, SplitFs};

/// `SplitFs` over the process's real filesystem.
#[derive(Clone, Debug, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn not_a_file() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "source is not a regular file")
}

impl SplitFs for LocalFs {
    fn open_read(&self, path: &Path) -> io::Result<OpenedSource> {
        // Opening a FIFO blocks until a writer shows up, so look before opening.
        if !fs::metadata(path)?.is_file() {
            return Err(not_a_file());
        }
        let f = File::open(path)?;
        let md = f.metadata()?;
        if !md.is_file() {
            return Err(not_a_file());
        }
        Ok(OpenedSource {
            reader: Box::new(f),
            len: md.len(),
        })
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(File::create(path)?))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
