use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::domain::{ChunkDescriptor, Progress, SplitRequest, SplitResult};
use crate::error::{Result, Side, SplitError};
use crate::fs::{OpenedSource, SplitFs};
use crate::fs_factory::{Backend, open_fs};
use crate::options::SplitOptions;
use crate::stats::SplitStats;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Cancelled,
}

/// Splits one source file into `{base}_Split{n}{ext}` chunk files.
#[derive(Clone)]
pub struct Splitter {
    fs: Arc<dyn SplitFs>,
    opts: SplitOptions,
}

impl Splitter {
    pub fn new(fs: Arc<dyn SplitFs>) -> Self {
        Self::with_options(fs, SplitOptions::default())
    }

    pub fn with_options(fs: Arc<dyn SplitFs>, opts: SplitOptions) -> Self {
        Self { fs, opts }
    }

    /// Splitter over the real filesystem with default options.
    pub fn local() -> Self {
        Self::new(open_fs(Backend::Local))
    }

    pub fn options(&self) -> &SplitOptions {
        &self.opts
    }

    /// Run one split on the calling thread.
    ///
    /// `on_progress` is called after every buffer written, with a
    /// non-decreasing byte count. `cancel` is checked before each chunk file
    /// is created and after every buffer written; the in-flight write always
    /// completes first. Files already written are left in place on every
    /// exit path.
    pub fn split<F>(
        &self,
        req: &SplitRequest,
        mut on_progress: F,
        cancel: &CancelToken,
    ) -> SplitResult
    where
        F: FnMut(Progress),
    {
        info!(
            source = %req.source_path().display(),
            out = %req.output_dir().display(),
            chunk_size = req.chunk_size(),
            "split: start"
        );

        let mut stats = SplitStats::default();
        match self.run(req, &mut on_progress, cancel, &mut stats) {
            Ok(Flow::Continue) => {
                info!(
                    chunks = stats.chunks,
                    bytes = stats.bytes_written,
                    "split: done"
                );
                SplitResult::Success(stats)
            }
            Ok(Flow::Cancelled) => {
                warn!(
                    chunks = stats.chunks,
                    bytes = stats.bytes_written,
                    total = stats.bytes_total,
                    "split: cancelled"
                );
                SplitResult::Cancelled(stats)
            }
            Err(e) => {
                warn!(error = %e, status = ?e.status(), chunks = stats.chunks, "split: failed");
                SplitResult::Failed(e)
            }
        }
    }

    fn run(
        &self,
        req: &SplitRequest,
        on_progress: &mut dyn FnMut(Progress),
        cancel: &CancelToken,
        stats: &mut SplitStats,
    ) -> Result<Flow> {
        if cancel.is_cancelled() {
            return Ok(Flow::Cancelled);
        }

        let src_path = req.source_path();
        let OpenedSource { reader, len } = self
            .fs
            .open_read(src_path)
            .map_err(|e| SplitError::from_io(Side::Source, src_path, e))?;
        stats.bytes_total = len;

        let out_dir = req.output_dir();
        self.fs
            .create_dir_all(out_dir)
            .map_err(|e| SplitError::from_io(Side::Output, out_dir, e))?;

        let mut copy = ChunkCopy {
            fs: self.fs.as_ref(),
            src_path,
            reader,
            buf: vec![0u8; self.opts.effective_buffer_size()],
            total: len,
            processed: 0,
            on_progress,
            cancel,
        };

        // The length taken at open time bounds the copy; bytes appended to the
        // source afterwards are not split.
        let mut index = 1u64;
        while copy.processed < copy.total {
            if cancel.is_cancelled() {
                return Ok(Flow::Cancelled);
            }
            let start = copy.processed;
            let end = start + req.chunk_size().min(copy.total - start);
            let chunk = ChunkDescriptor {
                index,
                byte_range: start..end,
                output_path: self.fs.join(out_dir, &req.chunk_file_name(index)),
            };
            let flow = copy.chunk(&chunk, stats)?;
            if flow == Flow::Cancelled {
                return Ok(Flow::Cancelled);
            }
            index += 1;
        }
        Ok(Flow::Continue)
    }
}

/// Per-run copy state: the source reader, the reused buffer and the running
/// byte count. Owned by the worker for the whole run.
struct ChunkCopy<'a, 'p> {
    fs: &'a dyn SplitFs,
    src_path: &'a Path,
    reader: Box<dyn Read + Send>,
    buf: Vec<u8>,
    total: u64,
    processed: u64,
    on_progress: &'a mut (dyn FnMut(Progress) + 'p),
    cancel: &'a CancelToken,
}

impl ChunkCopy<'_, '_> {
    /// Copy one chunk's byte range into a fresh file. The file handle is
    /// dropped before this returns, whatever the outcome.
    fn chunk(&mut self, chunk: &ChunkDescriptor, stats: &mut SplitStats) -> Result<Flow> {
        let path = chunk.output_path.as_path();
        let out_err = |e: io::Error| SplitError::from_io(Side::Output, path, e);

        let mut out = self.fs.create_write(path).map_err(out_err)?;
        stats.chunks += 1;
        debug!(
            index = chunk.index,
            start = chunk.byte_range.start,
            end = chunk.byte_range.end,
            path = %path.display(),
            "chunk open"
        );

        let mut remaining = chunk.byte_range.end - chunk.byte_range.start;
        while remaining > 0 {
            let want = self
                .buf
                .len()
                .min(usize::try_from(remaining).unwrap_or(usize::MAX));
            let n = read_some(self.reader.as_mut(), &mut self.buf[..want])
                .map_err(|e| SplitError::from_io(Side::Source, self.src_path, e))?;
            if n == 0 {
                return Err(SplitError::from_io(
                    Side::Source,
                    self.src_path,
                    io::Error::new(io::ErrorKind::UnexpectedEof, "source shrank during split"),
                ));
            }
            out.write_all(&self.buf[..n]).map_err(out_err)?;

            remaining -= n as u64;
            self.processed += n as u64;
            stats.bytes_written = self.processed;
            (self.on_progress)(Progress {
                bytes_processed: self.processed,
                bytes_total: self.total,
            });

            if self.cancel.is_cancelled() {
                out.flush().map_err(out_err)?;
                debug!(index = chunk.index, "chunk closed early");
                return Ok(Flow::Cancelled);
            }
        }

        out.flush().map_err(out_err)?;
        debug!(index = chunk.index, "chunk closed");
        Ok(Flow::Continue)
    }
}

fn read_some<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match r.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
