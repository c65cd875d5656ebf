use std::num::NonZeroU64;
use std::path::PathBuf;

use bigsplit_core::error::{Result, SplitError};
use bigsplit_core::fs_factory::{Backend, open_fs};
use bigsplit_core::{SplitOptions, SplitRequest, SplitResult, SplitStatus, Splitter, list_chunks};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::presentation::cli::SplitArgs;
use crate::presentation::progress::SplitProgress;

const MIB: u64 = 1024 * 1024;
const DEFAULT_SIZE_MB: u64 = 10;

pub fn chunk_size_from_args(size_mb: Option<u64>, size_bytes: Option<u64>) -> Result<NonZeroU64> {
    let bytes = match (size_bytes, size_mb) {
        (Some(b), _) => Some(b),
        (None, mb) => mb.unwrap_or(DEFAULT_SIZE_MB).checked_mul(MIB),
    };
    bytes
        .and_then(NonZeroU64::new)
        .ok_or_else(|| SplitError::Unknown("chunk size must be between 1 byte and u64::MAX".into()))
}

fn request_from_args(args: &SplitArgs) -> Result<(Splitter, SplitRequest)> {
    let chunk_size = chunk_size_from_args(args.size_mb, args.size_bytes)?;
    let mut req = SplitRequest::new(&args.source, chunk_size)?;
    if let Some(out) = &args.out {
        req = req.with_output_dir(out);
    }
    let buffer_size = args
        .buffer_kb
        .checked_mul(1024)
        .and_then(|b| usize::try_from(b).ok())
        .ok_or_else(|| {
            SplitError::Unknown(format!("buffer of {} KiB is too large", args.buffer_kb))
        })?;
    let splitter = Splitter::with_options(open_fs(Backend::Local), SplitOptions { buffer_size });
    Ok((splitter, req))
}

/// Run one split with a progress bar and Ctrl-C cancellation, then report it.
pub fn handle_split(args: SplitArgs) -> SplitStatus {
    let res = match request_from_args(&args) {
        Ok((splitter, req)) => run_on_runtime(splitter, req, !args.quiet && !args.json),
        Err(e) => SplitResult::Failed(e),
    };
    report(&res, args.json);
    res.status()
}

fn run_on_runtime(splitter: Splitter, req: SplitRequest, show_progress: bool) -> SplitResult {
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => return SplitResult::Failed(SplitError::Unknown(format!("runtime: {e}"))),
    };
    rt.block_on(drive(splitter, req, show_progress))
        .unwrap_or_else(SplitResult::Failed)
}

/// Splitting happens on the worker thread; this task only renders progress
/// and turns Ctrl-C into a cancel.
async fn drive(splitter: Splitter, req: SplitRequest, show_progress: bool) -> Result<SplitResult> {
    info!(
        source = %req.source_path().display(),
        chunk_size = req.chunk_size(),
        "split requested"
    );
    let progress = SplitProgress::new(show_progress, req.source_path());

    // One listener for the whole run; polling it once installs the handler.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;
    let mut interrupted_early = false;
    tokio::select! {
        biased;
        sig = &mut ctrl_c => {
            listening = false;
            interrupted_early = interrupted(sig);
        }
        () = std::future::ready(()) => {}
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = splitter.spawn(req, move |p| {
        let _ = tx.send(p);
    })?;
    let cancel = handle.cancel_token();
    if interrupted_early {
        cancel.cancel();
    }

    loop {
        tokio::select! {
            p = rx.recv() => match p {
                Some(p) => progress.update(p),
                // sender dropped: the worker is done
                None => break,
            },
            sig = &mut ctrl_c, if listening => {
                listening = false;
                if interrupted(sig) {
                    cancel.cancel();
                }
            }
        }
    }
    progress.finish();

    tokio::task::spawn_blocking(move || handle.join())
        .await
        .map_err(|e| SplitError::Unknown(format!("join split worker: {e}")))
}

/// Whether the listener saw an interrupt. A listener that failed to install
/// leaves the split running.
fn interrupted(sig: std::io::Result<()>) -> bool {
    match sig {
        Ok(()) => {
            warn!("interrupt received, cancelling split");
            true
        }
        Err(e) => {
            warn!(error = %e, "ctrl-c listener unavailable, split continues");
            false
        }
    }
}

fn report(res: &SplitResult, json: bool) {
    let status = res.status();
    if json {
        let body = serde_json::json!({
            "status": status,
            "severity": status.severity(),
            "message": status.message(),
            "stats": res.stats(),
            "error": res.error().map(|e| e.to_string()),
        });
        println!("{body}");
        return;
    }

    eprintln!("{}", status.message());
    match res {
        SplitResult::Success(s) | SplitResult::Cancelled(s) => {
            eprintln!("{} chunk file(s), {} of {} bytes", s.chunks, s.bytes_written, s.bytes_total);
        }
        SplitResult::Failed(e) => eprintln!("  {e}"),
    }
}

pub fn handle_chunks(source: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let mut req = SplitRequest::new(source, NonZeroU64::MIN)?;
    if let Some(out) = out {
        req = req.with_output_dir(out);
    }
    let rows = list_chunks(req.output_dir(), req.base_name(), req.extension())?;
    for r in &rows {
        println!("#{:<5} {:>12}  {}", r.index, r.size, r.path.display());
    }
    let gaps = rows
        .iter()
        .enumerate()
        .any(|(i, r)| r.index != i as u64 + 1);
    if gaps {
        eprintln!("chunks: numbering has gaps; files may come from different runs");
    }
    Ok(())
}
