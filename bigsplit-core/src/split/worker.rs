use std::any::Any;
use std::thread::{self, JoinHandle};

use tracing::error;

use crate::cancel::CancelToken;
use crate::domain::{Progress, SplitRequest, SplitResult};
use crate::error::{Result, SplitError};
use crate::split::engine::Splitter;

/// A split running on its own thread.
///
/// Each handle owns a token created for this run only, so a cancel from an
/// earlier run can never leak into a later one.
pub struct SplitHandle {
    cancel: CancelToken,
    join: JoinHandle<SplitResult>,
}

impl Splitter {
    /// Start `req` on a dedicated worker thread. `on_progress` runs on the
    /// worker; forward its values to another thread rather than doing slow
    /// work in it.
    pub fn spawn<F>(&self, req: SplitRequest, mut on_progress: F) -> Result<SplitHandle>
    where
        F: FnMut(Progress) + Send + 'static,
    {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let splitter = self.clone();
        let join = thread::Builder::new()
            .name("bigsplit-worker".into())
            .spawn(move || splitter.split(&req, &mut on_progress, &worker_cancel))
            .map_err(|e| SplitError::Unknown(format!("spawn split worker: {e}")))?;
        Ok(SplitHandle { cancel, join })
    }
}

impl SplitHandle {
    /// Ask the worker to stop at its next check point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the worker. A panic on the worker becomes `UnknownError`.
    pub fn join(self) -> SplitResult {
        match self.join.join() {
            Ok(res) => res,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(%msg, "split worker panicked");
                SplitResult::Failed(SplitError::Unknown(format!("split worker panicked: {msg}")))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_factory::{Backend, open_fs};
    use crate::fs_mem::MemFs;
    use crate::status::SplitStatus;
    use std::num::NonZeroU64;
    use std::path::Path;
    use std::sync::mpsc;

    fn setup(len: usize) -> (MemFs, Splitter, SplitRequest) {
        let fs = MemFs::new();
        fs.insert_file("/in/f.dat", vec![1u8; len]).unwrap();
        let splitter = Splitter::new(open_fs(Backend::Memory(fs.clone())));
        let req = SplitRequest::new("/in/f.dat", NonZeroU64::new(8).unwrap()).unwrap();
        (fs, splitter, req)
    }

    #[test]
    fn progress_crosses_threads_in_order() {
        let (fs, splitter, req) = setup(100);
        let (tx, rx) = mpsc::channel();
        let handle = splitter
            .spawn(req, move |p| {
                let _ = tx.send(p);
            })
            .unwrap();
        let res = handle.join();
        assert_eq!(res.status(), SplitStatus::Success);

        let seen: Vec<Progress> = rx.iter().collect();
        assert!(seen.windows(2).all(|w| w[0].bytes_processed <= w[1].bytes_processed));
        assert_eq!(seen.last().unwrap().percent(), 100);
        assert_eq!(fs.files_in(Path::new("/in/SplitFiles")).len(), 13);
    }

    #[test]
    fn cancelling_one_handle_does_not_affect_the_next() {
        let (_fs, splitter, req) = setup(100);

        let (go_tx, go_rx) = mpsc::channel::<()>();
        let first = splitter
            .spawn(req.clone(), move |_| {
                // hold the worker on its first buffer until cancelled
                let _ = go_rx.recv();
            })
            .unwrap();
        first.cancel();
        drop(go_tx);
        assert_eq!(first.join().status(), SplitStatus::Cancelled);

        let second = splitter.spawn(req, |_| {}).unwrap();
        assert!(!second.cancel_token().is_cancelled());
        assert_eq!(second.join().status(), SplitStatus::Success);
    }

    #[test]
    fn worker_panic_is_unknown_error() {
        let (_fs, splitter, req) = setup(10);
        let handle = splitter.spawn(req, |_| panic!("boom")).unwrap();
        let res = handle.join();
        assert_eq!(res.status(), SplitStatus::UnknownError);
        assert!(res.error().unwrap().to_string().contains("boom"));
    }
}
