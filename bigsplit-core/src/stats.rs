use serde::{Deserialize, Serialize};

/// Work done by one run, reported on success and on cancellation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    pub chunks: u64,
    pub bytes_written: u64,
    pub bytes_total: u64,
}
