#![forbid(unsafe_code)]

pub mod cancel;
pub mod domain;
pub mod error;
pub mod options;
pub mod stats;
pub mod status;

pub mod fs;
pub mod fs_factory;
pub mod fs_local;
pub mod fs_mem;

pub mod split {
    pub mod engine;
    pub mod worker;
}

pub mod list;

// Re-exports: stable API surface
pub use cancel::CancelToken;
pub use domain::{ChunkDescriptor, Progress, SplitRequest, SplitResult};
pub use list::{ChunkFile, list_chunks};
pub use options::SplitOptions;
pub use split::engine::Splitter;
pub use split::worker::SplitHandle;
pub use stats::SplitStats;
pub use status::{Severity, SplitStatus};
