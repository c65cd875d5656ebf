use std::sync::Arc;

use crate::fs::SplitFs;
use crate::fs_local::LocalFs;
use crate::fs_mem::MemFs;

pub enum Backend {
    Local,
    Memory(MemFs),
}

pub fn open_fs(backend: Backend) -> Arc<dyn SplitFs> {
    match backend {
        Backend::Local => Arc::new(LocalFs::new()),
        Backend::Memory(fs) => Arc::new(fs),
    }
}
