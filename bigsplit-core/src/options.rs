pub const DEFAULT_BUFFER_SIZE: usize = 20 * 1024;
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "SplitFiles";

#[derive(Clone, Debug)]
pub struct SplitOptions {
    /// Size of the copy buffer reused for every read/write step.
    /// Memory use is bounded by this, not by the chunk size.
    pub buffer_size: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl SplitOptions {
    pub(crate) fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(1)
    }
}
