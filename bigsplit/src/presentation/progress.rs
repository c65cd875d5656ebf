use std::path::Path;

use bigsplit_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})";

/// Byte progress of one split on stderr. Hidden for `--quiet` and `--json`.
pub struct SplitProgress {
    bar: ProgressBar,
}

impl SplitProgress {
    pub fn new(show: bool, source: &Path) -> Self {
        if !show {
            return Self::hidden();
        }
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        let name = source.file_name().unwrap_or(source.as_os_str());
        bar.set_message(format!("Splitting {}", name.to_string_lossy()));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, p: Progress) {
        if self.bar.length() != Some(p.bytes_total) {
            self.bar.set_length(p.bytes_total);
        }
        self.bar.set_position(p.bytes_processed);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sizes_bar_to_source_and_tracks_bytes() {
        let progress = SplitProgress::hidden();
        progress.update(Progress {
            bytes_processed: 20_480,
            bytes_total: 50_000,
        });
        assert_eq!(progress.bar.length(), Some(50_000));
        assert_eq!(progress.bar.position(), 20_480);

        progress.update(Progress {
            bytes_processed: 50_000,
            bytes_total: 50_000,
        });
        assert_eq!(progress.bar.position(), 50_000);
        progress.finish();
        assert!(progress.bar.is_finished());
    }
}
