//! Progress bar utilities for transfer batches
//!
//! Progress is drawn on stderr and counts objects, one tick per object.
//! In suppressed mode no bar is shown.

use super::OutputConfig;

/// Progress bar wrapper
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new progress bar over the given object count
    pub fn new(config: &OutputConfig, total: u64) -> Self {
        let bar = if config.suppress {
            None
        } else {
            let bar = indicatif::ProgressBar::new(total);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} objects")
                    .expect("valid template")
                    .progress_chars("#>-"),
            );
            Some(bar)
        };

        Self { bar }
    }

    /// Count one processed object
    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if the progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}
