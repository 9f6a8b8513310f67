//! Progress reporting utilities

use crate::comparator::CompareProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal progress for a comparison run
#[derive(Debug)]
pub struct ProgressReporter {
    pub load_pb: Option<ProgressBar>,
    pub rows_pb: Option<ProgressBar>,
    show_progress: bool,
}

impl ProgressReporter {
    /// Start with a spinner while the input tables load
    pub fn new_for_compare() -> Self {
        Self {
            load_pb: Some(create_spinner("Loading tables...")),
            rows_pb: None,
            show_progress: true,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            load_pb: None,
            rows_pb: None,
            show_progress: false,
        }
    }

    pub fn update_loading(&self, message: &str) {
        if let Some(pb) = &self.load_pb {
            pb.set_message(message.to_string());
        }
    }

    /// Finish loading and prepare the row bar once the row count is known
    pub fn finish_loading(&mut self, message: &str, total_rows: u64) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        if self.show_progress {
            self.rows_pb = Some(create_progress_bar(total_rows, "Indexing baseline..."));
        }
    }

    /// Feed a comparator milestone into the bars
    pub fn observe(&self, event: CompareProgress) {
        let Some(pb) = &self.rows_pb else {
            return;
        };

        match event {
            CompareProgress::Indexed { baseline_keys } => {
                pb.set_message(format!("Scanning rows ({} baseline keys)", baseline_keys));
            }
            CompareProgress::Rows { processed, total } => {
                pb.set_length(total as u64);
                pb.set_position(processed as u64);
            }
            CompareProgress::Finished { total } => {
                pb.set_position(total as u64);
            }
        }
    }

    /// Finish row processing
    pub fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.load_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar with known total
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
