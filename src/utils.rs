//! Small helpers shared by the driver and the CLI output.
use crate::constants::{PROGRESS_SPINNER_TEMPLATE, SPINNER_TICK_MS};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Bytes as kilobytes (1 KB = 1024 bytes).
pub fn to_kib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Size in KB with one decimal, e.g. "12.5 KB".
pub fn format_kib(bytes: u64) -> String {
    format!("{:.1} KB", to_kib(bytes))
}

/// Percentage saved going from `original_size` to `optimized_size`.
/// Negative when the output grew; 0 when there was nothing to begin with.
pub fn calculate_savings(original_size: u64, optimized_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - optimized_size as f64) / original_size as f64) * 100.0
}

/// A spinner in the crate's style, or a hidden one when output is quiet.
///
/// The spinner ticks on a background thread so it keeps moving while the
/// caller blocks on a download.
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(PROGRESS_SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    pb
}

pub fn section_rule() -> String {
    "=".repeat(crate::constants::SECTION_RULE_WIDTH)
}
