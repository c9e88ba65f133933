use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while the probe stage drains; the probe progress
/// callback updates its message with the resolved-candidate count.
pub fn probe_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap()
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Collecting candidates...");
    pb
}

pub fn report_probe_progress(pb: &ProgressBar, resolved: usize) {
    pb.set_message(format!("Probed {resolved} candidates so far..."));
}
