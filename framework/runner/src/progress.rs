use build_sweep_report_model::Level;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Displays a progress bar while the sweep is running to show the user how many levels are left.
pub struct SweepProgress {
    pb: ProgressBar,
}

impl SweepProgress {
    pub fn start(total_levels: usize) -> Self {
        let pb = ProgressBar::new(total_levels as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} levels [{elapsed_precise}] {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(200));

        Self { pb }
    }

    pub fn begin_level(&self, level: Level) {
        self.pb.set_message(format!("building level {level}"));
    }

    pub fn finish_level(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        log::trace!("Progress bar finished");
        self.pb.finish_and_clear();
    }
}
