use crate::clean::WorkspaceCleaner;
use crate::tool::BuildTool;
use crate::types::SweepResult;
use anyhow::Context;
use build_sweep_report_model::{run_folder_name, run_log_file_name, Level, RunResult};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Runs one build of the sweep and, on request, the report generation for it.
#[derive(Debug)]
pub struct RunExecutor<T> {
    tool: T,
    cleaner: WorkspaceCleaner,
}

impl<T: BuildTool> RunExecutor<T> {
    pub fn new(tool: T, cleaner: WorkspaceCleaner) -> Self {
        Self { tool, cleaner }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// The folder a run at `level` writes into.
    pub fn report_folder(&self, level: Level, output_dir: &Path) -> PathBuf {
        output_dir.join(run_folder_name(self.tool.target(), level))
    }

    /// Clean the previous build state and build at `level`, blocking until the tool exits.
    ///
    /// The build log goes to the run's report folder, which is created if needed. The exit status
    /// is returned as-is in the [RunResult]. An `Err` means the build could not be started at
    /// all.
    pub fn execute(&self, level: Level, output_dir: &Path) -> SweepResult<RunResult> {
        self.cleaner
            .clean()
            .context("Failed to clean previous build state")?;

        let report_folder = self.report_folder(level, output_dir);
        std::fs::create_dir_all(&report_folder).with_context(|| {
            format!("Failed to create report folder {}", report_folder.display())
        })?;

        let log_path = report_folder.join(run_log_file_name(self.tool.target(), level));
        let log = File::create(&log_path)
            .with_context(|| format!("Failed to create build log {}", log_path.display()))?;

        if level > 0 {
            log::info!("Building {} with {level} threads", self.tool.target());
        } else {
            log::info!("Building {} with the default thread count", self.tool.target());
        }

        let status = self.tool.build(level, log)?;
        Ok(RunResult::new(level, status, report_folder))
    }

    /// Generate the time report for a completed run into its report folder.
    ///
    /// When the tool fails or cannot be started and leaves an empty report behind, the file is
    /// removed so the run is not aggregated as if every category took no time.
    pub fn generate_report(&self, run: &RunResult) -> SweepResult<i32> {
        let report_path = run.expected_report_path();
        let report = File::create(&report_path)
            .with_context(|| format!("Failed to create time report {}", report_path.display()))?;

        let result = self.tool.time_report(report);
        let failed = !matches!(result, Ok(0));
        if failed && is_empty_file(&report_path) {
            std::fs::remove_file(&report_path).with_context(|| {
                format!("Failed to remove empty time report {}", report_path.display())
            })?;
        }

        result
    }
}

fn is_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.len() == 0)
}
