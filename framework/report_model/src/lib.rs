use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

mod folder;
mod parse;

pub use folder::{level_from_folder_name, run_folder_name, run_log_file_name};
pub use parse::{parse_line, parse_report, MetricSample, TOTAL_WALL_TIME};

/// The parallelism requested from the build tool for one run.
///
/// A level of 0 means the tool picks its own default concurrency.
pub type Level = u32;

/// Name of the timing report written into each run folder
pub const TIME_REPORT_FILE: &str = "time_report.txt";

/// Name of the run log written into each sweep root
pub const RUN_LOG_FILE: &str = "sweep_runs.jsonl";

/// Outcome of a single build run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    /// The parallelism level the build was invoked with
    pub level: Level,
    /// The exit status of the build command
    ///
    /// A process that was terminated without an exit code, for example by a signal, is
    /// recorded as `-1`.
    pub status: i32,
    /// The folder holding the build log, timing report and collected artifacts for this run
    pub report_folder: PathBuf,
    /// The timing report, if one was generated
    ///
    /// This is only set once report generation has run and the report file exists. A failed
    /// build never gets one.
    pub timing_report_path: Option<PathBuf>,
}

impl RunResult {
    /// Create a run result that has not had a timing report generated yet
    pub fn new(level: Level, status: i32, report_folder: PathBuf) -> Self {
        Self {
            level,
            status,
            report_folder,
            timing_report_path: None,
        }
    }

    /// Whether the build command exited with status 0
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }

    /// The expected location of the timing report for this run
    pub fn expected_report_path(&self) -> PathBuf {
        self.report_folder.join(TIME_REPORT_FILE)
    }

    /// Record the timing report if it exists on disk
    pub fn attach_report_if_present(&mut self) {
        let path = self.expected_report_path();
        self.timing_report_path = path.is_file().then_some(path);
    }
}

/// Append the run result to a file
///
/// The result will be serialized to JSON and output as a single line followed by a newline.
pub fn append_run_result(run_result: &RunResult, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_result(run_result, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Serialize the run result to a writer
pub fn store_run_result<W: Write>(run_result: &RunResult, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, run_result)?;
    Ok(())
}

/// Load run results from a reader containing one JSON object per line
///
/// Blank lines are ignored. This is the format produced by [append_run_result].
pub fn load_run_results<R: Read>(reader: R) -> anyhow::Result<Vec<RunResult>> {
    let reader = std::io::BufReader::new(reader);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        runs.push(serde_json::from_str(&line)?);
    }
    Ok(runs)
}

/// Format levels for log output, e.g. `0, 1, 2, 4`
pub fn format_levels(levels: &[Level]) -> String {
    levels.iter().join(", ")
}
