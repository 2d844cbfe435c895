use build_sweep_report_model::{load_run_results, Level, RunResult, RUN_LOG_FILE, TIME_REPORT_FILE};
use build_sweep_runner::prelude::{
    run_sweep, ArtifactCollector, BuildTool, LevelSelection, RunExecutor, SweepPlan, SweepResult,
    WorkspaceCleaner, PROFILE_FOLDER,
};
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pretends to build, failing at the configured levels and remembering what it was asked to do.
struct FakeTool {
    failing_levels: Vec<Level>,
    failing_reports: bool,
    missing_report_tool: bool,
    artifacts_dir: PathBuf,
    calls: RefCell<Vec<String>>,
    last_level: RefCell<Level>,
}

impl FakeTool {
    fn new(artifacts_dir: &Path) -> Self {
        Self {
            failing_levels: vec![],
            failing_reports: false,
            missing_report_tool: false,
            artifacts_dir: artifacts_dir.to_path_buf(),
            calls: RefCell::new(vec![]),
            last_level: RefCell::new(0),
        }
    }
}

impl BuildTool for FakeTool {
    fn target(&self) -> &str {
        "LinuxEditor"
    }

    fn build(&self, level: Level, mut log: File) -> SweepResult<i32> {
        self.calls.borrow_mut().push(format!("build {level}"));
        *self.last_level.borrow_mut() = level;
        writeln!(log, "build at {level}")?;

        std::fs::create_dir_all(&self.artifacts_dir)?;
        std::fs::write(self.artifacts_dir.join("profile.json"), format!("{level}"))?;

        Ok(if self.failing_levels.contains(&level) { 1 } else { 0 })
    }

    fn time_report(&self, mut report: File) -> SweepResult<i32> {
        let level = *self.last_level.borrow();
        self.calls.borrow_mut().push(format!("report {level}"));
        if self.missing_report_tool {
            anyhow::bail!("report tool not found");
        }
        if self.failing_reports {
            return Ok(1);
        }
        writeln!(report, "Total wall time: {}.0 sec", 10 + level)?;
        Ok(0)
    }
}

fn plan(output_parent: &Path, max_level: Level) -> SweepPlan {
    SweepPlan {
        output_parent: output_parent.to_path_buf(),
        max_level,
        single_run: false,
        selection: LevelSelection::default(),
        show_progress: false,
    }
}

#[test]
fn sweep_builds_selected_levels_in_order() {
    let workspace = tempfile::tempdir().unwrap();
    let artifacts = workspace.path().join("artifacts");
    let executor = RunExecutor::new(FakeTool::new(&artifacts), WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(artifacts, vec![]);

    let outcome = run_sweep(&plan(workspace.path(), 5), &executor, &collector).unwrap();

    assert_eq!(
        vec![0, 1, 2, 4],
        outcome.runs.iter().map(|r| r.level).collect::<Vec<_>>()
    );
    assert_eq!(
        vec![
            "build 0", "report 0", "build 1", "report 1", "build 2", "report 2", "build 4",
            "report 4"
        ],
        *executor.tool().calls.borrow()
    );
    assert!(outcome.failed_levels().is_empty());

    for run in &outcome.runs {
        assert_eq!(Some(run.report_folder.join(TIME_REPORT_FILE)), run.timing_report_path);
        let profile =
            std::fs::read_to_string(run.report_folder.join(PROFILE_FOLDER).join("profile.json"))
                .unwrap();
        assert_eq!(run.level.to_string(), profile);
    }
}

#[test]
fn failed_build_is_skipped_and_sweep_continues() {
    let workspace = tempfile::tempdir().unwrap();
    let artifacts = workspace.path().join("artifacts");
    let mut tool = FakeTool::new(&artifacts);
    tool.failing_levels = vec![1];
    let executor = RunExecutor::new(tool, WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(artifacts, vec![]);

    let outcome = run_sweep(&plan(workspace.path(), 2), &executor, &collector).unwrap();

    assert_eq!(vec![1], outcome.failed_levels());
    assert_eq!(
        vec!["build 0", "report 0", "build 1", "build 2", "report 2"],
        *executor.tool().calls.borrow()
    );

    let failed = &outcome.runs[1];
    assert_eq!(None, failed.timing_report_path);
    assert!(!failed.report_folder.join(TIME_REPORT_FILE).exists());
    assert!(!failed.report_folder.join(PROFILE_FOLDER).exists());
}

#[test]
fn failed_report_generation_still_collects_artifacts() {
    let workspace = tempfile::tempdir().unwrap();
    let artifacts = workspace.path().join("artifacts");
    let mut tool = FakeTool::new(&artifacts);
    tool.failing_reports = true;
    let executor = RunExecutor::new(tool, WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(artifacts, vec![]);

    let mut plan = plan(workspace.path(), 8);
    plan.single_run = true;
    let outcome = run_sweep(&plan, &executor, &collector).unwrap();

    assert_eq!(1, outcome.runs.len());
    let run = &outcome.runs[0];
    assert_eq!(0, run.level);
    assert!(run.succeeded());
    assert_eq!(None, run.timing_report_path);
    assert!(run.report_folder.join(PROFILE_FOLDER).join("profile.json").exists());
}

#[test]
fn report_tool_that_cannot_start_leaves_no_report() {
    let workspace = tempfile::tempdir().unwrap();
    let artifacts = workspace.path().join("artifacts");
    let mut tool = FakeTool::new(&artifacts);
    tool.missing_report_tool = true;
    let executor = RunExecutor::new(tool, WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(artifacts, vec![]);

    let mut plan = plan(workspace.path(), 8);
    plan.single_run = true;
    let outcome = run_sweep(&plan, &executor, &collector).unwrap();

    let run = &outcome.runs[0];
    assert!(run.succeeded());
    assert_eq!(None, run.timing_report_path);
    assert!(!run.report_folder.join(TIME_REPORT_FILE).exists());
    assert!(run.report_folder.join(PROFILE_FOLDER).join("profile.json").exists());
}

#[test]
fn every_attempted_level_is_logged() {
    let workspace = tempfile::tempdir().unwrap();
    let artifacts = workspace.path().join("artifacts");
    let mut tool = FakeTool::new(&artifacts);
    tool.failing_levels = vec![2];
    let executor = RunExecutor::new(tool, WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(artifacts, vec![]);

    let outcome = run_sweep(&plan(workspace.path(), 2), &executor, &collector).unwrap();

    let logged: Vec<RunResult> =
        load_run_results(File::open(outcome.output_root.join(RUN_LOG_FILE)).unwrap()).unwrap();
    assert_eq!(outcome.runs, logged);
}

#[test]
fn unwritable_output_parent_is_fatal() {
    let workspace = tempfile::tempdir().unwrap();
    let parent = workspace.path().join("file");
    std::fs::write(&parent, "").unwrap();
    let executor = RunExecutor::new(FakeTool::new(workspace.path()), WorkspaceCleaner::default());
    let collector = ArtifactCollector::new(workspace.path().join("artifacts"), vec![]);

    let result = run_sweep(&plan(&parent, 2), &executor, &collector);

    assert!(result.is_err());
    assert!(executor.tool().calls.borrow().is_empty());
}
