use crate::artifacts::ArtifactCollector;
use crate::executor::RunExecutor;
use crate::progress::SweepProgress;
use crate::selection::{planned_levels, LevelSelection};
use crate::tool::BuildTool;
use build_sweep_report_model::{append_run_result, format_levels, Level, RunResult, RUN_LOG_FILE};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// The only failure that stops a sweep: there is nowhere to write its output.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("Failed to create sweep output directory {}: {source}", path.display())]
pub struct SweepSetupError {
    path: PathBuf,
    source: std::io::Error,
}

impl SweepSetupError {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// What a sweep should build and where its output goes.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Directory in which the timestamped sweep folder is created
    pub output_parent: PathBuf,
    pub max_level: Level,
    /// Build level 0 only
    pub single_run: bool,
    pub selection: LevelSelection,
    pub show_progress: bool,
}

impl SweepPlan {
    pub fn levels(&self) -> Vec<Level> {
        planned_levels(self.max_level, self.single_run, &self.selection)
    }
}

/// Everything a finished sweep produced.
#[derive(Debug)]
pub struct SweepOutcome {
    pub output_root: PathBuf,
    /// One entry per attempted level, in the order they ran
    pub runs: Vec<RunResult>,
}

impl SweepOutcome {
    pub fn failed_levels(&self) -> Vec<Level> {
        self.runs
            .iter()
            .filter(|run| !run.succeeded())
            .map(|run| run.level)
            .collect()
    }
}

/// Name of the output folder for a sweep started at `now`, e.g. `reports2021-09-03_12-08-25`.
pub fn sweep_root_name(now: DateTime<Local>) -> String {
    format!("reports{}", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Create the output folder for a sweep starting now inside `parent`.
pub fn create_output_root(parent: &Path) -> Result<PathBuf, SweepSetupError> {
    let root = parent.join(sweep_root_name(Local::now()));
    std::fs::create_dir_all(&root)
        .and_then(|_| std::fs::canonicalize(&root))
        .map_err(|source| SweepSetupError {
            path: root.clone(),
            source,
        })
}

/// Build every planned level in turn, collecting reports and artifacts for each successful build.
///
/// Levels whose build fails, or can't be started, are logged and left out of aggregation; the
/// sweep carries on with the next level. Every attempted level is appended to the sweep's run log.
pub fn run_sweep<T: BuildTool>(
    plan: &SweepPlan,
    executor: &RunExecutor<T>,
    collector: &ArtifactCollector,
) -> Result<SweepOutcome, SweepSetupError> {
    let output_root = create_output_root(&plan.output_parent)?;
    let levels = plan.levels();
    log::info!(
        "Sweeping levels [{}] into {}",
        format_levels(&levels),
        output_root.display()
    );

    let progress = plan.show_progress.then(|| SweepProgress::start(levels.len()));
    let run_log = output_root.join(RUN_LOG_FILE);

    let mut runs = Vec::with_capacity(levels.len());
    for level in levels {
        if let Some(progress) = &progress {
            progress.begin_level(level);
        }

        let run = run_level(level, &output_root, executor, collector);
        if let Err(e) = append_run_result(&run, &run_log) {
            log::warn!("Failed to record level {level} in {}: {e:?}", run_log.display());
        }
        runs.push(run);

        if let Some(progress) = &progress {
            progress.finish_level();
        }
    }

    if let Some(progress) = &progress {
        progress.finish();
    }

    let outcome = SweepOutcome { output_root, runs };
    let failed = outcome.failed_levels();
    if failed.is_empty() {
        log::info!("Sweep finished, all {} levels built", outcome.runs.len());
    } else {
        log::warn!(
            "Sweep finished, {} of {} levels failed: [{}]",
            failed.len(),
            outcome.runs.len(),
            format_levels(&failed)
        );
    }

    Ok(outcome)
}

fn run_level<T: BuildTool>(
    level: Level,
    output_root: &Path,
    executor: &RunExecutor<T>,
    collector: &ArtifactCollector,
) -> RunResult {
    let mut run = match executor.execute(level, output_root) {
        Ok(run) => run,
        Err(e) => {
            log::error!("Build at level {level} could not run: {e:?}");
            return RunResult::new(level, -1, executor.report_folder(level, output_root));
        }
    };

    if !run.succeeded() {
        log::error!("Build at level {level} failed with status {}", run.status);
        return run;
    }

    match executor.generate_report(&run) {
        Ok(0) => {}
        Ok(status) => log::warn!("Time report for level {level} failed with status {status}"),
        Err(e) => log::warn!("Time report for level {level} could not run: {e:?}"),
    }

    if let Err(e) = collector.collect(&run.report_folder) {
        log::warn!("Failed to collect artifacts for level {level}: {e:?}");
    }

    run.attach_report_if_present();
    run
}
