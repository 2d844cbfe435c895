use anyhow::Context;
use build_sweep_runner::prelude::*;
use build_sweep_summariser::{summarise, SummariseOptions};

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<()> {
    let cli = init();
    log::info!("{CRATE_NAME} {CRATE_VERSION}");

    let config = SweepConfig::from_cli(&cli)?;
    let platform = Platform::detect();
    let workdir = &config.paths.workdir;
    log::debug!("Platform {platform}, working directory {}", workdir.display());

    let tool = ExternalBuildTool::from_config(&config.tool, platform, workdir)
        .context("Cannot run the sweep without a build tool")?;
    let executor = RunExecutor::new(tool, WorkspaceCleaner::new(config.paths.clean_paths()));
    let collector = ArtifactCollector::new(
        config.paths.artifacts_dir(),
        config.paths.extra_artifact_files(),
    );

    let plan = SweepPlan {
        output_parent: config.paths.output_parent_dir(),
        max_level: cli.max_level.unwrap_or_else(host_max_level),
        single_run: cli.single,
        selection: LevelSelection::from(cli.levels),
        show_progress: !cli.no_progress,
    };
    if cli.single {
        log::info!("Running a single build at the default thread count");
    }

    let outcome = run_sweep(&plan, &executor, &collector)?;

    let output = summarise(
        &outcome.output_root,
        &SummariseOptions {
            no_charts: cli.no_charts,
            charts_dir: None,
        },
    )?;

    log::info!(
        "Sweep data for {} of {} levels written to {}",
        output.table.rows().len(),
        outcome.runs.len(),
        output.table_path.display()
    );

    Ok(())
}
