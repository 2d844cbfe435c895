use build_sweep_report_model::Level;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct SweepCli {
    /// Run a single build at the tool's default parallelism instead of sweeping levels.
    #[arg(long, visible_alias = "default", default_value = "false")]
    pub single: bool,

    /// Path to a TOML file configuring the build tool and the paths it uses.
    #[arg(long, env = "BUILD_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the build tool is run from. Relative paths in the configuration are resolved
    /// against it.
    #[arg(long, env = "BUILD_SWEEP_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Directory in which the timestamped output folder for this sweep is created.
    #[arg(long, env = "BUILD_SWEEP_OUTPUT_PARENT")]
    pub output_parent: Option<PathBuf>,

    /// Highest level to consider. Defaults to the number of logical processors on this host.
    #[arg(long)]
    pub max_level: Option<Level>,

    /// Which levels between 0 and the max level are built.
    #[arg(long, value_enum, default_value_t = LevelPolicy::EvenAndOne)]
    pub levels: LevelPolicy,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI where nobody is watching the terminal and the bar only adds noise to
    /// the logs.
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Skip rendering charts after the table has been aggregated.
    #[arg(long, default_value = "false")]
    pub no_charts: bool,
}

/// The built-in level selection policies that can be picked from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPolicy {
    /// Level 1 and every even level.
    EvenAndOne,
    /// Every level.
    All,
}
