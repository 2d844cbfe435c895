mod artifacts;
mod clean;
mod cli;
mod config;
mod executor;
mod init;
mod platform;
mod progress;
mod selection;
mod sweep;
mod tool;
mod types;

pub mod prelude {
    pub use crate::artifacts::{ArtifactCollector, PROFILE_FOLDER};
    pub use crate::clean::{ensure_absent, WorkspaceCleaner};
    pub use crate::cli::{LevelPolicy, SweepCli};
    pub use crate::config::{ConfigError, PathsConfig, SweepConfig, ToolConfig};
    pub use crate::executor::RunExecutor;
    pub use crate::init::init;
    pub use crate::platform::Platform;
    pub use crate::selection::{host_max_level, planned_levels, LevelSelection};
    pub use crate::sweep::{
        create_output_root, run_sweep, sweep_root_name, SweepOutcome, SweepPlan, SweepSetupError,
    };
    pub use crate::tool::{resolve_program, BuildTool, ExternalBuildTool, BUILD_SWEEP_TOOL_ENV};
    pub use crate::types::SweepResult;
}
