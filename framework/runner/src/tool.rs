use crate::config::ToolConfig;
use crate::platform::Platform;
use crate::types::SweepResult;
use anyhow::{bail, Context};
use build_sweep_report_model::Level;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Environment variable to override the program used to run the build tool.
pub const BUILD_SWEEP_TOOL_ENV: &str = "BUILD_SWEEP_TOOL";

/// The external build tool being benchmarked.
pub trait BuildTool {
    /// The target passed to every build, also used to name run folders.
    fn target(&self) -> &str;

    /// Build the target at `level`, writing all output to `log`. Returns the exit status.
    fn build(&self, level: Level, log: File) -> SweepResult<i32>;

    /// Ask the tool for the time report of the last build, written to `report`. Returns the exit
    /// status.
    fn time_report(&self, report: File) -> SweepResult<i32>;
}

/// A [BuildTool] that runs a program on the host.
#[derive(Debug, Clone)]
pub struct ExternalBuildTool {
    program: PathBuf,
    args: Vec<String>,
    target: String,
    parallelism_flag: String,
    report_args: Vec<String>,
    workdir: PathBuf,
}

impl ExternalBuildTool {
    pub fn new(program: PathBuf, config: &ToolConfig, target: String, workdir: PathBuf) -> Self {
        Self {
            program,
            args: config.args.clone(),
            target,
            parallelism_flag: config.parallelism_flag.clone(),
            report_args: config.report_args.clone(),
            workdir,
        }
    }

    /// Create the tool from configuration, locating the program on this host.
    pub fn from_config(
        config: &ToolConfig,
        platform: Platform,
        workdir: &Path,
    ) -> SweepResult<Self> {
        let requested = std::env::var(BUILD_SWEEP_TOOL_ENV).ok();
        let program = resolve_program(requested.as_deref().unwrap_or(&config.program))?;
        Ok(Self::new(
            program,
            config,
            config.target_for(platform),
            workdir.to_path_buf(),
        ))
    }

    /// The command for a build at `level`: `<program> <args..> [<flag> <level>] <target>`.
    pub fn build_command(&self, level: Level) -> Command {
        let mut cmd = self.base_command();
        if level > 0 {
            cmd.arg(&self.parallelism_flag).arg(level.to_string());
        }
        cmd.arg(&self.target);
        cmd
    }

    /// The command that prints the time report: `<program> <args..> <report args..>`.
    pub fn time_report_command(&self) -> Command {
        let mut cmd = self.base_command();
        cmd.args(&self.report_args);
        cmd
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir).args(&self.args);
        cmd
    }
}

impl BuildTool for ExternalBuildTool {
    fn target(&self) -> &str {
        &self.target
    }

    fn build(&self, level: Level, log: File) -> SweepResult<i32> {
        let stderr = log.try_clone().context("Failed to share build log with stderr")?;
        let mut cmd = self.build_command(level);
        cmd.stdout(Stdio::from(log)).stderr(Stdio::from(stderr));
        run_to_completion(cmd)
    }

    fn time_report(&self, report: File) -> SweepResult<i32> {
        let mut cmd = self.time_report_command();
        cmd.stdout(Stdio::from(report));
        run_to_completion(cmd)
    }
}

fn run_to_completion(mut cmd: Command) -> SweepResult<i32> {
    log::debug!("Running command: {cmd:?}");
    let status = cmd
        .status()
        .with_context(|| format!("Could not run {:?}", cmd.get_program()))?;
    log::debug!("Command finished with status: {status}");
    Ok(exit_code(status))
}

/// The exit code of a finished process, or `-1` if it was terminated without one.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Find the program to run.
///
/// A bare program name is looked up in the user's `PATH`, anything containing a path separator
/// must exist as given.
pub fn resolve_program(program: &str) -> SweepResult<PathBuf> {
    if program.is_empty() {
        bail!(
            "Build tool program is empty, set '{BUILD_SWEEP_TOOL_ENV}' or the `tool.program` config"
        );
    }

    let path = PathBuf::from(program);
    if path.components().count() > 1 || path.is_absolute() {
        if !path.exists() {
            bail!("Build tool set to '{}' but that path doesn't exist", path.display());
        }
        return Ok(path);
    }

    which::which(program).with_context(|| {
        format!(
            "Build tool '{program}' not found in PATH. Install it or set '{BUILD_SWEEP_TOOL_ENV}' to the correct path."
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn tool(program: &str, args: &[&str]) -> ExternalBuildTool {
        let config = ToolConfig {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        };
        ExternalBuildTool::new(
            PathBuf::from(program),
            &config,
            "LinuxEditor".to_string(),
            std::env::temp_dir(),
        )
    }

    fn args_of(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn default_level_has_no_parallelism_flag() {
        let cmd = tool("perl", &["jam.pl"]).build_command(0);
        assert_eq!(vec!["jam.pl", "LinuxEditor"], args_of(&cmd));
    }

    #[test]
    fn level_adds_parallelism_flag_before_target() {
        let cmd = tool("perl", &["jam.pl"]).build_command(8);
        assert_eq!(vec!["jam.pl", "-j", "8", "LinuxEditor"], args_of(&cmd));
    }

    #[test]
    fn time_report_command_uses_report_args() {
        let cmd = tool("perl", &["jam.pl"]).time_report_command();
        assert_eq!(vec!["jam.pl", "time-report"], args_of(&cmd));
    }

    #[test]
    fn missing_program_path_is_error() {
        assert!(resolve_program("/non/existent/path/to/jam").is_err());
        assert!(resolve_program("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn build_writes_output_to_log_and_returns_status() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("build.log");

        // `sh -c <script>` receives the flag, level and target as $0, $1 and $2
        let tool = tool("sh", &["-c", "echo building $0 $1 $2; echo oops >&2; exit 3"]);
        let status = tool
            .build(4, File::create(&log_path).unwrap())
            .unwrap();

        assert_eq!(3, status);
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("building -j 4 LinuxEditor"), "{log}");
        assert!(log.contains("oops"), "{log}");
    }

    #[cfg(unix)]
    #[test]
    fn time_report_writes_stdout_to_report() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("time_report.txt");

        let tool = tool("sh", &["-c", "echo 'Total wall time: 1.5 sec'"]);
        let status = tool
            .time_report(File::create(&report_path).unwrap())
            .unwrap();

        assert_eq!(0, status);
        assert_eq!(
            "Total wall time: 1.5 sec\n",
            std::fs::read_to_string(&report_path).unwrap()
        );
    }

    #[test]
    fn unspawnable_program_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = tool("/non/existent/path/to/jam", &[]);
        let result = tool.build(0, File::create(dir.path().join("log")).unwrap());
        assert!(result.is_err());
    }
}
