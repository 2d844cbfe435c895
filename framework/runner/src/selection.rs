use crate::cli::LevelPolicy;
use build_sweep_report_model::Level;
use std::fmt;
use std::sync::Arc;
use sysinfo::System;

/// Decides which levels between 0 and the max level are built.
#[derive(Clone)]
pub struct LevelSelection {
    name: &'static str,
    predicate: Arc<dyn Fn(Level) -> bool + Send + Sync>,
}

impl LevelSelection {
    /// Level 1 and every even level, which halves the number of builds on large hosts.
    pub fn even_and_one() -> Self {
        Self {
            name: "even-and-one",
            predicate: Arc::new(|level| level == 1 || level % 2 == 0),
        }
    }

    pub fn all() -> Self {
        Self {
            name: "all",
            predicate: Arc::new(|_| true),
        }
    }

    pub fn custom(predicate: impl Fn(Level) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: "custom",
            predicate: Arc::new(predicate),
        }
    }

    pub fn includes(&self, level: Level) -> bool {
        (self.predicate)(level)
    }

    /// The selected levels in `0..=max_level`, ascending.
    pub fn select(&self, max_level: Level) -> Vec<Level> {
        (0..=max_level).filter(|level| self.includes(*level)).collect()
    }
}

impl Default for LevelSelection {
    fn default() -> Self {
        Self::even_and_one()
    }
}

impl fmt::Debug for LevelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelSelection").field(&self.name).finish()
    }
}

impl From<LevelPolicy> for LevelSelection {
    fn from(policy: LevelPolicy) -> Self {
        match policy {
            LevelPolicy::EvenAndOne => Self::even_and_one(),
            LevelPolicy::All => Self::all(),
        }
    }
}

/// The levels a sweep will build: only level 0 for a single run, otherwise the selected levels up
/// to `max_level`.
pub fn planned_levels(
    max_level: Level,
    single_run: bool,
    selection: &LevelSelection,
) -> Vec<Level> {
    if single_run {
        vec![0]
    } else {
        selection.select(max_level)
    }
}

/// The number of logical processors on this host, used as the default max level.
pub fn host_max_level() -> Level {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    let cpu_count = match sys.cpus().len() {
        0 => std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        n => n,
    };
    Level::try_from(cpu_count).unwrap_or(Level::MAX)
}
