use std::fmt;

/// The host platform, as named by the build tool's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Win,
    Mac,
}

impl Platform {
    /// Detect the platform this binary was built for.
    ///
    /// Hosts that are neither Windows nor macOS are treated as Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Win
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Win => "Win",
            Platform::Mac => "Mac",
        }
    }

    /// The build target used when none is configured, e.g. `LinuxEditor`.
    pub fn default_target(&self) -> String {
        format!("{}Editor", self.prefix())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_uses_prefix() {
        assert_eq!("LinuxEditor", Platform::Linux.default_target());
        assert_eq!("WinEditor", Platform::Win.default_target());
        assert_eq!("MacEditor", Platform::Mac.default_target());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn detects_linux() {
        assert_eq!(Platform::Linux, Platform::detect());
    }
}
