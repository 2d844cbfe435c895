use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Make sure nothing exists at `path`.
///
/// Directories are removed recursively and files are unlinked. A path that is already absent,
/// or disappears while being removed, counts as success.
pub fn ensure_absent(path: &Path) -> std::io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Removes the build tool's state between runs so that each level starts from a clean build.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceCleaner {
    paths: Vec<PathBuf>,
}

impl WorkspaceCleaner {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn clean(&self) -> anyhow::Result<()> {
        for path in &self.paths {
            log::debug!("Removing {}", path.display());
            ensure_absent(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}
