use crate::types::SweepResult;
use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Folder inside each run folder that receives the profiling artifacts.
pub const PROFILE_FOLDER: &str = "BuildProfile";

/// Copies the profiling artifacts a build leaves behind into the run's folder.
#[derive(Debug, Clone)]
pub struct ArtifactCollector {
    profile_dir: PathBuf,
    extra_files: Vec<PathBuf>,
}

impl ArtifactCollector {
    pub fn new(profile_dir: PathBuf, extra_files: Vec<PathBuf>) -> Self {
        Self {
            profile_dir,
            extra_files,
        }
    }

    /// Copy the profile directory, keeping its layout, and the extra files into
    /// `<report_folder>/BuildProfile`. Returns how many files were copied.
    ///
    /// Sources that don't exist are logged and skipped.
    pub fn collect(&self, report_folder: &Path) -> SweepResult<usize> {
        let dest = report_folder.join(PROFILE_FOLDER);
        std::fs::create_dir_all(&dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let mut copied = 0;
        if self.profile_dir.is_dir() {
            for entry in WalkDir::new(&self.profile_dir).min_depth(1) {
                let entry = entry?;
                let relative = entry.path().strip_prefix(&self.profile_dir)?;
                let target = dest.join(relative);
                if entry.file_type().is_dir() {
                    std::fs::create_dir_all(&target)?;
                } else if entry.file_type().is_file() {
                    copy_file(entry.path(), &target)?;
                    copied += 1;
                }
            }
        } else {
            log::warn!(
                "Profile directory {} not found, no profiles collected",
                self.profile_dir.display()
            );
        }

        for file in &self.extra_files {
            let Some(name) = file.file_name() else {
                log::warn!("Ignoring artifact path without a file name: {}", file.display());
                continue;
            };
            if !file.is_file() {
                log::warn!("Artifact {} not found, skipping", file.display());
                continue;
            }
            copy_file(file, &dest.join(name))?;
            copied += 1;
        }

        log::debug!("Copied {copied} artifacts into {}", dest.display());
        Ok(copied)
    }
}

fn copy_file(from: &Path, to: &Path) -> SweepResult<()> {
    std::fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_profile_tree_and_extra_files() {
        let src = tempfile::tempdir().unwrap();
        let profile = src.path().join("artifacts/BuildProfile");
        std::fs::create_dir_all(profile.join("nested")).unwrap();
        std::fs::write(profile.join("a.json"), "a").unwrap();
        std::fs::write(profile.join("nested/b.json"), "b").unwrap();
        let extra = src.path().join("artifacts/profile.json");
        std::fs::write(&extra, "{}").unwrap();

        let run = tempfile::tempdir().unwrap();
        let copied = ArtifactCollector::new(profile, vec![extra])
            .collect(run.path())
            .unwrap();

        assert_eq!(3, copied);
        let dest = run.path().join(PROFILE_FOLDER);
        assert_eq!("a", std::fs::read_to_string(dest.join("a.json")).unwrap());
        assert_eq!("b", std::fs::read_to_string(dest.join("nested/b.json")).unwrap());
        assert_eq!("{}", std::fs::read_to_string(dest.join("profile.json")).unwrap());
    }

    #[test]
    fn missing_sources_are_skipped() {
        let src = tempfile::tempdir().unwrap();
        let run = tempfile::tempdir().unwrap();

        let copied = ArtifactCollector::new(
            src.path().join("missing"),
            vec![src.path().join("missing.json")],
        )
        .collect(run.path())
        .unwrap();

        assert_eq!(0, copied);
        assert!(run.path().join(PROFILE_FOLDER).is_dir());
    }
}
