use crate::Level;

/// Name of the folder holding everything produced for one run, e.g. `LinuxEditor_j4_report`.
///
/// The level is encoded as a `j<level>` segment so that [level_from_folder_name] can recover it
/// without any other record of the sweep.
pub fn run_folder_name(target: &str, level: Level) -> String {
    format!("{}_j{level}_report", sanitize(target))
}

/// Name of the build log inside a run folder.
pub fn run_log_file_name(target: &str, level: Level) -> String {
    format!("build_{}_j{level}_log.txt", sanitize(target))
}

/// Recover the level from a run folder name.
///
/// The first `_` separated segment, the target, is skipped and the first following segment of
/// the form `j<digits>` gives the level.
pub fn level_from_folder_name(name: &str) -> Option<Level> {
    name.split('_').skip(1).find_map(|segment| {
        segment
            .strip_prefix('j')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
    })
}

// The target becomes the first segment of the folder name, so it can't contain the delimiter.
fn sanitize(target: &str) -> String {
    target.replace(['_', '/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_name_encodes_level() {
        assert_eq!("LinuxEditor_j4_report", run_folder_name("LinuxEditor", 4));
        assert_eq!("MacEditor_j0_report", run_folder_name("MacEditor", 0));
    }

    #[test]
    fn level_round_trips_through_folder_name() {
        for level in [0, 1, 2, 16, 128] {
            assert_eq!(
                Some(level),
                level_from_folder_name(&run_folder_name("WinEditor", level))
            );
        }
    }

    #[test]
    fn target_with_delimiter_still_parses() {
        let name = run_folder_name("my_j9_target", 3);
        assert_eq!("my-j9-target_j3_report", name);
        assert_eq!(Some(3), level_from_folder_name(&name));
    }

    #[test]
    fn names_without_level_are_rejected() {
        assert_eq!(None, level_from_folder_name("charts"));
        assert_eq!(None, level_from_folder_name("LinuxEditor_report"));
        assert_eq!(None, level_from_folder_name("LinuxEditor_j_report"));
        assert_eq!(None, level_from_folder_name("LinuxEditor_jx2_report"));
        assert_eq!(None, level_from_folder_name("j2_report"));
    }

    #[test]
    fn log_file_name_encodes_level() {
        assert_eq!(
            "build_LinuxEditor_j2_log.txt",
            run_log_file_name("LinuxEditor", 2)
        );
    }
}
