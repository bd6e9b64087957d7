//! Log file discovery.

use std::path::{Path, PathBuf};

use crate::error::{MonitorError, MonitorResult};

/// Newest log in `dir`: the lexicographically last file name with the given
/// extension (compared case-insensitively). The monitor names its logs by
/// date, so name order is creation order.
pub fn newest_log(dir: &Path, extension: &str) -> MonitorResult<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|e| MonitorError::Dir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut newest: Option<(String, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| MonitorError::Dir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if newest.as_ref().is_none_or(|(best, _)| name > *best) {
            newest = Some((name, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| MonitorError::NoLogFile {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn picks_last_name_case_insensitively() {
        let dir = scratch("tv_monitor_discover_pick");
        for name in ["2026-10-14.CSV", "2026-10-16.csv", "2026-10-15.CSV", "zzz.txt"] {
            std::fs::write(dir.join(name), "x").unwrap();
        }
        std::fs::create_dir_all(dir.join("2026-10-17.CSV")).unwrap();

        let found = newest_log(&dir, "csv").unwrap();
        assert_eq!(found.file_name().unwrap(), "2026-10-16.csv");
    }

    #[test]
    fn empty_directory_has_no_log() {
        let dir = scratch("tv_monitor_discover_empty");
        assert!(matches!(
            newest_log(&dir, "CSV"),
            Err(MonitorError::NoLogFile { .. })
        ));
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = std::env::temp_dir().join("tv_monitor_discover_missing_dir");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(matches!(
            newest_log(&dir, "CSV"),
            Err(MonitorError::Dir { .. })
        ));
    }
}
