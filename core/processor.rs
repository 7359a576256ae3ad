use crate::backup::BackupStore;
use crate::language;
use crate::preserve::PreserveSet;
use crate::stripper;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub dry_run: bool,
}

/// Aggregate counters for one invocation, reported once at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub comments_removed: usize,
    pub bytes_saved: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedLanguage,
    NotUtf8,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedLanguage => write!(f, "unsupported file type"),
            SkipReason::NotUtf8 => write!(f, "not valid UTF-8 text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Modified {
        comments_removed: usize,
        bytes_saved: u64,
    },
    Unchanged,
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    /// A block comment ran to end of file without its close token; the
    /// stripped span may be larger than the author intended.
    pub unterminated: bool,
}

/// Runs the per-file pipeline sequentially: read, strip, and when something
/// changed, back up the original before the new content is written. A
/// failure in one file never stops the batch. `unsupported` seeds the skip
/// counter with files the walk already classified.
pub fn process_files(
    files: &[PathBuf],
    unsupported: usize,
    store: &mut BackupStore,
    preserve: &PreserveSet,
    options: ProcessOptions,
) -> (ScanStats, Vec<FileReport>) {
    let started = Instant::now();
    let mut stats = ScanStats {
        files_scanned: unsupported,
        files_skipped: unsupported,
        ..ScanStats::default()
    };
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let report = process_single_file(path, store, preserve, options);
        stats.files_scanned += 1;
        match &report.status {
            FileStatus::Modified {
                comments_removed,
                bytes_saved,
            } => {
                stats.files_modified += 1;
                stats.comments_removed += comments_removed;
                stats.bytes_saved += bytes_saved;
            }
            FileStatus::Unchanged => {}
            FileStatus::Skipped(_) => stats.files_skipped += 1,
            FileStatus::Failed(_) => stats.files_failed += 1,
        }
        reports.push(report);
    }

    stats.elapsed = started.elapsed();
    (stats, reports)
}

fn process_single_file(
    path: &Path,
    store: &mut BackupStore,
    preserve: &PreserveSet,
    options: ProcessOptions,
) -> FileReport {
    let mut report = FileReport {
        path: path.to_path_buf(),
        status: FileStatus::Unchanged,
        unterminated: false,
    };

    let Some(profile) = language::profile_for_path(path) else {
        report.status = FileStatus::Skipped(SkipReason::UnsupportedLanguage);
        return report;
    };

    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) => {
            report.status = FileStatus::Failed(format!("Read failed: {}", e));
            return report;
        }
    };
    let Ok(original) = String::from_utf8(raw) else {
        report.status = FileStatus::Skipped(SkipReason::NotUtf8);
        return report;
    };

    let outcome = match stripper::strip(&original, profile.grammar, preserve) {
        Ok(outcome) => outcome,
        Err(e) => {
            report.status = FileStatus::Failed(format!("Stripping failed: {}", e));
            return report;
        }
    };
    report.unterminated = outcome.unterminated;

    if outcome.content == original {
        return report;
    }
    let modified = FileStatus::Modified {
        comments_removed: outcome.comments_removed,
        bytes_saved: (original.len() - outcome.content.len()) as u64,
    };
    if options.dry_run {
        report.status = modified;
        return report;
    }

    // The original must be safely in the store before the new bytes land.
    if let Err(e) = store.backup(path) {
        report.status = FileStatus::Failed(format!("Backup failed, file left untouched: {}", e));
        return report;
    }
    match write_atomic(path, &outcome.content) {
        Ok(()) => report.status = modified,
        Err(e) => report.status = FileStatus::Failed(e),
    }
    report
}

fn map_err_to_string<E: std::fmt::Display>(path: &Path, context: &str) -> impl Fn(E) -> String {
    let display = path.display().to_string();
    let context = context.to_string();
    move |e| format!("{} failed for {}: {}", context, display, e)
}

/// Stage the new content next to the target, then swap it in, so an
/// interrupted write never leaves a half-stripped file.
fn write_atomic(path: &Path, content: &str) -> Result<(), String> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp_file = tempfile::Builder::new()
        .prefix(".comms_tmp_")
        .tempfile_in(parent)
        .map_err(map_err_to_string(path, "Create temp file"))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(map_err_to_string(path, "Write temp file"))?;
    temp_file
        .persist(path)
        .map_err(map_err_to_string(path, "Replace"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(dir: &Path) -> (BackupStore, PreserveSet) {
        (
            BackupStore::open(dir, None).unwrap(),
            PreserveSet::default(),
        )
    }

    #[test]
    fn strips_supported_and_tallies_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let py = dir.path().join("a.py");
        fs::write(&py, "# comment\nprint(1)\n").unwrap();
        fs::write(dir.path().join("b.txt"), "plain # text\n").unwrap();

        let (mut store, preserve) = setup(dir.path());
        let (stats, reports) = process_files(
            &[py.clone()],
            1,
            &mut store,
            &preserve,
            ProcessOptions::default(),
        );

        assert_eq!(fs::read_to_string(&py).unwrap(), "print(1)\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("b.txt")).unwrap(),
            "plain # text\n"
        );
        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.files_modified, 1);
        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.files_failed, 0);
        assert_eq!(stats.comments_removed, 1);
        assert_eq!(stats.bytes_saved, 10);
        assert!(matches!(
            reports[0].status,
            FileStatus::Modified {
                comments_removed: 1,
                ..
            }
        ));
    }

    #[test]
    fn dry_run_writes_nothing_and_creates_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let py = dir.path().join("a.py");
        fs::write(&py, "# comment\nprint(1)\n").unwrap();

        let (mut store, preserve) = setup(dir.path());
        let (stats, _) = process_files(
            &[py.clone()],
            0,
            &mut store,
            &preserve,
            ProcessOptions { dry_run: true },
        );

        assert_eq!(fs::read_to_string(&py).unwrap(), "# comment\nprint(1)\n");
        assert_eq!(stats.files_modified, 1);
        assert!(!dir.path().join(crate::backup::DEFAULT_STORE_DIR).exists());
    }

    #[test]
    fn unchanged_file_is_not_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let py = dir.path().join("a.py");
        fs::write(&py, "print(1)\n").unwrap();

        let (mut store, preserve) = setup(dir.path());
        let (stats, _) =
            process_files(&[py], 0, &mut store, &preserve, ProcessOptions::default());

        assert_eq!(stats.files_modified, 0);
        assert_eq!(store.backup_count(), 0);
    }

    #[test]
    fn binary_file_is_skipped_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bin.py");
        fs::write(&bad, [0xff, 0xfe, 0x00, 0x23]).unwrap();

        let (mut store, preserve) = setup(dir.path());
        let (stats, reports) = process_files(
            &[bad.clone()],
            0,
            &mut store,
            &preserve,
            ProcessOptions::default(),
        );

        assert_eq!(stats.files_skipped, 1);
        assert_eq!(stats.files_failed, 0);
        assert_eq!(reports[0].status, FileStatus::Skipped(SkipReason::NotUtf8));
        assert_eq!(fs::read(&bad).unwrap(), vec![0xff, 0xfe, 0x00, 0x23]);
    }

    #[test]
    fn modified_file_can_be_restored_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let sh = dir.path().join("run.sh");
        let original = "#!/bin/sh\n# remove me\necho ok\n";
        fs::write(&sh, original).unwrap();

        let (mut store, preserve) = setup(dir.path());
        process_files(
            &[sh.clone()],
            0,
            &mut store,
            &preserve,
            ProcessOptions::default(),
        );
        assert_eq!(fs::read_to_string(&sh).unwrap(), "#!/bin/sh\necho ok\n");

        store.restore(&sh).unwrap();
        assert_eq!(fs::read_to_string(&sh).unwrap(), original);
    }
}
