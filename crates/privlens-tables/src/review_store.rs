//! Write-once storage of review records.
//!
//! The first non-empty result for an analysis is authoritative: later runs
//! never overwrite it. An absent file, an empty file or an empty JSON array
//! counts as "nothing stored yet". The existence check and the write run under
//! a `.lock` sibling file, so concurrent writers cannot both store.

use crate::error::TableError;
use crate::read::{display_path, parse_json, read_text};
use privlens_kernel::ReviewRecord;
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOutcome {
    Written,
    KeptExisting,
}

impl StoreOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::KeptExisting => "kept_existing",
        }
    }
}

/// Whether `path` already holds a non-empty review result.
fn has_stored_records(path: &Path) -> Result<bool, TableError> {
    if !path.exists() {
        return Ok(false);
    }
    let text = read_text(path)?;
    if text.trim().is_empty() {
        return Ok(false);
    }
    let stored: Value = parse_json(&display_path(path), &text)?;
    match stored {
        Value::Array(items) => Ok(!items.is_empty()),
        Value::Null => Ok(false),
        _ => Err(TableError::Corrupt(format!(
            "{}: stored review records must be a JSON array",
            display_path(path)
        ))),
    }
}

/// Lock file guarding one review store path; removed on drop.
struct StoreLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl StoreLockGuard {
    fn acquire(path: &Path) -> Result<Self, TableError> {
        let lock_path = store_lock_path(path);
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                let _ = writeln!(file, "pid={}", std::process::id());
                Ok(Self {
                    lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(TableError::LockBusy {
                    lock_path: display_path(&lock_path),
                })
            }
            Err(err) => Err(write_error(&lock_path, err)),
        }
    }
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn store_lock_path(path: &Path) -> PathBuf {
    let mut lock: OsString = path.as_os_str().to_os_string();
    lock.push(".lock");
    PathBuf::from(lock)
}

/// Store `records` at `path` unless a non-empty result is already there.
///
/// Fails with [`TableError::LockBusy`] while another writer holds the path.
pub fn store_review_records_once(
    path: &Path,
    records: &[ReviewRecord],
) -> Result<StoreOutcome, TableError> {
    let _guard = StoreLockGuard::acquire(path)?;
    if has_stored_records(path)? {
        tracing::info!(path = %path.display(), "review records already stored; keeping existing");
        return Ok(StoreOutcome::KeptExisting);
    }
    write_json_atomically(path, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "stored review records");
    Ok(StoreOutcome::Written)
}

pub fn load_review_records(path: &Path) -> Result<Vec<ReviewRecord>, TableError> {
    let text = read_text(path)?;
    parse_json(&display_path(path), &text)
}

fn write_error(path: &Path, source: std::io::Error) -> TableError {
    TableError::WriteFile {
        path: display_path(path),
        source,
    }
}

fn write_json_atomically<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), TableError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), TableError> {
        let file = File::create(&tmp_path).map_err(|e| write_error(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| write_error(&tmp_path, std::io::Error::other(e)))?;
        writer
            .write_all(b"\n")
            .map_err(|e| write_error(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| write_error(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| write_error(&tmp_path, e))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_error(path, e)
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent).map_err(|e| write_error(parent, e))?;
        dir.sync_all().map_err(|e| write_error(parent, e))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use privlens_kernel::{Label, Permission, ReviewTag};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "privlens-store-{prefix}-{}-{unique}.json",
            std::process::id()
        ))
    }

    fn record(label: &str, tag: ReviewTag) -> ReviewRecord {
        ReviewRecord {
            label: Label::from(label),
            tag,
            sentence: format!("{label} sentence"),
            evidence: vec![Permission::from("android.permission.CAMERA")],
        }
    }

    #[test]
    fn first_write_stores_and_second_keeps_existing() {
        let path = temp_path("once");
        let first = vec![record("CAMERA", ReviewTag::Missing)];
        let second = vec![record("LOC", ReviewTag::Consistent)];

        assert_eq!(
            store_review_records_once(&path, &first).expect("first store"),
            StoreOutcome::Written
        );
        assert_eq!(
            store_review_records_once(&path, &second).expect("second store"),
            StoreOutcome::KeptExisting
        );
        assert_eq!(load_review_records(&path).expect("reload"), first);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_array_is_overwritten() {
        let path = temp_path("empty-array");
        fs::write(&path, "[]\n").expect("fixture should write");
        let records = vec![record("SMS", ReviewTag::OverDeclared)];
        assert_eq!(
            store_review_records_once(&path, &records).expect("store"),
            StoreOutcome::Written
        );
        assert_eq!(load_review_records(&path).expect("reload"), records);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_array_content_is_not_clobbered() {
        let path = temp_path("object");
        fs::write(&path, "{\"unexpected\":true}").expect("fixture should write");
        let err = store_review_records_once(&path, &[record("SMS", ReviewTag::Missing)])
            .expect_err("non-array content must not be overwritten");
        assert!(matches!(err, TableError::Corrupt(_)));
        assert_eq!(
            fs::read_to_string(&path).expect("file should remain"),
            "{\"unexpected\":true}"
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = temp_path("nested").with_extension("d");
        let path = dir.join("reviews").join("records.json");
        store_review_records_once(&path, &[record("CAMERA", ReviewTag::Missing)])
            .expect("store should create parents");
        assert!(path.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn held_lock_reports_busy_and_leaves_target_untouched() {
        let path = temp_path("held-lock");
        let guard = StoreLockGuard::acquire(&path).expect("lock should be acquired");
        let err = store_review_records_once(&path, &[record("SMS", ReviewTag::Missing)])
            .expect_err("store must not proceed while locked");
        assert!(matches!(err, TableError::LockBusy { .. }));
        assert!(!path.exists());
        drop(guard);
        assert!(!store_lock_path(&path).exists());
        assert_eq!(
            store_review_records_once(&path, &[record("SMS", ReviewTag::Missing)])
                .expect("store after unlock"),
            StoreOutcome::Written
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn concurrent_writers_store_exactly_once() {
        for round in 0..50 {
            let path = temp_path(&format!("race-{round}"));
            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = [
                record("CAMERA", ReviewTag::Missing),
                record("LOC", ReviewTag::Consistent),
            ]
            .into_iter()
            .map(|entry| {
                let path = path.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let records = vec![entry];
                    let outcome = store_review_records_once(&path, &records);
                    (records, outcome)
                })
            })
            .collect();
            let results: Vec<_> = handles
                .into_iter()
                .map(|handle| handle.join().expect("writer thread should not panic"))
                .collect();

            let written: Vec<&Vec<ReviewRecord>> = results
                .iter()
                .filter(|(_, outcome)| matches!(outcome, Ok(StoreOutcome::Written)))
                .map(|(records, _)| records)
                .collect();
            assert_eq!(written.len(), 1, "round {round}: exactly one writer must store");
            for (_, outcome) in &results {
                assert!(matches!(
                    outcome,
                    Ok(StoreOutcome::Written)
                        | Ok(StoreOutcome::KeptExisting)
                        | Err(TableError::LockBusy { .. })
                ));
            }
            assert_eq!(&load_review_records(&path).expect("reload"), written[0]);
            assert!(!store_lock_path(&path).exists());
            let _ = fs::remove_file(path);
        }
    }
}
