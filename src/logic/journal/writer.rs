use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use thiserror::Error;

use crate::logic::pipeline::AnalysisResult;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("journal serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub fn partition_file_name(date: NaiveDate) -> String {
    format!("events_{}.json", date.format("%Y%m%d"))
}

pub struct EventJournal {
    dir: PathBuf,
    partition_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl EventJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            partition_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(partition_file_name(date))
    }

    /// Locks nobody holds are dropped here, so the map only tracks live partitions
    fn lock_for(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.partition_locks.lock();
        locks.retain(|d, lock| *d == date || Arc::strong_count(lock) > 1);
        locks
            .entry(date)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[cfg(test)]
    pub(crate) fn tracked_partitions(&self) -> usize {
        self.partition_locks.lock().len()
    }

    /// Append to the partition of `result.logged_at`; returns the partition path
    pub fn append(&self, result: &AnalysisResult) -> Result<PathBuf, JournalError> {
        let date = result.logged_at.date_naive();
        let lock = self.lock_for(date);
        let _guard = lock.lock();

        fs::create_dir_all(&self.dir)?;
        let path = self.partition_path(date);

        // Kept as raw values so entries written by other versions survive
        let mut entries = self.load_or_quarantine(&path)?;
        entries.push(serde_json::to_value(result)?);

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        fs::rename(&tmp, &path)?;

        log::debug!("Journal entry {} appended to {:?}", entries.len(), path);
        Ok(path)
    }

    fn load_or_quarantine(&self, path: &Path) -> Result<Vec<serde_json::Value>, JournalError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let quarantined =
                    PathBuf::from(format!("{}.corrupt-{}", path.display(), Utc::now().timestamp()));
                fs::rename(path, &quarantined)?;
                log::error!(
                    "Corrupted journal partition {:?} ({}), moved to {:?}",
                    path,
                    e,
                    quarantined
                );
                Ok(Vec::new())
            }
        }
    }

    /// Entries of one day, in append order. Missing partition = empty.
    pub fn read_partition(&self, date: NaiveDate) -> Result<Vec<AnalysisResult>, JournalError> {
        let lock = self.lock_for(date);
        let _guard = lock.lock();

        match fs::read(self.partition_path(date)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
