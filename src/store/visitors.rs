//! Anonymous visitor store: plain JSON per cookie id.
//!
//! Visitors are identified by a 16-byte hex token carried in a cookie; their
//! files hold visit counters and a newest-first fortune history capped at 50.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::UnseiError;

pub const MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub user_id: String,
    pub created_at: String,
    pub last_visit: String,
    pub visits: u64,
    pub fortune_results: Vec<serde_json::Value>,
}

pub struct VisitorStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

impl VisitorStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<VisitorStore, UnseiError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(VisitorStore {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    // entries are never evicted: one `Arc<Mutex<()>>` per id seen, held for
    // the process lifetime
    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    fn read_record(&self, id: &str) -> Result<Option<VisitorRecord>, UnseiError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }

    fn write_record(&self, record: &VisitorRecord) -> Result<(), UnseiError> {
        fs::write(
            self.path_for(&record.user_id),
            serde_json::to_string_pretty(record)?,
        )?;
        Ok(())
    }

    /// Visitor bootstrap. No cookie mints a fresh id with `visits: 1`; a
    /// known cookie bumps the counter. A cookie pointing at a missing file
    /// (wiped data dir) is rebuilt rather than rejected.
    pub fn init(
        &self,
        cookie_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(VisitorRecord, bool), UnseiError> {
        match cookie_id {
            None => {
                let record = VisitorRecord {
                    user_id: random_hex(16),
                    created_at: timestamp(now),
                    last_visit: timestamp(now),
                    visits: 1,
                    fortune_results: Vec::new(),
                };
                let lock = self.lock_for(&record.user_id);
                let _guard = lock.lock();
                self.write_record(&record)?;
                Ok((record, true))
            }
            Some(id) => {
                let lock = self.lock_for(id);
                let _guard = lock.lock();
                let mut record = self.read_record(id)?.unwrap_or(VisitorRecord {
                    user_id: id.to_string(),
                    created_at: timestamp(now),
                    last_visit: timestamp(now),
                    visits: 0,
                    fortune_results: Vec::new(),
                });
                record.last_visit = timestamp(now);
                record.visits += 1;
                self.write_record(&record)?;
                Ok((record, false))
            }
        }
    }

    /// Stamp and prepend a fortune result; newest stays first and the list
    /// is truncated at the cap. `Ok(None)` when the visitor is unknown.
    pub fn save_result(
        &self,
        id: &str,
        mut result: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, UnseiError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        let Some(mut record) = self.read_record(id)? else {
            return Ok(None);
        };
        let result_id = random_hex(8);
        if let Some(obj) = result.as_object_mut() {
            obj.insert("saveTime".to_string(), timestamp(now).into());
            obj.insert("resultId".to_string(), result_id.clone().into());
        }
        record.fortune_results.insert(0, result);
        record.fortune_results.truncate(MAX_RESULTS);
        self.write_record(&record)?;
        Ok(Some(result_id))
    }

    pub fn results(&self, id: &str) -> Result<Option<Vec<serde_json::Value>>, UnseiError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        Ok(self.read_record(id)?.map(|r| r.fortune_results))
    }

    pub fn count(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}
