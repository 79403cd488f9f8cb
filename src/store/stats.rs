//! Aggregate usage counters in a single `stats.json` behind one mutex.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::UnseiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub visits: u64,
    pub new_users: u64,
    pub fortunes: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_visits: u64,
    pub unique_users: u64,
    pub fortune_count: BTreeMap<String, u64>,
    pub daily_stats: BTreeMap<String, DayStats>,
}

impl Default for Stats {
    fn default() -> Stats {
        // the two fortune types the dashboard expects to always be present
        let mut fortune_count = BTreeMap::new();
        fortune_count.insert("basic".to_string(), 0);
        fortune_count.insert("time-fortune".to_string(), 0);
        Stats {
            total_visits: 0,
            unique_users: 0,
            fortune_count,
            daily_stats: BTreeMap::new(),
        }
    }
}

pub struct StatsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StatsStore {
    pub fn open(path: impl AsRef<Path>) -> Result<StatsStore, UnseiError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let store = StatsStore {
            path,
            lock: Mutex::new(()),
        };
        if !store.path.exists() {
            store.write(&Stats::default())?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<Stats, UnseiError> {
        if !self.path.exists() {
            return Ok(Stats::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(&self.path)?)?)
    }

    fn write(&self, stats: &Stats) -> Result<(), UnseiError> {
        fs::write(&self.path, serde_json::to_string_pretty(stats)?)?;
        Ok(())
    }

    /// Count a visit, optionally a new unique user, optionally one fortune
    /// of the named type, in both the totals and the per-day bucket.
    pub fn record(
        &self,
        fortune_type: Option<&str>,
        is_new_user: bool,
        today: NaiveDate,
    ) -> Result<(), UnseiError> {
        let _guard = self.lock.lock();
        let mut stats = self.read()?;

        stats.total_visits += 1;
        if is_new_user {
            stats.unique_users += 1;
        }
        if let Some(kind) = fortune_type {
            *stats.fortune_count.entry(kind.to_string()).or_insert(0) += 1;
        }

        let day = stats.daily_stats.entry(today.to_string()).or_default();
        day.visits += 1;
        if is_new_user {
            day.new_users += 1;
        }
        if let Some(kind) = fortune_type {
            *day.fortunes.entry(kind.to_string()).or_insert(0) += 1;
        }

        self.write(&stats)
    }

    pub fn snapshot(&self) -> Result<Stats, UnseiError> {
        let _guard = self.lock.lock();
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    #[test]
    fn starts_with_known_fortune_types() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatsStore::open(dir.path().join("stats.json")).unwrap();
        let snap = store.snapshot().unwrap();
        assert_eq!(snap.fortune_count.get("basic"), Some(&0));
        assert_eq!(snap.fortune_count.get("time-fortune"), Some(&0));
    }

    #[test]
    fn record_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatsStore::open(dir.path().join("stats.json")).unwrap();
        store.record(None, true, d(30)).unwrap();
        store.record(Some("basic"), false, d(30)).unwrap();
        store.record(Some("time-fortune"), false, d(31)).unwrap();

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.total_visits, 3);
        assert_eq!(snap.unique_users, 1);
        assert_eq!(snap.fortune_count["basic"], 1);
        assert_eq!(snap.fortune_count["time-fortune"], 1);

        let day = &snap.daily_stats["2026-08-30"];
        assert_eq!(day.visits, 2);
        assert_eq!(day.new_users, 1);
        assert_eq!(day.fortunes["basic"], 1);
        assert_eq!(snap.daily_stats["2026-08-31"].fortunes["time-fortune"], 1);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        {
            let store = StatsStore::open(&path).unwrap();
            store.record(Some("basic"), true, d(30)).unwrap();
        }
        let store = StatsStore::open(&path).unwrap();
        let snap = store.snapshot().unwrap();
        assert_eq!(snap.total_visits, 1);
        assert_eq!(snap.unique_users, 1);
    }
}
