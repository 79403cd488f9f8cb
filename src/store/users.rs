//! Registered-user store: one encrypted JSON file per uuid.
//!
//! On-disk document is `{"data": "<sealed record>"}`. Every mutation runs
//! under a per-id mutex, so concurrent requests for the same user serialize
//! instead of racing a read-modify-write.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crypto::SecretBox;
use crate::error::UnseiError;

/// Oldest readings are dropped past this.
pub const MAX_READINGS: usize = 50;

/// Points granted the first time the daily fortune is read on a calendar day.
pub const DAILY_READ_BONUS: i64 = 5;

const LOGIN_BASE_POINTS: i64 = 10;
const STREAK_BONUS: i64 = 50;
const STREAK_BONUS_EVERY: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_birthdate: Option<String>,
    pub result: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub gender: String,
    pub created_at: String,
    pub last_login: String,
    pub points: i64,
    pub login_streak: u32,
    pub readings: Vec<Reading>,
}

/// The record without its readings, as returned by get/login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub gender: String,
    pub created_at: String,
    pub last_login: String,
    pub points: i64,
    pub login_streak: u32,
}

impl UserRecord {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            name: self.name.clone(),
            birthdate: self.birthdate.clone(),
            gender: self.gender.clone(),
            created_at: self.created_at.clone(),
            last_login: self.last_login.clone(),
            points: self.points,
            login_streak: self.login_streak,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyBonus {
    pub points: i64,
    pub streak: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: UserView,
    pub daily_bonus: Option<DailyBonus>,
}

#[derive(Serialize, Deserialize)]
struct SealedDoc {
    data: String,
}

pub struct UserStore {
    dir: PathBuf,
    secret: SecretBox,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl UserStore {
    pub fn open(dir: impl AsRef<Path>, secret: &str) -> Result<UserStore, UnseiError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(UserStore {
            dir,
            secret: SecretBox::new(secret),
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    fn read_record(&self, id: &str) -> Result<Option<UserRecord>, UnseiError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let doc: SealedDoc = serde_json::from_str(&fs::read_to_string(path)?)?;
        let plaintext = self.secret.open(&doc.data)?;
        Ok(Some(serde_json::from_slice(&plaintext)?))
    }

    fn write_record(&self, record: &UserRecord) -> Result<(), UnseiError> {
        let sealed = self.secret.seal(&serde_json::to_vec(record)?)?;
        let doc = SealedDoc { data: sealed };
        fs::write(self.path_for(&record.id), serde_json::to_string(&doc)?)?;
        Ok(())
    }

    /// Load a record under its lock, apply `f`, persist, return `f`'s value.
    /// `Ok(None)` means the user does not exist.
    fn mutate<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut UserRecord) -> T,
    ) -> Result<Option<T>, UnseiError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        let Some(mut record) = self.read_record(id)? else {
            return Ok(None);
        };
        let out = f(&mut record);
        self.write_record(&record)?;
        Ok(Some(out))
    }

    pub fn create(
        &self,
        name: &str,
        birthdate: &str,
        gender: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, UnseiError> {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            birthdate: birthdate.to_string(),
            gender: gender.to_string(),
            created_at: timestamp(now),
            last_login: timestamp(now),
            points: 0,
            login_streak: 1,
            readings: Vec::new(),
        };
        let lock = self.lock_for(&record.id);
        let _guard = lock.lock();
        self.write_record(&record)?;
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<UserRecord, UnseiError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock();
        self.read_record(id)?.ok_or(UnseiError::NotFound)
    }

    pub fn delete(&self, id: &str) -> Result<(), UnseiError> {
        let lock = self.lock_for(id);
        let guard = lock.lock();
        let path = self.path_for(id);
        if !path.exists() {
            return Err(UnseiError::NotFound);
        }
        fs::remove_file(path)?;
        drop(guard);
        // the lock entry goes with the file, so the map does not grow with
        // every id ever seen
        self.locks.lock().remove(id);
        Ok(())
    }

    /// Append a reading if the user exists; silently a no-op otherwise (the
    /// fortune endpoints accept an optional userId). Oldest reading is
    /// evicted past the cap.
    pub fn append_reading(&self, id: &str, reading: Reading) -> Result<bool, UnseiError> {
        Ok(self
            .mutate(id, |record| {
                record.readings.push(reading);
                if record.readings.len() > MAX_READINGS {
                    let excess = record.readings.len() - MAX_READINGS;
                    record.readings.drain(..excess);
                }
            })?
            .is_some())
    }

    /// Daily login bonus. Same calendar day is a no-op; a one-day gap extends
    /// the streak (+10, +50 on every 5th day); a longer gap resets the streak
    /// to 1 and still pays the base 10.
    pub fn login(&self, id: &str, now: DateTime<Utc>) -> Result<LoginOutcome, UnseiError> {
        self.mutate(id, |record| {
            let last = DateTime::parse_from_rfc3339(&record.last_login)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(now);
            let day_gap = (now.date_naive() - last.date_naive()).num_days();
            if day_gap <= 0 {
                return LoginOutcome {
                    user: record.view(),
                    daily_bonus: None,
                };
            }
            if day_gap == 1 {
                record.login_streak += 1;
                record.points += LOGIN_BASE_POINTS;
                if record.login_streak % STREAK_BONUS_EVERY == 0 {
                    record.points += STREAK_BONUS;
                }
            } else {
                record.login_streak = 1;
                record.points += LOGIN_BASE_POINTS;
            }
            record.last_login = timestamp(now);
            let bonus = if record.login_streak % STREAK_BONUS_EVERY == 0 {
                LOGIN_BASE_POINTS + STREAK_BONUS
            } else {
                LOGIN_BASE_POINTS
            };
            LoginOutcome {
                user: record.view(),
                daily_bonus: Some(DailyBonus {
                    points: bonus,
                    streak: record.login_streak,
                }),
            }
        })?
        .ok_or(UnseiError::NotFound)
    }

    /// Record today's daily reading and pay the +5 bonus at most once per
    /// calendar day. Returns the bonus granted (0 on repeat calls), or
    /// `None` when the user does not exist.
    pub fn claim_daily(
        &self,
        id: &str,
        result: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, UnseiError> {
        let today = now.date_naive().to_string();
        self.mutate(id, |record| {
            let already = record
                .readings
                .iter()
                .any(|r| r.kind == "daily" && r.date.starts_with(&today));
            if already {
                return 0;
            }
            record.points += DAILY_READ_BONUS;
            record.readings.push(Reading {
                kind: "daily".to_string(),
                date: timestamp(now),
                partner_birthdate: None,
                result,
                bonus_points: Some(DAILY_READ_BONUS),
            });
            if record.readings.len() > MAX_READINGS {
                let excess = record.readings.len() - MAX_READINGS;
                record.readings.drain(..excess);
            }
            DAILY_READ_BONUS
        })
    }

    pub fn count(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> (tempfile::TempDir, UserStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::open(dir.path(), "test-secret").unwrap();
        (dir, store)
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn create_get_delete() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        assert_eq!(rec.points, 0);
        assert_eq!(rec.login_streak, 1);

        let loaded = store.get(&rec.id).unwrap();
        assert_eq!(loaded.name, "太郎");
        assert!(loaded.readings.is_empty());

        store.delete(&rec.id).unwrap();
        assert!(matches!(store.get(&rec.id), Err(UnseiError::NotFound)));
        assert!(matches!(store.delete(&rec.id), Err(UnseiError::NotFound)));
    }

    #[test]
    fn delete_evicts_the_per_id_lock() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        assert!(store.locks.lock().contains_key(&rec.id));
        store.delete(&rec.id).unwrap();
        assert!(!store.locks.lock().contains_key(&rec.id));
    }

    #[test]
    fn file_on_disk_is_sealed() {
        let (dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", rec.id))).unwrap();
        assert!(raw.contains("\"data\""));
        assert!(!raw.contains("太郎"));
        assert!(!raw.contains("1990-05-15"));
    }

    #[test]
    fn readings_cap_drops_oldest() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        for i in 0..(MAX_READINGS + 3) {
            store
                .append_reading(
                    &rec.id,
                    Reading {
                        kind: "fortune".to_string(),
                        date: format!("2026-08-30T00:00:{i:02}Z"),
                        partner_birthdate: None,
                        result: serde_json::json!({ "n": i }),
                        bonus_points: None,
                    },
                )
                .unwrap();
        }
        let loaded = store.get(&rec.id).unwrap();
        assert_eq!(loaded.readings.len(), MAX_READINGS);
        assert_eq!(loaded.readings[0].result["n"], 3);
    }

    #[test]
    fn append_to_missing_user_is_noop() {
        let (_dir, store) = store();
        let appended = store
            .append_reading(
                "nope",
                Reading {
                    kind: "fortune".to_string(),
                    date: "2026-08-30T00:00:00Z".to_string(),
                    partner_birthdate: None,
                    result: serde_json::json!({}),
                    bonus_points: None,
                },
            )
            .unwrap();
        assert!(!appended);
    }

    #[test]
    fn login_same_day_is_noop() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        let out = store.login(&rec.id, at(2026, 8, 30, 23)).unwrap();
        assert!(out.daily_bonus.is_none());
        assert_eq!(out.user.points, 0);
        assert_eq!(out.user.login_streak, 1);
    }

    #[test]
    fn login_next_day_extends_streak() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        let out = store.login(&rec.id, at(2026, 8, 31, 1)).unwrap();
        let bonus = out.daily_bonus.unwrap();
        assert_eq!(bonus.points, 10);
        assert_eq!(bonus.streak, 2);
        assert_eq!(out.user.points, 10);
    }

    #[test]
    fn fifth_consecutive_day_pays_streak_bonus() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 1, 9))
            .unwrap();
        for day in 2..=5 {
            store.login(&rec.id, at(2026, 8, day, 9)).unwrap();
        }
        let loaded = store.get(&rec.id).unwrap();
        assert_eq!(loaded.login_streak, 5);
        // days 2..=4 pay 10 each, day 5 pays 60
        assert_eq!(loaded.points, 30 + 60);
    }

    #[test]
    fn gap_resets_streak_but_still_pays_base() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 1, 9))
            .unwrap();
        store.login(&rec.id, at(2026, 8, 2, 9)).unwrap();
        let out = store.login(&rec.id, at(2026, 8, 10, 9)).unwrap();
        let bonus = out.daily_bonus.unwrap();
        assert_eq!(bonus.streak, 1);
        assert_eq!(bonus.points, 10);
        assert_eq!(out.user.points, 20);
    }

    #[test]
    fn daily_bonus_once_per_day() {
        let (_dir, store) = store();
        let rec = store
            .create("太郎", "1990-05-15", "male", at(2026, 8, 30, 9))
            .unwrap();
        let first = store
            .claim_daily(&rec.id, serde_json::json!({"fortuneScore": 70}), at(2026, 8, 30, 10))
            .unwrap();
        assert_eq!(first, Some(5));
        let second = store
            .claim_daily(&rec.id, serde_json::json!({"fortuneScore": 70}), at(2026, 8, 30, 22))
            .unwrap();
        assert_eq!(second, Some(0));

        let loaded = store.get(&rec.id).unwrap();
        assert_eq!(loaded.points, 5);
        assert_eq!(loaded.readings.len(), 1);

        // next calendar day pays again
        let next = store
            .claim_daily(&rec.id, serde_json::json!({"fortuneScore": 70}), at(2026, 8, 31, 10))
            .unwrap();
        assert_eq!(next, Some(5));
    }

    #[test]
    fn claim_daily_missing_user() {
        let (_dir, store) = store();
        let out = store
            .claim_daily("nope", serde_json::json!({}), at(2026, 8, 30, 10))
            .unwrap();
        assert!(out.is_none());
    }
}
