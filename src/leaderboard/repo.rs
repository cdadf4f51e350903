use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Cumulative stats for one user, as stored in the leaderboard file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(rename = "total_emissions_avoided")]
    pub total_emissions_avoided_kg: f64,
    pub total_items_saved: u64,
    #[serde(rename = "contributions")]
    pub contribution_count: u32,
    #[serde(rename = "last_contribution", with = "timestamp")]
    pub last_contribution_timestamp: OffsetDateTime,
}

/// File-backed leaderboard. Entries stay sorted by avoided emissions, highest
/// first, and every write rewrites the whole file.
///
/// Nothing here coordinates separate processes sharing one file; callers in
/// the same process serialize access through the coordinator's lock.
#[derive(Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardStore {
    /// Opens the store at `path`. A missing or unparsable file yields an empty board.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = load_entries(&path);
        sort_entries(&mut entries);
        let store = Self { path, entries };
        if store.is_empty() {
            debug!(path = %store.path.display(), "leaderboard is empty");
        } else {
            info!(path = %store.path.display(), users = store.len(), "leaderboard loaded");
        }
        store
    }

    /// Adds a contribution for `username`. The board only changes once the
    /// updated file has been written.
    pub fn record_contribution(
        &mut self,
        username: &str,
        emissions_kg: f64,
        items_saved: u64,
    ) -> Result<&LeaderboardEntry, AppError> {
        if !emissions_kg.is_finite() || emissions_kg < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "emissions must be a non-negative number, got {emissions_kg}"
            )));
        }

        let now = OffsetDateTime::now_utc();
        let mut next = self.entries.clone();
        match next.iter_mut().find(|e| e.username == username) {
            Some(entry) => {
                let total_kg = entry.total_emissions_avoided_kg + emissions_kg;
                if !total_kg.is_finite() {
                    return Err(AppError::InvalidInput(format!(
                        "total emissions for {username} would overflow"
                    )));
                }
                entry.total_items_saved = entry
                    .total_items_saved
                    .checked_add(items_saved)
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!("items saved for {username} would overflow"))
                    })?;
                entry.contribution_count = entry.contribution_count.checked_add(1).ok_or_else(|| {
                    AppError::InvalidInput(format!("contribution count for {username} would overflow"))
                })?;
                entry.total_emissions_avoided_kg = total_kg;
                entry.last_contribution_timestamp = now;
            }
            None => next.push(LeaderboardEntry {
                username: username.to_string(),
                total_emissions_avoided_kg: emissions_kg,
                total_items_saved: items_saved,
                contribution_count: 1,
                last_contribution_timestamp: now,
            }),
        }
        sort_entries(&mut next);
        self.persist(&next)?;
        self.entries = next;

        debug!(%username, emissions_kg, items_saved, "contribution recorded");
        self.entries
            .iter()
            .find(|e| e.username == username)
            .ok_or_else(|| AppError::Internal(format!("entry for {username} vanished")))
    }

    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// 1-indexed position of `username`.
    pub fn rank(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.username == username)
            .map(|i| i + 1)
    }

    pub fn get(&self, username: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.username == username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> Result<(), AppError> {
        let persist_err = |e: &dyn std::fmt::Display| {
            AppError::Persistence(format!("{}: {}", self.path.display(), e))
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persist_err(&e))?;
        }
        let body = serde_json::to_vec_pretty(entries).map_err(|e| persist_err(&e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| persist_err(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| persist_err(&e))?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Vec<LeaderboardEntry> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!(error = %e, dir = %parent.display(), "could not create leaderboard directory");
                }
            }
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "leaderboard unreadable; starting empty");
            return Vec::new();
        }
    };

    // A corrupt file resets the board rather than failing startup.
    serde_json::from_slice(&raw).unwrap_or_else(|e| {
        warn!(error = %e, path = %path.display(), "leaderboard corrupt; starting empty");
        Vec::new()
    })
}

/// Timestamps are written as RFC 3339. Reading also accepts ISO-8601 date-times
/// without an offset, which are taken as UTC.
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::{Iso8601, Rfc3339},
        OffsetDateTime, PrimitiveDateTime,
    };

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(raw, &Rfc3339).or_else(|_| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
    }
}

fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.total_emissions_avoided_kg
            .total_cmp(&a.total_emissions_avoided_kg)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LeaderboardStore {
        LeaderboardStore::open(dir.path().join("data").join("leaderboard.json"))
    }

    fn usernames(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.username.as_str()).collect()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert!(store.top(10).is_empty());
    }

    #[test]
    fn repeat_contributions_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.record_contribution("Alice", 5.2, 8).unwrap();
        let alice = store.record_contribution("Alice", 2.3, 3).unwrap().clone();

        assert_eq!(store.len(), 1);
        assert!((alice.total_emissions_avoided_kg - 7.5).abs() < 1e-9);
        assert_eq!(alice.total_items_saved, 11);
        assert_eq!(alice.contribution_count, 2);
    }

    #[test]
    fn top_is_sorted_by_emissions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.record_contribution("Alice", 5.2, 8).unwrap();
        store.record_contribution("Bob", 3.7, 5).unwrap();
        store.record_contribution("Charlie", 7.1, 12).unwrap();
        store.record_contribution("Alice", 2.3, 3).unwrap();

        assert_eq!(usernames(store.top(2)), ["Alice", "Charlie"]);
        assert_eq!(usernames(store.top(10)), ["Alice", "Charlie", "Bob"]);
        assert!(store.top(0).is_empty());
        assert_eq!(store.top(2), store.top(2));
    }

    #[test]
    fn rank_is_one_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_contribution("Bob", 3.7, 5).unwrap();
        store.record_contribution("Charlie", 7.1, 12).unwrap();

        assert_eq!(store.rank("Charlie"), Some(1));
        assert_eq!(store.rank("Bob"), Some(2));
        assert_eq!(store.rank("Dave"), None);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_contribution("first", 1.0, 1).unwrap();
        store.record_contribution("second", 1.0, 1).unwrap();
        assert_eq!(usernames(store.top(2)), ["first", "second"]);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_in(&dir);
            store.record_contribution("Bob", 3.7, 5).unwrap();
            store.record_contribution("Alice", 5.2, 8).unwrap();
        }
        let store = store_in(&dir);
        assert_eq!(usernames(store.top(5)), ["Alice", "Bob"]);
        assert_eq!(store.get("Bob").map(|e| e.total_items_saved), Some(5));
    }

    #[test]
    fn file_uses_flat_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_contribution("Alice", 1.5, 2).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("data").join("leaderboard.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &json[0];
        assert_eq!(first["username"], "Alice");
        assert_eq!(first["total_emissions_avoided"], 1.5);
        assert_eq!(first["total_items_saved"], 2);
        assert_eq!(first["contributions"], 1);
        assert!(first["last_contribution"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = LeaderboardStore::open(&path);
        assert!(store.is_empty());

        store.record_contribution("Alice", 1.0, 1).unwrap();
        assert_eq!(LeaderboardStore::open(&path).len(), 1);
    }

    #[test]
    fn unsorted_file_is_sorted_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(
            &path,
            r#"[
              {"username":"low","total_emissions_avoided":1.0,"total_items_saved":1,"contributions":1,"last_contribution":"2024-03-01T10:00:00Z"},
              {"username":"high","total_emissions_avoided":9.0,"total_items_saved":4,"contributions":2,"last_contribution":"2024-03-02T10:00:00Z"}
            ]"#,
        )
        .unwrap();

        let store = LeaderboardStore::open(&path);
        assert_eq!(usernames(store.top(2)), ["high", "low"]);
    }

    #[test]
    fn rejects_negative_or_nan_emissions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.record_contribution("Alice", -1.0, 1),
            Err(AppError::InvalidInput(_))
        ));
        assert!(store.record_contribution("Alice", f64::NAN, 1).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn naive_timestamps_load_as_utc() {
        let with_offset = timestamp::parse("2024-03-01T10:00:00Z").unwrap();
        let naive = timestamp::parse("2024-03-01T10:00:00.123456").unwrap();
        assert_eq!(naive.offset(), time::UtcOffset::UTC);
        assert_eq!(naive.microsecond(), 123_456);
        assert_eq!(naive.replace_microsecond(0).unwrap(), with_offset);
        assert!(timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn file_without_offsets_keeps_its_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(
            &path,
            r#"[{"username":"Alice","total_emissions_avoided":5.2,"total_items_saved":8,"contributions":1,"last_contribution":"2024-03-01T10:00:00.123456"}]"#,
        )
        .unwrap();

        let mut store = LeaderboardStore::open(&path);
        assert_eq!(store.len(), 1);
        store.record_contribution("Bob", 1.0, 1).unwrap();

        let store = LeaderboardStore::open(&path);
        assert_eq!(usernames(store.top(10)), ["Alice", "Bob"]);
        assert_eq!(store.get("Alice").map(|e| e.total_items_saved), Some(8));
    }

    #[test]
    fn items_overflow_is_rejected_without_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_contribution("Alice", 1.0, u64::MAX).unwrap();

        let err = store.record_contribution("Alice", 1.0, u64::MAX).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let alice = store.get("Alice").unwrap();
        assert_eq!(alice.total_items_saved, u64::MAX);
        assert_eq!(alice.contribution_count, 1);
        assert_eq!(store_in(&dir).get("Alice"), Some(alice));

        store.record_contribution("Bob", 2.0, 1).unwrap();
        assert_eq!(store.rank("Bob"), Some(1));
    }

    #[test]
    fn infinite_total_is_rejected_and_file_stays_readable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.record_contribution("Carol", 5.0, 1).unwrap();
        store.record_contribution("Mallory", 1e308, 1).unwrap();

        let err = store.record_contribution("Mallory", 1e308, 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(store.get("Mallory").map(|e| e.total_emissions_avoided_kg), Some(1e308));

        let reopened = store_in(&dir);
        assert_eq!(usernames(reopened.top(10)), ["Mallory", "Carol"]);
        for entry in reopened.top(10) {
            assert!(entry.total_emissions_avoided_kg.is_finite());
        }
    }

    #[test]
    fn totals_stay_non_negative() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        for kg in [0.0, 0.1, 2.5, 0.0, 7.25] {
            store.record_contribution("Alice", kg, 0).unwrap();
        }
        let alice = store.get("Alice").unwrap();
        assert!(alice.total_emissions_avoided_kg >= 0.0);
        assert!((alice.total_emissions_avoided_kg - 9.85).abs() < 1e-9);
        assert_eq!(alice.contribution_count, 5);
    }

    #[test]
    fn failed_write_leaves_board_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut store = LeaderboardStore::open(blocker.join("leaderboard.json"));

        for _ in 0..2 {
            let err = store.record_contribution("Alice", 5.0, 1).unwrap_err();
            assert!(matches!(err, AppError::Persistence(_)));
        }
        assert!(store.is_empty());
        assert_eq!(store.get("Alice"), None);
    }
}
