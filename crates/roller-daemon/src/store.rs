//! The roll log — append-only record store with a monotonic sequence counter.
//!
//! Records live in memory behind a lock and are mirrored to a JSON file
//! after every append, so `SeqID`s survive daemon restarts.

use std::path::PathBuf;
use std::sync::Arc;

use roller_proto::records::{RollDef, RollRecord, RollResult};
use tokio::sync::RwLock;
use tracing::info;

struct LogInner {
    records: Vec<RollRecord>,
    next_seq: i64,
}

#[derive(Clone)]
pub struct RollLog {
    inner: Arc<RwLock<LogInner>>,
    rolls_file: PathBuf,
}

impl RollLog {
    /// Load the persisted log, or start empty.  `SeqID`s continue from the
    /// highest persisted record.
    pub fn load(rolls_file: PathBuf) -> Self {
        let records = Self::load_records(&rolls_file);
        let next_seq = records.iter().map(|r| r.seq_id).max().unwrap_or(0) + 1;
        info!(
            "roll log: {} records loaded, next SeqID {}",
            records.len(),
            next_seq
        );

        Self {
            inner: Arc::new(RwLock::new(LogInner { records, next_seq })),
            rolls_file,
        }
    }

    fn load_records(rolls_file: &PathBuf) -> Vec<RollRecord> {
        if let Ok(content) = std::fs::read_to_string(rolls_file) {
            if let Ok(records) = serde_json::from_str::<Vec<RollRecord>>(&content) {
                return records;
            }
        }
        Vec::new()
    }

    /// Assign the next `SeqID`, append the record, and persist.
    pub async fn append(
        &self,
        request: RollDef,
        result: RollResult,
        user: String,
    ) -> anyhow::Result<RollRecord> {
        let record = {
            let mut inner = self.inner.write().await;
            let record = RollRecord {
                request,
                result,
                user,
                time: chrono::Local::now().format("%d %b %y %H:%M").to_string(),
                seq_id: inner.next_seq,
                permalink: false,
            };
            inner.next_seq += 1;
            inner.records.push(record.clone());
            record
        };
        self.save().await?;
        Ok(record)
    }

    /// Query the log the way `/rolls.json` does.
    ///
    /// Without a cursor (`since == 0`) this returns the most recent `limit`
    /// records, descending — there is no defined starting point, so newest
    /// first.  With a cursor it returns records with `SeqID > since`,
    /// ascending, capped at `limit`.
    pub async fn records_since(
        &self,
        since: i64,
        user: Option<&str>,
        limit: usize,
    ) -> Vec<RollRecord> {
        let inner = self.inner.read().await;
        let matches_user =
            |r: &RollRecord| user.map(|u| r.user == u).unwrap_or(true);

        // Appends keep `records` ascending by SeqID already.
        if since > 0 {
            inner
                .records
                .iter()
                .filter(|r| r.seq_id > since)
                .filter(|r| matches_user(r))
                .take(limit)
                .cloned()
                .collect()
        } else {
            let mut recent: Vec<RollRecord> = inner
                .records
                .iter()
                .rev()
                .filter(|r| matches_user(r))
                .take(limit)
                .cloned()
                .collect();
            recent.sort_by(|a, b| b.seq_id.cmp(&a.seq_id));
            recent
        }
    }

    pub async fn find_by_seq(&self, seq_id: i64) -> Option<RollRecord> {
        let inner = self.inner.read().await;
        inner.records.iter().find(|r| r.seq_id == seq_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    async fn save(&self) -> anyhow::Result<()> {
        let records = {
            let inner = self.inner.read().await;
            inner.records.clone()
        };

        if let Some(parent) = self.rolls_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.rolls_file, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roller_proto::notation::parse_roll;
    use roller_proto::roll::perform_roll;

    async fn append_one(log: &RollLog, text: &str, user: &str) -> RollRecord {
        let def = parse_roll(text).unwrap();
        let result = perform_roll(&def);
        log.append(def, result, user.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_seq_ids_start_at_one_and_increase() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollLog::load(dir.path().join("rolls.json"));

        let first = append_one(&log, "1d6", "alice").await;
        let second = append_one(&log, "2d20", "bob").await;
        assert_eq!(first.seq_id, 1);
        assert_eq!(second.seq_id, 2);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_seq_ids_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let rolls_file = dir.path().join("rolls.json");

        let log = RollLog::load(rolls_file.clone());
        append_one(&log, "1d6", "alice").await;
        append_one(&log, "1d6", "alice").await;

        let reloaded = RollLog::load(rolls_file);
        assert_eq!(reloaded.len().await, 2);
        let third = append_one(&reloaded, "1d6", "alice").await;
        assert_eq!(third.seq_id, 3);
    }

    #[tokio::test]
    async fn test_recent_page_is_descending_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollLog::load(dir.path().join("rolls.json"));
        for _ in 0..5 {
            append_one(&log, "1d6", "alice").await;
        }

        let page = log.records_since(0, None, 3).await;
        let ids: Vec<i64> = page.iter().map(|r| r.seq_id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn test_since_returns_strictly_newer_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollLog::load(dir.path().join("rolls.json"));
        for _ in 0..5 {
            append_one(&log, "1d6", "alice").await;
        }

        let newer = log.records_since(3, None, 20).await;
        let ids: Vec<i64> = newer.iter().map(|r| r.seq_id).collect();
        assert_eq!(ids, vec![4, 5]);

        assert!(log.records_since(5, None, 20).await.is_empty());
    }

    #[tokio::test]
    async fn test_user_filter() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollLog::load(dir.path().join("rolls.json"));
        append_one(&log, "1d6", "alice").await;
        append_one(&log, "1d6", "bob").await;
        append_one(&log, "1d6", "alice").await;

        let alices = log.records_since(0, Some("alice"), 20).await;
        let ids: Vec<i64> = alices.iter().map(|r| r.seq_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_find_by_seq() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollLog::load(dir.path().join("rolls.json"));
        let record = append_one(&log, "2d20+3", "alice").await;

        let found = log.find_by_seq(record.seq_id).await.unwrap();
        assert_eq!(found.request.text, "2d20+3");
        assert!(log.find_by_seq(999).await.is_none());
    }
}
