//! End-to-end feed scenario: a client catching up with a growing roll log,
//! driven the same way the TUI drives it (poll → apply → poll with the new
//! watermark).

use roller_proto::feed::{RollFeed, RECORDS_PER_PAGE, WATERMARK_NONE};
use roller_proto::records::RollRecord;

/// Stand-in for the daemon's log + `/rolls.json` semantics.
struct FakeLog {
    records: Vec<RollRecord>,
}

impl FakeLog {
    fn with_seq_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            records: ids
                .into_iter()
                .map(|seq_id| RollRecord {
                    seq_id,
                    user: "anon".to_string(),
                    ..RollRecord::default()
                })
                .collect(),
        }
    }

    fn append(&mut self, seq_id: i64) {
        self.records.push(RollRecord {
            seq_id,
            ..RollRecord::default()
        });
    }

    /// No cursor: most recent page, descending.  With a cursor: strictly
    /// newer records, ascending.
    fn rolls_json(&self, since: i64) -> Vec<RollRecord> {
        if since == WATERMARK_NONE {
            let mut page: Vec<_> = self.records.clone();
            page.sort_by(|a, b| b.seq_id.cmp(&a.seq_id));
            page.truncate(RECORDS_PER_PAGE);
            page
        } else {
            let mut newer: Vec<_> = self
                .records
                .iter()
                .filter(|r| r.seq_id > since)
                .cloned()
                .collect();
            newer.sort_by(|a, b| a.seq_id.cmp(&b.seq_id));
            newer.truncate(RECORDS_PER_PAGE);
            newer
        }
    }
}

fn seq_ids(records: &[RollRecord]) -> Vec<i64> {
    records.iter().map(|r| r.seq_id).collect()
}

#[test]
fn client_catches_up_then_follows_increments() {
    let mut log = FakeLog::with_seq_ids(1..=25);
    let mut feed = RollFeed::default();

    // Initial poll: no watermark yet, server hands back the default page.
    assert_eq!(feed.watermark(), WATERMARK_NONE);
    feed.apply(log.rolls_json(feed.watermark()));

    let expected: Vec<i64> = (6..=25).rev().collect();
    assert_eq!(seq_ids(feed.records()), expected);
    assert_eq!(feed.watermark(), 25);

    // Nothing new: the next poll is a no-op cycle.
    feed.apply(log.rolls_json(feed.watermark()));
    assert_eq!(feed.watermark(), 25);
    assert_eq!(feed.len(), RECORDS_PER_PAGE);

    // One new roll arrives; the view slides by one.
    log.append(26);
    feed.apply(log.rolls_json(feed.watermark()));

    let expected: Vec<i64> = (7..=26).rev().collect();
    assert_eq!(seq_ids(feed.records()), expected);
    assert_eq!(feed.watermark(), 26);
}

#[test]
fn client_survives_a_burst_larger_than_the_window() {
    let mut log = FakeLog::with_seq_ids(1..=3);
    let mut feed = RollFeed::default();
    feed.apply(log.rolls_json(feed.watermark()));
    assert_eq!(feed.watermark(), 3);

    // A burst of 50 rolls lands between polls.  The server caps each
    // response at one page, so the client takes the first page of newer
    // records and the watermark advances past what it displays only as far
    // as records it has actually seen.
    for seq in 4..=53 {
        log.append(seq);
    }
    feed.apply(log.rolls_json(feed.watermark()));
    assert_eq!(feed.watermark(), 23);
    assert_eq!(feed.len(), RECORDS_PER_PAGE);

    // Subsequent polls drain the rest, one page at a time.
    feed.apply(log.rolls_json(feed.watermark()));
    assert_eq!(feed.watermark(), 43);
    feed.apply(log.rolls_json(feed.watermark()));
    assert_eq!(feed.watermark(), 53);

    let expected: Vec<i64> = (34..=53).rev().collect();
    assert_eq!(seq_ids(feed.records()), expected);
}
