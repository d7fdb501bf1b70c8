//! The live roll feed — a bounded, sorted client-side view of the roll log.
//!
//! The daemon's log is append-only with strictly increasing `SeqID`s.  A
//! client keeps a `RollFeed` and repeatedly fetches records newer than its
//! watermark; each successful batch is merged into the view and the
//! watermark advances to the highest `SeqID` displayed, so the next poll
//! only asks for strictly newer records.

use crate::records::RollRecord;

/// How many records the view holds at most.
pub const RECORDS_PER_PAGE: usize = 20;

/// Watermark sentinel meaning "no records seen yet" (`SeqID`s start at 1).
pub const WATERMARK_NONE: i64 = 0;

/// Client-side view state: the visible records plus the poll cursor.
/// Owned by a single controller; all mutation goes through [`apply`].
///
/// [`apply`]: RollFeed::apply
#[derive(Debug, Clone)]
pub struct RollFeed {
    records: Vec<RollRecord>,
    watermark: i64,
    page_size: usize,
}

impl Default for RollFeed {
    fn default() -> Self {
        Self::new(RECORDS_PER_PAGE)
    }
}

impl RollFeed {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            watermark: WATERMARK_NONE,
            page_size,
        }
    }

    /// Visible records, sorted descending by `SeqID`.
    pub fn records(&self) -> &[RollRecord] {
        &self.records
    }

    /// Highest `SeqID` ever displayed; [`WATERMARK_NONE`] before the first
    /// non-empty merge.
    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incorporate a freshly fetched batch: merge into the bounded view and
    /// advance the watermark from the post-merge visible list.  An empty
    /// batch is "no update" and the cycle is skipped entirely.
    pub fn apply(&mut self, incoming: Vec<RollRecord>) {
        if incoming.is_empty() {
            return;
        }
        self.records = merge(&self.records, incoming, self.page_size);
        self.advance_watermark();
    }

    /// Set the watermark to the maximum `SeqID` in the visible list.  The
    /// list is the post-merge view, never just the incoming batch, so the
    /// watermark reflects the highest `SeqID` ever displayed.  An empty
    /// view leaves the watermark untouched.
    fn advance_watermark(&mut self) {
        if let Some(max) = self.records.iter().map(|r| r.seq_id).max() {
            self.watermark = max;
        }
    }
}

/// Merge a fetched batch into an existing view: incoming records first, then
/// the existing ones, stable-sorted descending by `SeqID` and truncated to
/// `page_size` (lowest `SeqID`s are the overflow).  Inputs are not mutated.
///
/// No deduplication: the server never re-sends a `SeqID` at or below the
/// `since` cursor, so within one client duplicates cannot arise.  If a
/// server ever did re-send one, the duplicate would be displayed until
/// truncation evicts it — see `duplicate_seq_ids_pass_through` below.
pub fn merge(
    existing: &[RollRecord],
    incoming: Vec<RollRecord>,
    page_size: usize,
) -> Vec<RollRecord> {
    let mut merged = incoming;
    merged.extend(existing.iter().cloned());
    merged.sort_by(|a, b| b.seq_id.cmp(&a.seq_id));
    merged.truncate(page_size);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seq_id: i64) -> RollRecord {
        RollRecord {
            seq_id,
            user: "anon".to_string(),
            ..RollRecord::default()
        }
    }

    fn records(ids: impl IntoIterator<Item = i64>) -> Vec<RollRecord> {
        ids.into_iter().map(record).collect()
    }

    fn seq_ids(feed: &[RollRecord]) -> Vec<i64> {
        feed.iter().map(|r| r.seq_id).collect()
    }

    #[test]
    fn test_merge_never_exceeds_page_size() {
        let merged = merge(&records(1..=15), records(16..=40), RECORDS_PER_PAGE);
        assert_eq!(merged.len(), RECORDS_PER_PAGE);
    }

    #[test]
    fn test_merge_sorts_descending() {
        let merged = merge(&records([3, 1]), records([2, 5, 4]), RECORDS_PER_PAGE);
        assert_eq!(seq_ids(&merged), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_merge_discards_lowest_overflow() {
        let merged = merge(&records(1..=20), records([21, 22]), RECORDS_PER_PAGE);
        assert_eq!(merged.first().unwrap().seq_id, 22);
        assert_eq!(merged.last().unwrap().seq_id, 3);
    }

    #[test]
    fn test_merge_with_empty_batch_is_identity() {
        let view = merge(&[], records([4, 9, 2]), RECORDS_PER_PAGE);
        let merged = merge(&view, Vec::new(), RECORDS_PER_PAGE);
        assert_eq!(merged, view);
    }

    #[test]
    fn test_merge_does_not_mutate_existing() {
        let existing = records([2, 1]);
        let _ = merge(&existing, records([3]), RECORDS_PER_PAGE);
        assert_eq!(seq_ids(&existing), vec![2, 1]);
    }

    #[test]
    fn duplicate_seq_ids_pass_through() {
        // Known gap, kept on purpose: merge does not deduplicate, so a
        // re-sent SeqID shows up twice until truncation evicts it.  The
        // stable sort keeps the incoming copy ahead of the existing one.
        let merged = merge(&records([5, 4]), records([5]), RECORDS_PER_PAGE);
        assert_eq!(seq_ids(&merged), vec![5, 5, 4]);
    }

    #[test]
    fn test_watermark_starts_at_sentinel() {
        let feed = RollFeed::default();
        assert_eq!(feed.watermark(), WATERMARK_NONE);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_empty_batch_leaves_watermark_unchanged() {
        let mut feed = RollFeed::default();
        feed.apply(records([8, 9]));
        assert_eq!(feed.watermark(), 9);

        feed.apply(Vec::new());
        assert_eq!(feed.watermark(), 9);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_watermark_tracks_visible_maximum() {
        let mut feed = RollFeed::default();
        feed.apply(records([3, 1, 2]));
        assert_eq!(feed.watermark(), 3);

        // Older records arriving late never move the watermark backwards.
        feed.apply(records([1]));
        assert_eq!(feed.watermark(), 3);
    }

    #[test]
    fn test_small_page_size_is_honored() {
        let mut feed = RollFeed::new(3);
        feed.apply(records(1..=10));
        assert_eq!(seq_ids(feed.records()), vec![10, 9, 8]);
        assert_eq!(feed.watermark(), 10);
    }
}
