use serde::{Deserialize, Serialize};

use crate::slug;

/// A parsed dice-roll request.  Roll `count` dice with `sides` sides, add
/// `modifier`, and succeed if the total is at or above `success` — or at or
/// below its absolute value when `success` is negative.  `text` is the
/// request exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RollDef {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
    pub success: i32,
    pub text: String,
}

/// The outcome of executing a roll.  `succeeded` is 1 when the roll met its
/// threshold, -1 when it didn't, and 0 when no threshold was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RollResult {
    pub rolls: Vec<u32>,
    pub total: i32,
    pub succeeded: i32,
}

/// One logged roll event: request + result plus who rolled and when.
///
/// `seq_id` is assigned by the daemon, strictly increasing and unique.  It is
/// both the record's identity and the sort/merge key; the feed uses it as the
/// `since` cursor for incremental polling.  Field names on the wire are
/// PascalCase (`SeqID` exactly) to stay compatible with the original JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RollRecord {
    pub request: RollDef,
    pub result: RollResult,
    pub user: String,
    pub time: String,
    #[serde(rename = "SeqID")]
    pub seq_id: i64,
    #[serde(default)]
    pub permalink: bool,
}

impl RollRecord {
    /// Short shareable token for this record, used in permalink URLs.
    pub fn slug(&self) -> String {
        slug::id_to_slug(self.seq_id)
    }
}
