//! JSONL trail envelope.
//!
//! Each persisted history record is wrapped in a `TrailEntry` and appended to
//! a per-type `.jsonl` file. The `v` field supports schema versioning: old
//! trail lines without a `v` field deserialize with `v == 1`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::HistoryRecord;

/// Current trail schema version.
pub const TRAIL_VERSION: u32 = 1;

/// Default trail version for backward compatibility with old JSONL files.
const fn default_trail_version() -> u32 {
    1
}

/// A single history record as stored in the trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailEntry {
    /// Schema version. Defaults to 1 for old trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// When the record was persisted.
    pub ts: DateTime<Utc>,

    pub record: HistoryRecord,
}

impl TrailEntry {
    #[must_use]
    pub fn new(record: HistoryRecord) -> Self {
        Self {
            v: TRAIL_VERSION,
            ts: Utc::now(),
            record,
        }
    }
}
