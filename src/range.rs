//! Call-number range value type.
//!
//! A [`CallNumberRange`] pairs two encoded endpoints with the topic path
//! they classify into. Construction never fails: endpoints that do not
//! parse leave the range carrying its raw strings with `valid` cleared, so
//! the build pipeline can report the bad record before discarding it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::callnum::{CallNumber, EncodedKey};

/// An ordered sequence of subject labels, most general first,
/// e.g. `["Science", "Mathematics"]`.
pub type TopicPath = Vec<String>;

/// An inclusive range of call numbers mapped to one topic path.
///
/// `begin` is the floor key of the start endpoint and `end` the ceiling key
/// of the stop endpoint, so the range covers every call number that shelves
/// within the endpoints' buckets (`QA276` as an endpoint covers `QA276.5`).
///
/// Equality and hashing consider `(begin, end, topic_path)` only; the raw
/// endpoint strings are diagnostic payload. Once indexed, a range is never
/// mutated.
#[derive(Debug, Clone)]
pub struct CallNumberRange {
    begin: EncodedKey,
    end: EncodedKey,
    begin_raw: String,
    end_raw: String,
    topic_path: TopicPath,
    valid: bool,
}

impl CallNumberRange {
    /// Build a range from raw endpoint strings.
    ///
    /// Both endpoints are encoded independently. If either fails to parse,
    /// or the endpoints are out of order, the range is produced anyway with
    /// `valid` cleared so callers can log it before dropping it.
    pub fn new(
        begin_raw: impl Into<String>,
        end_raw: impl Into<String>,
        topic_path: TopicPath,
    ) -> Self {
        let begin_raw = begin_raw.into();
        let end_raw = end_raw.into();
        let begin_key = CallNumber::parse(&begin_raw).map(|cn| cn.floor_key());
        let end_key = CallNumber::parse(&end_raw).map(|cn| cn.ceiling_key());
        let (begin, end, valid) = match (begin_key, end_key) {
            (Ok(begin), Ok(end)) => (begin, end, begin <= end),
            (begin, end) => (
                begin.unwrap_or(EncodedKey::MIN),
                end.unwrap_or(EncodedKey::MIN),
                false,
            ),
        };
        Self { begin, end, begin_raw, end_raw, topic_path, valid }
    }

    /// Encoded lower endpoint (inclusive).
    pub fn begin(&self) -> EncodedKey {
        self.begin
    }

    /// Encoded upper endpoint (inclusive bucket supremum).
    pub fn end(&self) -> EncodedKey {
        self.end
    }

    /// The start endpoint as originally written.
    pub fn begin_raw(&self) -> &str {
        &self.begin_raw
    }

    /// The stop endpoint as originally written.
    pub fn end_raw(&self) -> &str {
        &self.end_raw
    }

    /// The topic path this range classifies into.
    pub fn topic_path(&self) -> &TopicPath {
        &self.topic_path
    }

    /// Whether both endpoints encoded successfully and are in order.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the encoded key falls inside this range.
    pub fn contains(&self, key: EncodedKey) -> bool {
        self.begin <= key && key <= self.end
    }

    /// Whether this range fully encloses `other`. Used during pruning: an
    /// enclosed range with the same topic path adds no classification.
    pub fn surrounds(&self, other: &CallNumberRange) -> bool {
        self.begin <= other.begin && self.end >= other.end
    }

    /// First letter of the start endpoint, uppercased.
    pub fn first_letter(&self) -> Option<char> {
        first_alphabetic(&self.begin_raw)
    }

    /// Whether the two endpoints start with different letters.
    ///
    /// The source data never produces such ranges on purpose; when one
    /// shows up it is a data-quality problem worth a warning, not an error.
    pub fn crosses_letter_boundary(&self) -> bool {
        match (first_alphabetic(&self.begin_raw), first_alphabetic(&self.end_raw)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}

fn first_alphabetic(raw: &str) -> Option<char> {
    raw.chars().find(|c| c.is_ascii_alphabetic()).map(|c| c.to_ascii_uppercase())
}

impl PartialEq for CallNumberRange {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin && self.end == other.end && self.topic_path == other.topic_path
    }
}

impl Eq for CallNumberRange {}

impl Hash for CallNumberRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.begin.hash(state);
        self.end.hash(state);
        self.topic_path.hash(state);
    }
}

impl PartialOrd for CallNumberRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallNumberRange {
    /// Orders by `(begin, end)`; the topic path is a final tiebreaker only
    /// so that the ordering stays consistent with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.begin
            .cmp(&other.begin)
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.topic_path.cmp(&other.topic_path))
    }
}

impl fmt::Display for CallNumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.begin_raw, self.end_raw)
    }
}

/// The persisted form of a range: exactly the tuple that survives a
/// save/load round trip. Keys are stored alongside the raw strings so a
/// load never re-parses call numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRecord {
    /// Start endpoint as originally written.
    pub begin_raw: String,
    /// Stop endpoint as originally written.
    pub end_raw: String,
    /// Encoded lower endpoint.
    pub begin: EncodedKey,
    /// Encoded upper endpoint.
    pub end: EncodedKey,
    /// Topic path the range classifies into.
    pub topic_path: TopicPath,
}

impl From<&CallNumberRange> for RangeRecord {
    fn from(range: &CallNumberRange) -> Self {
        Self {
            begin_raw: range.begin_raw.clone(),
            end_raw: range.end_raw.clone(),
            begin: range.begin,
            end: range.end,
            topic_path: range.topic_path.clone(),
        }
    }
}

impl From<RangeRecord> for CallNumberRange {
    fn from(record: RangeRecord) -> Self {
        let valid = record.begin <= record.end;
        Self {
            begin: record.begin,
            end: record.end,
            begin_raw: record.begin_raw,
            end_raw: record.end_raw,
            topic_path: record.topic_path,
            valid,
        }
    }
}
