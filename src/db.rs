//! Database construction, pruning, freezing, and persistence.
//!
//! A [`Database`] is built once from a parsed hierarchical topic
//! definition, pruned of redundant ranges, then frozen behind a
//! [`RangeSet`]. After that it is logically immutable: queries touch no
//! mutable state, so a database can be shared across any number of reader
//! threads without locking. A data refresh builds a new `Database` and
//! swaps the handle (e.g. an `Arc`), never mutates a live one.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::range::{CallNumberRange, RangeRecord, TopicPath};
use crate::rangeset::RangeSet;

/// One node of the parsed topic definition: subject → topic → sub-topic.
///
/// This is the crate's boundary with the external XML collaborator: the
/// document has already been parsed, and each node carries its name, zero
/// or more (start, end) call-number pairs, and its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicEntry {
    /// Label for this level of the hierarchy.
    pub name: String,
    /// Raw (start, end) call-number pairs classified directly under this node.
    pub call_numbers: Vec<(String, String)>,
    /// Child nodes of the next level down.
    pub children: Vec<TopicEntry>,
}

impl TopicEntry {
    /// Create a node with no ranges or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), call_numbers: Vec::new(), children: Vec::new() }
    }

    /// Attach a (start, end) call-number pair.
    pub fn with_range(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.call_numbers.push((begin.into(), end.into()));
        self
    }

    /// Attach a child node.
    pub fn with_child(mut self, child: TopicEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// Counts reported by a build, the structured complement to the `tracing`
/// warnings emitted along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Valid ranges that made it into the index.
    pub built: usize,
    /// Ranges dropped because an endpoint failed to encode or the
    /// endpoints were out of order.
    pub dropped_invalid: usize,
    /// Ranges whose endpoints start with different letters (kept, warned).
    pub letter_crossings: usize,
    /// Ranges removed as redundant during pruning.
    pub pruned_redundant: usize,
}

/// Errors loading or saving the persisted range records.
///
/// Fatal to the whole operation: a malformed stream never yields a
/// partially populated database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying reader or writer failed.
    #[error("failed to read or write range records: {0}")]
    Io(#[from] std::io::Error),
    /// The stream does not hold the expected array of range records.
    #[error("persisted range records do not match the expected shape: {0}")]
    Format(#[from] serde_json::Error),
}

/// The frozen classification index: every surviving range plus the
/// augmented tree built over them.
#[derive(Debug)]
pub struct Database {
    ranges: Vec<CallNumberRange>,
    set: RangeSet,
    stats: BuildStats,
}

impl Database {
    /// Build, prune, and freeze a database from a parsed topic definition.
    ///
    /// Each subject is a root; topic paths accumulate the names from the
    /// subject down to the node owning the call-number pair. Invalid
    /// ranges are dropped with a warning and counted — a bad record never
    /// aborts the build.
    pub fn build(subjects: &[TopicEntry]) -> Self {
        let mut ranges = Vec::new();
        let mut stats = BuildStats::default();
        for subject in subjects {
            collect_ranges(subject, &[], &mut ranges, &mut stats);
        }
        debug!(built = stats.built, dropped = stats.dropped_invalid, "collected ranges");

        stats.pruned_redundant = prune(&mut ranges);
        info!(
            ranges = ranges.len(),
            pruned = stats.pruned_redundant,
            dropped = stats.dropped_invalid,
            letter_crossings = stats.letter_crossings,
            "database frozen"
        );
        Self::freeze(ranges, stats)
    }

    /// Freeze an already-validated range collection without pruning.
    pub fn from_ranges(ranges: Vec<CallNumberRange>) -> Self {
        let mut stats = BuildStats::default();
        let ranges: Vec<CallNumberRange> = ranges
            .into_iter()
            .filter(|r| {
                if r.is_valid() {
                    true
                } else {
                    warn!(range = %r, "dropping invalid range");
                    stats.dropped_invalid += 1;
                    false
                }
            })
            .collect();
        stats.built = ranges.len();
        Self::freeze(ranges, stats)
    }

    fn freeze(ranges: Vec<CallNumberRange>, stats: BuildStats) -> Self {
        let set = RangeSet::from_ranges(ranges.iter().cloned());
        Self { ranges, set, stats }
    }

    /// Topic paths for a raw call number, sorted for determinism.
    ///
    /// An unparseable or unclassified call number yields an empty vec.
    pub fn topics(&self, raw_call_number: &str) -> Vec<TopicPath> {
        let mut topics = self.set.topics_for(raw_call_number);
        topics.sort();
        topics
    }

    /// All surviving ranges, in build order.
    pub fn all_ranges(&self) -> &[CallNumberRange] {
        &self.ranges
    }

    /// Counts gathered while building.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Number of indexed ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the database indexes no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Serialize the surviving ranges as an array of persisted records.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let records: Vec<RangeRecord> = self.ranges.iter().map(RangeRecord::from).collect();
        serde_json::to_writer(writer, &records)?;
        Ok(())
    }

    /// Load a database from an array of persisted records.
    ///
    /// The records carry their keys, so no call number is re-parsed. Any
    /// shape mismatch fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let records: Vec<RangeRecord> = serde_json::from_reader(reader)?;
        let ranges: Vec<CallNumberRange> = records.into_iter().map(Into::into).collect();
        Ok(Self::from_ranges(ranges))
    }
}

/// Pure recursive descent over the topic hierarchy.
///
/// The accumulated path is copy-on-extend: each level clones the parent
/// path and appends its own name, so no shared array is ever mutated.
fn collect_ranges(
    entry: &TopicEntry,
    parent_path: &[String],
    out: &mut Vec<CallNumberRange>,
    stats: &mut BuildStats,
) {
    let mut path = parent_path.to_vec();
    path.push(entry.name.clone());

    for (begin, end) in &entry.call_numbers {
        let range = CallNumberRange::new(begin.clone(), end.clone(), path.clone());
        if !range.is_valid() {
            warn!(range = %range, topic = ?path, "dropping unparseable call-number range");
            stats.dropped_invalid += 1;
            continue;
        }
        if range.crosses_letter_boundary() {
            warn!(range = %range, topic = ?path, "range crosses a first-letter boundary");
            stats.letter_crossings += 1;
        }
        stats.built += 1;
        out.push(range);
    }

    for child in &entry.children {
        collect_ranges(child, &path, out, stats);
    }
}

/// Remove ranges made redundant by a surrounding range with the identical
/// topic path. Returns how many were removed.
///
/// Redundancy marks live in a phase-local side table, never on the ranges
/// themselves. Within a topic group sorted by `(begin, end)`, a surrounding
/// range always sorts no later than the range it surrounds, so each range
/// only needs comparing against earlier group members. Idempotent.
fn prune(ranges: &mut Vec<CallNumberRange>) -> usize {
    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by(|&a, &b| {
        ranges[a]
            .topic_path()
            .cmp(ranges[b].topic_path())
            .then_with(|| ranges[a].cmp(&ranges[b]))
    });

    let mut redundant = vec![false; ranges.len()];
    let mut group_start = 0;
    while group_start < order.len() {
        let path = ranges[order[group_start]].topic_path();
        let mut group_stop = group_start + 1;
        while group_stop < order.len() && ranges[order[group_stop]].topic_path() == path {
            group_stop += 1;
        }
        let group = &order[group_start..group_stop];
        for (pos, &inner) in group.iter().enumerate() {
            for &outer in &group[..pos] {
                if ranges[outer].surrounds(&ranges[inner]) {
                    redundant[inner] = true;
                    break;
                }
            }
        }
        group_start = group_stop;
    }

    let before = ranges.len();
    let mut idx = 0;
    ranges.retain(|_| {
        let keep = !redundant[idx];
        idx += 1;
        keep
    });
    before - ranges.len()
}
