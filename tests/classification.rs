use std::sync::Arc;
use std::thread;

use anyhow::Result;
use test_case::test_case;

use hlbrowse::{Database, TopicEntry, TopicPath};

fn topic(parts: &[&str]) -> TopicPath {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Route build warnings through the test writer; `RUST_LOG=warn` shows
/// dropped ranges when a scenario misbehaves.
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The scenario database from the design notes: a wide mathematics range,
/// a nested computing range with a fractional upper boundary, and an
/// overlapping pair of linguistics ranges that prune down to one.
fn database() -> Database {
    let subjects = vec![
        TopicEntry::new("Science")
            .with_child(TopicEntry::new("Mathematics").with_range("QA1", "QA100"))
            .with_child(TopicEntry::new("Computing").with_range("QA76", "QA76.9")),
        TopicEntry::new("Humanities").with_child(
            TopicEntry::new("Linguistics")
                .with_range("P1", "P999")
                .with_range("P11", "P50"),
        ),
    ];
    Database::build(&subjects)
}

#[test_case("QA1", &[&["Science", "Mathematics"]]; "lower boundary of a range")]
#[test_case("QA150", &[]; "between ranges")]
#[test_case("P11", &[&["Humanities", "Linguistics"]]; "pruned overlap yields a single match")]
#[test_case("P 999", &[&["Humanities", "Linguistics"]]; "inclusive upper boundary")]
#[test_case("###", &[]; "unparseable input is empty, not an error")]
#[test_case("", &[]; "empty input")]
#[test_case("QA76.9", &[&["Science", "Computing"], &["Science", "Mathematics"]]; "fractional upper boundary matches")]
#[test_case("QA76.95", &[&["Science", "Computing"], &["Science", "Mathematics"]]; "refinement of the upper boundary still matches")]
#[test_case("QA77", &[&["Science", "Mathematics"]]; "just past the fractional boundary")]
#[test_case("qa 76.5 .B3 1988", &[&["Science", "Computing"], &["Science", "Mathematics"]]; "messy real-world spelling")]
#[test_case("ZZ1000", &[]; "letters with no coverage")]
fn classifies(raw: &str, expected: &[&[&str]]) {
    let expected: Vec<TopicPath> = expected.iter().map(|path| topic(path)).collect();
    assert_eq!(database().topics(raw), expected);
}

#[test]
fn pruning_removes_only_the_surrounded_duplicate() {
    init_logging();
    let db = database();
    // P11-P50 is surrounded by P1-P999 under the same topic; everything
    // else survives.
    assert_eq!(db.len(), 3);
    assert_eq!(db.stats().pruned_redundant, 1);
    assert_eq!(db.stats().dropped_invalid, 0);
}

#[test]
fn save_and_load_round_trip() -> Result<()> {
    init_logging();
    let db = database();
    let mut buf = Vec::new();
    db.to_writer(&mut buf)?;

    let loaded = Database::from_reader(buf.as_slice())?;
    assert_eq!(loaded.all_ranges(), db.all_ranges());
    for probe in ["QA1", "QA76.9", "P11", "QA150", "###"] {
        assert_eq!(loaded.topics(probe), db.topics(probe), "mismatch for {probe}");
    }

    // Serializing the loaded database again produces identical bytes.
    let mut again = Vec::new();
    loaded.to_writer(&mut again)?;
    assert_eq!(buf, again);
    Ok(())
}

#[test]
fn concurrent_readers_see_consistent_results() {
    let db = Arc::new(database());
    let expected = db.topics("QA76.5");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = Arc::clone(&db);
            let expected = expected.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    assert_eq!(db.topics("QA76.5"), expected);
                    assert!(db.topics("QA150").is_empty());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("reader thread panicked");
    }
}

#[test]
fn refresh_swaps_a_new_database_atomically() {
    // The refresh model: build a new database and replace the handle.
    let old = Arc::new(database());
    let new_subjects =
        vec![TopicEntry::new("Science").with_child(
            TopicEntry::new("Physics").with_range("QC1", "QC999"),
        )];
    let new = Arc::new(Database::build(&new_subjects));

    assert!(!old.topics("QA1").is_empty());
    assert!(old.topics("QC100").is_empty());
    assert!(new.topics("QA1").is_empty());
    assert_eq!(new.topics("QC100"), vec![topic(&["Science", "Physics"])]);
}
