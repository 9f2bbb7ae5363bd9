//! CSV results store behavior.

mod common;

use common::TestStore;

use trustcourse::error::TaskError;
use trustcourse::results::{CsvSink, ResultSink, SessionRecord};

fn record(participant: &str, choices: Vec<u8>) -> SessionRecord {
    SessionRecord {
        participant: participant.to_owned(),
        choices,
    }
}

#[test]
fn first_append_writes_header_then_row() {
    let store = TestStore::new();
    let mut sink = store.sink();

    sink.append(&record("P001", vec![0, 1, 2]))
        .expect("append should succeed");

    assert_eq!(
        store.contents(),
        "participant_number,obstacle 1,obstacle 2,obstacle 3\nP001,0,1,2\n"
    );
}

#[test]
fn later_appends_skip_the_header() {
    let store = TestStore::new();
    let mut sink = store.sink();

    sink.append(&record("P001", vec![5, 5])).expect("first");
    sink.append(&record("P002", vec![0, 0])).expect("second");

    let contents = store.contents();
    assert_eq!(
        contents,
        "participant_number,obstacle 1,obstacle 2\nP001,5,5\nP002,0,0\n"
    );
}

#[test]
fn existing_store_from_an_earlier_run_is_not_rewritten() {
    let store = TestStore::new();
    std::fs::write(
        store.path(),
        "participant_number,obstacle 1\nP000,4\n",
    )
    .expect("seed store");

    let mut sink = store.sink();
    sink.append(&record("P001", vec![2])).expect("append");

    assert_eq!(
        store.contents(),
        "participant_number,obstacle 1\nP000,4\nP001,2\n"
    );
}

#[test]
fn awkward_participant_ids_are_csv_quoted() {
    let store = TestStore::new();
    let mut sink = store.sink();

    sink.append(&record("pilot, \"morning\"", vec![3]))
        .expect("append");

    let contents = store.contents();
    let row = contents.lines().nth(1).expect("record row");
    assert_eq!(row, "\"pilot, \"\"morning\"\"\",3");
}

#[test]
fn unwritable_store_reports_store_unwritable() {
    let store = TestStore::new();
    // A directory at the store path makes every open fail.
    let path = store.path();
    std::fs::create_dir(&path).expect("create blocking dir");

    let mut sink = CsvSink::new(&path);
    let err = sink
        .append(&record("P001", vec![1]))
        .expect_err("append must fail");

    match err {
        TaskError::StoreUnwritable { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected StoreUnwritable, got: {other}"),
    }
}
