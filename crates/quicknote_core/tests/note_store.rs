use quicknote_core::{AddError, DecodeWarningKind, NoteListing, NoteStore, StoreError};
use std::fs;

fn texts(store: &NoteStore) -> Vec<String> {
    store.notes().iter().map(|note| note.text().to_string()).collect()
}

fn store_with(items: &[&str]) -> NoteStore {
    let mut store = NoteStore::new();
    for item in items {
        store.add(item).unwrap();
    }
    store
}

#[test]
fn add_save_clear_load_lists_notes_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    let mut store = store_with(&["Buy milk", "Call Alice"]);
    let stamps: Vec<_> = store.notes().iter().map(|note| note.created_at()).collect();
    assert_eq!(store.save(&path).unwrap(), 2);

    store.clear();
    assert!(store.is_empty());

    let report = store.load(&path).unwrap();
    assert_eq!(report.loaded, 2);
    assert!(report.warnings.is_empty());
    assert!(!report.source_missing);

    let NoteListing::Entries(entries) = store.list() else {
        panic!("expected entries after load");
    };
    let rendered: Vec<String> = entries
        .map(|(position, note)| format!("{position}. {note}"))
        .collect();
    assert_eq!(
        rendered,
        vec![
            format!("1. Buy milk | {}", stamps[0].format("%Y-%m-%d %H:%M:%S")),
            format!("2. Call Alice | {}", stamps[1].format("%Y-%m-%d %H:%M:%S")),
        ]
    );
}

#[test]
fn blank_text_does_not_change_size() {
    let mut store = NoteStore::new();
    assert_eq!(store.add("").unwrap_err(), AddError::EmptyText);
    assert_eq!(store.add("   ").unwrap_err(), AddError::EmptyText);
    assert_eq!(store.add("\t\n").unwrap_err(), AddError::EmptyText);
    assert_eq!(store.len(), 0);
}

#[test]
fn delete_at_shifts_later_positions_down() {
    let mut store = store_with(&["a", "b", "c", "d"]);

    let removed = store.delete_at(2).unwrap();
    assert_eq!(removed.text(), "b");
    assert_eq!(texts(&store), vec!["a", "c", "d"]);

    store.delete_at(3).unwrap();
    assert_eq!(texts(&store), vec!["a", "c"]);

    store.delete_at(1).unwrap();
    assert_eq!(texts(&store), vec!["c"]);
}

#[test]
fn delete_out_of_range_leaves_store_unchanged() {
    let mut store = store_with(&["a", "b", "c"]);

    for position in [0, 4, usize::MAX] {
        let err = store.delete_at(position).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPosition { len: 3, .. }));
    }
    assert_eq!(texts(&store), vec!["a", "b", "c"]);

    let mut empty = NoteStore::new();
    assert!(empty.delete_at(1).is_err());
}

#[test]
fn load_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::new();

    let report = store.load(dir.path().join("absent.txt")).unwrap();
    assert!(report.source_missing);
    assert_eq!(report.loaded, 0);
    assert!(store.is_empty());
}

#[test]
fn load_replaces_instead_of_appending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    store_with(&["one", "two"]).save(&path).unwrap();

    let mut store = store_with(&["unsaved"]);
    store.load(&path).unwrap();
    store.load(&path).unwrap();
    assert_eq!(texts(&store), vec!["one", "two"]);

    let mut other = NoteStore::new();
    other.load(&path).unwrap();
    assert_eq!(store.notes(), other.notes());
}

#[test]
fn load_skips_corrupted_lines_and_reports_them() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(
        &path,
        "kept | 2024-02-02 02:02:02\nbroken line\nalso kept | 2024-02-03 03:03:03\n",
    )
    .unwrap();

    let mut store = NoteStore::new();
    let report = store.load(&path).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].line_number, 2);
    assert_eq!(texts(&store), vec!["kept", "also kept"]);
}

#[test]
fn save_truncates_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    store_with(&["one", "two", "three"]).save(&path).unwrap();
    store_with(&["only"]).save(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("only | "));
}

#[test]
fn save_into_missing_directory_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("notes.txt");

    let err = store_with(&["x"]).save(&path).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().contains("notes.txt"));
}

#[test]
fn load_of_directory_reports_io_error_and_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_with(&["kept"]);

    let err = store.load(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(texts(&store), vec!["kept"]);
}

#[test]
fn load_keeps_valid_lines_around_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let mut contents = b"good | 2024-01-01 00:00:00\n".to_vec();
    contents.extend_from_slice(b"bad \xff\xfe | 2024-01-01 00:00:01\n");
    contents.extend_from_slice(b"also good | 2024-01-01 00:00:02\n");
    fs::write(&path, contents).unwrap();

    let mut store = NoteStore::new();
    let report = store.load(&path).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].line_number, 2);
    assert_eq!(report.warnings[0].kind, DecodeWarningKind::InvalidEncoding);
    assert_eq!(texts(&store), vec!["good", "also good"]);
}

#[test]
fn load_rejects_leap_second_instead_of_rewriting_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(
        &path,
        "leap | 2024-01-01 23:59:60\nkept | 2024-01-01 23:59:59\n",
    )
    .unwrap();

    let mut store = NoteStore::new();
    let report = store.load(&path).unwrap();
    assert_eq!(texts(&store), vec!["kept"]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, DecodeWarningKind::UnparsableTimestamp);

    store.save(&path).unwrap();
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(!rewritten.contains("leap"));
    assert!(rewritten.starts_with("kept | 2024-01-01 23:59:59"));
}
