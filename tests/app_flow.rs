//! Application-level flows: file I/O, overlays, and embedded editing

use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jive::app::App;
use tempfile::tempdir;

fn k(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn feed(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(k(c));
    }
}

fn enter(app: &mut App) {
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
}

#[test]
fn test_save_writes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    let mut app = App::new("{\"a\": 1}", Some(path.clone()), false, false);

    feed(&mut app, ":w");
    enter(&mut app);

    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\": 1}");
    assert!(app.notification().unwrap().starts_with("Saved:"));
    assert!(!app.should_quit());
}

#[test]
fn test_save_without_path_reports() {
    let mut app = App::new("{}", None, false, false);
    feed(&mut app, ":w");
    enter(&mut app);
    assert_eq!(app.notification(), Some("No file name, use :w <file>"));
}

#[test]
fn test_save_as_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deep/out.json");
    let mut app = App::new("{}", None, false, false);

    feed(&mut app, &format!(":w {}", path.display()));
    enter(&mut app);

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_write_quit_sets_should_quit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    let mut app = App::new("{}", Some(path), false, false);
    feed(&mut app, ":wq");
    enter(&mut app);
    assert!(app.should_quit());
}

#[test]
fn test_quit_command() {
    let mut app = App::new("{}", None, false, false);
    feed(&mut app, ":q");
    enter(&mut app);
    assert!(app.should_quit());
}

#[test]
fn test_open_file_replaces_buffer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, "{\"loaded\": true}").unwrap();

    let mut app = App::new("{}", None, false, false);
    feed(&mut app, &format!(":e {}", path.display()));
    enter(&mut app);

    assert_eq!(app.editor().content(), "{\"loaded\": true}");
    assert!(app.notification().unwrap().starts_with("Opened:"));
}

#[test]
fn test_open_jsonl_expands_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.jsonl");
    fs::write(&path, "{\"a\":1}\n{\"b\":2}").unwrap();

    let mut app = App::new("{}", None, false, false);
    feed(&mut app, &format!(":e {}", path.display()));
    enter(&mut app);

    assert!(app.editor().jsonl);
    assert_eq!(app.editor().lines[0], "{");
    assert!(app.editor().lines.iter().any(String::is_empty));
}

#[test]
fn test_open_missing_file_reports() {
    let mut app = App::new("{}", None, false, false);
    feed(&mut app, ":e /no/such/file.json");
    enter(&mut app);
    assert!(app.notification().unwrap().starts_with("File not found:"));
    assert_eq!(app.editor().content(), "{}");
}

#[test]
fn test_help_toggles_and_closes() {
    let mut app = App::new("{}", None, false, false);
    feed(&mut app, ":help");
    enter(&mut app);
    assert!(app.help_visible());

    // With help focused, :q closes the overlay, not the app.
    feed(&mut app, ":q");
    enter(&mut app);
    assert!(!app.help_visible());
    assert!(!app.should_quit());
}

#[test]
fn test_embedded_edit_round_trip() {
    let mut app = App::new("{\n    \"p\": \"{\\\"a\\\": 1}\"\n}", None, false, false);

    feed(&mut app, "j$ej");
    assert_eq!(app.embedded_depth(), 1);
    assert_eq!(app.embedded_editor().content(), "{\n    \"a\": 1\n}");

    // Save the sub-document unchanged: it is minified and spliced back.
    feed(&mut app, ":wq");
    enter(&mut app);
    assert_eq!(app.embedded_depth(), 0);
    assert_eq!(app.notification(), Some("Embedded JSON updated"));
    assert_eq!(app.editor().lines[1], "    \"p\": \"{\\\"a\\\":1}\"");
}

#[test]
fn test_embedded_edit_applies_changes() {
    let mut app = App::new("{\n    \"p\": \"[1, 2]\"\n}", None, false, false);
    feed(&mut app, "j$ej");
    assert_eq!(app.embedded_depth(), 1);

    // Change 2 to 9 inside the sub-document.
    feed(&mut app, "jj$r9");
    feed(&mut app, ":wq");
    enter(&mut app);

    assert_eq!(app.embedded_depth(), 0);
    assert_eq!(app.editor().lines[1], "    \"p\": \"[1,9]\"");
}

#[test]
fn test_embedded_quit_discards_changes() {
    let mut app = App::new("{\n    \"p\": \"[1, 2]\"\n}", None, false, false);
    let before = app.editor().content();
    feed(&mut app, "j$ej");
    feed(&mut app, "dd");
    feed(&mut app, ":q");
    enter(&mut app);
    assert_eq!(app.embedded_depth(), 0);
    assert_eq!(app.editor().content(), before);
}

#[test]
fn test_embedded_invalid_json_stays_open() {
    let mut app = App::new("{\n    \"p\": \"[1, 2]\"\n}", None, false, false);
    feed(&mut app, "j$ej");

    // Break the sub-document, then force-save past validation.
    feed(&mut app, "dd");
    feed(&mut app, "dd");
    feed(&mut app, "dd");
    feed(&mut app, ":w!");
    enter(&mut app);

    assert_eq!(app.embedded_depth(), 1);
    assert_eq!(app.notification(), Some("Invalid JSON"));
}

#[test]
fn test_nested_embedded_edit() {
    // The outer string holds an object whose "q" value is itself an
    // embedded JSON string.
    let content = concat!(
        "{\n",
        "    \"p\": \"{\\\"q\\\": \\\"{\\\\\\\"x\\\\\\\": [1]}\\\"}\"\n",
        "}"
    );
    let mut app = App::new(content, None, false, false);

    feed(&mut app, "j$ej");
    assert_eq!(app.embedded_depth(), 1);
    // Level one shows the object with the doubly escaped string intact.
    assert!(app.embedded_editor().content().contains("\"q\""));

    feed(&mut app, "j$ej");
    assert_eq!(app.embedded_depth(), 2);
    assert_eq!(app.embedded_editor().content(), "{\n    \"x\": [\n        1\n    ]\n}");

    // Saving the inner level patches level one and stays there.
    feed(&mut app, ":wq");
    enter(&mut app);
    assert_eq!(app.embedded_depth(), 1);
    assert!(app.embedded_editor().content().contains("{\\\"x\\\":[1]}"));
}

#[test]
fn test_validation_notification() {
    let mut app = App::new("{broken", None, false, false);
    feed(&mut app, ":w /tmp/never-written.json");
    enter(&mut app);
    assert!(app.notification().unwrap().starts_with("Invalid JSON:"));
    assert!(!std::path::Path::new("/tmp/never-written.json").exists());
}
