// tests/template.rs

mod common;
use crate::common::builders::EventBuilder;
use crate::common::mock_root;

use std::time::{Duration, UNIX_EPOCH};

use pollwatch::exec::template::{expand, format_mtime};
use pollwatch::types::EventKind;

#[test]
fn expands_path_tokens() {
    let event = EventBuilder::create(mock_root(), "photos/2024/cat.tar.gz")
        .size(42)
        .build();

    assert_eq!(expand("{path}", &event), "/watch/photos/2024/cat.tar.gz");
    assert_eq!(expand("{relpath}", &event), "photos/2024/cat.tar.gz");
    assert_eq!(expand("{dir}", &event), "/watch/photos/2024");
    assert_eq!(expand("{name}", &event), "cat.tar.gz");
    assert_eq!(expand("{stem}|{ext}", &event), "cat.tar|.gz");
    assert_eq!(expand("{event}:{size}", &event), "create:42");
}

#[test]
fn leading_dot_is_not_an_extension() {
    let event = EventBuilder::create(mock_root(), ".bashrc").build();
    assert_eq!(expand("{stem}|{ext}", &event), ".bashrc|");
}

#[test]
fn name_without_dot_has_empty_ext() {
    let event = EventBuilder::create(mock_root(), "Makefile").build();
    assert_eq!(expand("{stem}{ext}", &event), "Makefile");
}

#[test]
fn age_tokens() {
    let event = EventBuilder::create(mock_root(), "old.log")
        .age(Duration::from_secs(3 * 86_400 + 5))
        .build();

    assert_eq!(expand("{age_days}", &event), "3");
    assert_eq!(expand("{age_ms}", &event), "259205000");
}

#[test]
fn mtime_is_rfc3339_utc() {
    let event = EventBuilder::create(mock_root(), "f")
        .modified(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
        .build();

    assert_eq!(expand("{mtime}", &event), "2023-11-14T22:13:20Z");
    assert_eq!(format_mtime(UNIX_EPOCH), "1970-01-01T00:00:00Z");
}

#[test]
fn unknown_tokens_are_left_verbatim() {
    let event = EventBuilder::create(mock_root(), "a.txt").build();
    assert_eq!(
        expand("{name} {unknown} {Path} {}", &event),
        "a.txt {unknown} {Path} {}"
    );
}

#[test]
fn move_event_reports_move_kind() {
    let event = EventBuilder::create(mock_root(), "b/x")
        .moved_from("a/x")
        .build();
    assert_eq!(event.kind, EventKind::Move);
    assert_eq!(expand("{event} {relpath}", &event), "move b/x");
}
