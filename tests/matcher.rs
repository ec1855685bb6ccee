// tests/matcher.rs

mod common;
use crate::common::builders::{ActionSpecBuilder, EventBuilder, WatchConfigBuilder};
use crate::common::mock_root;

use std::time::Duration;

use tempfile::TempDir;

use pollwatch::config::{Config, WatchConfig, parse_str};
use pollwatch::filter::Matcher;
use pollwatch::types::EventKind;

fn selected_names(watch: &WatchConfig, event: &pollwatch::watch::ChangeEvent) -> Vec<String> {
    Matcher::new()
        .select(event, watch)
        .into_iter()
        .map(|a| a.name.clone())
        .collect()
}

fn images_watch() -> WatchConfig {
    WatchConfigBuilder::new(mock_root())
        .with_action(
            ActionSpecBuilder::exec("images", "echo {path}")
                .include(&["**/*.jpg"])
                .exclude(&["**/tmp/**"])
                .build(),
        )
        .build()
}

#[test]
fn include_and_exclude_globs() {
    let watch = images_watch();

    let photo = EventBuilder::create(mock_root(), "photos/a.jpg").build();
    assert_eq!(selected_names(&watch, &photo), vec!["images"]);

    let tmp = EventBuilder::create(mock_root(), "photos/tmp/a.jpg").build();
    assert!(selected_names(&watch, &tmp).is_empty());

    let png = EventBuilder::create(mock_root(), "photos/a.png").build();
    assert!(selected_names(&watch, &png).is_empty());
}

#[test]
fn double_star_matches_top_level_files() {
    let watch = images_watch();
    let top = EventBuilder::create(mock_root(), "x.jpg").build();
    assert_eq!(selected_names(&watch, &top), vec!["images"]);
}

#[test]
fn single_star_does_not_cross_directories() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("top", "true").include(&["*.log"]).build())
        .build();

    let top = EventBuilder::create(mock_root(), "app.log").build();
    let nested = EventBuilder::create(mock_root(), "sub/app.log").build();

    assert_eq!(selected_names(&watch, &top), vec!["top"]);
    assert!(selected_names(&watch, &nested).is_empty());
}

#[test]
fn default_events_are_create_and_modify() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("any", "true").build())
        .build();

    for (kind, expected) in [
        (EventKind::Create, true),
        (EventKind::Modify, true),
        (EventKind::Delete, false),
        (EventKind::Move, false),
    ] {
        let event = EventBuilder::new(mock_root(), "f.txt", kind).build();
        assert_eq!(!selected_names(&watch, &event).is_empty(), expected, "{kind}");
    }
}

#[test]
fn only_files_rejects_directories() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("files", "true").files_only().build())
        .build();

    let dir = EventBuilder::create(mock_root(), "folder").dir().build();
    let file = EventBuilder::create(mock_root(), "folder.txt").build();

    assert!(selected_names(&watch, &dir).is_empty());
    assert_eq!(selected_names(&watch, &file), vec!["files"]);
}

#[test]
fn only_dirs_rejects_files() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("dirs", "true").dirs_only().build())
        .build();

    let dir = EventBuilder::create(mock_root(), "folder").dir().build();
    let file = EventBuilder::create(mock_root(), "folder.txt").build();

    assert_eq!(selected_names(&watch, &dir), vec!["dirs"]);
    assert!(selected_names(&watch, &file).is_empty());
}

#[test]
fn size_bounds_are_inclusive() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(
            ActionSpecBuilder::exec("sized", "true")
                .min_size(10)
                .max_size(20)
                .build(),
        )
        .build();

    let at = |size| EventBuilder::create(mock_root(), "f").size(size).build();

    assert!(selected_names(&watch, &at(9)).is_empty());
    assert_eq!(selected_names(&watch, &at(10)).len(), 1);
    assert_eq!(selected_names(&watch, &at(20)).len(), 1);
    assert!(selected_names(&watch, &at(21)).is_empty());
}

#[test]
fn zero_upper_bounds_in_config_mean_unbounded() {
    let dir = TempDir::new().unwrap();
    let raw = parse_str(&format!(
        r#"
[[watch]]
path = "{}"

[[watch.action]]
name = "any"
type = "exec"
cmd = "true"

[watch.action.condition]
max_size_bytes = 0
max_age_ms = 0
"#,
        dir.path().display()
    ))
    .unwrap();
    let cfg = Config::try_from(raw).unwrap();
    let watch = &cfg.watches[0];

    assert_eq!(watch.actions[0].filter.max_size, None);
    assert_eq!(watch.actions[0].filter.max_age, None);

    let big_and_old = EventBuilder::create(dir.path(), "f")
        .size(1 << 20)
        .age(Duration::from_secs(86_400))
        .build();
    assert_eq!(selected_names(watch, &big_and_old), vec!["any"]);
}

#[test]
fn age_bounds() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(
            ActionSpecBuilder::exec("stale", "true")
                .min_age(Duration::from_secs(60))
                .max_age(Duration::from_secs(3600))
                .build(),
        )
        .build();

    let aged = |secs| {
        EventBuilder::create(mock_root(), "f")
            .age(Duration::from_secs(secs))
            .build()
    };

    assert!(selected_names(&watch, &aged(30)).is_empty());
    assert_eq!(selected_names(&watch, &aged(600)).len(), 1);
    assert!(selected_names(&watch, &aged(7200)).is_empty());
}

#[test]
fn hidden_components_are_ignored_by_default() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("default", "true").build())
        .with_action(
            ActionSpecBuilder::exec("dotfiles", "true")
                .ignore_hidden(false)
                .build(),
        )
        .build();

    let hidden_dir = EventBuilder::create(mock_root(), ".git/config").build();
    let hidden_file = EventBuilder::create(mock_root(), "src/.env").build();

    assert_eq!(selected_names(&watch, &hidden_dir), vec!["dotfiles"]);
    assert_eq!(selected_names(&watch, &hidden_file), vec!["dotfiles"]);
}

#[test]
fn selection_preserves_configured_order() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(ActionSpecBuilder::exec("first", "true").build())
        .with_action(ActionSpecBuilder::exec("second", "true").build())
        .with_action(ActionSpecBuilder::exec("third", "true").build())
        .build();

    let event = EventBuilder::create(mock_root(), "f").build();
    assert_eq!(selected_names(&watch, &event), vec!["first", "second", "third"]);
}

#[test]
fn stop_on_first_match_returns_at_most_one() {
    let watch = WatchConfigBuilder::new(mock_root())
        .stop_on_first_match()
        .with_action(ActionSpecBuilder::exec("pdf", "true").include(&["**/*.pdf"]).build())
        .with_action(ActionSpecBuilder::exec("all_a", "true").build())
        .with_action(ActionSpecBuilder::exec("all_b", "true").build())
        .build();

    let txt = EventBuilder::create(mock_root(), "notes.txt").build();
    let pdf = EventBuilder::create(mock_root(), "doc.pdf").build();

    assert_eq!(selected_names(&watch, &txt), vec!["all_a"]);
    assert_eq!(selected_names(&watch, &pdf), vec!["pdf"]);
}

#[test]
fn move_events_match_on_new_path() {
    let watch = WatchConfigBuilder::new(mock_root())
        .with_action(
            ActionSpecBuilder::exec("moved_pdf", "true")
                .include(&["done/**"])
                .events(&[EventKind::Move])
                .build(),
        )
        .build();

    let event = EventBuilder::create(mock_root(), "done/a.pdf")
        .moved_from("inbox/a.pdf")
        .build();
    assert_eq!(selected_names(&watch, &event), vec!["moved_pdf"]);
}
