mod common;

use cfg_compare::{config::Config, job::Group, report::{build_index, scan_images}};
use common::{layout, put_images};
use tempfile::TempDir;

#[test]
fn only_names_present_in_both_groups_are_indexed() {
    let tmp = TempDir::new().unwrap();
    put_images(tmp.path(), "original", &["foo.svg", "bar.svg", "baz.svg"]);
    put_images(tmp.path(), "obfuscated", &["foo.svg", "baz.svg", "qux.svg"]);
    let cfg = Config::default();

    let index = build_index(&layout(&cfg, tmp.path()), "test_program").unwrap();
    assert_eq!(index.base_names("test_program"), vec!["baz", "foo"]);
    assert!(index.get("test_program", "bar").is_none());
    assert!(index.get("test_program", "qux").is_none());

    let foo = index.get("test_program", "foo").unwrap();
    assert_eq!(foo.original, "visualizations/original/foo.svg");
    assert_eq!(foo.obfuscated, "visualizations/obfuscated/foo.svg");
}

#[test]
fn index_does_not_depend_on_creation_order() {
    let names = ["m1.svg", "a0.svg", "zz.svg", "k.svg"];
    let mut reversed = names;
    reversed.reverse();

    let first = TempDir::new().unwrap();
    put_images(first.path(), "original", &names);
    put_images(first.path(), "obfuscated", &names);

    let second = TempDir::new().unwrap();
    put_images(second.path(), "obfuscated", &reversed);
    put_images(second.path(), "original", &reversed);

    let cfg = Config::default();
    let a = build_index(&layout(&cfg, first.path()), "test_program").unwrap();
    let b = build_index(&layout(&cfg, second.path()), "test_program").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len("test_program"), 4);
}

#[test]
fn missing_image_directories_give_an_empty_collection() {
    let tmp = TempDir::new().unwrap();
    let cfg = Config::default();
    let index = build_index(&layout(&cfg, tmp.path()), "test_program").unwrap();

    assert_eq!(index.len("test_program"), 0);
    assert!(index.entries("test_program").is_some());
    assert_eq!(
        serde_json::to_value(&index).unwrap(),
        serde_json::json!({ "test_program": {} })
    );
}

#[test]
fn colliding_image_names_keep_the_last_in_listing_order() {
    let tmp = TempDir::new().unwrap();
    // ".foo.svg" sorts before "foo.svg"; both normalize to "foo".
    put_images(tmp.path(), "original", &[".foo.svg", "foo.svg"]);
    put_images(tmp.path(), "obfuscated", &["foo.svg"]);
    let cfg = Config::default();

    let index = build_index(&layout(&cfg, tmp.path()), "test_program").unwrap();
    assert_eq!(index.len("test_program"), 1);
    assert_eq!(
        index.get("test_program", "foo").unwrap().original,
        "visualizations/original/foo.svg"
    );
}

#[test]
fn scan_only_sees_images_of_the_configured_format() {
    let tmp = TempDir::new().unwrap();
    put_images(tmp.path(), "original", &["a.svg", "b.png", "c.svg.tmp"]);
    let cfg = Config::default();

    let entries = scan_images(&layout(&cfg, tmp.path()), Group::Original).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].base_name, "a");
    assert_eq!(entries[0].group, Group::Original);
}

#[test]
fn collection_id_is_configurable() {
    let tmp = TempDir::new().unwrap();
    put_images(tmp.path(), "original", &["f.svg"]);
    put_images(tmp.path(), "obfuscated", &["f.svg"]);
    let cfg = Config::default();

    let index = build_index(&layout(&cfg, tmp.path()), "libfoo").unwrap();
    assert_eq!(index.base_names("libfoo"), vec!["f"]);
    assert!(index.entries("test_program").is_none());
}

#[cfg(unix)]
#[test]
fn images_with_non_utf8_names_stay_out_of_the_index() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().unwrap();
    put_images(tmp.path(), "original", &["main.svg"]);
    put_images(tmp.path(), "obfuscated", &["main.svg"]);
    for group in ["original", "obfuscated"] {
        let dir = tmp.path().join("build/visualizations").join(group);
        std::fs::write(dir.join(OsStr::from_bytes(b"a\xfe.svg")), "<svg/>").unwrap();
        std::fs::write(dir.join(OsStr::from_bytes(b"a\xff.svg")), "<svg/>").unwrap();
    }
    let cfg = Config::default();

    let index = build_index(&layout(&cfg, tmp.path()), "test_program").unwrap();
    assert_eq!(index.len("test_program"), 1);
    assert!(index.get("test_program", "main").is_some());
}
