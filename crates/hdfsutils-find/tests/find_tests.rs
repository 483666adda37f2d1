//! Integration tests for find over an in-memory filesystem.

use chrono::{Duration, TimeZone, Utc};

use hdfsutils_core::memory::MemoryFs;
use hdfsutils_core::{FsError, NodeKind, WalkConfig, WalkOrder};
use hdfsutils_find::{FindOptions, Finder, NumArg, Predicate};

fn create_test_tree() -> MemoryFs {
    let fs = MemoryFs::new();
    fs.put("/target/a/b/bar.txt", "now is the time").unwrap();
    fs.put("/target/a/b/baz.txt", "blah blah blah").unwrap();
    fs.put("/target/a/b/foo.txt", "now is not the time").unwrap();
    fs.put("/target/a/c/baz.txt", "this is another time").unwrap();
    fs.put("/target/a/d/fizz.txt", "").unwrap();
    fs.mkdir("/target/a/e").unwrap();
    fs
}

fn find_paths<F: hdfsutils_core::FileSystem>(finder: &Finder<F>, root: &str) -> Vec<String> {
    finder
        .find(root)
        .map(|entry| entry.unwrap().node.path)
        .collect()
}

#[test]
fn test_find_everything_pre_order() {
    let fs = create_test_tree();
    let finder = Finder::new(&fs, Predicate::True);

    assert_eq!(
        find_paths(&finder, "/target"),
        [
            "/target",
            "/target/a",
            "/target/a/b",
            "/target/a/b/bar.txt",
            "/target/a/b/baz.txt",
            "/target/a/b/foo.txt",
            "/target/a/c",
            "/target/a/c/baz.txt",
            "/target/a/d",
            "/target/a/d/fizz.txt",
            "/target/a/e",
        ]
    );
}

#[test]
fn test_name_order_ignores_listing_order() {
    let fs = create_test_tree().with_reversed_listings();
    let sorted = Finder::new(&fs, Predicate::True);
    let expected = find_paths(&sorted, "/target");
    assert_eq!(expected[3], "/target/a/b/bar.txt");

    let config = WalkConfig::builder().order(WalkOrder::Listing).build().unwrap();
    let listing = Finder::with_config(&fs, config, Predicate::True);
    let raw = find_paths(&listing, "/target");
    assert_eq!(raw[2], "/target/a/e");
    assert_eq!(raw.len(), expected.len());
}

#[test]
fn test_missing_root() {
    let fs = create_test_tree();
    let finder = Finder::new(&fs, Predicate::True);

    let mut matches = finder.find("/nope");
    let err = matches.next().unwrap().unwrap_err();
    assert_eq!(err.to_string(), "/nope: No such file or directory");
    assert!(matches.next().is_none());
}

#[test]
fn test_find_all_isolates_roots() {
    let fs = create_test_tree();
    fs.fail_on("/target/a/c");
    let options = FindOptions::builder().file_type("f").build().unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();

    let mut found = Vec::new();
    let summary = finder.find_all(&["/missing", "/target/a/c", "/target/a/b"], |entry| {
        found.push(entry.path().to_string())
    });

    assert_eq!(
        found,
        ["/target/a/b/bar.txt", "/target/a/b/baz.txt", "/target/a/b/foo.txt"]
    );
    assert_eq!(summary.matched, 3);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.failures[0].1.is_not_found());
    assert_eq!(summary.failures[1].0, "/target/a/c");
    assert!(matches!(summary.failures[1].1, FsError::Remote { .. }));
    assert!(!summary.is_success());
}

#[test]
fn test_name_and_type_options() {
    let fs = create_test_tree();
    let options = FindOptions::builder().name("baz.*").build().unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();
    assert_eq!(
        find_paths(&finder, "/target"),
        ["/target/a/b/baz.txt", "/target/a/c/baz.txt"]
    );

    let options = FindOptions::builder().file_type("d").max_depth(2usize).build().unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();
    assert_eq!(
        find_paths(&finder, "/target"),
        [
            "/target",
            "/target/a",
            "/target/a/b",
            "/target/a/c",
            "/target/a/d",
            "/target/a/e"
        ]
    );
}

#[test]
fn test_path_and_depth_window() {
    let fs = create_test_tree();
    let options = FindOptions::builder()
        .path("/target/*/c/*")
        .min_depth(3usize)
        .build()
        .unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();

    assert_eq!(find_paths(&finder, "/target"), ["/target/a/c/baz.txt"]);
}

#[test]
fn test_empty_option() {
    let fs = create_test_tree();
    let options = FindOptions::builder().empty(true).build().unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();

    assert_eq!(
        find_paths(&finder, "/target"),
        ["/target/a/d/fizz.txt", "/target/a/e"]
    );
}

#[test]
fn test_mtime_and_owner() {
    let now = Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap();
    let fs = create_test_tree();
    fs.set_modified("/target/a/b/bar.txt", now - Duration::days(10)).unwrap();
    fs.set_modified("/target/a/b/foo.txt", now - Duration::days(1)).unwrap();
    fs.set_modified("/target/a/b/baz.txt", now).unwrap();
    fs.set_owner("/target/a/b/foo.txt", "alice", "analysts").unwrap();

    let within_b = |options: FindOptions| {
        let finder = Finder::from_options(&fs, &options, now).unwrap();
        find_paths(&finder, "/target/a/b")
    };

    assert_eq!(
        within_b(FindOptions::builder().mtime("+7").build().unwrap()),
        ["/target/a/b/bar.txt"]
    );
    assert_eq!(
        within_b(FindOptions::builder().mtime("-2").file_type("f").build().unwrap()),
        ["/target/a/b/baz.txt", "/target/a/b/foo.txt"]
    );
    assert_eq!(
        within_b(FindOptions::builder().user("alice").build().unwrap()),
        ["/target/a/b/foo.txt"]
    );
    assert_eq!(
        within_b(FindOptions::builder().group("analysts").mmin("+60").build().unwrap()),
        ["/target/a/b/foo.txt"]
    );
}

#[test]
fn test_size_option() {
    let fs = create_test_tree();
    let options = FindOptions::builder().size("+15c").build().unwrap();
    let finder = Finder::from_options(&fs, &options, Utc::now()).unwrap();

    assert_eq!(
        find_paths(&finder, "/target"),
        ["/target/a/b/foo.txt", "/target/a/c/baz.txt"]
    );
}

#[test]
fn test_composed_predicate() {
    let fs = create_test_tree();
    let txt_not_baz = Predicate::name("*.txt", false)
        .unwrap()
        .and(!Predicate::name("baz*", false).unwrap());
    let predicate = txt_not_baz.or(Predicate::Depth(NumArg::parse("0").unwrap()));
    let finder = Finder::new(&fs, predicate);

    assert_eq!(
        find_paths(&finder, "/target"),
        [
            "/target",
            "/target/a/b/bar.txt",
            "/target/a/b/foo.txt",
            "/target/a/d/fizz.txt"
        ]
    );

    let none = Finder::new(&fs, Predicate::False.or(Predicate::Type(NodeKind::File).and(Predicate::False)));
    assert!(find_paths(&none, "/target").is_empty());
}

#[test]
fn test_bad_options_are_usage_errors() {
    let fs = create_test_tree();
    for options in [
        FindOptions::builder().size("big").build().unwrap(),
        FindOptions::builder().file_type("x").build().unwrap(),
        FindOptions::builder().name("[").build().unwrap(),
    ] {
        let err = Finder::from_options(&fs, &options, Utc::now()).unwrap_err();
        assert!(matches!(err, FsError::Usage { .. }));
    }
}
