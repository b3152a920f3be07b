use pilot_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    let joined = base.join("baz");
    assert_eq!(joined.as_str(), "foo/bar/baz");
}

#[test]
fn test_file_name_and_extension() {
    let path = NormalizedPath::new("runs/exp/config.yaml");
    assert_eq!(path.file_name(), Some("config.yaml"));
    assert_eq!(path.extension(), Some("yaml"));
}

#[test]
fn test_dotfile_has_no_extension() {
    let path = NormalizedPath::new(".pilot/.hidden");
    assert_eq!(path.extension(), None);
}

#[test]
fn test_exists_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
}

#[rstest]
#[case("a/../b", "b")]
#[case("a/./b//c", "a/b/c")]
#[case("/a/b/../../c", "/c")]
#[case("/../a", "/a")]
#[case("../a", "../a")]
#[case("a/../../b", "../b")]
#[case("a\\..\\b", "b")]
#[case("", ".")]
#[case("runs/", "runs")]
fn test_lexical_cleaning(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[rstest]
#[case("/repo", true)]
#[case("C:/repo", true)]
#[case("repo", false)]
#[case("./repo", false)]
fn test_is_absolute(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(input).is_absolute(), expected);
}

#[rstest]
#[case("..", true)]
#[case("../x", true)]
#[case("x/../..", true)]
#[case("x/..", false)]
#[case("..x", false)]
fn test_escapes_root(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(input).escapes_root(), expected);
}

#[test]
fn test_starts_with_is_component_wise() {
    let root = NormalizedPath::new("/work/repo");
    assert!(NormalizedPath::new("/work/repo/data").starts_with(&root));
    assert!(NormalizedPath::new("/work/repo").starts_with(&root));
    assert!(!NormalizedPath::new("/work/repo2/data").starts_with(&root));
}
