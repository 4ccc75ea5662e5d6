use std::path::PathBuf;

use toolnest::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".toolnestrc");
    let content = r"
# comment
--watch

--store posts-db
   
--render-debug-log=render.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(flags.store, Some(PathBuf::from("posts-db")));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".toolnestrc");
    let content = "--watch\n--base-url https://staging.mktoolnest.com\n--topics topics.json5\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "toolnest".to_string(),
        "sitemap".to_string(),
        "--base-url".to_string(),
        "https://mktoolnest.com".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(
        effective.base_url.as_deref(),
        Some("https://mktoolnest.com"),
        "cli should override base url"
    );
    assert_eq!(
        effective.topics,
        Some(PathBuf::from("topics.json5")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "toolnest".to_string(),
        "--store=data".to_string(),
        "--topics=topics.json5".to_string(),
        "--base-url=https://mktoolnest.com".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.store, Some(PathBuf::from("data")));
    assert_eq!(flags.topics, Some(PathBuf::from("topics.json5")));
    assert_eq!(flags.base_url.as_deref(), Some("https://mktoolnest.com"));
}

#[test]
fn test_unknown_tokens_are_ignored() {
    let args = vec![
        "toolnest".to_string(),
        "save".to_string(),
        "post.md".to_string(),
        "--title".to_string(),
        "Hello".to_string(),
        "--draft".to_string(),
    ];
    assert_eq!(parse_flag_tokens(&args), ConfigFlags::default());
}
