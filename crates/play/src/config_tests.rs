use super::*;

#[test]
fn test_empty_file_uses_defaults() {
    let config = PlayConfig::parse("").unwrap();
    assert_eq!(config, PlayConfig::default());
    assert_eq!(config.search_depth, 10);
    assert_eq!(config.human_color, Color::White);
}

#[test]
fn test_full_file() {
    let config = PlayConfig::parse(
        r#"
search_depth = 14
human_color = "black"

[engine]
path = "/opt/engines/stockfish"
args = ["--threads", "2"]
handshake_timeout_ms = 2000
"#,
    )
    .unwrap();
    assert_eq!(config.search_depth, 14);
    assert_eq!(config.human_color, Color::Black);
    assert_eq!(config.engine.path, "/opt/engines/stockfish");
    assert_eq!(config.engine.args, vec!["--threads", "2"]);
    assert_eq!(config.engine.handshake_timeout_ms, 2000);
    assert_eq!(config.engine.quit_timeout_ms, 1000);
}

#[test]
fn test_zero_depth_is_rejected() {
    let config = PlayConfig::parse("search_depth = 0").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidDepth)));
}

#[test]
fn test_unknown_color_is_a_parse_error() {
    assert!(matches!(
        PlayConfig::parse(r#"human_color = "green""#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_load_reports_missing_file() {
    let path = std::env::temp_dir().join("play-config-that-does-not-exist.toml");
    assert!(matches!(
        PlayConfig::load(&path),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn test_load_validates() {
    let path = std::env::temp_dir().join(format!("play-config-{}.toml", std::process::id()));
    std::fs::write(&path, "search_depth = 0\n").unwrap();
    let result = PlayConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ConfigError::InvalidDepth)));
}
