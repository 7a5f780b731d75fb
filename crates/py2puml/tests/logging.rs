//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use py2puml::core::logging::{init_logging, resolve_level, LogFormat, DEFAULT_LOG_LEVEL};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants.len(), 3);
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_explicit_level_wins() {
    assert_eq!(resolve_level(Some("trace")), "trace");
    assert_eq!(DEFAULT_LOG_LEVEL, "warn");
}

#[test]
fn test_init_logging_with_levels() {
    // Only the first call installs a subscriber; the rest fail gracefully
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("warn"), Some("json"));
    let _ = init_logging(Some("off"), None);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_generation_under_logging() {
    let _ = init_logging(Some("trace"), Some("compact"));

    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.py"), "class A:\n    pass\n").unwrap();
    let outcome = py2puml::generate(dir.path()).unwrap();
    assert!(outcome.diagram.contains("class \"A\""));
}
