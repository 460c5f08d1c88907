//! Loading configuration files from disk.

use std::io::Write;

use matchdesk::config::load_config;
use matchdesk::listing::OrderBy;
use matchdesk::ConfigError;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"{
            "version": "1.0",
            "database_path": "/var/lib/matchdesk/matchdesk.db",
            "listing": { "page_size": 50, "order_by": "deposit", "asc": true },
            "auto_match": { "tolerance_percentage": 10, "max_results": 100 },
            "search": { "debounce_ms": 250, "founder_limit": 5 },
            "recent": { "capacity": 5 },
            "logging": { "level": "debug", "json": true }
        }"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.listing.page_size, 50);
    assert_eq!(config.listing.order_by, OrderBy::Deposit);
    assert!(config.listing.asc);
    assert!((config.auto_match.tolerance() - 0.1).abs() < 1e-12);
    assert_eq!(config.auto_match.max_results, Some(100));
    assert_eq!(config.search.debounce_ms, 250);
    assert_eq!(config.recent.capacity, 5);
    assert!(config.logging.json);
    assert_eq!(
        config.resolved_database_path().unwrap().to_str(),
        Some("/var/lib/matchdesk/matchdesk.db")
    );
}

#[test]
fn test_minimal_config_uses_defaults() {
    let file = write_config(r#"{ "version": "1.0" }"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.listing.page_size, 20);
    assert_eq!(config.listing.order_by, OrderBy::ReceivedAt);
    assert!(!config.listing.asc);
    assert_eq!(config.auto_match.tolerance_percentage, 20.0);
    assert_eq!(config.auto_match.max_results, None);
    assert_eq!(config.search.founder_limit, 10);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_field_fails_schema() {
    let file = write_config(r#"{ "version": "1.0", "scoring": { "min_score": 3 } }"#);
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::SchemaValidation { .. })
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        load_config("/nonexistent/matchdesk.json"),
        Err(ConfigError::ReadFile { .. })
    ));
}
