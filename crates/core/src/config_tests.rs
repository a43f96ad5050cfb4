// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

#[test]
fn new_config_uses_defaults() {
    let config = LockConfig::new(Duration::from_secs(30));
    assert_eq!(config.max_in_flight, DEFAULT_MAX_IN_FLIGHT);
    assert_eq!(config.value, "1");
    assert!(config.endpoints.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn builder_overrides_defaults() {
    let config = LockConfig::new(Duration::from_secs(5))
        .with_max_in_flight(2)
        .with_value("owner-a")
        .with_endpoints(["redis://a/", "redis://b/"]);

    assert_eq!(config.max_in_flight, 2);
    assert_eq!(config.value, "owner-a");
    assert_eq!(config.endpoints, vec!["redis://a/", "redis://b/"]);
}

#[test]
fn zero_lease_is_rejected() {
    let config = LockConfig::new(Duration::ZERO);
    assert!(matches!(config.validate(), Err(ConfigError::LeaseTooShort)));
}

#[test]
fn sub_millisecond_lease_is_rejected() {
    let config = LockConfig::new(Duration::from_micros(500));
    assert!(matches!(config.validate(), Err(ConfigError::LeaseTooShort)));
}

#[test]
fn one_millisecond_lease_is_accepted() {
    assert!(LockConfig::new(MIN_LEASE).validate().is_ok());
}

#[test]
fn zero_concurrency_is_rejected() {
    let config = LockConfig::new(Duration::from_secs(1)).with_max_in_flight(0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroConcurrency)
    ));
}

#[test]
fn parses_humantime_lease() {
    let config = LockConfig::from_toml_str(
        r#"
lease = "1m 30s"
max_in_flight = 4
endpoints = ["redis://127.0.0.1:6379/"]
"#,
    )
    .unwrap();

    assert_eq!(config.lease, Duration::from_secs(90));
    assert_eq!(config.max_in_flight, 4);
    assert_eq!(config.value, DEFAULT_VALUE);
    assert_eq!(config.endpoints.len(), 1);
}

#[test]
fn missing_lease_fails_to_parse() {
    let result = LockConfig::from_toml_str("max_in_flight = 3");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn parsed_config_is_validated() {
    let result = LockConfig::from_toml_str(r#"lease = "0s""#);
    assert!(matches!(result, Err(ConfigError::LeaseTooShort)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"lease = "10s""#).unwrap();
    writeln!(file, r#"endpoints = ["redis://a/", "redis://b/", "redis://c/"]"#).unwrap();

    let config = LockConfig::load(file.path()).unwrap();

    assert_eq!(config.lease, Duration::from_secs(10));
    assert_eq!(config.endpoints.len(), 3);
}

#[test]
fn load_reports_missing_file() {
    let result = LockConfig::load(Path::new("/nonexistent/ql.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/ql.toml"));
}

#[test]
fn config_round_trips_through_toml() {
    let config = LockConfig::new(Duration::from_secs(45)).with_endpoints(["redis://a/"]);
    let text = toml::to_string(&config).unwrap();
    assert_eq!(LockConfig::from_toml_str(&text).unwrap(), config);
}
