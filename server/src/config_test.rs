use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 2] = [("DATABASE_URL", "postgres://localhost/vision"), ("BLOB_READ_WRITE_TOKEN", "tok")];

#[test]
fn defaults_apply_when_only_required_vars_set() {
    let config = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(config.blob.api_url, DEFAULT_BLOB_API_URL);
    assert_eq!(config.blob.public_host, DEFAULT_BLOB_PUBLIC_HOST);
    assert_eq!(config.blob.timeout_secs, DEFAULT_BLOB_TIMEOUT_SECS);
    assert_eq!(config.blob.token, "tok");
    assert!(!config.expose_error_details);
}

#[test]
fn missing_database_url_is_an_error() {
    let err = ServerConfig::from_lookup(lookup(&[("BLOB_READ_WRITE_TOKEN", "tok")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
}

#[test]
fn blank_blob_token_counts_as_missing() {
    let err = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("BLOB_READ_WRITE_TOKEN", " ")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::Missing("BLOB_READ_WRITE_TOKEN"));
}

#[test]
fn overrides_are_parsed() {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend([
        ("PORT", "8080"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("BLOB_API_URL", "http://localhost:9000/"),
        ("BLOB_PUBLIC_HOST", "blob.local"),
        ("BLOB_TIMEOUT_SECS", "5"),
        ("EXPOSE_ERROR_DETAILS", "TRUE"),
    ]);
    let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.db_max_connections, 12);
    assert_eq!(config.blob.api_url, "http://localhost:9000");
    assert_eq!(config.blob.public_host, "blob.local");
    assert_eq!(config.blob.timeout_secs, 5);
    assert!(config.expose_error_details);
}

#[test]
fn invalid_port_is_rejected() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("PORT", "eighty"));
    let err = ServerConfig::from_lookup(lookup(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".into() });
}

#[test]
fn invalid_flag_is_rejected() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("EXPOSE_ERROR_DETAILS", "maybe"));
    assert!(matches!(
        ServerConfig::from_lookup(lookup(&pairs)),
        Err(ConfigError::Invalid { var: "EXPOSE_ERROR_DETAILS", .. })
    ));
}
