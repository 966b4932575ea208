use super::*;

fn url() -> Option<String> {
    Some("postgres://app@localhost/ticketbridge".to_owned())
}

// =============================================================================
// ServerConfig::from_values
// =============================================================================

#[test]
fn defaults_apply_when_optional_vars_absent() {
    let config = ServerConfig::from_values(url(), None, None).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.db_max_connections, 5);
    assert_eq!(config.database_url, "postgres://app@localhost/ticketbridge");
}

#[test]
fn explicit_values_override_defaults() {
    let config =
        ServerConfig::from_values(url(), Some("8080".into()), Some("12".into())).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.db_max_connections, 12);
}

#[test]
fn missing_database_url_is_rejected() {
    assert!(matches!(
        ServerConfig::from_values(None, None, None),
        Err(ConfigError::MissingDatabaseUrl)
    ));
}

#[test]
fn blank_database_url_is_rejected() {
    assert!(matches!(
        ServerConfig::from_values(Some("   ".into()), None, None),
        Err(ConfigError::MissingDatabaseUrl)
    ));
}

#[test]
fn unparseable_port_is_rejected() {
    let result = ServerConfig::from_values(url(), Some("not-a-port".into()), None);
    assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
}

#[test]
fn out_of_range_port_is_rejected() {
    let result = ServerConfig::from_values(url(), Some("70000".into()), None);
    assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
}

#[test]
fn zero_pool_size_is_rejected() {
    let result = ServerConfig::from_values(url(), None, Some("0".into()));
    assert!(matches!(result, Err(ConfigError::InvalidDbMaxConnections(_))));
}

#[test]
fn unparseable_pool_size_is_rejected() {
    let result = ServerConfig::from_values(url(), None, Some("many".into()));
    assert!(matches!(result, Err(ConfigError::InvalidDbMaxConnections(_))));
}
