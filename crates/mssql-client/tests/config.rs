//! Connection property resolution tests.
//!
//! Covers URL parsing, precedence between the URL, environment defaults and
//! supplied properties, value validation, and the typed login view.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use mssql_client::{
    ApplicationIntent, EnvironmentDefaults, Error, LoginConfig, PacketSize, PropertyCatalog,
    PropertyKind, PropertyResolver, PropertySet, PropertyValue, RecognizedProperty,
    ResolvedConfiguration, SqlAuthentication, names,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn resolve(url: &str, supplied: &PropertySet) -> Result<ResolvedConfiguration, Error> {
    PropertyResolver::standard()
        .resolve(url, supplied, &EnvironmentDefaults::new())
        .map(|resolved| resolved.expect("a SQL Server URL"))
}

// ============================================================================
// URL Acceptance
// ============================================================================

#[test]
fn test_foreign_url_is_not_applicable() {
    let resolver = PropertyResolver::standard();
    let result = resolver
        .resolve(
            "jdbc:postgresql://db:5432/app",
            &PropertySet::new().with("user", "sa"),
            &EnvironmentDefaults::new(),
        )
        .unwrap();
    assert!(result.is_none());
    assert!(!resolver.accepts_url("jdbc:postgresql://db:5432/app"));
}

#[test]
fn test_accepts_url() {
    let resolver = PropertyResolver::standard();
    assert!(resolver.accepts_url("jdbc:sqlserver://db"));
    assert!(resolver.accepts_url("sqlserver://db;encrypt=true"));
    assert!(!resolver.accepts_url("jdbc:sqlserver://db;novalue"));
}

#[test]
fn test_malformed_segments() {
    for url in [
        "jdbc:sqlserver://db;databaseName",
        "jdbc:sqlserver://db;=value",
        "jdbc:sqlserver://db;password={unterminated",
        "jdbc:sqlserver://db;password={a}b",
        "jdbc:sqlserver://db:",
        "jdbc:sqlserver://db\\:1433",
    ] {
        let err = resolve(url, &PropertySet::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }), "{url}: {err}");
        assert!(err.is_configuration_error());
    }
}

#[test]
fn test_programmatic_only_property_rejected_in_url() {
    let err = resolve("jdbc:sqlserver://db;accessToken=abc", &PropertySet::new()).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedProperty { ref name } if name == "accessToken"));
}

#[test]
fn test_unknown_url_keys_are_ignored() {
    init_tracing();
    let resolved = resolve("jdbc:sqlserver://db;fancyFeature=on", &PropertySet::new()).unwrap();
    assert!(resolved.get("fancyFeature").is_none());
    assert_eq!(resolved.get_str(names::SERVER_NAME), Some("db"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_supplied_overrides_url() {
    let supplied = PropertySet::new().with("databaseName", "reporting");
    let resolved = resolve("jdbc:sqlserver://db;databaseName=app", &supplied).unwrap();
    assert_eq!(resolved.get_str(names::DATABASE_NAME), Some("reporting"));
}

#[test]
fn test_supplied_synonyms_are_normalized() {
    let supplied = PropertySet::new()
        .with("DATABASE", "reporting")
        .with("userName", "app_user")
        .with("PORT", "1500");
    let resolved = resolve("jdbc:sqlserver://db", &supplied).unwrap();
    assert_eq!(resolved.get_str(names::DATABASE_NAME), Some("reporting"));
    assert_eq!(resolved.get_str(names::USER), Some("app_user"));
    assert_eq!(resolved.get_int(names::PORT_NUMBER), Some(1500));
}

#[test]
fn test_url_only_keys_survive_a_disjoint_merge() {
    let resolver = PropertyResolver::standard();
    let base = resolver
        .parse_url("jdbc:sqlserver://db;databaseName=app;encrypt=true")
        .unwrap()
        .unwrap();
    let overlay = PropertySet::new()
        .with(names::USER, "app_user")
        .with(names::LOGIN_TIMEOUT, "7");

    let merged = resolver.merge(base, &overlay);
    assert_eq!(merged.get(names::SERVER_NAME), Some("db"));
    assert_eq!(merged.get(names::DATABASE_NAME), Some("app"));
    assert_eq!(merged.get(names::ENCRYPT), Some("true"));
    assert_eq!(merged.get(names::USER), Some("app_user"));
    assert_eq!(merged.get(names::LOGIN_TIMEOUT), Some("7"));
}

#[test]
fn test_environment_fills_only_unset_properties() {
    let resolver = PropertyResolver::standard();
    let env = EnvironmentDefaults::new().login_timeout(45);

    let from_env = resolver
        .resolve("jdbc:sqlserver://db", &PropertySet::new(), &env)
        .unwrap()
        .unwrap();
    assert_eq!(from_env.get_int(names::LOGIN_TIMEOUT), Some(45));

    let from_url = resolver
        .resolve("jdbc:sqlserver://db;loginTimeout=5", &PropertySet::new(), &env)
        .unwrap()
        .unwrap();
    assert_eq!(from_url.get_int(names::LOGIN_TIMEOUT), Some(5));

    let supplied = PropertySet::new().with("loginTimeout", "7");
    let from_supplied = resolver
        .resolve("jdbc:sqlserver://db", &supplied, &env)
        .unwrap()
        .unwrap();
    assert_eq!(from_supplied.get_int(names::LOGIN_TIMEOUT), Some(7));
}

#[test]
fn test_zero_environment_login_timeout_injects_nothing() {
    let env = EnvironmentDefaults::new().login_timeout(0);
    assert!(env.is_empty());
    let resolved = PropertyResolver::standard()
        .resolve("jdbc:sqlserver://db", &PropertySet::new(), &env)
        .unwrap()
        .unwrap();
    assert_eq!(resolved.get_int(names::LOGIN_TIMEOUT), Some(15));
}

#[test]
fn test_unknown_supplied_keys_are_dropped() {
    let supplied = PropertySet::new().with("notAProperty", "x");
    let resolved = resolve("jdbc:sqlserver://db", &supplied).unwrap();
    assert!(resolved.get("notAProperty").is_none());
}

#[test]
fn test_supplied_key_without_value() {
    let mut supplied = PropertySet::new();
    supplied.insert_absent("User");
    let err = resolve("jdbc:sqlserver://db", &supplied).unwrap_err();
    assert_eq!(err.property_name(), Some("User"));
}

#[test]
fn test_access_token_is_supplied_programmatically() {
    let supplied = PropertySet::new().with("accessToken", "eyJ0eXAi");
    let config = LoginConfig::from_url_with("jdbc:sqlserver://db", &supplied).unwrap();
    assert_eq!(config.access_token.as_ref().map(|t| t.expose()), Some("eyJ0eXAi"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_server_name_is_required() {
    let err = resolve("jdbc:sqlserver://", &PropertySet::new()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredProperty { ref name } if name == "serverName"));

    let err = resolve("jdbc:sqlserver://;serverName=   ", &PropertySet::new()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredProperty { .. }));
}

#[test]
fn test_server_name_may_come_from_supplied_properties() {
    let supplied = PropertySet::new().with("server", "db.example.com");
    let resolved = resolve("jdbc:sqlserver://", &supplied).unwrap();
    assert_eq!(resolved.get_str(names::SERVER_NAME), Some("db.example.com"));
}

#[test]
fn test_invalid_values_name_the_property() {
    let cases = [
        ("encrypt=yes", "encrypt"),
        ("portNumber=70000", "portNumber"),
        ("packetSize=100", "packetSize"),
        ("queryTimeout=-2", "queryTimeout"),
        ("applicationIntent=ReadSometimes", "applicationIntent"),
        ("loginTimeout=soon", "loginTimeout"),
    ];
    for (segment, name) in cases {
        let url = format!("jdbc:sqlserver://db;{segment}");
        let err = resolve(&url, &PropertySet::new()).unwrap_err();
        assert!(
            matches!(err, Error::InvalidPropertyValue { .. }),
            "{segment}: {err}"
        );
        assert_eq!(err.property_name(), Some(name), "{segment}");
    }
}

#[test]
fn test_keyword_values_ignore_surrounding_whitespace() {
    let supplied = PropertySet::new()
        .with("encrypt", " true")
        .with("portNumber", "1500 ")
        .with("applicationIntent", " ReadOnly ");
    let resolved = resolve("jdbc:sqlserver://db", &supplied).unwrap();
    assert_eq!(resolved.get_bool(names::ENCRYPT), Some(true));
    assert_eq!(resolved.get_int(names::PORT_NUMBER), Some(1500));
    assert_eq!(resolved.get_str(names::APPLICATION_INTENT), Some("readonly"));
}

#[test]
fn test_booleans_are_case_insensitive() {
    let resolved = resolve(
        "jdbc:sqlserver://db;encrypt=TRUE;trustServerCertificate=False",
        &PropertySet::new(),
    )
    .unwrap();
    assert_eq!(resolved.get_bool(names::ENCRYPT), Some(true));
    assert_eq!(resolved.get_bool(names::TRUST_SERVER_CERTIFICATE), Some(false));
}

#[test]
fn test_settings_resolve_to_canonical_spelling() {
    let resolved = resolve(
        "jdbc:sqlserver://db;applicationIntent=READONLY;authentication=sqlpassword",
        &PropertySet::new(),
    )
    .unwrap();
    assert_eq!(resolved.get_str(names::APPLICATION_INTENT), Some("readonly"));
    assert_eq!(
        resolved.setting::<ApplicationIntent>().unwrap(),
        Some(ApplicationIntent::ReadOnly)
    );
    assert_eq!(
        resolved.setting::<SqlAuthentication>().unwrap(),
        Some(SqlAuthentication::SqlPassword)
    );
}

#[test]
fn test_disable_statement_pooling_only_accepts_true() {
    let err = resolve(
        "jdbc:sqlserver://db;disableStatementPooling=false",
        &PropertySet::new(),
    )
    .unwrap_err();
    assert_eq!(err.property_name(), Some("disableStatementPooling"));
}

#[test]
fn test_failover_partner_conflicts_with_multi_subnet_failover() {
    let err = resolve(
        "jdbc:sqlserver://db;failoverPartner=mirror;multiSubnetFailover=true",
        &PropertySet::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ConflictingProperties { .. }));

    // Either one alone is fine.
    resolve("jdbc:sqlserver://db;failoverPartner=mirror", &PropertySet::new()).unwrap();
    resolve("jdbc:sqlserver://db;multiSubnetFailover=true", &PropertySet::new()).unwrap();
}

#[test]
fn test_every_property_resolves_with_defaults() {
    let resolved = resolve("jdbc:sqlserver://db", &PropertySet::new()).unwrap();
    assert_eq!(resolved.len(), PropertyCatalog::standard().len());
    assert_eq!(
        resolved.get(names::PORT_NUMBER),
        Some(&PropertyValue::Int(1433))
    );
    assert_eq!(resolved.get_str(names::APPLICATION_NAME), Some("mssql-client"));
    assert_eq!(resolved.get_str(names::TRUST_STORE_TYPE), Some("JKS"));
}

#[test]
fn test_resolved_debug_redacts_secrets() {
    let supplied = PropertySet::new().with("password", "hunter2");
    let resolved = resolve("jdbc:sqlserver://db;user=sa", &supplied).unwrap();
    let rendered = format!("{resolved:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("<redacted>"));

    let rendered = format!("{supplied:?}");
    assert!(!rendered.contains("hunter2"));
}

// ============================================================================
// Introspection
// ============================================================================

#[test]
fn test_property_info_reports_effective_values() {
    let supplied = PropertySet::new().with("password", "hunter2");
    let info = PropertyResolver::standard()
        .property_info("jdbc:sqlserver://db;databaseName=app", &supplied)
        .unwrap();

    let find = |name: &str| info.iter().find(|i| i.name == name).unwrap();
    assert_eq!(find("databaseName").value, "app");
    assert_eq!(find("serverName").value, "db");
    assert!(find("serverName").required);
    assert_eq!(find("password").value, "");
    assert_eq!(find("portNumber").value, "1433");
    assert_eq!(find("encrypt").choices, Some(&["true", "false"][..]));
    assert!(info.iter().all(|i| i.name != "accessToken"));
}

#[test]
fn test_property_info_skips_validation() {
    let info = PropertyResolver::standard()
        .property_info("jdbc:sqlserver://db;portNumber=notaport", &PropertySet::new())
        .unwrap();
    let port = info.iter().find(|i| i.name == "portNumber").unwrap();
    assert_eq!(port.value, "notaport");
}

#[test]
fn test_property_info_rejects_foreign_url() {
    let err = PropertyResolver::standard()
        .property_info("jdbc:mysql://db", &PropertySet::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
}

// ============================================================================
// Custom Catalogs
// ============================================================================

const RETRY_RANGE: &[std::ops::RangeInclusive<i64>] = &[0..=10];

#[test]
fn test_custom_catalog() {
    let catalog = PropertyCatalog::new(
        vec![
            RecognizedProperty::string(names::SERVER_NAME, "").required(),
            RecognizedProperty::integer("connectRetryCount", "1", RETRY_RANGE),
        ],
        vec![("retries", "connectRetryCount")],
    )
    .unwrap();
    assert!(matches!(
        catalog.get("connectRetryCount").unwrap().kind,
        PropertyKind::Int(_)
    ));

    let resolver = PropertyResolver::new(&catalog);
    let resolved = resolver
        .resolve(
            "jdbc:sqlserver://db;retries=3;encrypt=true",
            &PropertySet::new(),
            &EnvironmentDefaults::new(),
        )
        .unwrap()
        .unwrap();
    assert_eq!(resolved.get_int("connectRetryCount"), Some(3));
    assert!(resolved.get(names::ENCRYPT).is_none());
    assert_eq!(resolved.len(), 2);
}

#[test]
fn test_custom_catalog_secrets_are_redacted() {
    let catalog = PropertyCatalog::new(
        vec![
            RecognizedProperty::string(names::SERVER_NAME, "").required(),
            RecognizedProperty::string("vaultKey", "").secret(),
        ],
        vec![],
    )
    .unwrap();
    let resolver = PropertyResolver::new(&catalog);

    let from_url = resolver
        .parse_url("jdbc:sqlserver://db;vaultKey=url-s3cr3t")
        .unwrap()
        .unwrap();
    assert!(from_url.is_secret("vaultKey"));
    assert!(!format!("{from_url:?}").contains("url-s3cr3t"));

    let supplied = PropertySet::new().with("VAULTKEY", "supplied-s3cr3t");
    assert!(format!("{supplied:?}").contains("supplied-s3cr3t"));
    let fixed = resolver.fixup(&supplied).unwrap();
    assert!(!format!("{fixed:?}").contains("supplied-s3cr3t"));

    let merged = resolver.merge(from_url, &fixed);
    assert_eq!(merged.get("vaultKey"), Some("supplied-s3cr3t"));
    assert!(!format!("{merged:?}").contains("s3cr3t"));

    let resolved = resolver
        .resolve("jdbc:sqlserver://db", &supplied, &EnvironmentDefaults::new())
        .unwrap()
        .unwrap();
    assert!(!format!("{resolved:?}").contains("s3cr3t"));
}

#[test]
fn test_custom_catalog_rejects_duplicates() {
    let err = PropertyCatalog::new(
        vec![
            RecognizedProperty::string("alpha", ""),
            RecognizedProperty::string("ALPHA", ""),
        ],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidCatalog(_)));
}

// ============================================================================
// Typed Login Configuration
// ============================================================================

#[test]
fn test_login_config_from_url() {
    let config = LoginConfig::from_url(
        "jdbc:sqlserver://db.example.com\\SQLEXPRESS:1434;databaseName=app;user=sa;\
         password={p;ss};encrypt=true;packetSize=-1;lockTimeout=0;applicationIntent=ReadOnly",
    )
    .unwrap();

    assert_eq!(config.host, "db.example.com");
    assert_eq!(config.instance.as_deref(), Some("SQLEXPRESS"));
    assert_eq!(config.port, 1434);
    assert_eq!(config.database.as_deref(), Some("app"));
    assert_eq!(config.user.as_deref(), Some("sa"));
    assert_eq!(config.password.as_ref().map(|p| p.expose()), Some("p;ss"));
    assert!(config.encryption.encrypt);
    assert_eq!(config.packet_size, PacketSize::ServerDefault);
    assert_eq!(config.timeouts.lock_timeout, Some(Duration::ZERO));
    assert_eq!(config.timeouts.query_timeout, None);
    assert_eq!(config.application_intent, ApplicationIntent::ReadOnly);
    assert!(config.validate().is_ok());
    assert!(!format!("{config:?}").contains("p;ss"));
}

#[test]
fn test_login_config_defaults_match_catalog() {
    let config = LoginConfig::from_url("jdbc:sqlserver://localhost").unwrap();
    assert_eq!(config, LoginConfig::default());
}

#[test]
fn test_login_config_zero_login_timeout_uses_default() {
    let config = LoginConfig::from_url("jdbc:sqlserver://db;loginTimeout=0").unwrap();
    assert_eq!(config.timeouts.login_timeout, Duration::from_secs(15));
}

#[test]
fn test_login_config_rejects_foreign_url() {
    assert!(matches!(
        LoginConfig::from_url("jdbc:oracle:thin:@db:1521"),
        Err(Error::InvalidUrl { .. })
    ));
}

#[test]
fn test_login_config_builder_validation() {
    let config = LoginConfig::new()
        .failover_partner("mirror")
        .multi_subnet_failover(true);
    assert!(matches!(
        config.validate(),
        Err(Error::ConflictingProperties { .. })
    ));

    assert!(LoginConfig::new().host("").validate().is_err());
}

// ============================================================================
// Property Tests
// ============================================================================

fn scramble_case(name: &str, flips: &[bool]) -> String {
    name.chars()
        .zip(flips.iter().cycle())
        .map(|(c, &flip)| {
            if flip {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_supplied_value_wins(url_db in "[a-z][a-z0-9_]{0,15}", supplied_db in "[a-z][a-z0-9_]{0,15}") {
        let url = format!("jdbc:sqlserver://db;databaseName={url_db}");
        let supplied = PropertySet::new().with("databaseName", supplied_db.as_str());
        let resolved = resolve(&url, &supplied).unwrap();
        prop_assert_eq!(resolved.get_str(names::DATABASE_NAME), Some(supplied_db.as_str()));
    }

    #[test]
    fn prop_normalize_ignores_case(index in 0usize..32, flips in proptest::collection::vec(any::<bool>(), 1..8)) {
        let catalog = PropertyCatalog::standard();
        let entries: Vec<_> = catalog.url_settable().collect();
        let entry = entries[index % entries.len()];
        let key = scramble_case(entry.name, &flips);
        prop_assert_eq!(catalog.normalize(&key).unwrap(), entry.name);
    }

    #[test]
    fn prop_resolution_is_idempotent(port in 1u16..=65535, timeout in 0i64..=600) {
        let url = format!("jdbc:sqlserver://db:{port};loginTimeout={timeout}");
        let first = resolve(&url, &PropertySet::new()).unwrap();

        // Feeding the resolved values back in changes nothing.
        let supplied: PropertySet = first
            .iter()
            .filter(|(_, value)| value.as_str() != Some(""))
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        let second = resolve(&url, &supplied).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_merge_overlay_wins_and_base_survives(
        in_base in proptest::collection::vec(any::<bool>(), 128),
        in_overlay in proptest::collection::vec(any::<bool>(), 128),
    ) {
        let resolver = PropertyResolver::standard();
        let entries = resolver.catalog().entries();

        let mut base = PropertySet::new();
        let mut overlay = PropertySet::new().with("notInCatalog", "stray");
        for (i, entry) in entries.iter().enumerate() {
            if in_base[i % 128] {
                base.insert(entry.name, format!("base-{i}"));
            }
            if in_overlay[i % 128] {
                overlay.insert(entry.name, format!("overlay-{i}"));
            }
        }

        let merged = resolver.merge(base, &overlay);
        for (i, entry) in entries.iter().enumerate() {
            let expected = if in_overlay[i % 128] {
                Some(format!("overlay-{i}"))
            } else if in_base[i % 128] {
                Some(format!("base-{i}"))
            } else {
                None
            };
            prop_assert_eq!(merged.get(entry.name).map(str::to_owned), expected, "{}", entry.name);
        }
        prop_assert!(!merged.contains_key("notInCatalog"));
    }

    #[test]
    fn prop_port_range(port in any::<i64>()) {
        let url = format!("jdbc:sqlserver://db;portNumber={port}");
        let result = resolve(&url, &PropertySet::new());
        prop_assert_eq!(result.is_ok(), (0..=65535).contains(&port));
    }
}
