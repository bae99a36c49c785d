//! Connection property catalog.
//!
//! The catalog is the closed list of properties this driver understands:
//! one canonical name per property, its default, how its value is parsed,
//! whether it may appear in a URL, and an alternate-spelling table. Keys are
//! matched case-insensitively everywhere.
//!
//! [`PropertyCatalog::standard`] is the catalog used by default. Resolvers
//! borrow a catalog explicitly, so tests can supply their own through
//! [`PropertyCatalog::new`].

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::settings::{
    ApplicationIntent, AuthenticationScheme, ColumnEncryptionSetting, KeyStoreAuthentication,
    ResponseBuffering, SelectMethod, Setting, SqlAuthentication,
};

/// Canonical property names of the standard catalog.
pub mod names {
    #![allow(missing_docs)]

    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const APPLICATION_INTENT: &str = "applicationIntent";
    pub const APPLICATION_NAME: &str = "applicationName";
    pub const AUTHENTICATION: &str = "authentication";
    pub const AUTHENTICATION_SCHEME: &str = "authenticationScheme";
    pub const COLUMN_ENCRYPTION_SETTING: &str = "columnEncryptionSetting";
    pub const DATABASE_NAME: &str = "databaseName";
    pub const DISABLE_STATEMENT_POOLING: &str = "disableStatementPooling";
    pub const ENCRYPT: &str = "encrypt";
    pub const FAILOVER_PARTNER: &str = "failoverPartner";
    pub const FIPS_PROVIDER: &str = "fipsProvider";
    pub const HOST_NAME_IN_CERTIFICATE: &str = "hostNameInCertificate";
    pub const INSTANCE_NAME: &str = "instanceName";
    pub const INTEGRATED_SECURITY: &str = "integratedSecurity";
    pub const KEY_STORE_AUTHENTICATION: &str = "keyStoreAuthentication";
    pub const KEY_STORE_LOCATION: &str = "keyStoreLocation";
    pub const KEY_STORE_SECRET: &str = "keyStoreSecret";
    pub const LAST_UPDATE_COUNT: &str = "lastUpdateCount";
    pub const LOCK_TIMEOUT: &str = "lockTimeout";
    pub const LOGIN_TIMEOUT: &str = "loginTimeout";
    pub const MULTI_SUBNET_FAILOVER: &str = "multiSubnetFailover";
    pub const PACKET_SIZE: &str = "packetSize";
    pub const PASSWORD: &str = "password";
    pub const PORT_NUMBER: &str = "portNumber";
    pub const QUERY_TIMEOUT: &str = "queryTimeout";
    pub const RESPONSE_BUFFERING: &str = "responseBuffering";
    pub const SELECT_METHOD: &str = "selectMethod";
    pub const SEND_STRING_PARAMETERS_AS_UNICODE: &str = "sendStringParametersAsUnicode";
    pub const SEND_TIME_AS_DATETIME: &str = "sendTimeAsDatetime";
    pub const SERVER_NAME: &str = "serverName";
    pub const SERVER_NAME_AS_ACE: &str = "serverNameAsACE";
    pub const SERVER_SPN: &str = "serverSpn";
    pub const SOCKET_TIMEOUT: &str = "socketTimeout";
    pub const TRANSPARENT_NETWORK_IP_RESOLUTION: &str = "TransparentNetworkIPResolution";
    pub const TRUST_SERVER_CERTIFICATE: &str = "trustServerCertificate";
    pub const TRUST_STORE: &str = "trustStore";
    pub const TRUST_STORE_PASSWORD: &str = "trustStorePassword";
    pub const TRUST_STORE_TYPE: &str = "trustStoreType";
    pub const USER: &str = "user";
    pub const WORKSTATION_ID: &str = "workstationID";
    pub const XOPEN_STATES: &str = "xopenStates";
}

/// Default `applicationName` sent in the login record.
pub const DEFAULT_APPLICATION_NAME: &str = "mssql-client";

const TRUE_FALSE: &[&str] = &["true", "false"];
const REDACTED: &str = "<redacted>";

/// How a property's text value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Free text, optionally restricted to a list of choices.
    Str,
    /// `true` or `false`, case-insensitive.
    Bool,
    /// A decimal integer inside one of the listed inclusive ranges.
    Int(&'static [RangeInclusive<i64>]),
}

/// A validated, typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl PropertyValue {
    /// Get the value as a string slice, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a bool, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v) => f.write_str(v),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// One entry of a [`PropertyCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct RecognizedProperty {
    /// Canonical name.
    pub name: &'static str,
    /// Default value, in text form.
    pub default: &'static str,
    /// How the value is parsed.
    pub kind: PropertyKind,
    /// Resolution fails when no source gives this property a non-empty value.
    pub required: bool,
    /// Allowed values (case-insensitive), or `None` when unconstrained.
    pub choices: Option<&'static [&'static str]>,
    /// Whether the property may appear in a connection URL.
    pub settable_via_url: bool,
    /// Whether the value is a credential that must never be shown.
    pub secret: bool,
}

impl RecognizedProperty {
    /// A free-text property.
    #[must_use]
    pub const fn string(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            kind: PropertyKind::Str,
            required: false,
            choices: None,
            settable_via_url: true,
            secret: false,
        }
    }

    /// A boolean property.
    #[must_use]
    pub const fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            kind: PropertyKind::Bool,
            choices: Some(TRUE_FALSE),
            ..Self::string(name, if default { "true" } else { "false" })
        }
    }

    /// An integer property accepting values in any of `ranges`.
    #[must_use]
    pub const fn integer(
        name: &'static str,
        default: &'static str,
        ranges: &'static [RangeInclusive<i64>],
    ) -> Self {
        Self {
            kind: PropertyKind::Int(ranges),
            ..Self::string(name, default)
        }
    }

    /// A text property restricted to the spellings of a [`Setting`].
    #[must_use]
    pub const fn setting<S: Setting>(default: &'static str) -> Self {
        Self::string(S::PROPERTY, default).with_choices(S::NAMES)
    }

    /// Mark the property as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict the property to a list of values.
    #[must_use]
    pub const fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Accept the property only through supplied properties, never a URL.
    #[must_use]
    pub const fn programmatic_only(mut self) -> Self {
        self.settable_via_url = false;
        self
    }

    /// Mark the value as a credential.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Parse and validate a text value for this property.
    ///
    /// Free text is kept as given. Numbers, booleans and choices ignore
    /// surrounding whitespace. An empty value for an optional text property
    /// means "not set" and is accepted even when the property has choices.
    pub fn parse_value(&self, raw: &str) -> Result<PropertyValue> {
        let token = raw.trim();
        match self.kind {
            PropertyKind::Str if self.choices.is_none() => Ok(PropertyValue::Str(raw.to_owned())),
            PropertyKind::Str => {
                if token.is_empty() && !self.required {
                    return Ok(PropertyValue::Str(String::new()));
                }
                self.choose(token).map(|c| PropertyValue::Str(c.to_owned()))
            }
            PropertyKind::Bool => {
                let choice = self.choose(token)?;
                Ok(PropertyValue::Bool(choice.eq_ignore_ascii_case("true")))
            }
            PropertyKind::Int(ranges) => {
                let value: i64 = token.parse().map_err(|_| self.invalid(raw, "expected an integer"))?;
                if ranges.iter().any(|range| range.contains(&value)) {
                    Ok(PropertyValue::Int(value))
                } else {
                    Err(self.invalid(raw, &format!("expected {}", describe_ranges(ranges))))
                }
            }
        }
    }

    fn choose(&self, raw: &str) -> Result<&'static str> {
        let choices = self.choices.unwrap_or(TRUE_FALSE);
        choices
            .iter()
            .copied()
            .find(|choice| choice.eq_ignore_ascii_case(raw))
            .ok_or_else(|| self.invalid(raw, &format!("expected one of {}", choices.join(", "))))
    }

    pub(crate) fn invalid(&self, raw: &str, reason: &str) -> Error {
        Error::InvalidPropertyValue {
            name: self.name.to_owned(),
            value: self.display_value(raw).to_owned(),
            reason: reason.to_owned(),
        }
    }

    /// `value`, or a placeholder when this property is a secret.
    #[must_use]
    pub fn display_value<'v>(&self, value: &'v str) -> &'v str {
        if self.secret { REDACTED } else { value }
    }
}

fn describe_ranges(ranges: &[RangeInclusive<i64>]) -> String {
    let parts: Vec<String> = ranges
        .iter()
        .map(|range| match (*range.start(), *range.end()) {
            (start, end) if start == end => start.to_string(),
            (start, i64::MAX) => format!(">= {start}"),
            (start, end) => format!("{start}..={end}"),
        })
        .collect();
    parts.join(" or ")
}

const NON_NEGATIVE_OR_DISABLED: &[RangeInclusive<i64>] = &[-1..=i64::MAX];
const NON_NEGATIVE: &[RangeInclusive<i64>] = &[0..=i64::MAX];
const U16_RANGE: &[RangeInclusive<i64>] = &[0..=65535];
const PACKET_SIZE_RANGES: &[RangeInclusive<i64>] = &[-1..=-1, 0..=0, 512..=32767];

/// Properties of the standard catalog, in reporting order.
static STANDARD_PROPERTIES: &[RecognizedProperty] = &[
    RecognizedProperty::setting::<ApplicationIntent>("readwrite"),
    RecognizedProperty::string(names::APPLICATION_NAME, DEFAULT_APPLICATION_NAME),
    RecognizedProperty::setting::<ColumnEncryptionSetting>("Disabled"),
    RecognizedProperty::string(names::DATABASE_NAME, ""),
    RecognizedProperty::boolean(names::DISABLE_STATEMENT_POOLING, true).with_choices(&["true"]),
    RecognizedProperty::boolean(names::ENCRYPT, false),
    RecognizedProperty::string(names::FAILOVER_PARTNER, ""),
    RecognizedProperty::string(names::HOST_NAME_IN_CERTIFICATE, ""),
    RecognizedProperty::string(names::INSTANCE_NAME, ""),
    RecognizedProperty::boolean(names::INTEGRATED_SECURITY, false),
    RecognizedProperty::setting::<KeyStoreAuthentication>(""),
    RecognizedProperty::string(names::KEY_STORE_SECRET, "").secret(),
    RecognizedProperty::string(names::KEY_STORE_LOCATION, ""),
    RecognizedProperty::boolean(names::LAST_UPDATE_COUNT, true),
    RecognizedProperty::integer(names::LOCK_TIMEOUT, "-1", NON_NEGATIVE_OR_DISABLED),
    RecognizedProperty::integer(names::LOGIN_TIMEOUT, "15", U16_RANGE),
    RecognizedProperty::boolean(names::MULTI_SUBNET_FAILOVER, false),
    RecognizedProperty::integer(names::PACKET_SIZE, "8000", PACKET_SIZE_RANGES),
    RecognizedProperty::string(names::PASSWORD, "").secret(),
    RecognizedProperty::integer(names::PORT_NUMBER, "1433", U16_RANGE),
    RecognizedProperty::integer(names::QUERY_TIMEOUT, "-1", NON_NEGATIVE_OR_DISABLED),
    RecognizedProperty::setting::<ResponseBuffering>("adaptive"),
    RecognizedProperty::setting::<SelectMethod>("direct"),
    RecognizedProperty::boolean(names::SEND_STRING_PARAMETERS_AS_UNICODE, true),
    RecognizedProperty::boolean(names::SERVER_NAME_AS_ACE, false),
    RecognizedProperty::string(names::SERVER_NAME, "").required(),
    RecognizedProperty::string(names::SERVER_SPN, ""),
    RecognizedProperty::boolean(names::TRANSPARENT_NETWORK_IP_RESOLUTION, true),
    RecognizedProperty::boolean(names::TRUST_SERVER_CERTIFICATE, false),
    RecognizedProperty::string(names::TRUST_STORE_TYPE, "JKS"),
    RecognizedProperty::string(names::TRUST_STORE, ""),
    RecognizedProperty::string(names::TRUST_STORE_PASSWORD, "").secret(),
    RecognizedProperty::boolean(names::SEND_TIME_AS_DATETIME, true),
    RecognizedProperty::string(names::USER, ""),
    RecognizedProperty::string(names::WORKSTATION_ID, ""),
    RecognizedProperty::boolean(names::XOPEN_STATES, false),
    RecognizedProperty::setting::<AuthenticationScheme>("nativeAuthentication"),
    RecognizedProperty::setting::<SqlAuthentication>("NotSpecified"),
    RecognizedProperty::string(names::FIPS_PROVIDER, ""),
    RecognizedProperty::integer(names::SOCKET_TIMEOUT, "0", NON_NEGATIVE),
    RecognizedProperty::string(names::ACCESS_TOKEN, "")
        .programmatic_only()
        .secret(),
];

/// Alternate spellings of the standard catalog.
static STANDARD_SYNONYMS: &[(&str, &str)] = &[
    ("database", names::DATABASE_NAME),
    ("userName", names::USER),
    ("server", names::SERVER_NAME),
    ("port", names::PORT_NUMBER),
];

static STANDARD: Lazy<PropertyCatalog> =
    Lazy::new(|| PropertyCatalog::index(STANDARD_PROPERTIES.to_vec(), STANDARD_SYNONYMS.to_vec()));

/// The closed set of recognized connection properties.
#[derive(Debug, Clone)]
pub struct PropertyCatalog {
    entries: Vec<RecognizedProperty>,
    synonyms: Vec<(&'static str, &'static str)>,
    by_name: HashMap<String, usize>,
    by_synonym: HashMap<String, usize>,
}

impl PropertyCatalog {
    /// The catalog of properties this driver understands.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a catalog from entries and `(synonym, canonical name)` pairs.
    ///
    /// Fails when two entries share a name, a default does not parse, or a
    /// synonym is ambiguous or points at a name that is not in the catalog.
    pub fn new(
        entries: Vec<RecognizedProperty>,
        synonyms: Vec<(&'static str, &'static str)>,
    ) -> Result<Self> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entry in &entries {
            if let Some(previous) = seen.insert(entry.name.to_ascii_lowercase(), entry.name) {
                return Err(Error::InvalidCatalog(format!(
                    "property {} duplicates {previous}",
                    entry.name
                )));
            }
            entry
                .parse_value(entry.default)
                .map_err(|e| Error::InvalidCatalog(format!("bad default: {e}")))?;
        }

        let mut targets: HashMap<String, &str> = HashMap::new();
        for (synonym, target) in &synonyms {
            let key = synonym.to_ascii_lowercase();
            if seen.contains_key(&key) {
                return Err(Error::InvalidCatalog(format!(
                    "synonym {synonym} shadows a property name"
                )));
            }
            let Some(&canonical) = seen.get(&target.to_ascii_lowercase()) else {
                return Err(Error::InvalidCatalog(format!(
                    "synonym {synonym} targets unknown property {target}"
                )));
            };
            if let Some(previous) = targets.insert(key, canonical) {
                if !previous.eq_ignore_ascii_case(target) {
                    return Err(Error::InvalidCatalog(format!(
                        "synonym {synonym} maps to both {previous} and {target}"
                    )));
                }
            }
        }

        Ok(Self::index(entries, synonyms))
    }

    fn index(
        entries: Vec<RecognizedProperty>,
        synonyms: Vec<(&'static str, &'static str)>,
    ) -> Self {
        let by_name: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.to_ascii_lowercase(), i))
            .collect();
        let by_synonym = synonyms
            .iter()
            .filter_map(|(synonym, target)| {
                by_name
                    .get(&target.to_ascii_lowercase())
                    .map(|&i| (synonym.to_ascii_lowercase(), i))
            })
            .collect();

        Self {
            entries,
            synonyms,
            by_name,
            by_synonym,
        }
    }

    /// All entries, in reporting order.
    #[must_use]
    pub fn entries(&self) -> &[RecognizedProperty] {
        &self.entries
    }

    /// Entries that may appear in a URL.
    pub fn url_settable(&self) -> impl Iterator<Item = &RecognizedProperty> {
        self.entries.iter().filter(|entry| entry.settable_via_url)
    }

    /// Entries accepted only through supplied properties.
    pub fn programmatic_only(&self) -> impl Iterator<Item = &RecognizedProperty> {
        self.entries.iter().filter(|entry| !entry.settable_via_url)
    }

    /// `(synonym, canonical name)` pairs.
    #[must_use]
    pub fn synonyms(&self) -> &[(&'static str, &'static str)] {
        &self.synonyms
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by canonical name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecognizedProperty> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// Map a key to the canonical name of a URL-settable property.
    ///
    /// Synonyms are consulted first, then canonical names.
    pub fn normalize(&self, name: &str) -> Result<&'static str> {
        let key = name.to_ascii_lowercase();
        let found = self
            .by_synonym
            .get(&key)
            .or_else(|| self.by_name.get(&key))
            .map(|&i| &self.entries[i])
            .filter(|entry| entry.settable_via_url);

        match found {
            Some(entry) => Ok(entry.name),
            None => Err(Error::UnrecognizedProperty {
                name: name.to_owned(),
            }),
        }
    }

    /// Map a key to the canonical name of a programmatic-only property.
    #[must_use]
    pub fn normalize_programmatic_only(&self, name: &str) -> Option<&'static str> {
        self.get(name)
            .filter(|entry| !entry.settable_via_url)
            .map(|entry| entry.name)
    }

    pub(crate) fn is_secret(&self, name: &str) -> bool {
        self.get(name).is_some_and(|entry| entry.secret)
    }
}

/// An ordered set of raw, unvalidated property values.
///
/// This is what callers supply and what URL parsing produces. A key may be
/// present without a value, which fixup rejects for recognized keys.
///
/// Keys can be tagged as secret so `Debug` hides their values. Sets built
/// by a [`PropertyResolver`](crate::PropertyResolver) tag every property its
/// catalog marks secret; standard credential names are hidden either way.
/// Tags do not take part in equality.
#[derive(Clone, Default, Eq)]
pub struct PropertySet {
    entries: Vec<(String, Option<String>)>,
    secrets: Vec<String>,
}

impl PropertySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a property, replacing an existing value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key.into(), Some(value.into()));
    }

    /// Add a secret property, builder style.
    #[must_use]
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_secret(key, value);
        self
    }

    /// Set a property whose value must never be shown.
    pub fn insert_secret(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert_tagged(key.into(), value.into(), true);
    }

    pub(crate) fn insert_tagged(&mut self, key: String, value: String, secret: bool) {
        if secret && !self.is_secret(&key) {
            self.secrets.push(key.clone());
        }
        self.put(key, Some(value));
    }

    /// Check if `key` is tagged as secret.
    #[must_use]
    pub fn is_secret(&self, key: &str) -> bool {
        self.secrets.iter().any(|k| k == key)
    }

    /// Record a key with no value.
    pub fn insert_absent(&mut self, key: impl Into<String>) {
        self.put(key.into(), None);
    }

    fn put(&mut self, key: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under `key` (exact match).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Check if `key` is present, with or without a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.secrets.retain(|k| k != key);
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        self.entries.remove(index).1
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K, V> FromIterator<(K, V)> for PropertySet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl PartialEq for PropertySet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let standard = PropertyCatalog::standard();
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| {
                let shown = match v {
                    Some(_) if self.is_secret(k) || standard.is_secret(k) => Some(REDACTED),
                    other => other.as_deref(),
                };
                (k, shown)
            }))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let rebuilt = PropertyCatalog::new(
            STANDARD_PROPERTIES.to_vec(),
            STANDARD_SYNONYMS.to_vec(),
        );
        assert!(rebuilt.is_ok());
        assert_eq!(PropertyCatalog::standard().len(), STANDARD_PROPERTIES.len());
    }

    #[test]
    fn test_only_server_name_is_required() {
        let required: Vec<_> = PropertyCatalog::standard()
            .entries()
            .iter()
            .filter(|entry| entry.required)
            .map(|entry| entry.name)
            .collect();
        assert_eq!(required, vec![names::SERVER_NAME]);
    }

    #[test]
    fn test_normalize_synonyms_and_case() {
        let catalog = PropertyCatalog::standard();
        assert_eq!(catalog.normalize("database").unwrap(), names::DATABASE_NAME);
        assert_eq!(catalog.normalize("DATABASENAME").unwrap(), names::DATABASE_NAME);
        assert_eq!(catalog.normalize("UserName").unwrap(), names::USER);
        assert_eq!(catalog.normalize("PORT").unwrap(), names::PORT_NUMBER);
        assert_eq!(
            catalog.normalize("transparentnetworkipresolution").unwrap(),
            names::TRANSPARENT_NETWORK_IP_RESOLUTION
        );
        assert!(matches!(
            catalog.normalize("bogus"),
            Err(Error::UnrecognizedProperty { .. })
        ));
    }

    #[test]
    fn test_access_token_is_programmatic_only() {
        let catalog = PropertyCatalog::standard();
        assert!(catalog.normalize("accessToken").is_err());
        assert_eq!(
            catalog.normalize_programmatic_only("ACCESSTOKEN"),
            Some(names::ACCESS_TOKEN)
        );
        assert_eq!(catalog.normalize_programmatic_only("user"), None);
        assert_eq!(catalog.programmatic_only().count(), 1);
    }

    #[test]
    fn test_parse_values() {
        let catalog = PropertyCatalog::standard();
        let encrypt = catalog.get(names::ENCRYPT).unwrap();
        assert_eq!(encrypt.parse_value("TRUE").unwrap(), PropertyValue::Bool(true));
        assert!(encrypt.parse_value("yes").is_err());

        let intent = catalog.get(names::APPLICATION_INTENT).unwrap();
        assert_eq!(
            intent.parse_value("ReadOnly").unwrap(),
            PropertyValue::Str("readonly".into())
        );

        let pooling = catalog.get(names::DISABLE_STATEMENT_POOLING).unwrap();
        assert!(pooling.parse_value("false").is_err());
    }

    #[test]
    fn test_integer_ranges() {
        let catalog = PropertyCatalog::standard();
        let packet = catalog.get(names::PACKET_SIZE).unwrap();
        assert_eq!(packet.parse_value("-1").unwrap(), PropertyValue::Int(-1));
        assert_eq!(packet.parse_value("0").unwrap(), PropertyValue::Int(0));
        assert_eq!(packet.parse_value("512").unwrap(), PropertyValue::Int(512));
        assert!(packet.parse_value("511").is_err());
        assert!(packet.parse_value("32768").is_err());

        let query = catalog.get(names::QUERY_TIMEOUT).unwrap();
        let err = query.parse_value("-42").unwrap_err();
        assert!(err.to_string().contains(">= -1"));
        assert!(query.parse_value("ten").is_err());
    }

    #[test]
    fn test_empty_optional_choice_is_unset() {
        let catalog = PropertyCatalog::standard();
        let key_store = catalog.get(names::KEY_STORE_AUTHENTICATION).unwrap();
        assert_eq!(key_store.parse_value("").unwrap(), PropertyValue::Str(String::new()));
        assert!(key_store.parse_value("CertificateStore").is_err());
    }

    #[test]
    fn test_invalid_catalogs() {
        let duplicate = PropertyCatalog::new(
            vec![
                RecognizedProperty::string("host", ""),
                RecognizedProperty::string("HOST", ""),
            ],
            vec![],
        );
        assert!(matches!(duplicate, Err(Error::InvalidCatalog(_))));

        let dangling = PropertyCatalog::new(
            vec![RecognizedProperty::string("host", "")],
            vec![("server", "hostName")],
        );
        assert!(matches!(dangling, Err(Error::InvalidCatalog(_))));

        const RETRIES: &[RangeInclusive<i64>] = &[0..=10];
        let bad_default = PropertyCatalog::new(
            vec![RecognizedProperty::integer("retries", "many", RETRIES)],
            vec![],
        );
        assert!(matches!(bad_default, Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_secret_values_are_redacted() {
        let set = PropertySet::new()
            .with("user", "sa")
            .with("password", "hunter2");
        let shown = format!("{set:?}");
        assert!(shown.contains("sa"));
        assert!(!shown.contains("hunter2"));

        let password = PropertyCatalog::standard().get("password").unwrap();
        assert_eq!(password.display_value("hunter2"), "<redacted>");
    }

    #[test]
    fn test_tagged_secrets_are_redacted() {
        let mut set = PropertySet::new()
            .with("vaultKey", "s3cr3t")
            .with_secret("signingKey", "k3y");
        assert!(format!("{set:?}").contains("s3cr3t"));
        assert!(!format!("{set:?}").contains("k3y"));

        set.insert_secret("vaultKey", "s3cr3t");
        assert!(!format!("{set:?}").contains("s3cr3t"));
        assert_eq!(set, PropertySet::new().with("vaultKey", "s3cr3t").with("signingKey", "k3y"));

        set.remove("vaultKey");
        set.insert("vaultKey", "visible");
        assert!(format!("{set:?}").contains("visible"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored_for_keywords() {
        let catalog = PropertyCatalog::standard();
        let encrypt = catalog.get(names::ENCRYPT).unwrap();
        assert_eq!(encrypt.parse_value(" true ").unwrap(), PropertyValue::Bool(true));
        let intent = catalog.get(names::APPLICATION_INTENT).unwrap();
        assert!(intent.parse_value("\tReadOnly").is_ok());
        let port = catalog.get(names::PORT_NUMBER).unwrap();
        assert_eq!(port.parse_value(" 1433 ").unwrap(), PropertyValue::Int(1433));
        let password = catalog.get(names::PASSWORD).unwrap();
        assert_eq!(
            password.parse_value(" pw ").unwrap(),
            PropertyValue::Str(" pw ".to_owned())
        );
    }

    #[test]
    fn test_property_set_replaces_in_place() {
        let mut set: PropertySet = [("a", "1"), ("b", "2")].into_iter().collect();
        set.insert("a", "3");
        set.insert_absent("c");
        let keys: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(set.get("a"), Some("3"));
        assert_eq!(set.get("c"), None);
        assert!(set.contains_key("c"));
        assert_eq!(set.remove("b"), Some("2".into()));
        assert_eq!(set.len(), 2);
    }
}
