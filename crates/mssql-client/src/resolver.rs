//! Connection property resolution.
//!
//! Properties come from three sources, lowest precedence first:
//!
//! 1. the connection URL,
//! 2. environment defaults (only for properties the URL leaves unset),
//! 3. properties supplied by the caller.
//!
//! The merged set is validated against the catalog in one pass. Either every
//! property parses and every policy holds, or resolution fails naming the
//! offending property; nothing partially validated is ever returned.

use std::fmt;

use crate::error::{Error, Result};
use crate::properties::{PropertyCatalog, PropertySet, PropertyValue, names};
use crate::settings::{Setting, parse_setting};
use crate::url;

/// Defaults supplied by the environment the driver runs in.
///
/// These fill in properties the URL does not set. Supplied properties still
/// override them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentDefaults {
    values: PropertySet,
}

impl EnvironmentDefaults {
    /// Create an empty set of defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a default for a property, by canonical name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name, value);
        self
    }

    /// Set the ambient login timeout in seconds. Zero means "not set".
    #[must_use]
    pub fn login_timeout(self, seconds: u32) -> Self {
        if seconds > 0 {
            self.with(names::LOGIN_TIMEOUT, seconds.to_string())
        } else {
            self
        }
    }

    /// Check if no defaults are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fully validated set of connection properties.
///
/// Holds one typed value for every catalog entry, in catalog order, with
/// defaults filled in.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    values: Vec<ResolvedProperty>,
}

#[derive(Clone, PartialEq, Eq)]
struct ResolvedProperty {
    name: &'static str,
    value: PropertyValue,
    secret: bool,
}

impl ResolvedConfiguration {
    /// Value of a property, by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| &p.value)
    }

    /// Text value of a property.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    /// Integer value of a property.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropertyValue::as_int)
    }

    /// Boolean value of a property.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    /// Typed value of an enumerated setting.
    ///
    /// `None` when the property is unset (empty) or not in the catalog.
    pub fn setting<S: Setting>(&self) -> Result<Option<S>> {
        match self.get_str(S::PROPERTY) {
            None | Some("") => Ok(None),
            Some(value) => parse_setting(value).map(Some),
        }
    }

    /// Names and values in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.values.iter().map(|p| (p.name, &p.value))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the configuration holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|p| {
                let shown: &dyn fmt::Debug = if p.secret { &"<redacted>" } else { &p.value };
                (p.name, shown)
            }))
            .finish()
    }
}

/// One row of the property introspection report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct PropertyInfo {
    /// Canonical name.
    pub name: &'static str,
    /// Effective value, or the default. Always empty for secrets.
    pub value: String,
    /// Whether the property must be set.
    pub required: bool,
    /// Allowed values, if constrained.
    pub choices: Option<&'static [&'static str]>,
}

/// Resolves connection properties against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'a> {
    catalog: &'a PropertyCatalog,
}

impl PropertyResolver<'static> {
    /// A resolver over the standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(PropertyCatalog::standard())
    }
}

impl Default for PropertyResolver<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> PropertyResolver<'a> {
    /// A resolver over `catalog`.
    #[must_use]
    pub fn new(catalog: &'a PropertyCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver validates against.
    #[must_use]
    pub fn catalog(&self) -> &'a PropertyCatalog {
        self.catalog
    }

    /// Map a key to its canonical URL-settable property name.
    pub fn normalize(&self, name: &str) -> Result<&'static str> {
        self.catalog.normalize(name)
    }

    /// Parse a URL into raw properties; `None` if the URL is not ours.
    pub fn parse_url(&self, url: &str) -> Result<Option<PropertySet>> {
        url::parse_url(self.catalog, url)
    }

    /// Check if `url` is a well-formed URL for this driver.
    #[must_use]
    pub fn accepts_url(&self, url: &str) -> bool {
        matches!(self.parse_url(url), Ok(Some(_)))
    }

    /// Rename supplied keys to canonical names.
    ///
    /// Keys are tried against URL-settable properties (and synonyms), then
    /// programmatic-only properties. Unknown keys are dropped. A recognized
    /// key without a value is an error.
    pub fn fixup(&self, raw: &PropertySet) -> Result<PropertySet> {
        let mut fixed = PropertySet::new();

        for (key, value) in raw.iter() {
            let name = match self.catalog.normalize(key) {
                Ok(name) => Some(name),
                Err(_) => self.catalog.normalize_programmatic_only(key),
            };
            let Some(name) = name else {
                tracing::trace!(key = %key, "ignoring unknown connection property");
                continue;
            };
            let Some(value) = value else {
                return Err(Error::InvalidPropertyValue {
                    name: key.to_owned(),
                    value: String::new(),
                    reason: "no value supplied".to_owned(),
                });
            };
            let secret = raw.is_secret(key) || self.catalog.is_secret(name);
            fixed.insert_tagged(name.to_owned(), value.to_owned(), secret);
        }

        Ok(fixed)
    }

    /// Overwrite `base` with every catalog property present in `overlay`.
    ///
    /// Keys `overlay` does not set keep their `base` value. Both sets are
    /// expected to use canonical names.
    #[must_use]
    pub fn merge(&self, mut base: PropertySet, overlay: &PropertySet) -> PropertySet {
        for entry in self.catalog.entries() {
            if let Some(value) = overlay.get(entry.name) {
                let secret = entry.secret || overlay.is_secret(entry.name);
                base.insert_tagged(entry.name.to_owned(), value.to_owned(), secret);
            }
        }
        base
    }

    /// Resolve a URL, supplied properties and environment defaults.
    ///
    /// Returns `Ok(None)` when the URL belongs to some other driver.
    pub fn resolve(
        &self,
        url: &str,
        supplied: &PropertySet,
        environment: &EnvironmentDefaults,
    ) -> Result<Option<ResolvedConfiguration>> {
        let Some(mut properties) = self.parse_url(url)? else {
            return Ok(None);
        };

        for (key, value) in environment.values.iter() {
            let (Some(entry), Some(value)) = (self.catalog.get(key), value) else {
                continue;
            };
            if !properties.contains_key(entry.name) {
                properties.insert_tagged(entry.name.to_owned(), value.to_owned(), entry.secret);
            }
        }

        let overlay = self.fixup(supplied)?;
        let merged = self.merge(properties, &overlay);
        self.validate(&merged).map(Some)
    }

    /// Validate canonical raw properties against the catalog.
    pub fn validate(&self, merged: &PropertySet) -> Result<ResolvedConfiguration> {
        let mut values = Vec::with_capacity(self.catalog.len());

        for entry in self.catalog.entries() {
            let raw = merged.get(entry.name);
            if entry.required && raw.is_none_or(|v| v.trim().is_empty()) {
                return Err(Error::MissingRequiredProperty {
                    name: entry.name.to_owned(),
                });
            }
            values.push(ResolvedProperty {
                name: entry.name,
                value: entry.parse_value(raw.unwrap_or(entry.default))?,
                secret: entry.secret,
            });
        }

        let resolved = ResolvedConfiguration { values };
        check_policies(&resolved)?;

        tracing::debug!(properties = resolved.len(), "resolved connection properties");
        Ok(resolved)
    }

    /// Describe every URL-settable property as it would resolve.
    ///
    /// Values are not validated. Fails with [`Error::InvalidUrl`] when the URL
    /// is not ours.
    pub fn property_info(&self, url: &str, supplied: &PropertySet) -> Result<Vec<PropertyInfo>> {
        let Some(parsed) = self.parse_url(url)? else {
            return Err(Error::InvalidUrl {
                reason: format!("not a SQL Server URL (expected {})", url::URL_PREFIX),
            });
        };
        let merged = self.merge(parsed, &self.fixup(supplied)?);

        Ok(self
            .catalog
            .url_settable()
            .map(|entry| PropertyInfo {
                name: entry.name,
                value: if entry.secret {
                    String::new()
                } else {
                    merged.get(entry.name).unwrap_or(entry.default).to_owned()
                },
                required: entry.required,
                choices: entry.choices,
            })
            .collect())
    }
}

fn check_policies(resolved: &ResolvedConfiguration) -> Result<()> {
    let has_partner = resolved
        .get_str(names::FAILOVER_PARTNER)
        .is_some_and(|partner| !partner.is_empty());
    let multi_subnet = resolved
        .get_bool(names::MULTI_SUBNET_FAILOVER)
        .unwrap_or(false);

    if has_partner && multi_subnet {
        return Err(Error::ConflictingProperties {
            first: names::FAILOVER_PARTNER,
            second: names::MULTI_SUBNET_FAILOVER,
        });
    }
    Ok(())
}
