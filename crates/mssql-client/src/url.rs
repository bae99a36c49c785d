//! Connection URL parsing.
//!
//! ```text
//! jdbc:sqlserver://[serverName[\instanceName][:portNumber]][;property=value]*
//! ```
//!
//! The `sqlserver://` prefix is accepted as well, and prefixes match
//! case-insensitively. A value wrapped in `{...}` may contain `;`. Keys are
//! normalized against the URL-settable part of the catalog; keys the catalog
//! does not know are skipped.

use crate::error::{Error, Result};
use crate::properties::{PropertyCatalog, PropertySet, names};

/// Canonical URL prefix.
pub const URL_PREFIX: &str = "jdbc:sqlserver://";

/// Prefix accepted without the `jdbc:` scheme.
pub const SHORT_URL_PREFIX: &str = "sqlserver://";

/// The part of `url` after a recognized prefix, or `None` if the URL
/// belongs to some other driver.
#[must_use]
pub fn strip_prefix(url: &str) -> Option<&str> {
    [URL_PREFIX, SHORT_URL_PREFIX].into_iter().find_map(|prefix| {
        url.get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .and_then(|_| url.get(prefix.len()..))
    })
}

/// Parse `url` into canonical property names and raw values.
///
/// Returns `Ok(None)` when the URL does not belong to this driver. A
/// programmatic-only property named in the URL is an error, as is a
/// malformed segment.
pub fn parse_url(catalog: &PropertyCatalog, url: &str) -> Result<Option<PropertySet>> {
    let Some(rest) = strip_prefix(url) else {
        tracing::debug!("URL is not a SQL Server URL");
        return Ok(None);
    };

    let mut properties = PropertySet::new();
    let (server, params) = match rest.find(';') {
        Some(end) => (&rest[..end], &rest[end..]),
        None => (rest, ""),
    };
    parse_server(server.trim(), &mut properties)?;

    for (key, value) in parse_pairs(params)? {
        match catalog.normalize(key) {
            Ok(name) => {
                properties.insert_tagged(name.to_owned(), value.to_owned(), catalog.is_secret(name));
            }
            Err(err) => {
                if catalog.normalize_programmatic_only(key).is_some() {
                    return Err(err);
                }
                tracing::trace!(key = %key, "ignoring unknown URL property");
            }
        }
    }

    Ok(Some(properties))
}

fn parse_server(server: &str, properties: &mut PropertySet) -> Result<()> {
    if server.is_empty() {
        return Ok(());
    }

    let (host_instance, port) = match server.rsplit_once(':') {
        Some((host, port)) => (host, Some(port.trim())),
        None => (server, None),
    };
    let (host, instance) = match host_instance.split_once('\\') {
        Some((host, instance)) => (host, Some(instance.trim())),
        None => (host_instance, None),
    };

    properties.insert(names::SERVER_NAME, host.trim());
    if let Some(instance) = instance {
        if instance.is_empty() {
            return Err(invalid("empty instance name after '\\'"));
        }
        properties.insert(names::INSTANCE_NAME, instance);
    }
    if let Some(port) = port {
        if port.is_empty() {
            return Err(invalid("empty port number after ':'"));
        }
        properties.insert(names::PORT_NUMBER, port);
    }
    Ok(())
}

/// Split `;key=value` segments, honoring `{...}` quoting.
fn parse_pairs(mut input: &str) -> Result<Vec<(&str, &str)>> {
    let mut pairs = Vec::new();

    loop {
        input = input.trim_start();
        if let Some(after) = input.strip_prefix(';') {
            input = after;
            continue;
        }
        if input.is_empty() {
            return Ok(pairs);
        }

        let Some(delim) = input.find(['=', ';']) else {
            return Err(invalid(&format!("missing '=' in segment {input:?}")));
        };
        if input[delim..].starts_with(';') {
            return Err(invalid(&format!(
                "missing '=' in segment {:?}",
                &input[..delim]
            )));
        }

        let key = input[..delim].trim();
        if key.is_empty() {
            return Err(invalid("empty property name"));
        }

        let rest = input[delim + 1..].trim_start();
        if let Some(braced) = rest.strip_prefix('{') {
            let Some(close) = braced.find('}') else {
                return Err(invalid(&format!("unterminated '{{' in value of {key}")));
            };
            let after = braced[close + 1..].trim_start();
            if !after.is_empty() && !after.starts_with(';') {
                return Err(invalid(&format!("unexpected text after '}}' in value of {key}")));
            }
            pairs.push((key, &braced[..close]));
            input = after;
        } else {
            let end = rest.find(';').unwrap_or(rest.len());
            pairs.push((key, rest[..end].trim_end()));
            input = &rest[end..];
        }
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidUrl {
        reason: reason.to_owned(),
    }
}
