//! Typed login configuration.
//!
//! [`LoginConfig`] is what the login and session-setup code consumes. It is
//! built from a [`ResolvedConfiguration`], so every value has already been
//! validated against the catalog, or assembled directly with builder
//! methods.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::properties::{DEFAULT_APPLICATION_NAME, PropertySet, names};
use crate::resolver::{EnvironmentDefaults, PropertyResolver, ResolvedConfiguration};
use crate::settings::{
    ApplicationIntent, AuthenticationScheme, ColumnEncryptionSetting, KeyStoreAuthentication,
    ResponseBuffering, SelectMethod, Setting, SqlAuthentication,
};

/// Login timeout used when the configured value is zero.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(15);

/// A credential string that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The credential itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Network packet size negotiated at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketSize {
    /// Use whatever the server proposes (`-1`).
    ServerDefault,
    /// Use the largest size the server allows (`0`).
    Maximum,
    /// Request a specific size in bytes.
    Bytes(u16),
}

impl Default for PacketSize {
    fn default() -> Self {
        Self::Bytes(8000)
    }
}

/// Timeout configuration.
///
/// Enforcement belongs to the transport; these are only the limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time allowed for the login handshake.
    pub login_timeout: Duration,
    /// Per-statement timeout, `None` for no limit (`-1` or `0`).
    pub query_timeout: Option<Duration>,
    /// Lock wait timeout, `None` to wait indefinitely (`-1`). Zero means
    /// "do not wait".
    pub lock_timeout: Option<Duration>,
    /// Socket read timeout, `None` for no limit (`0`).
    pub socket_timeout: Option<Duration>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            query_timeout: None,
            lock_timeout: None,
            socket_timeout: None,
        }
    }
}

impl TimeoutConfig {
    /// Create a new timeout configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login timeout.
    #[must_use]
    pub fn login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    /// Set the query timeout.
    #[must_use]
    pub fn query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set the lock timeout.
    #[must_use]
    pub fn lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the socket timeout.
    #[must_use]
    pub fn socket_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.socket_timeout = timeout;
        self
    }
}

/// Channel encryption settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionConfig {
    /// Require TLS for the whole session.
    pub encrypt: bool,
    /// Skip server certificate validation.
    pub trust_server_certificate: bool,
    /// Host name expected in the server certificate.
    pub host_name_in_certificate: Option<String>,
    /// Path of the trust store.
    pub trust_store: Option<String>,
    /// Format of the trust store.
    pub trust_store_type: String,
    /// Password of the trust store.
    pub trust_store_password: Option<Secret>,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            encrypt: false,
            trust_server_certificate: false,
            host_name_in_certificate: None,
            trust_store: None,
            trust_store_type: "JKS".to_owned(),
            trust_store_password: None,
        }
    }
}

/// Everything the login handshake needs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct LoginConfig {
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Named instance.
    pub instance: Option<String>,
    /// Initial database.
    pub database: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Login password.
    pub password: Option<Secret>,
    /// Bearer token for token authentication.
    pub access_token: Option<Secret>,
    /// Application name sent in the login record.
    pub application_name: String,
    /// Declared workload.
    pub application_intent: ApplicationIntent,
    /// Client workstation name.
    pub workstation_id: Option<String>,
    /// Network packet size.
    pub packet_size: PacketSize,
    /// Timeouts.
    pub timeouts: TimeoutConfig,
    /// Channel encryption.
    pub encryption: EncryptionConfig,
    /// Database mirroring failover partner.
    pub failover_partner: Option<String>,
    /// Try every address of an availability group listener in parallel.
    pub multi_subnet_failover: bool,
    /// Try resolved addresses one after another with short timeouts.
    pub transparent_network_ip_resolution: bool,
    /// Convert the host name to ASCII Compatible Encoding.
    pub server_name_as_ace: bool,
    /// Use integrated (Windows/Kerberos) authentication.
    pub integrated_security: bool,
    /// Authentication mode.
    pub authentication: SqlAuthentication,
    /// Integrated authentication mechanism.
    pub authentication_scheme: AuthenticationScheme,
    /// Service principal name of the server.
    pub server_spn: Option<String>,
    /// Always Encrypted support.
    pub column_encryption: ColumnEncryptionSetting,
    /// Column master key store unlock mode.
    pub key_store_authentication: Option<KeyStoreAuthentication>,
    /// Column master key store path.
    pub key_store_location: Option<String>,
    /// Column master key store secret.
    pub key_store_secret: Option<Secret>,
    /// Send string parameters as NVARCHAR.
    pub send_string_parameters_as_unicode: bool,
    /// Send time values as DATETIME rather than TIME.
    pub send_time_as_datetime: bool,
    /// Report only the last update count of a batch.
    pub last_update_count: bool,
    /// Report X/Open SQLSTATE codes.
    pub xopen_states: bool,
    /// Result buffering.
    pub response_buffering: ResponseBuffering,
    /// Result production method.
    pub select_method: SelectMethod,
    /// FIPS security provider name.
    pub fips_provider: Option<String>,
    /// Statement pooling is off.
    pub disable_statement_pooling: bool,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 1433,
            instance: None,
            database: None,
            user: None,
            password: None,
            access_token: None,
            application_name: DEFAULT_APPLICATION_NAME.to_owned(),
            application_intent: ApplicationIntent::default(),
            workstation_id: None,
            packet_size: PacketSize::default(),
            timeouts: TimeoutConfig::default(),
            encryption: EncryptionConfig::default(),
            failover_partner: None,
            multi_subnet_failover: false,
            transparent_network_ip_resolution: true,
            server_name_as_ace: false,
            integrated_security: false,
            authentication: SqlAuthentication::default(),
            authentication_scheme: AuthenticationScheme::default(),
            server_spn: None,
            column_encryption: ColumnEncryptionSetting::default(),
            key_store_authentication: None,
            key_store_location: None,
            key_store_secret: None,
            send_string_parameters_as_unicode: true,
            send_time_as_datetime: true,
            last_update_count: true,
            xopen_states: false,
            response_buffering: ResponseBuffering::default(),
            select_method: SelectMethod::default(),
            fips_provider: None,
            disable_statement_pooling: true,
        }
    }
}

impl LoginConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a connection URL with the standard catalog.
    ///
    /// A URL for some other driver is an [`Error::InvalidUrl`].
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with(url, &PropertySet::new())
    }

    /// Resolve a connection URL plus supplied properties with the standard
    /// catalog.
    pub fn from_url_with(url: &str, supplied: &PropertySet) -> Result<Self> {
        let resolved = PropertyResolver::standard()
            .resolve(url, supplied, &EnvironmentDefaults::new())?
            .ok_or_else(|| Error::InvalidUrl {
                reason: "not a SQL Server URL".to_owned(),
            })?;
        Self::from_resolved(&resolved)
    }

    /// Build the typed view of a resolved configuration.
    ///
    /// The configuration must come from a catalog that carries the standard
    /// property names; a missing one is reported as missing.
    pub fn from_resolved(resolved: &ResolvedConfiguration) -> Result<Self> {
        let r = Reader(resolved);

        let login_secs = r.int(names::LOGIN_TIMEOUT)?;
        let timeouts = TimeoutConfig {
            login_timeout: match login_secs {
                0 => DEFAULT_LOGIN_TIMEOUT,
                secs => Duration::from_secs(r.unsigned(names::LOGIN_TIMEOUT, secs)?),
            },
            query_timeout: r.optional_duration(names::QUERY_TIMEOUT, Duration::from_secs, true)?,
            lock_timeout: r.optional_duration(names::LOCK_TIMEOUT, Duration::from_millis, false)?,
            socket_timeout: r.optional_duration(names::SOCKET_TIMEOUT, Duration::from_millis, true)?,
        };

        let packet_size = match r.int(names::PACKET_SIZE)? {
            -1 => PacketSize::ServerDefault,
            0 => PacketSize::Maximum,
            bytes => PacketSize::Bytes(r.narrow(names::PACKET_SIZE, bytes)?),
        };

        let encryption = EncryptionConfig {
            encrypt: r.flag(names::ENCRYPT)?,
            trust_server_certificate: r.flag(names::TRUST_SERVER_CERTIFICATE)?,
            host_name_in_certificate: r.text(names::HOST_NAME_IN_CERTIFICATE),
            trust_store: r.text(names::TRUST_STORE),
            trust_store_type: r.text(names::TRUST_STORE_TYPE).unwrap_or_default(),
            trust_store_password: r.secret(names::TRUST_STORE_PASSWORD),
        };

        let port = r.int(names::PORT_NUMBER)?;

        Ok(Self {
            host: r.text(names::SERVER_NAME).unwrap_or_default(),
            port: r.narrow(names::PORT_NUMBER, port)?,
            instance: r.text(names::INSTANCE_NAME),
            database: r.text(names::DATABASE_NAME),
            user: r.text(names::USER),
            password: r.secret(names::PASSWORD),
            access_token: r.secret(names::ACCESS_TOKEN),
            application_name: r.text(names::APPLICATION_NAME).unwrap_or_default(),
            application_intent: r.setting()?.unwrap_or_default(),
            workstation_id: r.text(names::WORKSTATION_ID),
            packet_size,
            timeouts,
            encryption,
            failover_partner: r.text(names::FAILOVER_PARTNER),
            multi_subnet_failover: r.flag(names::MULTI_SUBNET_FAILOVER)?,
            transparent_network_ip_resolution: r.flag(names::TRANSPARENT_NETWORK_IP_RESOLUTION)?,
            server_name_as_ace: r.flag(names::SERVER_NAME_AS_ACE)?,
            integrated_security: r.flag(names::INTEGRATED_SECURITY)?,
            authentication: r.setting()?.unwrap_or_default(),
            authentication_scheme: r.setting()?.unwrap_or_default(),
            server_spn: r.text(names::SERVER_SPN),
            column_encryption: r.setting()?.unwrap_or_default(),
            key_store_authentication: r.setting()?,
            key_store_location: r.text(names::KEY_STORE_LOCATION),
            key_store_secret: r.secret(names::KEY_STORE_SECRET),
            send_string_parameters_as_unicode: r.flag(names::SEND_STRING_PARAMETERS_AS_UNICODE)?,
            send_time_as_datetime: r.flag(names::SEND_TIME_AS_DATETIME)?,
            last_update_count: r.flag(names::LAST_UPDATE_COUNT)?,
            xopen_states: r.flag(names::XOPEN_STATES)?,
            response_buffering: r.setting()?.unwrap_or_default(),
            select_method: r.setting()?.unwrap_or_default(),
            fips_provider: r.text(names::FIPS_PROVIDER),
            disable_statement_pooling: r.flag(names::DISABLE_STATEMENT_POOLING)?,
        })
    }

    /// Set the server host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the named instance.
    #[must_use]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the initial database.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set SQL Server login credentials.
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(Secret::new(password));
        self
    }

    /// Set a bearer token.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token));
        self
    }

    /// Set the application name.
    #[must_use]
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Set the application intent.
    #[must_use]
    pub fn application_intent(mut self, intent: ApplicationIntent) -> Self {
        self.application_intent = intent;
        self
    }

    /// Set the workstation name.
    #[must_use]
    pub fn workstation_id(mut self, id: impl Into<String>) -> Self {
        self.workstation_id = Some(id.into());
        self
    }

    /// Set the packet size.
    #[must_use]
    pub fn packet_size(mut self, size: PacketSize) -> Self {
        self.packet_size = size;
        self
    }

    /// Set the timeouts.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the channel encryption settings.
    #[must_use]
    pub fn encryption(mut self, encryption: EncryptionConfig) -> Self {
        self.encryption = encryption;
        self
    }

    /// Set the mirroring failover partner.
    #[must_use]
    pub fn failover_partner(mut self, partner: impl Into<String>) -> Self {
        self.failover_partner = Some(partner.into());
        self
    }

    /// Enable or disable multi-subnet failover.
    #[must_use]
    pub fn multi_subnet_failover(mut self, enabled: bool) -> Self {
        self.multi_subnet_failover = enabled;
        self
    }

    /// Set the authentication mode.
    #[must_use]
    pub fn authentication(mut self, authentication: SqlAuthentication) -> Self {
        self.authentication = authentication;
        self
    }

    /// Set the Always Encrypted setting.
    #[must_use]
    pub fn column_encryption(mut self, setting: ColumnEncryptionSetting) -> Self {
        self.column_encryption = setting;
        self
    }

    /// Check cross-property rules on a hand-built configuration.
    pub fn validate(&self) -> Result<()> {
        if self.failover_partner.is_some() && self.multi_subnet_failover {
            return Err(Error::ConflictingProperties {
                first: names::FAILOVER_PARTNER,
                second: names::MULTI_SUBNET_FAILOVER,
            });
        }
        if self.host.is_empty() {
            return Err(Error::MissingRequiredProperty {
                name: names::SERVER_NAME.to_owned(),
            });
        }
        Ok(())
    }
}

struct Reader<'r>(&'r ResolvedConfiguration);

impl Reader<'_> {
    fn missing(name: &str) -> Error {
        Error::MissingRequiredProperty {
            name: name.to_owned(),
        }
    }

    fn text(&self, name: &str) -> Option<String> {
        self.0
            .get_str(name)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    }

    fn secret(&self, name: &str) -> Option<Secret> {
        self.text(name).map(Secret)
    }

    fn flag(&self, name: &str) -> Result<bool> {
        self.0.get_bool(name).ok_or_else(|| Self::missing(name))
    }

    fn int(&self, name: &str) -> Result<i64> {
        self.0.get_int(name).ok_or_else(|| Self::missing(name))
    }

    fn setting<S: Setting>(&self) -> Result<Option<S>> {
        self.0.setting::<S>()
    }

    fn narrow<T: TryFrom<i64>>(&self, name: &str, value: i64) -> Result<T> {
        T::try_from(value).map_err(|_| Error::InvalidPropertyValue {
            name: name.to_owned(),
            value: value.to_string(),
            reason: "out of range".to_owned(),
        })
    }

    fn unsigned(&self, name: &str, value: i64) -> Result<u64> {
        self.narrow(name, value)
    }

    /// `-1` means "no limit", and so does zero when `zero_is_unlimited`.
    fn optional_duration(
        &self,
        name: &str,
        unit: fn(u64) -> Duration,
        zero_is_unlimited: bool,
    ) -> Result<Option<Duration>> {
        match self.int(name)? {
            value if value < 0 => Ok(None),
            0 if zero_is_unlimited => Ok(None),
            value => Ok(Some(unit(self.unsigned(name, value)?))),
        }
    }
}
