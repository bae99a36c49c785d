//! Enumerated connection settings.
//!
//! Each setting is a closed enum whose spellings are listed once, in a
//! table. Parsing is a case-insensitive lookup in that table shared by all
//! settings, and the same table feeds the allowed values of the matching
//! catalog entry.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::properties::names;

/// A closed set of values accepted by one connection property.
pub trait Setting: Copy + PartialEq + 'static {
    /// Canonical name of the property this setting is read from.
    const PROPERTY: &'static str;

    /// Every variant with its canonical spelling.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Canonical spellings, in declaration order.
    const NAMES: &'static [&'static str];

    /// Canonical spelling of this value.
    fn as_str(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, variant)| *variant == self)
            .map_or("", |(name, _)| name)
    }
}

/// Look `value` up in the table of `S`, ignoring case.
pub fn parse_setting<S: Setting>(value: &str) -> Result<S> {
    S::VARIANTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, variant)| *variant)
        .ok_or_else(|| Error::InvalidPropertyValue {
            name: S::PROPERTY.to_owned(),
            value: value.to_owned(),
            reason: format!("expected one of {}", S::NAMES.join(", ")),
        })
}

macro_rules! setting {
    (
        $(#[$meta:meta])*
        pub enum $name:ident for $property:path, default $default:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl Setting for $name {
            const PROPERTY: &'static str = $property;
            const VARIANTS: &'static [(&'static str, Self)] = &[$(($text, Self::$variant)),+];
            const NAMES: &'static [&'static str] = &[$($text),+];
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                parse_setting(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

setting! {
    /// Workload the application declares when connecting to an availability
    /// group listener.
    pub enum ApplicationIntent for names::APPLICATION_INTENT, default ReadWrite {
        /// Read-only workload; may be routed to a readable secondary.
        ReadOnly => "readonly",
        /// Read-write workload.
        ReadWrite => "readwrite",
    }
}

setting! {
    /// Authentication mode used for the login.
    pub enum SqlAuthentication for names::AUTHENTICATION, default NotSpecified {
        /// Use whatever the other credential properties imply.
        NotSpecified => "NotSpecified",
        /// SQL Server login with user name and password.
        SqlPassword => "SqlPassword",
        /// Azure Active Directory user name and password.
        ActiveDirectoryPassword => "ActiveDirectoryPassword",
        /// Azure Active Directory integrated authentication.
        ActiveDirectoryIntegrated => "ActiveDirectoryIntegrated",
    }
}

setting! {
    /// Always Encrypted support for the connection.
    pub enum ColumnEncryptionSetting for names::COLUMN_ENCRYPTION_SETTING, default Disabled {
        /// Encrypt parameters and decrypt results transparently.
        Enabled => "Enabled",
        /// Encrypted columns are returned as ciphertext.
        Disabled => "Disabled",
    }
}

setting! {
    /// How the column master key store is unlocked.
    pub enum KeyStoreAuthentication for names::KEY_STORE_AUTHENTICATION, default JavaKeyStorePassword {
        /// Password-protected key store file.
        JavaKeyStorePassword => "JavaKeyStorePassword",
    }
}

setting! {
    /// Integrated authentication mechanism.
    pub enum AuthenticationScheme for names::AUTHENTICATION_SCHEME, default NativeAuthentication {
        /// Kerberos through a GSS-API implementation.
        JavaKerberos => "javaKerberos",
        /// The platform's native mechanism (SSPI on Windows).
        NativeAuthentication => "nativeAuthentication",
    }
}

setting! {
    /// How much of a result is buffered before it is handed to the caller.
    pub enum ResponseBuffering for names::RESPONSE_BUFFERING, default Adaptive {
        /// Buffer only what is needed.
        Adaptive => "adaptive",
        /// Read the entire result into memory.
        Full => "full",
    }
}

setting! {
    /// How result sets are produced by the server.
    pub enum SelectMethod for names::SELECT_METHOD, default Direct {
        /// Plain result sets.
        Direct => "direct",
        /// Server-side cursors.
        Cursor => "cursor",
    }
}
