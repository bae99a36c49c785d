//! TDS protocol version and the type-system features it gates.

use core::fmt;

/// TDS protocol version negotiated at login.
///
/// The client uses it to decide which parts of the type system the server
/// understands: the SQL Server 2008 temporal types and the bounded type
/// names reported in place of legacy and `(MAX)` types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TdsVersion(u32);

impl TdsVersion {
    /// TDS 7.0 (SQL Server 7.0)
    pub const V7_0: Self = Self(0x70000000);

    /// TDS 7.1 (SQL Server 2000)
    pub const V7_1: Self = Self(0x71000000);

    /// TDS 7.2 (SQL Server 2005)
    pub const V7_2: Self = Self(0x72090002);

    /// TDS 7.3A (SQL Server 2008)
    pub const V7_3A: Self = Self(0x730A0003);

    /// TDS 7.3B (SQL Server 2008 R2)
    pub const V7_3B: Self = Self(0x730B0003);

    /// TDS 7.4 (SQL Server 2012+)
    pub const V7_4: Self = Self(0x74000004);

    /// TDS 8.0 (SQL Server 2022+ strict encryption mode)
    pub const V8_0: Self = Self(0x08000000);

    /// Create a version from its wire value.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    const fn is_tds_8(self) -> bool {
        self.0 == Self::V8_0.0
    }

    /// Whether DATE, TIME, DATETIME2 and DATETIMEOFFSET exist (TDS 7.3,
    /// SQL Server 2008).
    ///
    /// Servers at this level also report legacy and `(MAX)` types under
    /// their canonical bounded names; see [`SsType::canonical`](crate::SsType::canonical).
    #[must_use]
    pub const fn supports_date_time_types(self) -> bool {
        self.is_tds_8() || self.0 >= Self::V7_3A.0
    }

    const fn label(self) -> Option<&'static str> {
        match self.0 {
            0x70000000 => Some("7.0"),
            0x71000000 | 0x71000001 => Some("7.1"),
            0x72090002 => Some("7.2"),
            0x730A0003 => Some("7.3A"),
            0x730B0003 => Some("7.3B"),
            0x74000004 => Some("7.4"),
            0x08000000 => Some("8.0"),
            _ => None,
        }
    }
}

impl Default for TdsVersion {
    fn default() -> Self {
        Self::V7_4
    }
}

impl fmt::Display for TdsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "TDS {label}"),
            None => write!(f, "TDS 0x{:08X}", self.0),
        }
    }
}
