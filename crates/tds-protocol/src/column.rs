//! Column descriptors as delivered in COLMETADATA.

use crate::crypto::CryptoMetadata;
use crate::type_info::TypeInfo;

/// Multi-part name of the table a column belongs to.
///
/// Parts are `server.catalog.schema.object`; absent leading parts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableName {
    /// Linked server name.
    pub server: Option<String>,
    /// Database (catalog) name.
    pub catalog: Option<String>,
    /// Schema name.
    pub schema: Option<String>,
    /// Table or view name.
    pub object: Option<String>,
}

impl TableName {
    /// Build from the parts of a multi-part name, most significant first.
    ///
    /// The last part is always the object; any parts beyond four are ignored
    /// from the left.
    #[must_use]
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        let mut rev = parts.into_iter().rev();

        let object = rev.next();
        let schema = rev.next();
        let catalog = rev.next();
        let server = rev.next();

        Self {
            server,
            catalog,
            schema,
            object,
        }
    }
}

/// One result column: its name, wire type and optional encryption overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ColumnData {
    /// Column name (empty for unnamed expressions).
    pub name: String,
    /// Source table, when the server sent one.
    pub table: Option<TableName>,
    /// Wire type. For an encrypted column this is the ciphertext carrier.
    pub type_info: TypeInfo,
    /// Encryption overlay.
    pub crypto_metadata: Option<CryptoMetadata>,
}

impl ColumnData {
    /// Create a plain column.
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            table: None,
            type_info,
            crypto_metadata: None,
        }
    }

    /// Attach the source table.
    #[must_use]
    pub fn with_table(mut self, table: TableName) -> Self {
        self.table = Some(table);
        self
    }

    /// Attach encryption metadata.
    #[must_use]
    pub fn with_crypto_metadata(mut self, crypto: CryptoMetadata) -> Self {
        self.crypto_metadata = Some(crypto);
        self
    }

    /// Whether the column is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.crypto_metadata.is_some()
    }

    /// The type that describes the column's values.
    ///
    /// This is the encryption base type when one is present, otherwise the
    /// wire type.
    #[must_use]
    pub fn effective_type(&self) -> &TypeInfo {
        match &self.crypto_metadata {
            Some(crypto) => &crypto.base_type,
            None => &self.type_info,
        }
    }
}
