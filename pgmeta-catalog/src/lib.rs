pub mod cache;
pub mod error;
pub mod ident;
pub mod mem_impl;
pub mod monitor;
pub mod query;
pub mod relkind;
pub mod row;
pub mod source;

pub use cache::*;
pub use monitor::Monitor;
pub use query::CatalogQuery;
pub use relkind::RelKind;
pub use row::Row;
pub use source::CatalogSource;

use bitflags::bitflags;
use std::fmt;

/// Object identifier assigned by the catalog.
/// Unique within one database, never reused while the object exists.
pub type Oid = u64;
pub type RoleID = Oid;
pub type SchemaID = Oid;
pub type ClassID = Oid;
pub type ProcID = Oid;

/// Oid 0 means "unset".
pub const INVALID_OID: Oid = 0;

/// Every loaded catalog object is addressable by oid and name.
pub trait CatalogObject: Send + Sync {
    fn oid(&self) -> Oid;

    fn name(&self) -> &str;
}

/// Kind of a catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Database,
    Role,
    Schema,
    Table,
    View,
    MaterializedView,
    PartitionedTable,
    ForeignTable,
    Column,
    Index,
    Sequence,
    CompositeType,
    Type,
    Domain,
    Function,
    Procedure,
    Aggregate,
    Trigger,
    Extension,
    Tablespace,
    ForeignDataWrapper,
    ForeignServer,
    Language,
}

impl ObjectKind {
    /// Roles are the subject of grants rather than their object.
    #[inline]
    pub fn is_role_like(self) -> bool {
        matches!(self, ObjectKind::Role)
    }

    #[inline]
    pub fn is_table_like(self) -> bool {
        matches!(
            self,
            ObjectKind::Table
                | ObjectKind::View
                | ObjectKind::MaterializedView
                | ObjectKind::PartitionedTable
                | ObjectKind::ForeignTable
        )
    }

    #[inline]
    pub fn is_routine(self) -> bool {
        matches!(
            self,
            ObjectKind::Function | ObjectKind::Procedure | ObjectKind::Aggregate
        )
    }

    /// Set representation of this kind.
    #[inline]
    pub fn as_set(self) -> ObjectKinds {
        match self {
            ObjectKind::Database => ObjectKinds::DATABASE,
            ObjectKind::Role => ObjectKinds::ROLE,
            ObjectKind::Schema => ObjectKinds::SCHEMA,
            ObjectKind::Table => ObjectKinds::TABLE,
            ObjectKind::View => ObjectKinds::VIEW,
            ObjectKind::MaterializedView => ObjectKinds::MATERIALIZED_VIEW,
            ObjectKind::PartitionedTable => ObjectKinds::PARTITIONED_TABLE,
            ObjectKind::ForeignTable => ObjectKinds::FOREIGN_TABLE,
            ObjectKind::Column => ObjectKinds::COLUMN,
            ObjectKind::Index => ObjectKinds::INDEX,
            ObjectKind::Sequence => ObjectKinds::SEQUENCE,
            ObjectKind::CompositeType => ObjectKinds::COMPOSITE_TYPE,
            ObjectKind::Type => ObjectKinds::TYPE,
            ObjectKind::Domain => ObjectKinds::DOMAIN,
            ObjectKind::Function => ObjectKinds::FUNCTION,
            ObjectKind::Procedure => ObjectKinds::PROCEDURE,
            ObjectKind::Aggregate => ObjectKinds::AGGREGATE,
            ObjectKind::Trigger => ObjectKinds::TRIGGER,
            ObjectKind::Extension => ObjectKinds::EXTENSION,
            ObjectKind::Tablespace => ObjectKinds::TABLESPACE,
            ObjectKind::ForeignDataWrapper => ObjectKinds::FOREIGN_DATA_WRAPPER,
            ObjectKind::ForeignServer => ObjectKinds::FOREIGN_SERVER,
            ObjectKind::Language => ObjectKinds::LANGUAGE,
        }
    }

    /// Keyword used in CREATE, ALTER and COMMENT statements.
    #[inline]
    pub fn sql_keyword(self) -> &'static str {
        match self {
            ObjectKind::Database => "DATABASE",
            ObjectKind::Role => "ROLE",
            ObjectKind::Schema => "SCHEMA",
            ObjectKind::Table
            | ObjectKind::PartitionedTable
            | ObjectKind::Column => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::MaterializedView => "MATERIALIZED VIEW",
            ObjectKind::ForeignTable => "FOREIGN TABLE",
            ObjectKind::Index => "INDEX",
            ObjectKind::Sequence => "SEQUENCE",
            ObjectKind::CompositeType | ObjectKind::Type => "TYPE",
            ObjectKind::Domain => "DOMAIN",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Aggregate => "AGGREGATE",
            ObjectKind::Trigger => "TRIGGER",
            ObjectKind::Extension => "EXTENSION",
            ObjectKind::Tablespace => "TABLESPACE",
            ObjectKind::ForeignDataWrapper => "FOREIGN DATA WRAPPER",
            ObjectKind::ForeignServer => "SERVER",
            ObjectKind::Language => "LANGUAGE",
        }
    }

    /// Object type keyword of `GRANT ... ON <kind>` and `REVOKE`.
    ///
    /// GRANT names every relation TABLE except sequences, and
    /// aggregates are granted as functions.
    #[inline]
    pub fn grant_keyword(self) -> &'static str {
        match self {
            ObjectKind::Table
            | ObjectKind::View
            | ObjectKind::MaterializedView
            | ObjectKind::PartitionedTable
            | ObjectKind::ForeignTable
            | ObjectKind::Column => "TABLE",
            ObjectKind::Function | ObjectKind::Aggregate => "FUNCTION",
            ObjectKind::ForeignServer => "FOREIGN SERVER",
            kind => kind.sql_keyword(),
        }
    }
}

impl fmt::Display for ObjectKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_keyword())
    }
}

bitflags! {
    /// Set of object kinds, used by privilege types to declare
    /// what they can be granted on.
    pub struct ObjectKinds: u32 {
        const DATABASE = 1 << 0;
        const ROLE = 1 << 1;
        const SCHEMA = 1 << 2;
        const TABLE = 1 << 3;
        const VIEW = 1 << 4;
        const MATERIALIZED_VIEW = 1 << 5;
        const PARTITIONED_TABLE = 1 << 6;
        const FOREIGN_TABLE = 1 << 7;
        const COLUMN = 1 << 8;
        const INDEX = 1 << 9;
        const SEQUENCE = 1 << 10;
        const COMPOSITE_TYPE = 1 << 11;
        const TYPE = 1 << 12;
        const DOMAIN = 1 << 13;
        const FUNCTION = 1 << 14;
        const PROCEDURE = 1 << 15;
        const AGGREGATE = 1 << 16;
        const TRIGGER = 1 << 17;
        const EXTENSION = 1 << 18;
        const TABLESPACE = 1 << 19;
        const FOREIGN_DATA_WRAPPER = 1 << 20;
        const FOREIGN_SERVER = 1 << 21;
        const LANGUAGE = 1 << 22;
        // all relation kinds privileges on tables apply to.
        const TABLES = Self::TABLE.bits
            | Self::VIEW.bits
            | Self::MATERIALIZED_VIEW.bits
            | Self::PARTITIONED_TABLE.bits
            | Self::FOREIGN_TABLE.bits;
        const ROUTINES = Self::FUNCTION.bits | Self::PROCEDURE.bits | Self::AGGREGATE.bits;
    }
}

impl ObjectKinds {
    #[inline]
    pub fn contains_kind(&self, kind: ObjectKind) -> bool {
        self.contains(kind.as_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_kinds() {
        assert!(ObjectKinds::TABLES.contains_kind(ObjectKind::View));
        assert!(ObjectKinds::TABLES.contains_kind(ObjectKind::ForeignTable));
        assert!(!ObjectKinds::TABLES.contains_kind(ObjectKind::Sequence));
        assert!(ObjectKinds::ROUTINES.contains_kind(ObjectKind::Aggregate));
        assert!(ObjectKind::Role.is_role_like());
        assert!(!ObjectKind::Schema.is_role_like());
        assert_eq!(ObjectKind::ForeignServer.sql_keyword(), "SERVER");
        assert_eq!(ObjectKind::MaterializedView.to_string(), "MATERIALIZED VIEW");
    }

    #[test]
    fn test_grant_keyword() {
        for kind in [
            ObjectKind::Table,
            ObjectKind::View,
            ObjectKind::MaterializedView,
            ObjectKind::PartitionedTable,
            ObjectKind::ForeignTable,
        ] {
            assert_eq!(kind.grant_keyword(), "TABLE");
        }
        assert_eq!(ObjectKind::Aggregate.grant_keyword(), "FUNCTION");
        assert_eq!(ObjectKind::ForeignServer.grant_keyword(), "FOREIGN SERVER");
        assert_eq!(ObjectKind::Sequence.grant_keyword(), "SEQUENCE");
        assert_eq!(ObjectKind::Procedure.grant_keyword(), "PROCEDURE");
        assert_eq!(ObjectKind::ForeignDataWrapper.grant_keyword(), "FOREIGN DATA WRAPPER");
    }
}
