use crate::privilege_type::PrivilegeType;
use crate::role_ref::RoleRef;
use pgmeta_catalog::ident::{qualified_name, quote_ident};
use pgmeta_catalog::{ObjectKind, Row};
use semistr::SemiStr;

pub const COL_GRANTOR: &str = "grantor";
pub const COL_GRANTEE: &str = "grantee";
pub const COL_PRIVILEGE_TYPE: &str = "privilege_type";
pub const COL_IS_GRANTABLE: &str = "is_grantable";
pub const COL_WITH_HIERARCHY: &str = "with_hierarchy";
pub const COL_TABLE_CATALOG: &str = "table_catalog";
pub const COL_TABLE_SCHEMA: &str = "table_schema";
pub const COL_TABLE_NAME: &str = "table_name";
pub const COL_COLUMN_NAME: &str = "column_name";
pub const COL_SPECIFIC_CATALOG: &str = "specific_catalog";
pub const COL_SPECIFIC_SCHEMA: &str = "specific_schema";
pub const COL_SPECIFIC_NAME: &str = "specific_name";
pub const COL_OBJECT_CATALOG: &str = "object_catalog";
pub const COL_OBJECT_SCHEMA: &str = "object_schema";
pub const COL_OBJECT_NAME: &str = "object_name";

/// Kind of object a grant row describes.
/// Decides which name columns the row carries.
///
/// Database level kinds only come from ACL columns, their rows
/// use the `object_*` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantKind {
    Schema,
    Table,
    Sequence,
    Function,
    Procedure,
    Column,
    Type,
    Database,
    Tablespace,
    ForeignDataWrapper,
    ForeignServer,
}

impl GrantKind {
    #[inline]
    pub fn object_kind(self) -> ObjectKind {
        match self {
            GrantKind::Schema => ObjectKind::Schema,
            GrantKind::Table => ObjectKind::Table,
            GrantKind::Sequence => ObjectKind::Sequence,
            GrantKind::Function => ObjectKind::Function,
            GrantKind::Procedure => ObjectKind::Procedure,
            GrantKind::Column => ObjectKind::Column,
            GrantKind::Type => ObjectKind::Type,
            GrantKind::Database => ObjectKind::Database,
            GrantKind::Tablespace => ObjectKind::Tablespace,
            GrantKind::ForeignDataWrapper => ObjectKind::ForeignDataWrapper,
            GrantKind::ForeignServer => ObjectKind::ForeignServer,
        }
    }

    #[inline]
    pub fn from_object_kind(kind: ObjectKind) -> Option<GrantKind> {
        let res = match kind {
            ObjectKind::Schema => GrantKind::Schema,
            k if k.is_table_like() => GrantKind::Table,
            ObjectKind::Sequence => GrantKind::Sequence,
            ObjectKind::Function | ObjectKind::Aggregate => GrantKind::Function,
            ObjectKind::Procedure => GrantKind::Procedure,
            ObjectKind::Column => GrantKind::Column,
            ObjectKind::Type | ObjectKind::CompositeType | ObjectKind::Domain => GrantKind::Type,
            ObjectKind::Database => GrantKind::Database,
            ObjectKind::Tablespace => GrantKind::Tablespace,
            ObjectKind::ForeignDataWrapper => GrantKind::ForeignDataWrapper,
            ObjectKind::ForeignServer => GrantKind::ForeignServer,
            _ => return None,
        };
        Some(res)
    }

    /// Hierarchy flag only exists for table-like grants.
    #[inline]
    pub fn has_hierarchy(self) -> bool {
        matches!(self, GrantKind::Table)
    }

    #[inline]
    pub fn is_routine(self) -> bool {
        matches!(self, GrantKind::Function | GrantKind::Procedure)
    }
}

/// Name of the object a grant applies to.
/// Any part may be missing if the row did not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub catalog: Option<SemiStr>,
    pub schema: Option<SemiStr>,
    pub name: Option<SemiStr>,
    pub column: Option<SemiStr>,
}

impl ObjectRef {
    #[inline]
    pub fn new(catalog: &str, schema: &str, name: &str) -> Self {
        ObjectRef {
            catalog: Some(SemiStr::new(catalog)),
            schema: Some(SemiStr::new(schema)),
            name: Some(SemiStr::new(name)),
            column: None,
        }
    }

    /// Reference to a schema itself, which has no parent schema.
    #[inline]
    pub fn schema(catalog: &str, schema: &str) -> Self {
        ObjectRef::global(catalog, schema)
    }

    /// Reference to an object that belongs to no schema, such as a
    /// tablespace, foreign server or the database itself.
    #[inline]
    pub fn global(catalog: &str, name: &str) -> Self {
        ObjectRef {
            catalog: Some(SemiStr::new(catalog)),
            schema: None,
            name: Some(SemiStr::new(name)),
            column: None,
        }
    }

    #[inline]
    pub fn with_column(mut self, column: &str) -> Self {
        self.column = Some(SemiStr::new(column));
        self
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.as_str())
    }

    #[inline]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_ref().map(|n| n.as_str())
    }

    /// Quoted `schema.name`, or just the name when schema is absent.
    #[inline]
    pub fn qualified_name(&self) -> String {
        match (self.schema_name(), self.name()) {
            (Some(schema), Some(name)) => qualified_name(schema, name),
            (None, Some(name)) => quote_ident(name),
            (Some(schema), None) => quote_ident(schema),
            (None, None) => String::from("?"),
        }
    }

    #[inline]
    fn from_row(row: &Row, catalog: &str, schema: &str, name: &str) -> Self {
        ObjectRef {
            catalog: row.semistr(catalog),
            schema: row.semistr(schema),
            name: row.semistr(name),
            column: None,
        }
    }
}

/// One privilege granted on one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegeGrant {
    pub kind: GrantKind,
    pub grantor: Option<RoleRef>,
    pub grantee: Option<RoleRef>,
    pub object: ObjectRef,
    pub privilege_type: PrivilegeType,
    pub grantable: bool,
    pub with_hierarchy: Option<bool>,
}

impl PrivilegeGrant {
    #[inline]
    pub fn new(
        kind: GrantKind,
        grantor: Option<RoleRef>,
        grantee: Option<RoleRef>,
        object: ObjectRef,
        privilege_type: PrivilegeType,
        grantable: bool,
    ) -> Self {
        PrivilegeGrant {
            kind,
            grantor,
            grantee,
            object,
            privilege_type,
            grantable,
            with_hierarchy: if kind.has_hierarchy() {
                Some(false)
            } else {
                None
            },
        }
    }

    #[inline]
    pub fn with_hierarchy(mut self, with_hierarchy: bool) -> Self {
        if self.kind.has_hierarchy() {
            self.with_hierarchy = Some(with_hierarchy);
        }
        self
    }

    /// Build grant from one privilege row.
    ///
    /// Grantor and grantee are omitted when their column is null,
    /// which is different from the PUBLIC pseudo-role. Missing columns
    /// leave fields unset instead of rejecting the row.
    pub fn from_row(kind: GrantKind, database: &str, row: &Row) -> Self {
        let role_ref = |col: &str| row.str(col).map(|name| RoleRef::new(database, name));
        let privilege_type = match row.str(COL_PRIVILEGE_TYPE) {
            Some(name) => PrivilegeType::from_name(name),
            None => {
                log::warn!("{:?} grant row without privilege type", kind);
                PrivilegeType::Unknown
            }
        };
        let mut with_hierarchy = None;
        let object = match kind {
            GrantKind::Function | GrantKind::Procedure => ObjectRef::from_row(
                row,
                COL_SPECIFIC_CATALOG,
                COL_SPECIFIC_SCHEMA,
                COL_SPECIFIC_NAME,
            ),
            GrantKind::Sequence
            | GrantKind::Type
            | GrantKind::Schema
            | GrantKind::Database
            | GrantKind::Tablespace
            | GrantKind::ForeignDataWrapper
            | GrantKind::ForeignServer => {
                ObjectRef::from_row(row, COL_OBJECT_CATALOG, COL_OBJECT_SCHEMA, COL_OBJECT_NAME)
            }
            GrantKind::Column => {
                let mut obj =
                    ObjectRef::from_row(row, COL_TABLE_CATALOG, COL_TABLE_SCHEMA, COL_TABLE_NAME);
                obj.column = row.semistr(COL_COLUMN_NAME);
                obj
            }
            GrantKind::Table => {
                with_hierarchy = Some(row.flag(COL_WITH_HIERARCHY));
                ObjectRef::from_row(row, COL_TABLE_CATALOG, COL_TABLE_SCHEMA, COL_TABLE_NAME)
            }
        };
        PrivilegeGrant {
            kind,
            grantor: role_ref(COL_GRANTOR),
            grantee: role_ref(COL_GRANTEE),
            object,
            privilege_type,
            grantable: row.flag(COL_IS_GRANTABLE),
            with_hierarchy,
        }
    }

    /// Grant to PUBLIC. A grant without grantee is not public.
    #[inline]
    pub fn is_public(&self) -> bool {
        self.grantee.as_ref().is_some_and(|g| g.is_public())
    }

    #[inline]
    pub fn grantee_name(&self) -> Option<&str> {
        self.grantee.as_ref().map(|g| g.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_grant_from_row() {
        let row = Row::new()
            .with(COL_GRANTOR, "alice")
            .with(COL_GRANTEE, "bob")
            .with(COL_TABLE_CATALOG, "shop")
            .with(COL_TABLE_SCHEMA, "public")
            .with(COL_TABLE_NAME, "orders")
            .with(COL_PRIVILEGE_TYPE, "SELECT")
            .with(COL_IS_GRANTABLE, "YES")
            .with(COL_WITH_HIERARCHY, "NO");
        let grant = PrivilegeGrant::from_row(GrantKind::Table, "shop", &row);
        assert_eq!(grant.grantor.as_ref().unwrap().name(), "alice");
        assert_eq!(grant.grantee_name(), Some("bob"));
        assert_eq!(grant.object.qualified_name(), "public.orders");
        assert_eq!(grant.privilege_type, PrivilegeType::Select);
        assert!(grant.grantable);
        assert_eq!(grant.with_hierarchy, Some(false));
    }

    #[test]
    fn test_routine_grant_from_row() {
        let row = Row::new()
            .with(COL_GRANTOR, "postgres")
            .with(COL_GRANTEE, "PUBLIC")
            .with(COL_SPECIFIC_CATALOG, "shop")
            .with(COL_SPECIFIC_SCHEMA, "public")
            .with(COL_SPECIFIC_NAME, "order_total_16420")
            .with(COL_PRIVILEGE_TYPE, "EXECUTE")
            .with(COL_IS_GRANTABLE, "NO");
        let grant = PrivilegeGrant::from_row(GrantKind::Function, "shop", &row);
        assert!(grant.is_public());
        assert_eq!(grant.object.name(), Some("order_total_16420"));
        assert_eq!(grant.privilege_type, PrivilegeType::Execute);
        assert_eq!(grant.with_hierarchy, None);
    }

    #[test]
    fn test_null_grantee_is_not_public() {
        let row = Row::new()
            .with_null(COL_GRANTOR)
            .with_null(COL_GRANTEE)
            .with(COL_OBJECT_SCHEMA, "public")
            .with(COL_OBJECT_NAME, "order_seq")
            .with(COL_PRIVILEGE_TYPE, "USAGE");
        let grant = PrivilegeGrant::from_row(GrantKind::Sequence, "shop", &row);
        assert!(grant.grantor.is_none());
        assert!(grant.grantee.is_none());
        assert!(!grant.is_public());

        let row = Row::new()
            .with(COL_GRANTEE, "")
            .with(COL_PRIVILEGE_TYPE, "USAGE");
        let grant = PrivilegeGrant::from_row(GrantKind::Sequence, "shop", &row);
        assert!(grant.is_public());
    }

    #[test]
    fn test_partial_grant_row() {
        // no privilege type, no names: keeps what is there.
        let row = Row::new().with(COL_GRANTEE, "bob").with(COL_COLUMN_NAME, "amount");
        let grant = PrivilegeGrant::from_row(GrantKind::Column, "shop", &row);
        assert_eq!(grant.privilege_type, PrivilegeType::Unknown);
        assert_eq!(grant.object.column.as_ref().map(|c| c.as_str()), Some("amount"));
        assert!(grant.object.name.is_none());
        assert!(!grant.grantable);
    }

    #[test]
    fn test_global_object_ref() {
        let fast = ObjectRef::global("shop", "Fast SSD");
        assert_eq!(fast.catalog.as_ref().map(|c| c.as_str()), Some("shop"));
        assert!(fast.schema_name().is_none());
        assert_eq!(fast.name(), Some("Fast SSD"));
        assert_eq!(fast.qualified_name(), "\"Fast SSD\"");

        let orders = ObjectRef::new("shop", "public", "orders");
        assert_eq!(orders.qualified_name(), "public.orders");
    }
}
