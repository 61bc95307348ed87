use crate::object::column::{Column, HasColumns};
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::qualified_name;
use pgmeta_catalog::{CatalogObject, ClassID, ObjectCache, ObjectKind, Oid, RoleID, Row, SchemaID};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_TYPNAME: &str = "typname";
pub const COL_TYPNAMESPACE: &str = "typnamespace";
pub const COL_SCHEMA_NAME: &str = "schema_name";
pub const COL_TYPOWNER: &str = "typowner";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_TYPRELID: &str = "typrelid";
pub const COL_TYPACL: &str = "typacl";
pub const COL_DESCRIPTION: &str = "description";

/// Composite type. Its attributes live in a `pg_class` entry of
/// kind `c`, which is what namespace lookups find.
#[derive(Debug)]
pub struct CompositeType {
    pub oid: Oid,
    pub name: SemiStr,
    pub schema: SchemaID,
    pub schema_name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub relation: ClassID,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
    columns: ObjectCache<Column>,
}

impl CompositeType {
    pub fn from_row(row: &Row) -> Option<CompositeType> {
        let name = row.semistr(COL_TYPNAME)?;
        Some(CompositeType {
            oid: row.oid(COL_OID),
            name,
            schema: row.oid(COL_TYPNAMESPACE),
            schema_name: row
                .semistr(COL_SCHEMA_NAME)
                .unwrap_or_else(|| SemiStr::new("")),
            owner: row.oid(COL_TYPOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            relation: row.oid(COL_TYPRELID),
            acl: row.text_array(COL_TYPACL),
            description: row.string(COL_DESCRIPTION),
            columns: ObjectCache::new("attributes"),
        })
    }
}

impl CatalogObject for CompositeType {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl HasColumns for CompositeType {
    #[inline]
    fn column_cache(&self) -> &ObjectCache<Column> {
        &self.columns
    }

    #[inline]
    fn columns_relation(&self) -> ClassID {
        self.relation
    }
}

impl PrivilegeOwner for CompositeType {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::CompositeType
    }

    #[inline]
    fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_ref().map(|o| o.as_str())
    }

    #[inline]
    fn acl(&self) -> Option<&[String]> {
        self.acl.as_deref()
    }

    #[inline]
    fn object_ref(&self, database: &str) -> ObjectRef {
        ObjectRef::new(database, self.schema_name.as_str(), self.name.as_str())
    }

    #[inline]
    fn sql_name(&self) -> String {
        qualified_name(self.schema_name.as_str(), self.name.as_str())
    }
}

impl PropertySource for CompositeType {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::oid("relation", "Relation", 4, self.relation),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}
