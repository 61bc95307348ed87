use crate::context::MetaContext;
use crate::error::Result;
use crate::object::column::{Column, HasColumns};
use crate::object::index::Index;
use crate::object::relation::Relation;
use crate::object::schema::Schema;
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::{CatalogObject, CatalogQuery, ClassID, ObjectCache, ObjectKind, Oid, RelKind, Row};
use pgmeta_privilege::{GrantKind, ObjectRef, PrivilegeGrant};
use std::sync::Arc;

pub const COL_RELTABLESPACE: &str = "reltablespace";
pub const COL_RELTUPLES: &str = "reltuples";
pub const COL_RELHASINDEX: &str = "relhasindex";
pub const COL_RELISPARTITION: &str = "relispartition";
pub const COL_RELPERSISTENCE: &str = "relpersistence";
pub const COL_RELOPTIONS: &str = "reloptions";

/// Relations that can toggle foreign key enforcement.
pub trait SupportsReferentialIntegrity {
    fn supports_referential_integrity(&self) -> bool;

    /// Statement enabling or disabling enforcement, `None` when
    /// not supported.
    fn referential_integrity_sql(&self, enable: bool) -> Option<String>;
}

/// Table-like relation: regular or partitioned table, view,
/// materialized view or foreign table.
///
/// Kinds share one representation, behavior that differs per kind
/// is selected through the capability traits.
#[derive(Debug)]
pub struct Table {
    pub rel: Relation,
    pub tablespace: Oid,
    /// Planner estimate, -1 if never analyzed.
    pub row_count_estimate: f64,
    pub has_indexes: bool,
    pub is_partition: bool,
    /// `p` permanent, `u` unlogged, `t` temporary.
    pub persistence: char,
    pub options: Vec<String>,
    columns: ObjectCache<Column>,
}

impl Table {
    pub fn from_row(row: &Row) -> Option<Table> {
        let rel = Relation::from_row(row, RelKind::Table)?;
        if !rel.kind.is_table_like() {
            log::debug!("relation {} of kind {} is not a table", rel.name.as_str(), rel.kind);
            return None;
        }
        Some(Table {
            rel,
            tablespace: row.oid(COL_RELTABLESPACE),
            row_count_estimate: row.f64(COL_RELTUPLES).unwrap_or(-1.0),
            has_indexes: row.flag(COL_RELHASINDEX),
            is_partition: row.flag(COL_RELISPARTITION),
            persistence: row.char(COL_RELPERSISTENCE).unwrap_or('p'),
            options: row.text_array(COL_RELOPTIONS).unwrap_or_default(),
            columns: ObjectCache::new("columns"),
        })
    }

    #[inline]
    pub fn kind(&self) -> RelKind {
        self.rel.kind
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.rel.kind.is_view()
    }

    #[inline]
    pub fn is_foreign(&self) -> bool {
        self.rel.kind == RelKind::ForeignTable
    }

    #[inline]
    pub fn schema_name(&self) -> &str {
        self.rel.schema_name.as_str()
    }

    #[inline]
    pub fn qualified_name(&self) -> String {
        self.rel.qualified_name()
    }

    /// Only plain, partitioned and materialized relations are indexed.
    #[inline]
    pub fn supports_indexes(&self) -> bool {
        matches!(
            self.rel.kind,
            RelKind::Table | RelKind::PartitionedTable | RelKind::MaterializedView
        )
    }

    /// Indexes of this table, taken from the schema index cache.
    pub fn indexes(&self, schema: &Schema, ctx: &MetaContext) -> Result<Vec<Arc<Index>>> {
        if !self.supports_indexes() {
            return Ok(vec![]);
        }
        let indexes = schema.indexes(ctx)?;
        Ok(indexes
            .into_iter()
            .filter(|idx| idx.table == self.rel.oid)
            .collect())
    }

    /// Grants from `information_schema.table_privileges`.
    pub fn fetch_grants(&self, ctx: &MetaContext) -> Result<Vec<PrivilegeGrant>> {
        let rows = ctx.query(&CatalogQuery::TableGrants {
            schema: self.rel.schema_name.clone(),
            table: self.rel.name.clone(),
        })?;
        let database = ctx.database_name();
        Ok(rows
            .iter()
            .map(|row| PrivilegeGrant::from_row(GrantKind::Table, database, row))
            .collect())
    }

    /// Grants from `information_schema.column_privileges`.
    pub fn fetch_column_grants(&self, ctx: &MetaContext) -> Result<Vec<PrivilegeGrant>> {
        let rows = ctx.query(&CatalogQuery::ColumnGrants {
            schema: self.rel.schema_name.clone(),
            table: self.rel.name.clone(),
        })?;
        let database = ctx.database_name();
        Ok(rows
            .iter()
            .map(|row| PrivilegeGrant::from_row(GrantKind::Column, database, row))
            .collect())
    }
}

impl CatalogObject for Table {
    #[inline]
    fn oid(&self) -> ClassID {
        self.rel.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.rel.name.as_str()
    }
}

impl HasColumns for Table {
    #[inline]
    fn column_cache(&self) -> &ObjectCache<Column> {
        &self.columns
    }

    #[inline]
    fn columns_relation(&self) -> ClassID {
        self.rel.oid
    }
}

impl SupportsReferentialIntegrity for Table {
    #[inline]
    fn supports_referential_integrity(&self) -> bool {
        matches!(self.rel.kind, RelKind::Table | RelKind::PartitionedTable)
    }

    fn referential_integrity_sql(&self, enable: bool) -> Option<String> {
        if !self.supports_referential_integrity() {
            return None;
        }
        Some(format!(
            "ALTER TABLE {} {} TRIGGER ALL",
            self.qualified_name(),
            if enable { "ENABLE" } else { "DISABLE" }
        ))
    }
}

impl PrivilegeOwner for Table {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        // unrecognized kinds never reach a table.
        self.rel.kind.object_kind().unwrap_or(ObjectKind::Table)
    }

    #[inline]
    fn owner_name(&self) -> Option<&str> {
        self.rel.owner_name()
    }

    #[inline]
    fn acl(&self) -> Option<&[String]> {
        self.rel.acl.as_deref()
    }

    #[inline]
    fn object_ref(&self, database: &str) -> ObjectRef {
        self.rel.object_ref(database)
    }

    #[inline]
    fn sql_name(&self) -> String {
        self.qualified_name()
    }
}

impl PropertySource for Table {
    fn properties(&self) -> Vec<Property> {
        let mut props = vec![
            Property::new("name", "Name", 1, &self.rel.name),
            Property::oid("oid", "OID", 2, self.rel.oid),
            Property::new("kind", "Kind", 3, self.rel.kind.description()),
            Property::new("owner", "Owner", 4, self.rel.owner_name.as_ref()),
            Property::new("schema", "Schema", 5, &self.rel.schema_name),
            Property::oid("tablespace", "Tablespace", 6, self.tablespace),
            Property::new("options", "Options", 20, self.options.as_slice()),
            Property::new(
                "description",
                "Description",
                100,
                self.rel.description.as_deref(),
            ),
        ];
        if !self.is_view() {
            props.push(Property::new(
                "row_count_estimate",
                "Row count estimate",
                10,
                self.row_count_estimate,
            ));
            props.push(Property::new("has_indexes", "Has indexes", 11, self.has_indexes));
            props.push(Property::new("is_partition", "Partition", 12, self.is_partition));
        }
        props
    }
}
