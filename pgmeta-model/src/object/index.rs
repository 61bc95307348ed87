use crate::context::MetaContext;
use crate::error::Result;
use crate::object::relation::Relation;
use crate::object::schema::Schema;
use crate::object::table::Table;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::{CatalogObject, ClassID, RelKind, Row};
use semistr::SemiStr;
use std::sync::Arc;

pub const COL_INDRELID: &str = "indrelid";
pub const COL_INDISUNIQUE: &str = "indisunique";
pub const COL_INDISPRIMARY: &str = "indisprimary";
pub const COL_AMNAME: &str = "amname";
pub const COL_DEFINITION: &str = "definition";

/// Index or partitioned index.
#[derive(Debug)]
pub struct Index {
    pub rel: Relation,
    /// Indexed table.
    pub table: ClassID,
    pub unique: bool,
    pub primary: bool,
    pub method: Option<SemiStr>,
    /// `pg_get_indexdef` output.
    pub definition: Option<String>,
}

impl Index {
    pub fn from_row(row: &Row) -> Option<Index> {
        let rel = Relation::from_row(row, RelKind::Index)?;
        if !rel.kind.is_index() {
            log::debug!("relation {} of kind {} is not an index", rel.name.as_str(), rel.kind);
            return None;
        }
        Some(Index {
            rel,
            table: row.oid(COL_INDRELID),
            unique: row.flag(COL_INDISUNIQUE),
            primary: row.flag(COL_INDISPRIMARY),
            method: row.semistr(COL_AMNAME),
            definition: row.string(COL_DEFINITION),
        })
    }

    /// Indexed table, `None` if it is not visible.
    #[inline]
    pub fn table(&self, schema: &Schema, ctx: &MetaContext) -> Result<Option<Arc<Table>>> {
        schema.table(ctx, self.table)
    }

    #[inline]
    pub fn qualified_name(&self) -> String {
        self.rel.qualified_name()
    }
}

impl CatalogObject for Index {
    #[inline]
    fn oid(&self) -> ClassID {
        self.rel.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.rel.name.as_str()
    }
}

impl PropertySource for Index {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.rel.name),
            Property::oid("oid", "OID", 2, self.rel.oid),
            Property::oid("table", "Table", 3, self.table),
            Property::new("unique", "Unique", 4, self.unique),
            Property::new("primary", "Primary", 5, self.primary),
            Property::new("method", "Access method", 6, self.method.as_ref()),
            Property::new("definition", "Definition", 7, self.definition.as_deref()).hidden(),
        ]
    }
}
