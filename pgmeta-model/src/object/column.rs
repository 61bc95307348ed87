use crate::context::MetaContext;
use crate::error::Result;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::{CatalogObject, CatalogQuery, ClassID, ObjectCache, Oid, Row};
use semistr::SemiStr;
use std::sync::Arc;

pub const COL_ATTNUM: &str = "attnum";
pub const COL_ATTNAME: &str = "attname";
pub const COL_ATTRELID: &str = "attrelid";
pub const COL_TYPE_NAME: &str = "type_name";
pub const COL_ATTNOTNULL: &str = "attnotnull";
pub const COL_DEFAULT_VALUE: &str = "default_value";
pub const COL_ATTACL: &str = "attacl";
pub const COL_DESCRIPTION: &str = "description";

/// Column of a table, view or composite type.
/// Keyed by its position within the relation.
#[derive(Debug, Clone)]
pub struct Column {
    pub position: i64,
    pub name: SemiStr,
    pub relation: ClassID,
    pub type_name: Option<SemiStr>,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Column {
    #[inline]
    pub fn from_row(row: &Row) -> Option<Column> {
        let name = row.semistr(COL_ATTNAME)?;
        let position = row.i64(COL_ATTNUM).filter(|n| *n > 0)?;
        Some(Column {
            position,
            name,
            relation: row.oid(COL_ATTRELID),
            type_name: row.semistr(COL_TYPE_NAME),
            not_null: row.flag(COL_ATTNOTNULL),
            default_value: row.string(COL_DEFAULT_VALUE),
            acl: row.text_array(COL_ATTACL),
            description: row.string(COL_DESCRIPTION),
        })
    }
}

impl CatalogObject for Column {
    #[inline]
    fn oid(&self) -> Oid {
        self.position as Oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PropertySource for Column {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::new("position", "Position", 2, self.position),
            Property::new("type", "Data type", 3, self.type_name.as_ref()),
            Property::new("not_null", "Not null", 4, self.not_null),
            Property::new("default", "Default", 5, self.default_value.as_deref()),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}

/// Relations whose attributes are loaded as columns.
pub trait HasColumns {
    fn column_cache(&self) -> &ObjectCache<Column>;

    /// `pg_class` oid the attributes belong to.
    fn columns_relation(&self) -> ClassID;

    #[inline]
    fn columns(&self, ctx: &MetaContext) -> Result<Vec<Arc<Column>>> {
        let query = CatalogQuery::Columns {
            table: self.columns_relation(),
        };
        let cols = self.column_cache().all(ctx.fetch(query, &Column::from_row))?;
        Ok(cols)
    }

    #[inline]
    fn column(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Column>>> {
        let query = CatalogQuery::Columns {
            table: self.columns_relation(),
        };
        let col = self
            .column_cache()
            .get_by_name(ctx.fetch(query, &Column::from_row), name)?;
        Ok(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_row() {
        let row = Row::new()
            .with(COL_ATTNUM, "3")
            .with(COL_ATTNAME, "amount")
            .with(COL_ATTRELID, "16410")
            .with(COL_TYPE_NAME, "numeric(12,2)")
            .with(COL_ATTNOTNULL, "t")
            .with_null(COL_DEFAULT_VALUE)
            .with_null(COL_ATTACL)
            .with_null(COL_DESCRIPTION);
        let col = Column::from_row(&row).unwrap();
        assert_eq!(col.oid(), 3);
        assert!(col.not_null);
        assert!(col.default_value.is_none());
        assert_eq!(
            col.property("type").unwrap().value.as_str(),
            Some("numeric(12,2)")
        );
        // system columns have negative numbers.
        let row = row.with(COL_ATTNUM, "-1");
        assert!(Column::from_row(&row).is_none());
    }
}
