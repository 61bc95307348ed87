use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl, if_not_exists};
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::{quote_ident, quote_literal};
use pgmeta_catalog::{CatalogObject, ObjectKind, Oid, RoleID, Row, SchemaID};
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_EXTNAME: &str = "extname";
pub const COL_EXTOWNER: &str = "extowner";
pub const COL_EXTNAMESPACE: &str = "extnamespace";
pub const COL_SCHEMA_NAME: &str = "schema_name";
pub const COL_EXTRELOCATABLE: &str = "extrelocatable";
pub const COL_EXTVERSION: &str = "extversion";
pub const COL_DESCRIPTION: &str = "description";

/// Installed extension of the database.
#[derive(Debug, Clone)]
pub struct Extension {
    pub oid: Oid,
    pub name: SemiStr,
    pub owner: RoleID,
    pub schema: SchemaID,
    pub schema_name: Option<SemiStr>,
    pub relocatable: bool,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl Extension {
    #[inline]
    pub fn from_row(row: &Row) -> Option<Extension> {
        let name = row.semistr(COL_EXTNAME)?;
        Some(Extension {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_EXTOWNER),
            schema: row.oid(COL_EXTNAMESPACE),
            schema_name: row.semistr(COL_SCHEMA_NAME),
            relocatable: row.flag(COL_EXTRELOCATABLE),
            version: row.non_empty_str(COL_EXTVERSION).map(String::from),
            description: row.string(COL_DESCRIPTION),
        })
    }
}

impl CatalogObject for Extension {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl ObjectDdl for Extension {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = quote_ident(self.name.as_str());
        let mut sql = format!("CREATE EXTENSION {}{}", if_not_exists(ctx), name);
        if let Some(schema) = &self.schema_name {
            sql.push_str(" SCHEMA ");
            sql.push_str(&quote_ident(schema.as_str()));
        }
        if let Some(version) = &self.version {
            sql.push_str(" VERSION ");
            sql.push_str(&quote_literal(version));
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.object_comment(ctx, ObjectKind::Extension, &name, self.description.as_deref());
        b.finish()
    }
}

impl PropertySource for Extension {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("schema", "Schema", 3, self.schema_name.as_ref()),
            Property::new("version", "Version", 4, self.version.as_deref()),
            Property::new("relocatable", "Relocatable", 5, self.relocatable),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}
