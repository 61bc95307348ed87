use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl, if_not_exists};
use crate::error::Result;
use crate::object::composite_type::CompositeType;
use crate::object::index::Index;
use crate::object::procedure::{Aggregate, Procedure};
use crate::object::sequence::Sequence;
use crate::object::table::Table;
use crate::object::trigger::Trigger;
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::quote_ident;
use pgmeta_catalog::{
    CatalogObject, CatalogQuery, ClassID, ObjectCache, ObjectKind, ProcID, RelKind, RoleID, Row,
    SchemaID,
};
use pgmeta_privilege::sql::alter_default_privileges_statement;
use pgmeta_privilege::{DefaultPrivilege, ObjectRef};
use semistr::SemiStr;
use std::sync::Arc;

pub const COL_OID: &str = "oid";
pub const COL_NSPNAME: &str = "nspname";
pub const COL_NSPOWNER: &str = "nspowner";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_NSPACL: &str = "nspacl";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_RELKIND: &str = "relkind";

/// Object found by name in a schema through its relation kind.
#[derive(Debug, Clone)]
pub enum SchemaObject {
    Table(Arc<Table>),
    Index(Arc<Index>),
    Sequence(Arc<Sequence>),
    CompositeType(Arc<CompositeType>),
}

impl SchemaObject {
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            SchemaObject::Table(t) => t.name(),
            SchemaObject::Index(i) => i.name(),
            SchemaObject::Sequence(s) => s.name(),
            SchemaObject::CompositeType(c) => c.name(),
        }
    }

    #[inline]
    pub fn object_kind(&self) -> Option<ObjectKind> {
        match self {
            SchemaObject::Table(t) => t.kind().object_kind(),
            SchemaObject::Index(_) => Some(ObjectKind::Index),
            SchemaObject::Sequence(_) => Some(ObjectKind::Sequence),
            SchemaObject::CompositeType(_) => Some(ObjectKind::CompositeType),
        }
    }
}

/// Namespace of one database.
///
/// Each child kind has its own cache, filled by one bulk query
/// scoped to this schema on first access.
#[derive(Debug)]
pub struct Schema {
    pub oid: SchemaID,
    pub name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
    tables: ObjectCache<Table>,
    indexes: ObjectCache<Index>,
    sequences: ObjectCache<Sequence>,
    composite_types: ObjectCache<CompositeType>,
    procedures: ObjectCache<Procedure>,
    aggregates: ObjectCache<Aggregate>,
    triggers: ObjectCache<Trigger>,
}

impl Schema {
    pub fn from_row(row: &Row) -> Option<Schema> {
        let name = row.semistr(COL_NSPNAME)?;
        Some(Schema {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_NSPOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            acl: row.text_array(COL_NSPACL),
            description: row.string(COL_DESCRIPTION),
            tables: ObjectCache::new("tables"),
            indexes: ObjectCache::new("indexes"),
            sequences: ObjectCache::new("sequences"),
            composite_types: ObjectCache::new("composite_types"),
            procedures: ObjectCache::new("procedures"),
            aggregates: ObjectCache::new("aggregates"),
            triggers: ObjectCache::new("triggers"),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Catalog, toast and temporary namespaces.
    #[inline]
    pub fn is_system(&self) -> bool {
        let name = self.name.as_str();
        name.starts_with("pg_") || name == "information_schema"
    }

    /// Tables, views, materialized views and foreign tables.
    #[inline]
    pub fn tables(&self, ctx: &MetaContext) -> Result<Vec<Arc<Table>>> {
        let res = self.tables.all(ctx.fetch(
            CatalogQuery::Tables {
                namespace: self.oid,
            },
            &Table::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn table(&self, ctx: &MetaContext, oid: ClassID) -> Result<Option<Arc<Table>>> {
        let res = self.tables.get_by_oid(
            ctx.fetch(
                CatalogQuery::Tables {
                    namespace: self.oid,
                },
                &Table::from_row,
            ),
            oid,
        )?;
        Ok(res)
    }

    #[inline]
    pub fn table_by_name(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Table>>> {
        let res = self.tables.get_by_name(
            ctx.fetch(
                CatalogQuery::Tables {
                    namespace: self.oid,
                },
                &Table::from_row,
            ),
            name,
        )?;
        Ok(res)
    }

    /// Views and materialized views, served from the table cache.
    pub fn views(&self, ctx: &MetaContext) -> Result<Vec<Arc<Table>>> {
        let mut tables = self.tables(ctx)?;
        tables.retain(|t| t.is_view());
        Ok(tables)
    }

    #[inline]
    pub fn indexes(&self, ctx: &MetaContext) -> Result<Vec<Arc<Index>>> {
        let res = self.indexes.all(ctx.fetch(
            CatalogQuery::Indexes {
                namespace: self.oid,
            },
            &Index::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn index(&self, ctx: &MetaContext, oid: ClassID) -> Result<Option<Arc<Index>>> {
        let res = self.indexes.get_by_oid(
            ctx.fetch(
                CatalogQuery::Indexes {
                    namespace: self.oid,
                },
                &Index::from_row,
            ),
            oid,
        )?;
        Ok(res)
    }

    #[inline]
    pub fn sequences(&self, ctx: &MetaContext) -> Result<Vec<Arc<Sequence>>> {
        let res = self.sequences.all(ctx.fetch(
            CatalogQuery::Sequences {
                namespace: self.oid,
            },
            &Sequence::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn sequence(&self, ctx: &MetaContext, oid: ClassID) -> Result<Option<Arc<Sequence>>> {
        let res = self.sequences.get_by_oid(
            ctx.fetch(
                CatalogQuery::Sequences {
                    namespace: self.oid,
                },
                &Sequence::from_row,
            ),
            oid,
        )?;
        Ok(res)
    }

    #[inline]
    pub fn composite_types(&self, ctx: &MetaContext) -> Result<Vec<Arc<CompositeType>>> {
        let res = self.composite_types.all(ctx.fetch(
            CatalogQuery::CompositeTypes {
                namespace: self.oid,
            },
            &CompositeType::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn procedures(&self, ctx: &MetaContext) -> Result<Vec<Arc<Procedure>>> {
        let res = self.procedures.all(ctx.fetch(
            CatalogQuery::Procedures {
                namespace: self.oid,
            },
            &Procedure::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn procedure(&self, ctx: &MetaContext, oid: ProcID) -> Result<Option<Arc<Procedure>>> {
        let res = self.procedures.get_by_oid(
            ctx.fetch(
                CatalogQuery::Procedures {
                    namespace: self.oid,
                },
                &Procedure::from_row,
            ),
            oid,
        )?;
        Ok(res)
    }

    #[inline]
    pub fn aggregates(&self, ctx: &MetaContext) -> Result<Vec<Arc<Aggregate>>> {
        let res = self.aggregates.all(ctx.fetch(
            CatalogQuery::Aggregates {
                namespace: self.oid,
            },
            &Aggregate::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn triggers(&self, ctx: &MetaContext) -> Result<Vec<Arc<Trigger>>> {
        let res = self.triggers.all(ctx.fetch(
            CatalogQuery::Triggers {
                namespace: self.oid,
            },
            &Trigger::from_row,
        ))?;
        Ok(res)
    }

    /// Default privileges defined in this schema. Not cached.
    pub fn default_privileges(&self, ctx: &MetaContext) -> Result<Vec<DefaultPrivilege>> {
        let rows = ctx.query(&CatalogQuery::DefaultAcl {
            namespace: self.oid,
        })?;
        let database = ctx.database_name();
        Ok(rows
            .iter()
            .flat_map(|row| DefaultPrivilege::from_default_acl_row(database, row))
            .collect())
    }

    /// `ALTER DEFAULT PRIVILEGES` statements of this schema.
    pub fn default_privileges_sql(&self, ctx: &MetaContext) -> Result<Vec<String>> {
        Ok(self
            .default_privileges(ctx)?
            .iter()
            .filter_map(alter_default_privileges_statement)
            .collect())
    }

    /// Find a relation by name and load it through the cache
    /// matching its kind.
    ///
    /// Returns `None` if no relation has this name, or if its kind
    /// has no resolver here.
    pub fn resolve(&self, ctx: &MetaContext, name: &str) -> Result<Option<SchemaObject>> {
        let rows = ctx.query(&CatalogQuery::RelationKind {
            namespace: self.oid,
            name: SemiStr::new(name),
        })?;
        let Some(row) = rows.first() else {
            log::debug!("relation {}.{} not found", self.name.as_str(), name);
            return Ok(None);
        };
        let oid = row.oid(COL_OID);
        let Some(code) = row.char(COL_RELKIND) else {
            log::warn!("relation {}.{} has no kind", self.name.as_str(), name);
            return Ok(None);
        };
        let kind = RelKind::from_code(code);
        let res = match kind {
            k if k.is_table_like() => self.table(ctx, oid)?.map(SchemaObject::Table),
            k if k.is_index() => self.index(ctx, oid)?.map(SchemaObject::Index),
            RelKind::Sequence => self.sequence(ctx, oid)?.map(SchemaObject::Sequence),
            // the type is found through its attribute relation.
            RelKind::CompositeType => self
                .composite_types(ctx)?
                .into_iter()
                .find(|t| t.relation == oid)
                .map(SchemaObject::CompositeType),
            _ => {
                log::warn!(
                    "no resolver for relation {}.{} of kind '{}'",
                    self.name.as_str(),
                    name,
                    kind.code()
                );
                return Ok(None);
            }
        };
        Ok(res)
    }

    /// Reload every child cache that was loaded before.
    /// Stops at the first failure, leaving that cache intact.
    pub fn refresh(&self, ctx: &MetaContext) -> Result<()> {
        let ns = self.oid;
        if self.tables.is_loaded() {
            self.tables
                .refresh(ctx.fetch(CatalogQuery::Tables { namespace: ns }, &Table::from_row))?;
        }
        if self.indexes.is_loaded() {
            self.indexes
                .refresh(ctx.fetch(CatalogQuery::Indexes { namespace: ns }, &Index::from_row))?;
        }
        if self.sequences.is_loaded() {
            self.sequences.refresh(
                ctx.fetch(CatalogQuery::Sequences { namespace: ns }, &Sequence::from_row),
            )?;
        }
        if self.composite_types.is_loaded() {
            self.composite_types.refresh(ctx.fetch(
                CatalogQuery::CompositeTypes { namespace: ns },
                &CompositeType::from_row,
            ))?;
        }
        if self.procedures.is_loaded() {
            self.procedures.refresh(
                ctx.fetch(CatalogQuery::Procedures { namespace: ns }, &Procedure::from_row),
            )?;
        }
        if self.aggregates.is_loaded() {
            self.aggregates.refresh(
                ctx.fetch(CatalogQuery::Aggregates { namespace: ns }, &Aggregate::from_row),
            )?;
        }
        if self.triggers.is_loaded() {
            self.triggers
                .refresh(ctx.fetch(CatalogQuery::Triggers { namespace: ns }, &Trigger::from_row))?;
        }
        Ok(())
    }
}

impl CatalogObject for Schema {
    #[inline]
    fn oid(&self) -> SchemaID {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for Schema {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Schema
    }

    #[inline]
    fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_ref().map(|s| s.as_str())
    }

    #[inline]
    fn acl(&self) -> Option<&[String]> {
        self.acl.as_deref()
    }

    #[inline]
    fn object_ref(&self, database: &str) -> ObjectRef {
        ObjectRef::schema(database, self.name.as_str())
    }

    #[inline]
    fn sql_name(&self) -> String {
        quote_ident(self.name.as_str())
    }
}

impl ObjectDdl for Schema {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = self.sql_name();
        let mut sql = format!("CREATE SCHEMA {}{}", if_not_exists(ctx), name);
        if let Some(owner) = &self.owner_name {
            sql.push_str(" AUTHORIZATION ");
            sql.push_str(&quote_ident(owner.as_str()));
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.object_comment(ctx, ObjectKind::Schema, &name, self.description.as_deref());
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for Schema {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::new("system", "System", 4, self.is_system()).hidden(),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_schema() {
        for (name, system) in [
            ("pg_catalog", true),
            ("pg_toast", true),
            ("information_schema", true),
            ("public", false),
            ("sales", false),
        ] {
            let row = Row::new().with(COL_OID, "1").with(COL_NSPNAME, name);
            assert_eq!(Schema::from_row(&row).unwrap().is_system(), system);
        }
    }
}
