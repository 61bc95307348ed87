use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl};
use crate::error::{Error, Result};
use crate::object::extension::Extension;
use crate::object::foreign::{ForeignDataWrapper, ForeignServer};
use crate::object::role::Role;
use crate::object::schema::Schema;
use crate::object::tablespace::Tablespace;
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::{quote_ident, quote_literal};
use pgmeta_catalog::{CatalogObject, CatalogQuery, ObjectCache, ObjectKind, Oid, RoleID, Row, SchemaID};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;
use std::sync::Arc;

pub const COL_OID: &str = "oid";
pub const COL_DATNAME: &str = "datname";
pub const COL_DATDBA: &str = "datdba";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_ENCODING: &str = "encoding";
pub const COL_DATCOLLATE: &str = "datcollate";
pub const COL_DATCTYPE: &str = "datctype";
pub const COL_DATALLOWCONN: &str = "datallowconn";
pub const COL_DATCONNLIMIT: &str = "datconnlimit";
pub const COL_DATTABLESPACE: &str = "dattablespace";
pub const COL_DATACL: &str = "datacl";
pub const COL_DESCRIPTION: &str = "description";

/// Root of the object tree, the database named in the config.
///
/// Cluster-wide objects (roles, tablespaces) are cached here as
/// seen from this database.
#[derive(Debug)]
pub struct Database {
    pub oid: Oid,
    pub name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub encoding: Option<String>,
    pub collate: Option<String>,
    pub ctype: Option<String>,
    pub allow_connections: bool,
    pub conn_limit: i64,
    pub tablespace: Oid,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
    roles: ObjectCache<Role>,
    schemas: ObjectCache<Schema>,
    extensions: ObjectCache<Extension>,
    tablespaces: ObjectCache<Tablespace>,
    foreign_data_wrappers: ObjectCache<ForeignDataWrapper>,
    foreign_servers: ObjectCache<ForeignServer>,
}

impl Database {
    /// Fetch the database row of the configured database.
    pub fn load(ctx: &MetaContext) -> Result<Database> {
        let name = ctx.database_name();
        let rows = ctx.query(&CatalogQuery::Database {
            name: SemiStr::new(name),
        })?;
        match rows.first().and_then(Database::from_row) {
            Some(db) => {
                log::debug!("loaded database {} with oid {}", name, db.oid);
                Ok(db)
            }
            None => Err(Error::DatabaseNotFound(name.to_string())),
        }
    }

    pub fn from_row(row: &Row) -> Option<Database> {
        let name = row.semistr(COL_DATNAME)?;
        Some(Database {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_DATDBA),
            owner_name: row.semistr(COL_OWNER_NAME),
            encoding: row.string(COL_ENCODING),
            collate: row.string(COL_DATCOLLATE),
            ctype: row.string(COL_DATCTYPE),
            allow_connections: row.bool(COL_DATALLOWCONN).unwrap_or(true),
            conn_limit: row.i64(COL_DATCONNLIMIT).unwrap_or(-1),
            tablespace: row.oid(COL_DATTABLESPACE),
            acl: row.text_array(COL_DATACL),
            description: row.string(COL_DESCRIPTION),
            roles: ObjectCache::new("roles"),
            schemas: ObjectCache::new("schemas"),
            extensions: ObjectCache::new("extensions"),
            tablespaces: ObjectCache::new("tablespaces"),
            foreign_data_wrappers: ObjectCache::new("foreign_data_wrappers"),
            foreign_servers: ObjectCache::new("foreign_servers"),
        })
    }

    #[inline]
    pub fn roles(&self, ctx: &MetaContext) -> Result<Vec<Arc<Role>>> {
        let res = self
            .roles
            .all(ctx.fetch(CatalogQuery::Roles, &Role::from_row))?;
        Ok(res)
    }

    #[inline]
    pub fn role(&self, ctx: &MetaContext, oid: RoleID) -> Result<Option<Arc<Role>>> {
        let res = self
            .roles
            .get_by_oid(ctx.fetch(CatalogQuery::Roles, &Role::from_row), oid)?;
        Ok(res)
    }

    #[inline]
    pub fn role_by_name(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Role>>> {
        let res = self
            .roles
            .get_by_name(ctx.fetch(CatalogQuery::Roles, &Role::from_row), name)?;
        Ok(res)
    }

    /// Schemas, without system schemas unless configured.
    #[inline]
    pub fn schemas(&self, ctx: &MetaContext) -> Result<Vec<Arc<Schema>>> {
        let show_system = ctx.config().show_system_objects;
        let res = self
            .schemas
            .all(ctx.fetch(CatalogQuery::Namespaces, &Schema::from_row))?;
        Ok(res
            .into_iter()
            .filter(|s| show_system || !s.is_system())
            .collect())
    }

    #[inline]
    pub fn schema(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Schema>>> {
        let res = self.namespace(ctx, name)?;
        Ok(res.filter(|s| visible(ctx, s)))
    }

    #[inline]
    pub fn schema_by_oid(&self, ctx: &MetaContext, oid: SchemaID) -> Result<Option<Arc<Schema>>> {
        let res = self
            .schemas
            .get_by_oid(ctx.fetch(CatalogQuery::Namespaces, &Schema::from_row), oid)?;
        Ok(res.filter(|s| visible(ctx, s)))
    }

    /// Any namespace by name, system schemas included.
    ///
    /// Object references such as trigger functions may point into
    /// `pg_catalog` even when system objects are hidden.
    #[inline]
    pub fn namespace(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Schema>>> {
        let res = self
            .schemas
            .get_by_name(ctx.fetch(CatalogQuery::Namespaces, &Schema::from_row), name)?;
        Ok(res)
    }

    #[inline]
    pub fn extensions(&self, ctx: &MetaContext) -> Result<Vec<Arc<Extension>>> {
        let res = self
            .extensions
            .all(ctx.fetch(CatalogQuery::Extensions, &Extension::from_row))?;
        Ok(res)
    }

    #[inline]
    pub fn extension(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<Extension>>> {
        let res = self
            .extensions
            .get_by_name(ctx.fetch(CatalogQuery::Extensions, &Extension::from_row), name)?;
        Ok(res)
    }

    #[inline]
    pub fn tablespaces(&self, ctx: &MetaContext) -> Result<Vec<Arc<Tablespace>>> {
        let res = self
            .tablespaces
            .all(ctx.fetch(CatalogQuery::Tablespaces, &Tablespace::from_row))?;
        Ok(res)
    }

    #[inline]
    pub fn tablespace(&self, ctx: &MetaContext, oid: Oid) -> Result<Option<Arc<Tablespace>>> {
        let res = self
            .tablespaces
            .get_by_oid(ctx.fetch(CatalogQuery::Tablespaces, &Tablespace::from_row), oid)?;
        Ok(res)
    }

    #[inline]
    pub fn foreign_data_wrappers(&self, ctx: &MetaContext) -> Result<Vec<Arc<ForeignDataWrapper>>> {
        let res = self.foreign_data_wrappers.all(ctx.fetch(
            CatalogQuery::ForeignDataWrappers,
            &ForeignDataWrapper::from_row,
        ))?;
        Ok(res)
    }

    #[inline]
    pub fn foreign_servers(&self, ctx: &MetaContext) -> Result<Vec<Arc<ForeignServer>>> {
        let res = self
            .foreign_servers
            .all(ctx.fetch(CatalogQuery::ForeignServers, &ForeignServer::from_row))?;
        Ok(res)
    }

    #[inline]
    pub fn foreign_server(&self, ctx: &MetaContext, name: &str) -> Result<Option<Arc<ForeignServer>>> {
        let res = self.foreign_servers.get_by_name(
            ctx.fetch(CatalogQuery::ForeignServers, &ForeignServer::from_row),
            name,
        )?;
        Ok(res)
    }

    /// Wrapper a server is reached through.
    pub fn server_wrapper(
        &self,
        ctx: &MetaContext,
        server: &ForeignServer,
    ) -> Result<Option<Arc<ForeignDataWrapper>>> {
        let res = self.foreign_data_wrappers.get_by_oid(
            ctx.fetch(
                CatalogQuery::ForeignDataWrappers,
                &ForeignDataWrapper::from_row,
            ),
            server.wrapper,
        )?;
        Ok(res)
    }

    /// Reload every cache that was loaded before. Schemas are
    /// replaced as a whole, which drops their child caches.
    pub fn refresh(&self, ctx: &MetaContext) -> Result<()> {
        if self.roles.is_loaded() {
            self.roles
                .refresh(ctx.fetch(CatalogQuery::Roles, &Role::from_row))?;
        }
        if self.schemas.is_loaded() {
            self.schemas
                .refresh(ctx.fetch(CatalogQuery::Namespaces, &Schema::from_row))?;
        }
        if self.extensions.is_loaded() {
            self.extensions
                .refresh(ctx.fetch(CatalogQuery::Extensions, &Extension::from_row))?;
        }
        if self.tablespaces.is_loaded() {
            self.tablespaces
                .refresh(ctx.fetch(CatalogQuery::Tablespaces, &Tablespace::from_row))?;
        }
        if self.foreign_data_wrappers.is_loaded() {
            self.foreign_data_wrappers.refresh(ctx.fetch(
                CatalogQuery::ForeignDataWrappers,
                &ForeignDataWrapper::from_row,
            ))?;
        }
        if self.foreign_servers.is_loaded() {
            self.foreign_servers
                .refresh(ctx.fetch(CatalogQuery::ForeignServers, &ForeignServer::from_row))?;
        }
        Ok(())
    }
}

#[inline]
fn visible(ctx: &MetaContext, schema: &Schema) -> bool {
    ctx.config().show_system_objects || !schema.is_system()
}

impl CatalogObject for Database {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for Database {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Database
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
        ObjectRef::global(database, self.name.as_str())
    }

    #[inline]
    fn sql_name(&self) -> String {
        quote_ident(self.name.as_str())
    }
}

impl ObjectDdl for Database {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = self.sql_name();
        let mut sql = format!("CREATE DATABASE {}", name);
        if let Some(owner) = &self.owner_name {
            sql.push_str(&format!(" OWNER {}", quote_ident(owner.as_str())));
        }
        if let Some(encoding) = &self.encoding {
            sql.push_str(&format!(" ENCODING {}", quote_literal(encoding)));
        }
        if let Some(collate) = &self.collate {
            sql.push_str(&format!(" LC_COLLATE {}", quote_literal(collate)));
        }
        if let Some(ctype) = &self.ctype {
            sql.push_str(&format!(" LC_CTYPE {}", quote_literal(ctype)));
        }
        if self.conn_limit >= 0 {
            sql.push_str(&format!(" CONNECTION LIMIT {}", self.conn_limit));
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.object_comment(ctx, ObjectKind::Database, &name, self.description.as_deref());
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for Database {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::new("encoding", "Encoding", 4, self.encoding.as_deref()),
            Property::new("collate", "Collate", 5, self.collate.as_deref()),
            Property::new("ctype", "Ctype", 6, self.ctype.as_deref()),
            Property::new("allow_connections", "Allow connections", 7, self.allow_connections),
            Property::new("conn_limit", "Connection limit", 8, self.conn_limit),
            Property::oid("tablespace", "Tablespace", 9, self.tablespace),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}
