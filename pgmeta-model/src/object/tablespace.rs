use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl, with_clause};
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::{quote_ident, quote_literal};
use pgmeta_catalog::{CatalogObject, ObjectKind, Oid, RoleID, Row};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_SPCNAME: &str = "spcname";
pub const COL_SPCOWNER: &str = "spcowner";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_SPCACL: &str = "spcacl";
pub const COL_SPCOPTIONS: &str = "spcoptions";
pub const COL_LOCATION: &str = "location";
pub const COL_DESCRIPTION: &str = "description";

/// Tablespace, shared by all databases of the cluster.
#[derive(Debug, Clone)]
pub struct Tablespace {
    pub oid: Oid,
    pub name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub acl: Option<Vec<String>>,
    pub options: Vec<String>,
    /// Empty for the built-in tablespaces.
    pub location: Option<String>,
    pub description: Option<String>,
}

impl Tablespace {
    #[inline]
    pub fn from_row(row: &Row) -> Option<Tablespace> {
        let name = row.semistr(COL_SPCNAME)?;
        Some(Tablespace {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_SPCOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            acl: row.text_array(COL_SPCACL),
            options: row.text_array(COL_SPCOPTIONS).unwrap_or_default(),
            location: row.non_empty_str(COL_LOCATION).map(String::from),
            description: row.string(COL_DESCRIPTION),
        })
    }
}

impl CatalogObject for Tablespace {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for Tablespace {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Tablespace
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

impl ObjectDdl for Tablespace {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = self.sql_name();
        let mut sql = format!("CREATE TABLESPACE {}", name);
        if let Some(owner) = &self.owner_name {
            sql.push_str(" OWNER ");
            sql.push_str(&quote_ident(owner.as_str()));
        }
        sql.push_str(" LOCATION ");
        sql.push_str(&quote_literal(self.location.as_deref().unwrap_or("")));
        let with = with_clause(&self.options);
        if !with.is_empty() {
            sql.push(' ');
            sql.push_str(&with);
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.object_comment(ctx, ObjectKind::Tablespace, &name, self.description.as_deref());
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for Tablespace {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::new("location", "Location", 4, self.location.as_deref()),
            Property::new("options", "Options", 5, self.options.as_slice()),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}
