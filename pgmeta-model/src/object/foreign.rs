use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl, options_clause};
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::{quote_ident, quote_literal};
use pgmeta_catalog::{CatalogObject, ObjectKind, Oid, RoleID, Row};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_FDWNAME: &str = "fdwname";
pub const COL_FDWOWNER: &str = "fdwowner";
pub const COL_HANDLER: &str = "handler";
pub const COL_VALIDATOR: &str = "validator";
pub const COL_FDWACL: &str = "fdwacl";
pub const COL_FDWOPTIONS: &str = "fdwoptions";
pub const COL_SRVNAME: &str = "srvname";
pub const COL_SRVOWNER: &str = "srvowner";
pub const COL_SRVFDW: &str = "srvfdw";
pub const COL_SRVTYPE: &str = "srvtype";
pub const COL_SRVVERSION: &str = "srvversion";
pub const COL_SRVACL: &str = "srvacl";
pub const COL_SRVOPTIONS: &str = "srvoptions";

/// `regproc` renders an unset function as `-`.
#[inline]
fn regproc(row: &Row, name: &str) -> Option<String> {
    row.non_empty_str(name)
        .filter(|s| *s != "-")
        .map(String::from)
}

#[derive(Debug, Clone)]
pub struct ForeignDataWrapper {
    pub oid: Oid,
    pub name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub handler: Option<String>,
    pub validator: Option<String>,
    pub acl: Option<Vec<String>>,
    pub options: Vec<String>,
}

impl ForeignDataWrapper {
    #[inline]
    pub fn from_row(row: &Row) -> Option<ForeignDataWrapper> {
        let name = row.semistr(COL_FDWNAME)?;
        Some(ForeignDataWrapper {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_FDWOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            handler: regproc(row, COL_HANDLER),
            validator: regproc(row, COL_VALIDATOR),
            acl: row.text_array(COL_FDWACL),
            options: row.text_array(COL_FDWOPTIONS).unwrap_or_default(),
        })
    }
}

impl CatalogObject for ForeignDataWrapper {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for ForeignDataWrapper {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::ForeignDataWrapper
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

impl ObjectDdl for ForeignDataWrapper {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let mut sql = format!("CREATE FOREIGN DATA WRAPPER {}", self.sql_name());
        match &self.handler {
            Some(handler) => sql.push_str(&format!(" HANDLER {}", handler)),
            None => sql.push_str(" NO HANDLER"),
        }
        match &self.validator {
            Some(validator) => sql.push_str(&format!(" VALIDATOR {}", validator)),
            None => sql.push_str(" NO VALIDATOR"),
        }
        if !self.options.is_empty() {
            sql.push_str(" OPTIONS ");
            sql.push_str(&options_clause(&self.options));
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for ForeignDataWrapper {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::new("handler", "Handler", 4, self.handler.as_deref()),
            Property::new("validator", "Validator", 5, self.validator.as_deref()),
            Property::new("options", "Options", 6, self.options.as_slice()),
        ]
    }
}

/// Foreign server, reached through one data wrapper.
#[derive(Debug, Clone)]
pub struct ForeignServer {
    pub oid: Oid,
    pub name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub wrapper: Oid,
    pub wrapper_name: Option<SemiStr>,
    pub server_type: Option<String>,
    pub version: Option<String>,
    pub acl: Option<Vec<String>>,
    pub options: Vec<String>,
}

impl ForeignServer {
    #[inline]
    pub fn from_row(row: &Row) -> Option<ForeignServer> {
        let name = row.semistr(COL_SRVNAME)?;
        Some(ForeignServer {
            oid: row.oid(COL_OID),
            name,
            owner: row.oid(COL_SRVOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            wrapper: row.oid(COL_SRVFDW),
            wrapper_name: row.semistr(COL_FDWNAME),
            server_type: row.non_empty_str(COL_SRVTYPE).map(String::from),
            version: row.non_empty_str(COL_SRVVERSION).map(String::from),
            acl: row.text_array(COL_SRVACL),
            options: row.text_array(COL_SRVOPTIONS).unwrap_or_default(),
        })
    }
}

impl CatalogObject for ForeignServer {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for ForeignServer {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::ForeignServer
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

impl ObjectDdl for ForeignServer {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let mut sql = format!("CREATE SERVER {}", self.sql_name());
        if let Some(server_type) = &self.server_type {
            sql.push_str(" TYPE ");
            sql.push_str(&quote_literal(server_type));
        }
        if let Some(version) = &self.version {
            sql.push_str(" VERSION ");
            sql.push_str(&quote_literal(version));
        }
        sql.push_str(" FOREIGN DATA WRAPPER ");
        match &self.wrapper_name {
            Some(fdw) => sql.push_str(&quote_ident(fdw.as_str())),
            None => sql.push_str(&self.wrapper.to_string()),
        }
        if !self.options.is_empty() {
            sql.push_str(" OPTIONS ");
            sql.push_str(&options_clause(&self.options));
        }
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for ForeignServer {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("owner", "Owner", 3, self.owner_name.as_ref()),
            Property::new("wrapper", "Foreign data wrapper", 4, self.wrapper_name.as_ref()),
            Property::new("type", "Type", 5, self.server_type.as_deref()),
            Property::new("version", "Version", 6, self.version.as_deref()),
            Property::new("options", "Options", 7, self.options.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regproc_dash() {
        let row = Row::new()
            .with(COL_OID, "16600")
            .with(COL_FDWNAME, "file_fdw")
            .with(COL_HANDLER, "file_fdw_handler")
            .with(COL_VALIDATOR, "-");
        let fdw = ForeignDataWrapper::from_row(&row).unwrap();
        assert_eq!(fdw.handler.as_deref(), Some("file_fdw_handler"));
        assert!(fdw.validator.is_none());
        assert!(fdw.acl.is_none());
    }
}
