use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl};
use crate::error::Result;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::{quote_ident, quote_literal};
use pgmeta_catalog::{CatalogObject, CatalogQuery, ObjectKind, RoleID, Row};
use pgmeta_privilege::{GrantKind, Permission, PrivilegeGrant, RoleRef};
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_ROLNAME: &str = "rolname";
pub const COL_ROLSUPER: &str = "rolsuper";
pub const COL_ROLINHERIT: &str = "rolinherit";
pub const COL_ROLCREATEROLE: &str = "rolcreaterole";
pub const COL_ROLCREATEDB: &str = "rolcreatedb";
pub const COL_ROLCANLOGIN: &str = "rolcanlogin";
pub const COL_ROLREPLICATION: &str = "rolreplication";
pub const COL_ROLBYPASSRLS: &str = "rolbypassrls";
pub const COL_ROLCONNLIMIT: &str = "rolconnlimit";
pub const COL_ROLVALIDUNTIL: &str = "rolvaliduntil";
pub const COL_DESCRIPTION: &str = "description";

/// Role from `pg_roles`. Users are roles that can log in.
#[derive(Debug, Clone)]
pub struct Role {
    pub oid: RoleID,
    pub name: SemiStr,
    pub superuser: bool,
    pub inherit: bool,
    pub create_role: bool,
    pub create_db: bool,
    pub can_login: bool,
    pub replication: bool,
    pub bypass_rls: bool,
    /// -1 means no limit.
    pub conn_limit: i64,
    pub valid_until: Option<String>,
    pub description: Option<String>,
}

impl Role {
    #[inline]
    pub fn from_row(row: &Row) -> Option<Role> {
        let name = row.semistr(COL_ROLNAME)?;
        Some(Role {
            oid: row.oid(COL_OID),
            name,
            superuser: row.flag(COL_ROLSUPER),
            inherit: row.bool(COL_ROLINHERIT).unwrap_or(true),
            create_role: row.flag(COL_ROLCREATEROLE),
            create_db: row.flag(COL_ROLCREATEDB),
            can_login: row.flag(COL_ROLCANLOGIN),
            replication: row.flag(COL_ROLREPLICATION),
            bypass_rls: row.flag(COL_ROLBYPASSRLS),
            conn_limit: row.i64(COL_ROLCONNLIMIT).unwrap_or(-1),
            valid_until: row.non_empty_str(COL_ROLVALIDUNTIL).map(String::from),
            description: row.string(COL_DESCRIPTION),
        })
    }

    #[inline]
    pub fn is_user(&self) -> bool {
        self.can_login
    }

    #[inline]
    pub fn role_ref(&self, database: &str) -> RoleRef {
        let role_type = if self.can_login { "user" } else { "role" };
        RoleRef::new(database, self.name.as_str()).with_type(role_type)
    }

    /// Grants held by this role on tables, sequences and routines.
    /// Fetched on every call.
    pub fn grants(&self, ctx: &MetaContext) -> Result<Vec<PrivilegeGrant>> {
        let database = ctx.database_name();
        let mut grants = vec![];
        for (query, kind) in [
            (
                CatalogQuery::RoleTableGrants {
                    role: self.name.clone(),
                },
                GrantKind::Table,
            ),
            (
                CatalogQuery::RoleSequenceGrants {
                    role: self.name.clone(),
                },
                GrantKind::Sequence,
            ),
            (
                CatalogQuery::RoleRoutineGrants {
                    role: self.name.clone(),
                },
                GrantKind::Function,
            ),
        ] {
            let rows = ctx.query(&query)?;
            grants.extend(
                rows.iter()
                    .map(|row| PrivilegeGrant::from_row(kind, database, row)),
            );
        }
        Ok(grants)
    }

    /// Privileges of this role grouped per object.
    #[inline]
    pub fn permissions(&self, ctx: &MetaContext) -> Result<Vec<Permission>> {
        let grants = self.grants(ctx)?;
        Ok(Permission::group_by_object(
            &self.role_ref(ctx.database_name()),
            &grants,
        ))
    }

    fn with_options(&self) -> Vec<String> {
        let flag = |on: bool, name: &str| {
            if on {
                name.to_string()
            } else {
                format!("NO{}", name)
            }
        };
        let mut opts = vec![
            flag(self.can_login, "LOGIN"),
            flag(self.superuser, "SUPERUSER"),
            flag(self.create_db, "CREATEDB"),
            flag(self.create_role, "CREATEROLE"),
            flag(self.inherit, "INHERIT"),
            flag(self.replication, "REPLICATION"),
            flag(self.bypass_rls, "BYPASSRLS"),
        ];
        if self.conn_limit >= 0 {
            opts.push(format!("CONNECTION LIMIT {}", self.conn_limit));
        }
        if let Some(valid_until) = &self.valid_until {
            opts.push(format!("VALID UNTIL {}", quote_literal(valid_until)));
        }
        opts
    }
}

impl CatalogObject for Role {
    #[inline]
    fn oid(&self) -> RoleID {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl ObjectDdl for Role {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = quote_ident(self.name.as_str());
        let mut b = DdlBuilder::new();
        b.statement(format!(
            "CREATE ROLE {} WITH {}",
            name,
            self.with_options().join(" ")
        ));
        b.object_comment(ctx, ObjectKind::Role, &name, self.description.as_deref());
        b.finish()
    }
}

impl PropertySource for Role {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("superuser", "Superuser", 3, self.superuser),
            Property::new("inherit", "Inherit", 4, self.inherit),
            Property::new("create_role", "Create role", 5, self.create_role),
            Property::new("create_db", "Create database", 6, self.create_db),
            Property::new("can_login", "Can login", 7, self.can_login),
            Property::new("replication", "Replication", 8, self.replication),
            Property::new("bypass_rls", "Bypass RLS", 9, self.bypass_rls),
            Property::new("conn_limit", "Connection limit", 10, self.conn_limit),
            Property::new(
                "valid_until",
                "Valid until",
                11,
                self.valid_until.as_deref(),
            ),
            Property::new(
                "description",
                "Description",
                100,
                self.description.as_deref(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_row() -> Row {
        Row::new()
            .with(COL_OID, "16384")
            .with(COL_ROLNAME, "alice")
            .with(COL_ROLSUPER, "f")
            .with(COL_ROLINHERIT, "t")
            .with(COL_ROLCREATEROLE, "f")
            .with(COL_ROLCREATEDB, "t")
            .with(COL_ROLCANLOGIN, "t")
            .with(COL_ROLREPLICATION, "f")
            .with(COL_ROLBYPASSRLS, "f")
            .with(COL_ROLCONNLIMIT, "10")
            .with_null(COL_ROLVALIDUNTIL)
            .with(COL_DESCRIPTION, "Sales lead")
    }

    #[test]
    fn test_role_from_row() {
        let role = Role::from_row(&alice_row()).unwrap();
        assert_eq!(role.oid(), 16384);
        assert!(role.is_user());
        assert!(role.create_db);
        assert_eq!(role.conn_limit, 10);
        assert!(role.valid_until.is_none());
        assert!(Role::from_row(&Row::new().with(COL_OID, "1")).is_none());
    }

    #[test]
    fn test_role_property_order() {
        let role = Role::from_row(&alice_row()).unwrap();
        let props = role.viewable_properties();
        assert_eq!(props[0].id, "name");
        assert!(props.iter().all(|p| p.id != "oid"));
        assert_eq!(props.last().unwrap().id, "description");
    }
}
