use crate::acl::parse_acl;
use crate::grant::{GrantKind, ObjectRef, PrivilegeGrant};
use crate::permission::{Permission, PermissionOwner, PermissionTarget};
use crate::role_ref::RoleRef;
use indexmap::IndexMap;
use pgmeta_catalog::{Oid, Row};
use semistr::SemiStr;
use std::fmt;

pub const COL_OID: &str = "oid";
pub const COL_DEFACL_ROLE: &str = "defaclrole";
pub const COL_DEFACL_NAMESPACE: &str = "defaclnamespace";
pub const COL_DEFACL_OBJTYPE: &str = "defaclobjtype";
pub const COL_DEFACL_ACL: &str = "defaclacl";

/// Kind of future objects a default privilege applies to.
///
/// Codes come from `pg_default_acl.defaclobjtype`, which is a
/// different code space than relation kinds: here `f` is function,
/// not foreign table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultObjectKind {
    Table,
    Sequence,
    Function,
    Type,
}

impl DefaultObjectKind {
    /// Unrecognized codes leave the kind unset.
    #[inline]
    pub fn from_acl_code(code: char) -> Option<Self> {
        let res = match code {
            'r' => DefaultObjectKind::Table,
            'S' => DefaultObjectKind::Sequence,
            'f' => DefaultObjectKind::Function,
            'T' => DefaultObjectKind::Type,
            _ => return None,
        };
        Some(res)
    }

    #[inline]
    pub fn acl_code(self) -> char {
        match self {
            DefaultObjectKind::Table => 'r',
            DefaultObjectKind::Sequence => 'S',
            DefaultObjectKind::Function => 'f',
            DefaultObjectKind::Type => 'T',
        }
    }

    #[inline]
    pub fn grant_kind(self) -> GrantKind {
        match self {
            DefaultObjectKind::Table => GrantKind::Table,
            DefaultObjectKind::Sequence => GrantKind::Sequence,
            DefaultObjectKind::Function => GrantKind::Function,
            DefaultObjectKind::Type => GrantKind::Type,
        }
    }

    /// Plural keyword of `ALTER DEFAULT PRIVILEGES ... ON <kind>`.
    #[inline]
    pub fn plural_keyword(self) -> &'static str {
        match self {
            DefaultObjectKind::Table => "TABLES",
            DefaultObjectKind::Sequence => "SEQUENCES",
            DefaultObjectKind::Function => "FUNCTIONS",
            DefaultObjectKind::Type => "TYPES",
        }
    }
}

impl fmt::Display for DefaultObjectKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural_keyword())
    }
}

/// Privileges granted automatically to objects created in the future
/// by `role` in `schema`.
#[derive(Debug, Clone)]
pub struct DefaultPrivilege {
    pub oid: Oid,
    /// Role whose future objects are affected.
    pub role: Option<RoleRef>,
    /// `None` for defaults that apply in every schema.
    pub schema: Option<SemiStr>,
    pub under_kind: Option<DefaultObjectKind>,
    pub permission: Permission,
}

impl DefaultPrivilege {
    /// Parse one `pg_default_acl` row into one entry per grantee.
    pub fn from_default_acl_row(database: &str, row: &Row) -> Vec<DefaultPrivilege> {
        let oid = row.oid(COL_OID);
        let role = row
            .str(COL_DEFACL_ROLE)
            .map(|name| RoleRef::new(database, name));
        let schema = row.non_empty_str(COL_DEFACL_NAMESPACE).map(SemiStr::new);
        let under_kind = match row.char(COL_DEFACL_OBJTYPE) {
            Some(code) => {
                let kind = DefaultObjectKind::from_acl_code(code);
                if kind.is_none() {
                    log::warn!("unrecognized default privilege object type '{}'", code);
                }
                kind
            }
            None => None,
        };
        let object = ObjectRef {
            catalog: Some(SemiStr::new(database)),
            schema: schema.clone(),
            name: None,
            column: None,
        };
        // unset kinds still carry the grants, attached to the schema.
        let grant_kind = under_kind.map_or(GrantKind::Schema, |k| k.grant_kind());
        let items = row.text_array(COL_DEFACL_ACL).unwrap_or_default();

        let mut groups: IndexMap<Option<RoleRef>, Vec<PrivilegeGrant>> = IndexMap::new();
        for item in parse_acl(&items) {
            for grant in item.to_grants(grant_kind, database, &object) {
                groups.entry(grant.grantee.clone()).or_default().push(grant);
            }
        }
        groups
            .into_iter()
            .map(|(grantee, grants)| DefaultPrivilege {
                oid,
                role: role.clone(),
                schema: schema.clone(),
                under_kind,
                permission: Permission::aggregate(
                    PermissionOwner::Object(object.clone()),
                    PermissionTarget::Grantee(grantee),
                    &grants,
                ),
            })
            .collect()
    }

    #[inline]
    pub fn grantee(&self) -> Option<&RoleRef> {
        self.permission.grantee()
    }

    #[inline]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.as_str())
    }
}
