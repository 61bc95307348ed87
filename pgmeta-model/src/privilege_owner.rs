use pgmeta_catalog::ident::quote_ident;
use pgmeta_catalog::{CatalogObject, ObjectKind};
use pgmeta_privilege::{GrantKind, ObjectRef, Permission, PrivilegeGrant, grants_from_acl};

/// Objects carrying an ACL column.
///
/// Permissions are computed from the ACL and role names only, no
/// role has to be loaded for it.
pub trait PrivilegeOwner: CatalogObject {
    fn object_kind(&self) -> ObjectKind;

    fn owner_name(&self) -> Option<&str>;

    /// Raw ACL items, `None` if the column is null.
    fn acl(&self) -> Option<&[String]>;

    fn object_ref(&self, database: &str) -> ObjectRef;

    /// Quoted name as used in GRANT and ALTER statements.
    fn sql_name(&self) -> String;

    #[inline]
    fn grants(&self, database: &str) -> Vec<PrivilegeGrant> {
        let Some(kind) = GrantKind::from_object_kind(self.object_kind()) else {
            log::warn!("{} {} does not carry grants", self.object_kind(), self.name());
            return vec![];
        };
        grants_from_acl(
            self.acl(),
            self.owner_name(),
            database,
            kind,
            &self.object_ref(database),
        )
    }

    /// Grants folded per grantee.
    #[inline]
    fn permissions(&self, database: &str) -> Vec<Permission> {
        Permission::group_by_grantee(&self.object_ref(database), &self.grants(database))
    }

    #[inline]
    fn change_owner_sql(&self, new_owner: &str) -> String {
        format!(
            "ALTER {} {} OWNER TO {}",
            self.object_kind().sql_keyword(),
            self.sql_name(),
            quote_ident(new_owner)
        )
    }
}
