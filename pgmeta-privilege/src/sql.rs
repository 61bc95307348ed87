use crate::default_privilege::DefaultPrivilege;
use crate::permission::{Permission, PermissionBits};
use crate::privilege_type::PrivilegeType;
use crate::role_ref::RoleRef;
use pgmeta_catalog::ObjectKind;
use pgmeta_catalog::ident::quote_ident;

/// Grantee as it appears in GRANT and REVOKE.
#[inline]
pub fn grantee_sql(grantee: &RoleRef) -> String {
    if grantee.is_public() {
        String::from("PUBLIC")
    } else {
        quote_ident(grantee.name())
    }
}

/// Privileges that can appear in a statement. Unknown codes are dropped.
#[inline]
fn grantable_types(privileges: &[PrivilegeType]) -> Vec<PrivilegeType> {
    privileges
        .iter()
        .copied()
        .filter(|t| t.is_valid() || *t == PrivilegeType::All)
        .collect()
}

/// Privilege list of a statement. Collapses to `ALL PRIVILEGES`
/// when `ALL` is present or every applicable privilege is listed.
/// Empty if no listed privilege can be named.
pub fn privilege_list(kind: ObjectKind, privileges: &[PrivilegeType]) -> String {
    let valid = grantable_types(privileges);
    if valid.contains(&PrivilegeType::All) {
        return String::from("ALL PRIVILEGES");
    }
    let all = PrivilegeType::all_for(kind);
    if !all.is_empty() && all.iter().all(|t| valid.contains(t)) {
        return String::from("ALL PRIVILEGES");
    }
    valid
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `GRANT <privs> ON <kind> <object> TO <grantee> [WITH GRANT OPTION]`.
///
/// `object` must already be quoted. Returns `None` when no privilege
/// can be named.
pub fn grant_statement(
    kind: ObjectKind,
    object: &str,
    privileges: &[PrivilegeType],
    grantee: &RoleRef,
    with_grant_option: bool,
) -> Option<String> {
    let privs = privilege_list(kind, privileges);
    if privs.is_empty() {
        return None;
    }
    let mut sql = format!(
        "GRANT {} ON {} {} TO {}",
        privs,
        kind.grant_keyword(),
        object,
        grantee_sql(grantee)
    );
    if with_grant_option {
        sql.push_str(" WITH GRANT OPTION");
    }
    Some(sql)
}

/// `REVOKE <privs> ON <kind> <object> FROM <grantee>`.
pub fn revoke_statement(
    kind: ObjectKind,
    object: &str,
    privileges: &[PrivilegeType],
    grantee: &RoleRef,
) -> Option<String> {
    let privs = privilege_list(kind, privileges);
    if privs.is_empty() {
        return None;
    }
    Some(format!(
        "REVOKE {} ON {} {} FROM {}",
        privs,
        kind.grant_keyword(),
        object,
        grantee_sql(grantee)
    ))
}

/// Split privileges of one permission into plain and grantable ones.
/// Types without a name in SQL are skipped.
fn split_grantable(perm: &Permission) -> (Vec<PrivilegeType>, Vec<PrivilegeType>) {
    let mut plain = vec![];
    let mut grantable = vec![];
    for (t, bits) in perm.privileges() {
        if !bits.contains(PermissionBits::GRANTED) {
            continue;
        }
        if !t.is_valid() && t != PrivilegeType::All {
            log::debug!("privilege {:?} has no SQL name, skipped", t);
            continue;
        }
        if bits.is_grantable() {
            grantable.push(t);
        } else {
            plain.push(t);
        }
    }
    (plain, grantable)
}

/// GRANT statements reproducing one grantee's permission on an object.
/// Grantable privileges go into a separate statement. Permissions
/// without grantee produce nothing.
pub fn permission_statements(kind: ObjectKind, object: &str, perm: &Permission) -> Vec<String> {
    let Some(grantee) = perm.grantee() else {
        return vec![];
    };
    let (plain, grantable) = split_grantable(perm);
    [(plain, false), (grantable, true)]
        .into_iter()
        .filter_map(|(privs, with_grant_option)| {
            grant_statement(kind, object, &privs, grantee, with_grant_option)
        })
        .collect()
}

/// `ALTER DEFAULT PRIVILEGES [FOR ROLE r] [IN SCHEMA s] GRANT ...`.
///
/// Returns `None` when the object kind is unset or nothing is granted.
pub fn alter_default_privileges_statement(default: &DefaultPrivilege) -> Option<String> {
    let kind = default.under_kind?;
    let grantee = default.grantee()?;
    let (plain, grantable) = split_grantable(&default.permission);
    let object_kind = kind.grant_kind().object_kind();
    let mut prefix = String::from("ALTER DEFAULT PRIVILEGES");
    if let Some(role) = &default.role {
        prefix.push_str(" FOR ROLE ");
        prefix.push_str(&quote_ident(role.name()));
    }
    if let Some(schema) = default.schema_name() {
        prefix.push_str(" IN SCHEMA ");
        prefix.push_str(&quote_ident(schema));
    }
    let mut stmts = vec![];
    for (privs, with_grant_option) in [(plain, false), (grantable, true)] {
        let privs = privilege_list(object_kind, &privs);
        if privs.is_empty() {
            continue;
        }
        let mut sql = format!(
            "{} GRANT {} ON {} TO {}",
            prefix,
            privs,
            kind.plural_keyword(),
            grantee_sql(grantee)
        );
        if with_grant_option {
            sql.push_str(" WITH GRANT OPTION");
        }
        stmts.push(sql);
    }
    if stmts.is_empty() {
        None
    } else {
        Some(stmts.join(";\n"))
    }
}
