use crate::grant::{GrantKind, ObjectRef, PrivilegeGrant};
use crate::privilege_type::PrivilegeType;
use crate::role_ref::{PUBLIC_ROLE, RoleRef};
use semistr::SemiStr;
use smallvec::SmallVec;

/// One parsed `aclitem`: `grantee=privileges/grantor`.
///
/// An empty grantee denotes PUBLIC. A `*` after a privilege
/// code marks it grantable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclItem {
    pub grantee: SemiStr,
    pub grantor: SemiStr,
    pub privileges: SmallVec<[(PrivilegeType, bool); 8]>,
}

impl AclItem {
    #[inline]
    pub fn is_public(&self) -> bool {
        self.grantee.as_str().is_empty()
    }

    /// Convert into one grant per privilege code.
    pub fn to_grants(
        &self,
        kind: GrantKind,
        database: &str,
        object: &ObjectRef,
    ) -> Vec<PrivilegeGrant> {
        let grantee = if self.is_public() {
            RoleRef::new(database, PUBLIC_ROLE)
        } else {
            RoleRef::new(database, self.grantee.as_str())
        };
        let grantor = RoleRef::new(database, self.grantor.as_str());
        self.privileges
            .iter()
            .map(|(privilege_type, grantable)| {
                PrivilegeGrant::new(
                    kind,
                    Some(grantor.clone()),
                    Some(grantee.clone()),
                    object.clone(),
                    *privilege_type,
                    *grantable,
                )
            })
            .collect()
    }
}

/// Parse one ACL item. Malformed items are logged and skipped.
pub fn parse_acl_item(text: &str) -> Option<AclItem> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let Some(eq_pos) = find_unquoted(text, '=') else {
        log::warn!("bad ACL item: {}", text);
        return None;
    };
    let grantee = unquote_role(&text[..eq_pos]);
    let perm_str = &text[eq_pos + 1..];
    let Some(slash_pos) = find_unquoted(perm_str, '/') else {
        log::warn!("bad permissions string: {}", perm_str);
        return None;
    };
    let codes = &perm_str[..slash_pos];
    let grantor = unquote_role(&perm_str[slash_pos + 1..]);

    let mut privileges = SmallVec::new();
    let mut chars = codes.chars().peekable();
    while let Some(code) = chars.next() {
        let grantable = chars.next_if_eq(&'*').is_some();
        privileges.push((PrivilegeType::from_code(code), grantable));
    }
    Some(AclItem {
        grantee: SemiStr::new(&grantee),
        grantor: SemiStr::new(&grantor),
        privileges,
    })
}

/// Parse all items of an ACL array, skipping malformed ones.
#[inline]
pub fn parse_acl<S: AsRef<str>>(items: &[S]) -> Vec<AclItem> {
    items
        .iter()
        .filter_map(|item| parse_acl_item(item.as_ref()))
        .collect()
}

/// Grants described by an object's ACL column.
///
/// A null ACL means default privileges: the owner holds everything.
/// An empty ACL means nobody has any privilege.
pub fn grants_from_acl<S: AsRef<str>>(
    acl: Option<&[S]>,
    owner: Option<&str>,
    database: &str,
    kind: GrantKind,
    object: &ObjectRef,
) -> Vec<PrivilegeGrant> {
    match acl {
        None => {
            let owner = owner.map(|o| RoleRef::new(database, o));
            vec![PrivilegeGrant::new(
                kind,
                owner.clone(),
                owner,
                object.clone(),
                PrivilegeType::All,
                false,
            )]
        }
        Some(items) => parse_acl(items)
            .iter()
            .flat_map(|item| item.to_grants(kind, database, object))
            .collect(),
    }
}

/// Position of `ch` outside of double quotes.
fn find_unquoted(s: &str, ch: char) -> Option<usize> {
    let mut quoted = false;
    for (idx, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == ch && !quoted => return Some(idx),
            _ => (),
        }
    }
    None
}

/// Role names with special characters are double-quoted, with
/// embedded quotes doubled.
fn unquote_role(s: &str) -> String {
    let s = s.trim();
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_acl_item() {
        let item = parse_acl_item("bob=arw*/alice").unwrap();
        assert_eq!(item.grantee.as_str(), "bob");
        assert_eq!(item.grantor.as_str(), "alice");
        assert_eq!(
            item.privileges.as_slice(),
            &[
                (PrivilegeType::Insert, false),
                (PrivilegeType::Select, false),
                (PrivilegeType::Update, true),
            ]
        );
        assert!(!item.is_public());
    }

    #[test]
    fn test_parse_public_and_quoted() {
        let item = parse_acl_item("=U/postgres").unwrap();
        assert!(item.is_public());
        assert_eq!(item.privileges.as_slice(), &[(PrivilegeType::Usage, false)]);

        let item = parse_acl_item(r#""report ""ro""=r/"a=b/c""#).unwrap();
        assert_eq!(item.grantee.as_str(), r#"report "ro""#);
        assert_eq!(item.grantor.as_str(), "a=b/c");
    }

    #[test]
    fn test_parse_bad_items_skipped() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert!(parse_acl_item("").is_none());
        assert!(parse_acl_item("bob").is_none());
        assert!(parse_acl_item("bob=r").is_none());
        let items = parse_acl(&["bob", "carol=r/alice", "dave=q/alice"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].privileges[0].0, PrivilegeType::Unknown);
    }

    #[test]
    fn test_grants_from_acl() {
        let object = ObjectRef::new("shop", "public", "orders");
        let acl = vec![
            String::from("alice=arwdDxt/alice"),
            String::from("bob=r*/alice"),
            String::from("=r/alice"),
        ];
        let grants = grants_from_acl(
            Some(acl.as_slice()),
            Some("alice"),
            "shop",
            GrantKind::Table,
            &object,
        );
        assert_eq!(grants.len(), 9);
        let bob: Vec<_> = grants
            .iter()
            .filter(|g| g.grantee_name() == Some("bob"))
            .collect();
        assert_eq!(bob.len(), 1);
        assert!(bob[0].grantable);
        assert!(grants.last().unwrap().is_public());

        let empty: Vec<String> = vec![];
        assert!(
            grants_from_acl(Some(empty.as_slice()), Some("alice"), "shop", GrantKind::Table, &object)
                .is_empty()
        );
    }

    #[test]
    fn test_null_acl_means_owner_all() {
        let object = ObjectRef::schema("shop", "sales");
        let grants =
            grants_from_acl::<String>(None, Some("alice"), "shop", GrantKind::Schema, &object);
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].privilege_type, PrivilegeType::All);
        assert_eq!(grants[0].grantee_name(), Some("alice"));
    }
}
