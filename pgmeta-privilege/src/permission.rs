use crate::grant::{ObjectRef, PrivilegeGrant};
use crate::privilege_type::PrivilegeType;
use crate::role_ref::RoleRef;
use bitflags::bitflags;
use indexmap::IndexMap;
use pgmeta_catalog::ObjectKind;
use smallvec::SmallVec;

bitflags! {
    /// State of one privilege type for one grantee.
    pub struct PermissionBits: u8 {
        const GRANTED = 0x01;
        const WITH_GRANT_OPTION = 0x02;
        const WITH_HIERARCHY = 0x04;
    }
}

impl PermissionBits {
    pub const NONE: PermissionBits = PermissionBits::empty();

    /// Bits contributed by a single grant.
    #[inline]
    pub fn from_grant(grant: &PrivilegeGrant) -> Self {
        let mut bits = PermissionBits::GRANTED;
        if grant.grantable {
            bits |= PermissionBits::WITH_GRANT_OPTION;
        }
        if grant.with_hierarchy == Some(true) {
            bits |= PermissionBits::WITH_HIERARCHY;
        }
        bits
    }

    #[inline]
    pub fn is_granted(self) -> bool {
        self.contains(PermissionBits::GRANTED)
    }

    #[inline]
    pub fn is_grantable(self) -> bool {
        self.contains(PermissionBits::WITH_GRANT_OPTION)
    }
}

/// Object whose privileges are described: a concrete object, or a
/// role when looking at privileges from the grantee side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionOwner {
    Object(ObjectRef),
    Role(RoleRef),
}

/// Who or what the permission is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionTarget {
    /// Grantee of an object's privileges. `None` when the grantee
    /// column was null, which is not PUBLIC.
    Grantee(Option<RoleRef>),
    /// Object a role holds privileges on.
    Object(ObjectRef),
}

/// Grants sharing one owner and one target, folded into a bitmask
/// per privilege type.
///
/// Holds at most one mask per privilege type. Masks of repeated
/// types are unioned, so every flag observed on any grant is kept.
#[derive(Debug, Clone)]
pub struct Permission {
    pub owner: PermissionOwner,
    pub target: PermissionTarget,
    grants: SmallVec<[PrivilegeGrant; 4]>,
    bits: IndexMap<PrivilegeType, PermissionBits>,
}

impl Permission {
    #[inline]
    pub fn new(owner: PermissionOwner, target: PermissionTarget) -> Self {
        Permission {
            owner,
            target,
            grants: SmallVec::new(),
            bits: IndexMap::new(),
        }
    }

    /// Fold all grants into one permission. Grants are expected to
    /// share the target, callers group them beforehand.
    #[inline]
    pub fn aggregate<'a, I>(owner: PermissionOwner, target: PermissionTarget, grants: I) -> Self
    where
        I: IntoIterator<Item = &'a PrivilegeGrant>,
    {
        let mut perm = Permission::new(owner, target);
        for grant in grants {
            perm.add_grant(grant.clone());
        }
        perm
    }

    /// Group an object's grants by grantee, in order of first appearance.
    pub fn group_by_grantee<'a, I>(owner: &ObjectRef, grants: I) -> Vec<Permission>
    where
        I: IntoIterator<Item = &'a PrivilegeGrant>,
    {
        let mut groups: IndexMap<Option<RoleRef>, Permission> = IndexMap::new();
        for grant in grants {
            groups
                .entry(grant.grantee.clone())
                .or_insert_with(|| {
                    Permission::new(
                        PermissionOwner::Object(owner.clone()),
                        PermissionTarget::Grantee(grant.grantee.clone()),
                    )
                })
                .add_grant(grant.clone());
        }
        groups.into_values().collect()
    }

    /// Group a role's grants by the object they apply to.
    pub fn group_by_object<'a, I>(role: &RoleRef, grants: I) -> Vec<Permission>
    where
        I: IntoIterator<Item = &'a PrivilegeGrant>,
    {
        let mut groups: IndexMap<ObjectRef, Permission> = IndexMap::new();
        for grant in grants {
            groups
                .entry(grant.object.clone())
                .or_insert_with(|| {
                    Permission::new(
                        PermissionOwner::Role(role.clone()),
                        PermissionTarget::Object(grant.object.clone()),
                    )
                })
                .add_grant(grant.clone());
        }
        groups.into_values().collect()
    }

    #[inline]
    pub fn add_grant(&mut self, grant: PrivilegeGrant) {
        let bits = PermissionBits::from_grant(&grant);
        *self
            .bits
            .entry(grant.privilege_type)
            .or_insert(PermissionBits::NONE) |= bits;
        self.grants.push(grant);
    }

    /// Mask of one privilege type, `NONE` if never granted.
    #[inline]
    pub fn get_permission(&self, privilege_type: PrivilegeType) -> PermissionBits {
        self.bits
            .get(&privilege_type)
            .copied()
            .unwrap_or(PermissionBits::NONE)
    }

    /// Privilege types present, in order of first grant.
    #[inline]
    pub fn privileges(&self) -> impl Iterator<Item = (PrivilegeType, PermissionBits)> + '_ {
        self.bits.iter().map(|(t, b)| (*t, *b))
    }

    #[inline]
    pub fn grants(&self) -> &[PrivilegeGrant] {
        &self.grants
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn grantee(&self) -> Option<&RoleRef> {
        match &self.target {
            PermissionTarget::Grantee(grantee) => grantee.as_ref(),
            PermissionTarget::Object(_) => None,
        }
    }

    /// Either `ALL` was granted or every privilege applicable to `kind`.
    pub fn has_all_privileges(&self, kind: ObjectKind) -> bool {
        if self.get_permission(PrivilegeType::All).is_granted() {
            return true;
        }
        let all = PrivilegeType::all_for(kind);
        !all.is_empty()
            && all
                .iter()
                .all(|t| self.get_permission(*t).is_granted())
    }

    /// All applicable privileges are held with grant option.
    pub fn has_all_grantable(&self, kind: ObjectKind) -> bool {
        if self.get_permission(PrivilegeType::All).is_grantable() {
            return true;
        }
        let all = PrivilegeType::all_for(kind);
        !all.is_empty()
            && all
                .iter()
                .all(|t| self.get_permission(*t).is_grantable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::GrantKind;

    fn orders() -> ObjectRef {
        ObjectRef::new("shop", "public", "orders")
    }

    fn grant(grantee: &str, privilege_type: PrivilegeType, grantable: bool) -> PrivilegeGrant {
        PrivilegeGrant::new(
            GrantKind::Table,
            Some(RoleRef::new("shop", "alice")),
            Some(RoleRef::new("shop", grantee)),
            orders(),
            privilege_type,
            grantable,
        )
    }

    fn bob() -> PermissionTarget {
        PermissionTarget::Grantee(Some(RoleRef::new("shop", "bob")))
    }

    #[test]
    fn test_single_grantable_select() {
        let grants = vec![grant("bob", PrivilegeType::Select, true)];
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), &grants);
        let bits = perm.get_permission(PrivilegeType::Select);
        assert_eq!(bits, PermissionBits::GRANTED | PermissionBits::WITH_GRANT_OPTION);
        assert_eq!(bits.bits(), 3);
        assert_eq!(perm.get_permission(PrivilegeType::Insert), PermissionBits::NONE);
        assert_eq!(perm.get_permission(PrivilegeType::Insert).bits(), 0);
    }

    #[test]
    fn test_flags_are_unioned() {
        let grants = vec![
            grant("bob", PrivilegeType::Select, true),
            grant("bob", PrivilegeType::Select, false).with_hierarchy(true),
        ];
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), &grants);
        assert_eq!(perm.get_permission(PrivilegeType::Select).bits(), 7);
        assert_eq!(perm.privileges().count(), 1);
        assert_eq!(perm.grants().len(), 2);

        // order of grants does not matter.
        let reversed: Vec<_> = grants.iter().rev().cloned().collect();
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), &reversed);
        assert_eq!(perm.get_permission(PrivilegeType::Select).bits(), 7);
    }

    #[test]
    fn test_group_by_grantee() {
        let mut grants = vec![
            grant("bob", PrivilegeType::Select, false),
            grant("carol", PrivilegeType::Insert, false),
            grant("bob", PrivilegeType::Update, true),
        ];
        let mut null_grantee = grant("x", PrivilegeType::Delete, false);
        null_grantee.grantee = None;
        grants.push(null_grantee);

        let perms = Permission::group_by_grantee(&orders(), &grants);
        assert_eq!(perms.len(), 3);
        assert_eq!(perms[0].grantee().unwrap().name(), "bob");
        assert!(perms[0].get_permission(PrivilegeType::Update).is_grantable());
        assert_eq!(perms[1].grantee().unwrap().name(), "carol");
        assert!(perms[2].grantee().is_none());
        assert_eq!(perms[2].target, PermissionTarget::Grantee(None));
    }

    #[test]
    fn test_group_by_object() {
        let customers = ObjectRef::new("shop", "public", "customers");
        let mut other = grant("bob", PrivilegeType::Select, false);
        other.object = customers.clone();
        let grants = vec![
            grant("bob", PrivilegeType::Select, false),
            other,
            grant("bob", PrivilegeType::Insert, false),
        ];
        let bob = RoleRef::new("shop", "bob");
        let perms = Permission::group_by_object(&bob, &grants);
        assert_eq!(perms.len(), 2);
        assert_eq!(perms[0].target, PermissionTarget::Object(orders()));
        assert_eq!(perms[0].privileges().count(), 2);
        assert_eq!(perms[1].target, PermissionTarget::Object(customers));
        assert_eq!(perms[1].owner, PermissionOwner::Role(bob));
    }

    #[test]
    fn test_has_all_privileges() {
        let all: Vec<_> = PrivilegeType::all_for(ObjectKind::Table)
            .into_iter()
            .map(|t| grant("bob", t, false))
            .collect();
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), &all);
        assert!(perm.has_all_privileges(ObjectKind::Table));
        assert!(!perm.has_all_grantable(ObjectKind::Table));

        let partial = &all[..3];
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), partial);
        assert!(!perm.has_all_privileges(ObjectKind::Table));

        let owner_all = vec![grant("bob", PrivilegeType::All, false)];
        let perm = Permission::aggregate(PermissionOwner::Object(orders()), bob(), &owner_all);
        assert!(perm.has_all_privileges(ObjectKind::Schema));
    }
}
