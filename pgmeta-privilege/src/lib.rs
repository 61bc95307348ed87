pub mod acl;
pub mod default_privilege;
pub mod grant;
pub mod permission;
pub mod privilege_type;
pub mod role_ref;
pub mod sql;

pub use acl::{AclItem, grants_from_acl, parse_acl, parse_acl_item};
pub use default_privilege::{DefaultObjectKind, DefaultPrivilege};
pub use grant::{GrantKind, ObjectRef, PrivilegeGrant};
pub use permission::{Permission, PermissionBits, PermissionOwner, PermissionTarget};
pub use privilege_type::PrivilegeType;
pub use role_ref::{PUBLIC_ROLE, RoleRef};
