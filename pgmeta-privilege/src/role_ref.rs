use semistr::SemiStr;
use std::cmp::Ordering;
use std::fmt;

/// Name of the pseudo-role every role is a member of.
pub const PUBLIC_ROLE: &str = "public";

/// Reference to a grantor or grantee by name.
///
/// Permissions are computed from references only, so a role that
/// cannot be loaded (dropped, or not visible) still shows up.
#[derive(Debug, Clone)]
pub struct RoleRef {
    pub database: SemiStr,
    pub role_name: SemiStr,
    pub role_type: Option<SemiStr>,
}

impl RoleRef {
    #[inline]
    pub fn new(database: &str, role_name: &str) -> Self {
        RoleRef {
            database: SemiStr::new(database),
            role_name: SemiStr::new(role_name),
            role_type: None,
        }
    }

    #[inline]
    pub fn with_type(mut self, role_type: &str) -> Self {
        self.role_type = Some(SemiStr::new(role_type));
        self
    }

    #[inline]
    pub fn public(database: &str) -> Self {
        RoleRef::new(database, PUBLIC_ROLE)
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.role_name.as_str()
    }

    /// Explicitly empty name or `public` denotes the PUBLIC pseudo-role.
    #[inline]
    pub fn is_public(&self) -> bool {
        let name = self.role_name.as_str();
        name.is_empty() || name.eq_ignore_ascii_case(PUBLIC_ROLE)
    }

    #[inline]
    fn type_key(&self) -> Option<String> {
        self.role_type.as_ref().map(|t| t.as_str().to_ascii_lowercase())
    }
}

impl PartialEq for RoleRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RoleRef {}

impl std::hash::Hash for RoleRef {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.database.as_str().hash(state);
        self.role_name.as_str().hash(state);
        self.type_key().hash(state);
    }
}

impl PartialOrd for RoleRef {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoleRef {
    /// Database name, then role name, then role type ignoring case.
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.database
            .as_str()
            .cmp(other.database.as_str())
            .then_with(|| self.role_name.as_str().cmp(other.role_name.as_str()))
            .then_with(|| self.type_key().cmp(&other.type_key()))
    }
}

impl fmt::Display for RoleRef {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_public() {
            f.write_str("PUBLIC")
        } else {
            f.write_str(self.role_name.as_str())
        }
    }
}
