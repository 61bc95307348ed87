use pgmeta_catalog::{ObjectKind, ObjectKinds};
use std::fmt;

/// Privilege kinds known to the server.
///
/// `All` and `Unknown` are sentinels without a code. Any code or
/// name that is not recognized maps to `Unknown`, never to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrivilegeType {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    Create,
    Connect,
    Temporary,
    Execute,
    Usage,
    Rule,
    All,
    Unknown,
}

// Static registry: type, code, applicable kinds.
const REGISTRY: &[(PrivilegeType, Option<char>, ObjectKinds)] = &[
    (
        PrivilegeType::Select,
        Some('r'),
        ObjectKinds::from_bits_truncate(
            ObjectKinds::TABLES.bits() | ObjectKinds::SEQUENCE.bits() | ObjectKinds::COLUMN.bits(),
        ),
    ),
    (
        PrivilegeType::Insert,
        Some('a'),
        ObjectKinds::from_bits_truncate(ObjectKinds::TABLES.bits() | ObjectKinds::COLUMN.bits()),
    ),
    (
        PrivilegeType::Update,
        Some('w'),
        ObjectKinds::from_bits_truncate(
            ObjectKinds::TABLES.bits() | ObjectKinds::SEQUENCE.bits() | ObjectKinds::COLUMN.bits(),
        ),
    ),
    (PrivilegeType::Delete, Some('d'), ObjectKinds::TABLES),
    (PrivilegeType::Truncate, Some('D'), ObjectKinds::TABLES),
    (
        PrivilegeType::References,
        Some('x'),
        ObjectKinds::from_bits_truncate(ObjectKinds::TABLES.bits() | ObjectKinds::COLUMN.bits()),
    ),
    (PrivilegeType::Trigger, Some('t'), ObjectKinds::TABLES),
    (
        PrivilegeType::Create,
        Some('C'),
        ObjectKinds::from_bits_truncate(
            ObjectKinds::DATABASE.bits()
                | ObjectKinds::SCHEMA.bits()
                | ObjectKinds::TABLESPACE.bits(),
        ),
    ),
    (PrivilegeType::Connect, Some('c'), ObjectKinds::DATABASE),
    (PrivilegeType::Temporary, Some('T'), ObjectKinds::DATABASE),
    (PrivilegeType::Execute, Some('X'), ObjectKinds::ROUTINES),
    (
        PrivilegeType::Usage,
        Some('U'),
        ObjectKinds::from_bits_truncate(
            ObjectKinds::SEQUENCE.bits()
                | ObjectKinds::SCHEMA.bits()
                | ObjectKinds::TYPE.bits()
                | ObjectKinds::COMPOSITE_TYPE.bits()
                | ObjectKinds::DOMAIN.bits()
                | ObjectKinds::FOREIGN_DATA_WRAPPER.bits()
                | ObjectKinds::FOREIGN_SERVER.bits()
                | ObjectKinds::LANGUAGE.bits(),
        ),
    ),
    (PrivilegeType::Rule, Some('R'), ObjectKinds::TABLES),
    (PrivilegeType::All, None, ObjectKinds::all()),
    (PrivilegeType::Unknown, None, ObjectKinds::empty()),
];

impl PrivilegeType {
    /// All registered types, sentinels included.
    #[inline]
    pub fn all_types() -> impl Iterator<Item = PrivilegeType> {
        REGISTRY.iter().map(|(t, _, _)| *t)
    }

    #[inline]
    pub fn from_code(code: char) -> Self {
        REGISTRY
            .iter()
            .find(|(_, c, _)| *c == Some(code))
            .map(|(t, _, _)| *t)
            .unwrap_or_else(|| {
                log::debug!("unknown privilege code '{}'", code);
                PrivilegeType::Unknown
            })
    }

    /// Lookup by symbolic name, case-insensitive.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("TEMP") {
            return PrivilegeType::Temporary;
        }
        if name.eq_ignore_ascii_case("ALL PRIVILEGES") {
            return PrivilegeType::All;
        }
        Self::all_types()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                log::debug!("unknown privilege name '{}'", name);
                PrivilegeType::Unknown
            })
    }

    /// Single character code used in ACL items. Sentinels have none.
    #[inline]
    pub fn code(self) -> Option<char> {
        self.entry().1
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            PrivilegeType::Select => "SELECT",
            PrivilegeType::Insert => "INSERT",
            PrivilegeType::Update => "UPDATE",
            PrivilegeType::Delete => "DELETE",
            PrivilegeType::Truncate => "TRUNCATE",
            PrivilegeType::References => "REFERENCES",
            PrivilegeType::Trigger => "TRIGGER",
            PrivilegeType::Create => "CREATE",
            PrivilegeType::Connect => "CONNECT",
            PrivilegeType::Temporary => "TEMPORARY",
            PrivilegeType::Execute => "EXECUTE",
            PrivilegeType::Usage => "USAGE",
            PrivilegeType::Rule => "RULE",
            PrivilegeType::All => "ALL",
            PrivilegeType::Unknown => "UNKNOWN",
        }
    }

    #[inline]
    pub fn applicable_kinds(self) -> ObjectKinds {
        self.entry().2
    }

    /// Privileges always apply to role-like kinds as grantees,
    /// otherwise the kind must be declared by the type.
    #[inline]
    pub fn supports_target_kind(self, kind: ObjectKind) -> bool {
        kind.is_role_like() || self.applicable_kinds().contains_kind(kind)
    }

    /// Sentinels are not real privileges.
    #[inline]
    pub fn is_valid(self) -> bool {
        !matches!(self, PrivilegeType::All | PrivilegeType::Unknown)
    }

    /// RULE was removed from the server and is never granted by `ALL`.
    #[inline]
    pub fn is_obsolete(self) -> bool {
        matches!(self, PrivilegeType::Rule)
    }

    /// Privileges that make up `ALL` for an object kind.
    #[inline]
    pub fn all_for(kind: ObjectKind) -> Vec<PrivilegeType> {
        Self::all_types()
            .filter(|t| t.is_valid() && !t.is_obsolete())
            .filter(|t| t.applicable_kinds().contains_kind(kind))
            .collect()
    }

    #[inline]
    fn entry(self) -> &'static (PrivilegeType, Option<char>, ObjectKinds) {
        // registry is ordered as the enum.
        &REGISTRY[self as usize]
    }
}

impl fmt::Display for PrivilegeType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ordered_as_enum() {
        for (idx, (t, _, _)) in REGISTRY.iter().enumerate() {
            assert_eq!(*t as usize, idx);
        }
    }

    #[test]
    fn test_code_round_trip() {
        let mut coded = 0;
        for t in PrivilegeType::all_types() {
            if let Some(code) = t.code() {
                assert_eq!(PrivilegeType::from_code(code), t);
                coded += 1;
            }
        }
        assert_eq!(coded, 13);
        assert_eq!(PrivilegeType::from_code('r'), PrivilegeType::Select);
        assert_eq!(PrivilegeType::from_code('D'), PrivilegeType::Truncate);
        assert_eq!(PrivilegeType::from_code('d'), PrivilegeType::Delete);
    }

    #[test]
    fn test_unknown_fallback() {
        for code in ['z', '?', '*', ' ', 'Q'] {
            assert_eq!(PrivilegeType::from_code(code), PrivilegeType::Unknown);
        }
        assert_eq!(PrivilegeType::from_name("FLY"), PrivilegeType::Unknown);
        assert_eq!(PrivilegeType::from_name(""), PrivilegeType::Unknown);
    }

    #[test]
    fn test_from_name() {
        for t in PrivilegeType::all_types() {
            assert_eq!(PrivilegeType::from_name(t.name()), t);
        }
        assert_eq!(PrivilegeType::from_name("select"), PrivilegeType::Select);
        assert_eq!(PrivilegeType::from_name(" Usage "), PrivilegeType::Usage);
        assert_eq!(PrivilegeType::from_name("TEMP"), PrivilegeType::Temporary);
        assert_eq!(
            PrivilegeType::from_name("ALL PRIVILEGES"),
            PrivilegeType::All
        );
    }

    #[test]
    fn test_supports_target_kind() {
        assert!(PrivilegeType::Select.supports_target_kind(ObjectKind::Table));
        assert!(PrivilegeType::Select.supports_target_kind(ObjectKind::Sequence));
        assert!(!PrivilegeType::Select.supports_target_kind(ObjectKind::Function));
        assert!(PrivilegeType::Execute.supports_target_kind(ObjectKind::Procedure));
        assert!(PrivilegeType::Connect.supports_target_kind(ObjectKind::Role));
        assert!(PrivilegeType::Unknown.supports_target_kind(ObjectKind::Role));
        assert!(!PrivilegeType::Unknown.supports_target_kind(ObjectKind::Table));
    }

    #[test]
    fn test_all_for_kind() {
        let table = PrivilegeType::all_for(ObjectKind::Table);
        assert_eq!(
            table,
            vec![
                PrivilegeType::Select,
                PrivilegeType::Insert,
                PrivilegeType::Update,
                PrivilegeType::Delete,
                PrivilegeType::Truncate,
                PrivilegeType::References,
                PrivilegeType::Trigger,
            ]
        );
        assert_eq!(
            PrivilegeType::all_for(ObjectKind::Schema),
            vec![PrivilegeType::Create, PrivilegeType::Usage]
        );
        assert_eq!(
            PrivilegeType::all_for(ObjectKind::Function),
            vec![PrivilegeType::Execute]
        );
    }
}
