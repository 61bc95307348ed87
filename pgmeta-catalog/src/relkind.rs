use crate::ObjectKind;
use std::fmt;

/// Relation kind stored in `pg_class.relkind`.
///
/// Newer servers and derived engines keep adding kinds, so a code
/// outside the known set is kept as `Unrecognized` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelKind {
    Table,
    Index,
    Sequence,
    Toast,
    View,
    MaterializedView,
    CompositeType,
    ForeignTable,
    PartitionedTable,
    PartitionedIndex,
    Unrecognized(char),
}

impl RelKind {
    #[inline]
    pub fn from_code(code: char) -> Self {
        match code {
            'r' => RelKind::Table,
            'i' => RelKind::Index,
            'S' => RelKind::Sequence,
            't' => RelKind::Toast,
            'v' => RelKind::View,
            'm' => RelKind::MaterializedView,
            'c' => RelKind::CompositeType,
            'f' => RelKind::ForeignTable,
            'p' => RelKind::PartitionedTable,
            'I' => RelKind::PartitionedIndex,
            other => RelKind::Unrecognized(other),
        }
    }

    #[inline]
    pub fn code(self) -> char {
        match self {
            RelKind::Table => 'r',
            RelKind::Index => 'i',
            RelKind::Sequence => 'S',
            RelKind::Toast => 't',
            RelKind::View => 'v',
            RelKind::MaterializedView => 'm',
            RelKind::CompositeType => 'c',
            RelKind::ForeignTable => 'f',
            RelKind::PartitionedTable => 'p',
            RelKind::PartitionedIndex => 'I',
            RelKind::Unrecognized(c) => c,
        }
    }

    #[inline]
    pub fn is_recognized(self) -> bool {
        !matches!(self, RelKind::Unrecognized(_))
    }

    /// Kinds that behave like a table: they have columns and can be selected from.
    #[inline]
    pub fn is_table_like(self) -> bool {
        matches!(
            self,
            RelKind::Table
                | RelKind::View
                | RelKind::MaterializedView
                | RelKind::PartitionedTable
                | RelKind::ForeignTable
        )
    }

    #[inline]
    pub fn is_index(self) -> bool {
        matches!(self, RelKind::Index | RelKind::PartitionedIndex)
    }

    #[inline]
    pub fn is_view(self) -> bool {
        matches!(self, RelKind::View | RelKind::MaterializedView)
    }

    /// Object kind this relation is presented as.
    /// Toast tables and unrecognized codes have none.
    #[inline]
    pub fn object_kind(self) -> Option<ObjectKind> {
        let kind = match self {
            RelKind::Table => ObjectKind::Table,
            RelKind::Index | RelKind::PartitionedIndex => ObjectKind::Index,
            RelKind::Sequence => ObjectKind::Sequence,
            RelKind::View => ObjectKind::View,
            RelKind::MaterializedView => ObjectKind::MaterializedView,
            RelKind::CompositeType => ObjectKind::CompositeType,
            RelKind::ForeignTable => ObjectKind::ForeignTable,
            RelKind::PartitionedTable => ObjectKind::PartitionedTable,
            RelKind::Toast | RelKind::Unrecognized(_) => return None,
        };
        Some(kind)
    }

    #[inline]
    pub fn description(self) -> &'static str {
        match self {
            RelKind::Table => "table",
            RelKind::Index => "index",
            RelKind::Sequence => "sequence",
            RelKind::Toast => "TOAST table",
            RelKind::View => "view",
            RelKind::MaterializedView => "materialized view",
            RelKind::CompositeType => "composite type",
            RelKind::ForeignTable => "foreign table",
            RelKind::PartitionedTable => "partitioned table",
            RelKind::PartitionedIndex => "partitioned index",
            RelKind::Unrecognized(_) => "unrecognized",
        }
    }
}

impl From<char> for RelKind {
    #[inline]
    fn from(code: char) -> Self {
        RelKind::from_code(code)
    }
}

impl fmt::Display for RelKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelKind::Unrecognized(c) => write!(f, "unrecognized({})", c),
            other => f.write_str(other.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relkind_codes() {
        for code in ['r', 'i', 'S', 't', 'v', 'm', 'c', 'f', 'p', 'I'] {
            let kind = RelKind::from_code(code);
            assert!(kind.is_recognized());
            assert_eq!(kind.code(), code);
        }
        let z = RelKind::from_code('Z');
        assert_eq!(z, RelKind::Unrecognized('Z'));
        assert_eq!(z.code(), 'Z');
        assert!(z.object_kind().is_none());
        assert_eq!(z.to_string(), "unrecognized(Z)");
    }

    #[test]
    fn test_relkind_classes() {
        assert!(RelKind::View.is_table_like());
        assert!(RelKind::ForeignTable.is_table_like());
        assert!(!RelKind::Sequence.is_table_like());
        assert!(RelKind::PartitionedIndex.is_index());
        assert_eq!(
            RelKind::from_code('f').object_kind(),
            Some(ObjectKind::ForeignTable)
        );
    }
}
