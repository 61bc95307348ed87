use pgmeta_catalog::ident::qualified_name;
use pgmeta_catalog::{ClassID, RelKind, RoleID, Row, SchemaID};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;

pub const COL_OID: &str = "oid";
pub const COL_RELNAME: &str = "relname";
pub const COL_RELNAMESPACE: &str = "relnamespace";
pub const COL_SCHEMA_NAME: &str = "schema_name";
pub const COL_RELKIND: &str = "relkind";
pub const COL_RELOWNER: &str = "relowner";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_RELACL: &str = "relacl";
pub const COL_DESCRIPTION: &str = "description";

/// Fields shared by every `pg_class` entry.
#[derive(Debug, Clone)]
pub struct Relation {
    pub oid: ClassID,
    pub name: SemiStr,
    pub schema: SchemaID,
    pub schema_name: SemiStr,
    pub kind: RelKind,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Relation {
    /// Relation kind falls back to `kind` when the row has none,
    /// as for queries restricted to one kind.
    pub fn from_row(row: &Row, kind: RelKind) -> Option<Relation> {
        let name = row.semistr(COL_RELNAME)?;
        let kind = row.char(COL_RELKIND).map_or(kind, RelKind::from_code);
        Some(Relation {
            oid: row.oid(COL_OID),
            name,
            schema: row.oid(COL_RELNAMESPACE),
            schema_name: row
                .semistr(COL_SCHEMA_NAME)
                .unwrap_or_else(|| SemiStr::new("")),
            kind,
            owner: row.oid(COL_RELOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            acl: row.text_array(COL_RELACL),
            description: row.string(COL_DESCRIPTION),
        })
    }

    #[inline]
    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema_name.as_str(), self.name.as_str())
    }

    #[inline]
    pub fn object_ref(&self, database: &str) -> ObjectRef {
        ObjectRef::new(database, self.schema_name.as_str(), self.name.as_str())
    }

    #[inline]
    pub fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_ref().map(|o| o.as_str())
    }
}

