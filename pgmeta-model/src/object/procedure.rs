use crate::context::MetaContext;
use crate::error::Result;
use crate::object::schema::Schema;
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::ident::qualified_name;
use pgmeta_catalog::{CatalogObject, CatalogQuery, ObjectKind, ProcID, RoleID, Row, SchemaID};
use pgmeta_privilege::{GrantKind, ObjectRef, PrivilegeGrant};
use semistr::SemiStr;
use std::fmt;
use std::sync::Arc;

pub const COL_OID: &str = "oid";
pub const COL_PRONAME: &str = "proname";
pub const COL_PRONAMESPACE: &str = "pronamespace";
pub const COL_SCHEMA_NAME: &str = "schema_name";
pub const COL_PROOWNER: &str = "proowner";
pub const COL_OWNER_NAME: &str = "owner_name";
pub const COL_PROKIND: &str = "prokind";
pub const COL_LANNAME: &str = "lanname";
pub const COL_ARGUMENTS: &str = "arguments";
pub const COL_RESULT_TYPE: &str = "result_type";
pub const COL_PROVOLATILE: &str = "provolatile";
pub const COL_PROISSTRICT: &str = "proisstrict";
pub const COL_PROSECDEF: &str = "prosecdef";
pub const COL_PROACL: &str = "proacl";
pub const COL_DESCRIPTION: &str = "description";

pub const COL_AGGKIND: &str = "aggkind";
pub const COL_TRANSFN: &str = "transfn";
pub const COL_FINALFN: &str = "finalfn";
pub const COL_COMBINEFN: &str = "combinefn";
pub const COL_STATE_TYPE: &str = "state_type";
pub const COL_AGGINITVAL: &str = "agginitval";
pub const COL_SORT_OPERATOR: &str = "sort_operator";

/// `pg_proc.prokind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    Function,
    Procedure,
    Aggregate,
    Window,
    Unrecognized(char),
}

impl ProcedureKind {
    #[inline]
    pub fn from_code(code: char) -> Self {
        match code {
            'f' => ProcedureKind::Function,
            'p' => ProcedureKind::Procedure,
            'a' => ProcedureKind::Aggregate,
            'w' => ProcedureKind::Window,
            c => {
                log::warn!("unrecognized procedure kind '{}'", c);
                ProcedureKind::Unrecognized(c)
            }
        }
    }

    #[inline]
    pub fn object_kind(self) -> ObjectKind {
        match self {
            ProcedureKind::Procedure => ObjectKind::Procedure,
            ProcedureKind::Aggregate => ObjectKind::Aggregate,
            _ => ObjectKind::Function,
        }
    }
}

impl fmt::Display for ProcedureKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureKind::Function => f.write_str("function"),
            ProcedureKind::Procedure => f.write_str("procedure"),
            ProcedureKind::Aggregate => f.write_str("aggregate"),
            ProcedureKind::Window => f.write_str("window"),
            ProcedureKind::Unrecognized(c) => write!(f, "unrecognized({})", c),
        }
    }
}

/// `pg_proc.provolatile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    Immutable,
    Stable,
    Volatile,
}

impl Volatility {
    #[inline]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'i' => Some(Volatility::Immutable),
            's' => Some(Volatility::Stable),
            'v' => Some(Volatility::Volatile),
            _ => None,
        }
    }

    #[inline]
    pub fn keyword(self) -> &'static str {
        match self {
            Volatility::Immutable => "IMMUTABLE",
            Volatility::Stable => "STABLE",
            Volatility::Volatile => "VOLATILE",
        }
    }
}

/// Function, procedure, aggregate or window function.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub oid: ProcID,
    pub name: SemiStr,
    pub schema: SchemaID,
    pub schema_name: SemiStr,
    pub owner: RoleID,
    pub owner_name: Option<SemiStr>,
    pub kind: ProcedureKind,
    pub language: Option<SemiStr>,
    /// Identity arguments, e.g. `integer, text`.
    pub arguments: String,
    pub result_type: Option<String>,
    pub volatility: Option<Volatility>,
    pub strict: bool,
    pub security_definer: bool,
    pub acl: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Procedure {
    pub fn from_row(row: &Row) -> Option<Procedure> {
        let name = row.semistr(COL_PRONAME)?;
        Some(Procedure {
            oid: row.oid(COL_OID),
            name,
            schema: row.oid(COL_PRONAMESPACE),
            schema_name: row
                .semistr(COL_SCHEMA_NAME)
                .unwrap_or_else(|| SemiStr::new("")),
            owner: row.oid(COL_PROOWNER),
            owner_name: row.semistr(COL_OWNER_NAME),
            kind: row
                .char(COL_PROKIND)
                .map_or(ProcedureKind::Function, ProcedureKind::from_code),
            language: row.semistr(COL_LANNAME),
            arguments: row.string(COL_ARGUMENTS).unwrap_or_default(),
            result_type: row.string(COL_RESULT_TYPE),
            volatility: row.char(COL_PROVOLATILE).and_then(Volatility::from_code),
            strict: row.flag(COL_PROISSTRICT),
            security_definer: row.flag(COL_PROSECDEF),
            acl: row.text_array(COL_PROACL),
            description: row.string(COL_DESCRIPTION),
        })
    }

    /// `schema.name(args)`, unique within the database.
    #[inline]
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            qualified_name(self.schema_name.as_str(), self.name.as_str()),
            self.arguments
        )
    }

    /// Name used by `information_schema` to tell overloads apart.
    #[inline]
    pub fn specific_name(&self) -> String {
        format!("{}_{}", self.name.as_str(), self.oid)
    }

    /// Grants from `information_schema.routine_privileges`.
    pub fn fetch_grants(&self, ctx: &MetaContext) -> Result<Vec<PrivilegeGrant>> {
        let rows = ctx.query(&CatalogQuery::RoutineGrants {
            schema: self.schema_name.clone(),
            specific_name: SemiStr::new(&self.specific_name()),
        })?;
        let kind = if self.kind == ProcedureKind::Procedure {
            GrantKind::Procedure
        } else {
            GrantKind::Function
        };
        let database = ctx.database_name();
        Ok(rows
            .iter()
            .map(|row| PrivilegeGrant::from_row(kind, database, row))
            .collect())
    }
}

impl CatalogObject for Procedure {
    #[inline]
    fn oid(&self) -> ProcID {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PrivilegeOwner for Procedure {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        self.kind.object_kind()
    }

    #[inline]
    fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_ref().map(|o| o.as_str())
    }

    #[inline]
    fn acl(&self) -> Option<&[String]> {
        self.acl.as_deref()
    }

    #[inline]
    fn object_ref(&self, database: &str) -> ObjectRef {
        ObjectRef::new(database, self.schema_name.as_str(), &self.specific_name())
    }

    #[inline]
    fn sql_name(&self) -> String {
        self.signature()
    }
}

impl PropertySource for Procedure {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("kind", "Kind", 3, self.kind.to_string().as_str()),
            Property::new("owner", "Owner", 4, self.owner_name.as_ref()),
            Property::new("language", "Language", 5, self.language.as_ref()),
            Property::new("arguments", "Arguments", 6, self.arguments.as_str()),
            Property::new("result_type", "Result type", 7, self.result_type.as_deref()),
            Property::new(
                "volatility",
                "Volatility",
                8,
                self.volatility.map(Volatility::keyword),
            ),
            Property::new("strict", "Strict", 9, self.strict),
            Property::new("security_definer", "Security definer", 10, self.security_definer),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}

/// `pg_aggregate.aggkind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Normal,
    OrderedSet,
    Hypothetical,
}

impl AggregateKind {
    #[inline]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(AggregateKind::Normal),
            'o' => Some(AggregateKind::OrderedSet),
            'h' => Some(AggregateKind::Hypothetical),
            _ => None,
        }
    }
}

/// Aggregate definition. The aggregate itself is also a `pg_proc`
/// entry with the same oid.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub oid: ProcID,
    pub name: SemiStr,
    pub schema: SchemaID,
    pub owner: RoleID,
    pub arguments: String,
    pub kind: Option<AggregateKind>,
    pub transition_fn: Option<String>,
    pub final_fn: Option<String>,
    pub combine_fn: Option<String>,
    pub state_type: Option<String>,
    pub initial_value: Option<String>,
    pub sort_operator: Option<String>,
}

impl Aggregate {
    pub fn from_row(row: &Row) -> Option<Aggregate> {
        let name = row.semistr(COL_PRONAME)?;
        Some(Aggregate {
            oid: row.oid(COL_OID),
            name,
            schema: row.oid(COL_PRONAMESPACE),
            owner: row.oid(COL_PROOWNER),
            arguments: row.string(COL_ARGUMENTS).unwrap_or_default(),
            kind: row.char(COL_AGGKIND).and_then(AggregateKind::from_code),
            transition_fn: row.string(COL_TRANSFN),
            final_fn: row.string(COL_FINALFN),
            combine_fn: row.string(COL_COMBINEFN),
            state_type: row.string(COL_STATE_TYPE),
            initial_value: row.string(COL_AGGINITVAL),
            sort_operator: row.string(COL_SORT_OPERATOR),
        })
    }

    /// Function entry of this aggregate.
    #[inline]
    pub fn function(&self, schema: &Schema, ctx: &MetaContext) -> Result<Option<Arc<Procedure>>> {
        schema.procedure(ctx, self.oid)
    }
}

impl CatalogObject for Aggregate {
    #[inline]
    fn oid(&self) -> ProcID {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PropertySource for Aggregate {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("arguments", "Arguments", 3, self.arguments.as_str()),
            Property::new("transition_fn", "Transition function", 4, self.transition_fn.as_deref()),
            Property::new("final_fn", "Final function", 5, self.final_fn.as_deref()),
            Property::new("combine_fn", "Combine function", 6, self.combine_fn.as_deref()),
            Property::new("state_type", "State type", 7, self.state_type.as_deref()),
            Property::new("initial_value", "Initial value", 8, self.initial_value.as_deref()),
            Property::new("sort_operator", "Sort operator", 9, self.sort_operator.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedure_from_row() {
        let row = Row::new()
            .with(COL_OID, "16450")
            .with(COL_PRONAME, "order_total")
            .with(COL_PRONAMESPACE, "2200")
            .with(COL_SCHEMA_NAME, "public")
            .with(COL_OWNER_NAME, "alice")
            .with(COL_PROKIND, "f")
            .with(COL_LANNAME, "sql")
            .with(COL_ARGUMENTS, "order_id integer")
            .with(COL_PROVOLATILE, "s")
            .with_null(COL_PROACL);
        let p = Procedure::from_row(&row).unwrap();
        assert_eq!(p.signature(), "public.order_total(order_id integer)");
        assert_eq!(p.specific_name(), "order_total_16450");
        assert_eq!(p.volatility, Some(Volatility::Stable));
        assert_eq!(p.object_kind(), ObjectKind::Function);
        // null acl: owner holds everything.
        let perms = p.permissions("shop");
        assert_eq!(perms.len(), 1);
        assert!(perms[0].has_all_privileges(ObjectKind::Function));
    }

    #[test]
    fn test_procedure_kind_codes() {
        assert_eq!(ProcedureKind::from_code('p').object_kind(), ObjectKind::Procedure);
        assert_eq!(ProcedureKind::from_code('a').object_kind(), ObjectKind::Aggregate);
        assert_eq!(ProcedureKind::from_code('w').object_kind(), ObjectKind::Function);
        assert_eq!(ProcedureKind::from_code('q'), ProcedureKind::Unrecognized('q'));
        assert_eq!(AggregateKind::from_code('o'), Some(AggregateKind::OrderedSet));
        assert_eq!(AggregateKind::from_code('z'), None);
    }
}
