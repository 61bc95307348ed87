use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl};
use crate::error::Result;
use crate::object::database::Database;
use crate::object::procedure::Procedure;
use crate::object::schema::Schema;
use crate::object::table::Table;
use crate::property::{Property, PropertySource};
use bitflags::bitflags;
use pgmeta_catalog::ident::{qualified_name, quote_ident};
use pgmeta_catalog::{CatalogObject, ClassID, ObjectKind, Oid, ProcID, Row};
use semistr::SemiStr;
use std::sync::Arc;

pub const COL_OID: &str = "oid";
pub const COL_TGNAME: &str = "tgname";
pub const COL_TGRELID: &str = "tgrelid";
pub const COL_TABLE_NAME: &str = "table_name";
pub const COL_SCHEMA_NAME: &str = "schema_name";
pub const COL_TGFOID: &str = "tgfoid";
pub const COL_FUNCTION_SCHEMA: &str = "function_schema";
pub const COL_FUNCTION_NAME: &str = "function_name";
pub const COL_TGTYPE: &str = "tgtype";
pub const COL_TGENABLED: &str = "tgenabled";
pub const COL_DEFINITION: &str = "definition";
pub const COL_DESCRIPTION: &str = "description";

// bits of pg_trigger.tgtype
const TGTYPE_ROW: i64 = 1 << 0;
const TGTYPE_BEFORE: i64 = 1 << 1;
const TGTYPE_INSERT: i64 = 1 << 2;
const TGTYPE_DELETE: i64 = 1 << 3;
const TGTYPE_UPDATE: i64 = 1 << 4;
const TGTYPE_TRUNCATE: i64 = 1 << 5;
const TGTYPE_INSTEAD: i64 = 1 << 6;

bitflags! {
    pub struct TriggerEvents: u8 {
        const INSERT = 0x01;
        const UPDATE = 0x02;
        const DELETE = 0x04;
        const TRUNCATE = 0x08;
    }
}

impl TriggerEvents {
    #[inline]
    pub fn from_tgtype(tgtype: i64) -> Self {
        let mut events = TriggerEvents::empty();
        if tgtype & TGTYPE_INSERT != 0 {
            events |= TriggerEvents::INSERT;
        }
        if tgtype & TGTYPE_UPDATE != 0 {
            events |= TriggerEvents::UPDATE;
        }
        if tgtype & TGTYPE_DELETE != 0 {
            events |= TriggerEvents::DELETE;
        }
        if tgtype & TGTYPE_TRUNCATE != 0 {
            events |= TriggerEvents::TRUNCATE;
        }
        events
    }

    /// `INSERT OR UPDATE ...` in statement order.
    pub fn to_sql(self) -> String {
        let mut names = vec![];
        for (flag, name) in [
            (TriggerEvents::INSERT, "INSERT"),
            (TriggerEvents::UPDATE, "UPDATE"),
            (TriggerEvents::DELETE, "DELETE"),
            (TriggerEvents::TRUNCATE, "TRUNCATE"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        names.join(" OR ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    #[inline]
    pub fn from_tgtype(tgtype: i64) -> Self {
        if tgtype & TGTYPE_INSTEAD != 0 {
            TriggerTiming::InsteadOf
        } else if tgtype & TGTYPE_BEFORE != 0 {
            TriggerTiming::Before
        } else {
            TriggerTiming::After
        }
    }

    #[inline]
    pub fn keyword(self) -> &'static str {
        match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        }
    }
}

/// `pg_trigger.tgenabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEnabled {
    Origin,
    Disabled,
    Replica,
    Always,
    Unrecognized(char),
}

impl TriggerEnabled {
    #[inline]
    pub fn from_code(code: char) -> Self {
        match code {
            'O' => TriggerEnabled::Origin,
            'D' => TriggerEnabled::Disabled,
            'R' => TriggerEnabled::Replica,
            'A' => TriggerEnabled::Always,
            c => {
                log::warn!("unrecognized trigger enabled state '{}'", c);
                TriggerEnabled::Unrecognized(c)
            }
        }
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, TriggerEnabled::Disabled)
    }
}

/// Trigger on a table of one schema.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub oid: Oid,
    pub name: SemiStr,
    pub table: ClassID,
    pub table_name: Option<SemiStr>,
    /// Schema of the table, which is the schema of the trigger.
    pub schema_name: Option<SemiStr>,
    pub function: ProcID,
    pub function_schema: Option<SemiStr>,
    pub function_name: Option<SemiStr>,
    pub timing: TriggerTiming,
    pub events: TriggerEvents,
    pub for_each_row: bool,
    pub enabled: TriggerEnabled,
    /// `pg_get_triggerdef` output.
    pub definition: Option<String>,
    pub description: Option<String>,
}

impl Trigger {
    pub fn from_row(row: &Row) -> Option<Trigger> {
        let name = row.semistr(COL_TGNAME)?;
        let tgtype = row.i64(COL_TGTYPE).unwrap_or(0);
        Some(Trigger {
            oid: row.oid(COL_OID),
            name,
            table: row.oid(COL_TGRELID),
            table_name: row.semistr(COL_TABLE_NAME),
            schema_name: row.semistr(COL_SCHEMA_NAME),
            function: row.oid(COL_TGFOID),
            function_schema: row.semistr(COL_FUNCTION_SCHEMA),
            function_name: row.semistr(COL_FUNCTION_NAME),
            timing: TriggerTiming::from_tgtype(tgtype),
            events: TriggerEvents::from_tgtype(tgtype),
            for_each_row: tgtype & TGTYPE_ROW != 0,
            enabled: row
                .char(COL_TGENABLED)
                .map_or(TriggerEnabled::Origin, TriggerEnabled::from_code),
            definition: row.non_empty_str(COL_DEFINITION).map(String::from),
            description: row.string(COL_DESCRIPTION),
        })
    }

    /// Table the trigger is defined on. `None` if the table is
    /// not visible, the trigger is then shown with an unknown table.
    #[inline]
    pub fn table(&self, schema: &Schema, ctx: &MetaContext) -> Result<Option<Arc<Table>>> {
        let table = schema.table(ctx, self.table)?;
        if table.is_none() {
            log::debug!("table {} of trigger {} not found", self.table, self.name.as_str());
        }
        Ok(table)
    }

    /// Trigger function, which may live in another schema.
    pub fn function(&self, database: &Database, ctx: &MetaContext) -> Result<Option<Arc<Procedure>>> {
        let Some(schema_name) = &self.function_schema else {
            log::debug!("function {} of trigger {} not found", self.function, self.name.as_str());
            return Ok(None);
        };
        match database.namespace(ctx, schema_name.as_str())? {
            Some(schema) => schema.procedure(ctx, self.function),
            None => Ok(None),
        }
    }

    fn table_sql_name(&self) -> String {
        match (&self.schema_name, &self.table_name) {
            (Some(s), Some(t)) => qualified_name(s.as_str(), t.as_str()),
            (None, Some(t)) => quote_ident(t.as_str()),
            _ => self.table.to_string(),
        }
    }

    fn reconstruct(&self) -> String {
        let function = match (&self.function_schema, &self.function_name) {
            (Some(s), Some(f)) => qualified_name(s.as_str(), f.as_str()),
            (None, Some(f)) => quote_ident(f.as_str()),
            _ => self.function.to_string(),
        };
        format!(
            "CREATE TRIGGER {} {} {} ON {} FOR EACH {} EXECUTE FUNCTION {}()",
            quote_ident(self.name.as_str()),
            self.timing.keyword(),
            self.events.to_sql(),
            self.table_sql_name(),
            if self.for_each_row { "ROW" } else { "STATEMENT" },
            function
        )
    }
}

impl ObjectDdl for Trigger {
    /// Server-side definition when available, otherwise rebuilt
    /// from the decoded trigger type.
    fn ddl(&self, ctx: &MetaContext) -> String {
        let mut b = DdlBuilder::new();
        match &self.definition {
            Some(def) => b.statement(def),
            None => b.statement(self.reconstruct()),
        };
        let name = format!("{} ON {}", quote_ident(self.name.as_str()), self.table_sql_name());
        b.object_comment(ctx, ObjectKind::Trigger, &name, self.description.as_deref());
        b.finish()
    }
}

impl CatalogObject for Trigger {
    #[inline]
    fn oid(&self) -> Oid {
        self.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl PropertySource for Trigger {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.name),
            Property::oid("oid", "OID", 2, self.oid),
            Property::new("table", "Table", 3, self.table_name.as_ref()),
            Property::new("timing", "Timing", 4, self.timing.keyword()),
            Property::new("events", "Events", 5, self.events.to_sql().as_str()),
            Property::new("for_each_row", "For each row", 6, self.for_each_row),
            Property::new("enabled", "Enabled", 7, self.enabled.is_enabled()),
            Property::new("function", "Function", 8, self.function_name.as_ref()),
            Property::new("description", "Description", 100, self.description.as_deref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tgtype_decoding() {
        // ROW | BEFORE | INSERT | UPDATE
        let tgtype = 1 | 2 | 4 | 16;
        assert_eq!(TriggerTiming::from_tgtype(tgtype), TriggerTiming::Before);
        let events = TriggerEvents::from_tgtype(tgtype);
        assert_eq!(events, TriggerEvents::INSERT | TriggerEvents::UPDATE);
        assert_eq!(events.to_sql(), "INSERT OR UPDATE");

        assert_eq!(TriggerTiming::from_tgtype(8), TriggerTiming::After);
        assert_eq!(TriggerTiming::from_tgtype(64 | 1 | 4), TriggerTiming::InsteadOf);
        assert_eq!(TriggerEvents::from_tgtype(32).to_sql(), "TRUNCATE");
    }

    #[test]
    fn test_trigger_reconstruct() {
        let row = Row::new()
            .with(COL_OID, "16460")
            .with(COL_TGNAME, "orders_audit")
            .with(COL_TGRELID, "16410")
            .with(COL_TABLE_NAME, "orders")
            .with(COL_SCHEMA_NAME, "public")
            .with(COL_TGFOID, "16453")
            .with(COL_FUNCTION_SCHEMA, "audit")
            .with(COL_FUNCTION_NAME, "log_change")
            .with(COL_TGTYPE, "17")
            .with(COL_TGENABLED, "D")
            .with_null(COL_DEFINITION);
        let trigger = Trigger::from_row(&row).unwrap();
        assert!(!trigger.enabled.is_enabled());
        assert_eq!(
            trigger.reconstruct(),
            "CREATE TRIGGER orders_audit AFTER INSERT OR UPDATE ON public.orders \
             FOR EACH ROW EXECUTE FUNCTION audit.log_change()"
        );
    }
}
