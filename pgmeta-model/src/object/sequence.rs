use crate::context::MetaContext;
use crate::ddl::{DdlBuilder, ObjectDdl, if_not_exists};
use crate::object::relation::Relation;
use crate::privilege_owner::PrivilegeOwner;
use crate::property::{Property, PropertySource};
use pgmeta_catalog::{CatalogObject, ClassID, ObjectKind, RelKind, Row};
use pgmeta_privilege::ObjectRef;
use semistr::SemiStr;

pub const COL_SEQSTART: &str = "seqstart";
pub const COL_SEQINCREMENT: &str = "seqincrement";
pub const COL_SEQMIN: &str = "seqmin";
pub const COL_SEQMAX: &str = "seqmax";
pub const COL_SEQCACHE: &str = "seqcache";
pub const COL_SEQCYCLE: &str = "seqcycle";
pub const COL_DATA_TYPE: &str = "data_type";

#[derive(Debug)]
pub struct Sequence {
    pub rel: Relation,
    pub data_type: Option<SemiStr>,
    pub start: i64,
    pub increment: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub cache: i64,
    pub cycle: bool,
}

impl Sequence {
    pub fn from_row(row: &Row) -> Option<Sequence> {
        let rel = Relation::from_row(row, RelKind::Sequence)?;
        Some(Sequence {
            rel,
            data_type: row.semistr(COL_DATA_TYPE),
            start: row.i64(COL_SEQSTART).unwrap_or(1),
            increment: row.i64(COL_SEQINCREMENT).unwrap_or(1),
            min_value: row.i64(COL_SEQMIN).unwrap_or(1),
            max_value: row.i64(COL_SEQMAX).unwrap_or(i64::MAX),
            cache: row.i64(COL_SEQCACHE).unwrap_or(1),
            cycle: row.flag(COL_SEQCYCLE),
        })
    }

    #[inline]
    pub fn qualified_name(&self) -> String {
        self.rel.qualified_name()
    }
}

impl CatalogObject for Sequence {
    #[inline]
    fn oid(&self) -> ClassID {
        self.rel.oid
    }

    #[inline]
    fn name(&self) -> &str {
        self.rel.name.as_str()
    }
}

impl PrivilegeOwner for Sequence {
    #[inline]
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Sequence
    }

    #[inline]
    fn owner_name(&self) -> Option<&str> {
        self.rel.owner_name()
    }

    #[inline]
    fn acl(&self) -> Option<&[String]> {
        self.rel.acl.as_deref()
    }

    #[inline]
    fn object_ref(&self, database: &str) -> ObjectRef {
        self.rel.object_ref(database)
    }

    #[inline]
    fn sql_name(&self) -> String {
        self.qualified_name()
    }
}

impl ObjectDdl for Sequence {
    fn ddl(&self, ctx: &MetaContext) -> String {
        let name = self.qualified_name();
        let mut sql = format!("CREATE SEQUENCE {}{}", if_not_exists(ctx), name);
        if let Some(data_type) = &self.data_type {
            sql.push_str(" AS ");
            sql.push_str(data_type.as_str());
        }
        sql.push_str(&format!(
            " INCREMENT BY {} MINVALUE {} MAXVALUE {} START {} CACHE {} {}",
            self.increment,
            self.min_value,
            self.max_value,
            self.start,
            self.cache,
            if self.cycle { "CYCLE" } else { "NO CYCLE" }
        ));
        let mut b = DdlBuilder::new();
        b.statement(sql);
        b.object_comment(ctx, ObjectKind::Sequence, &name, self.rel.description.as_deref());
        b.permissions(ctx, self);
        b.finish()
    }
}

impl PropertySource for Sequence {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", "Name", 1, &self.rel.name),
            Property::oid("oid", "OID", 2, self.rel.oid),
            Property::new("owner", "Owner", 3, self.rel.owner_name.as_ref()),
            Property::new("data_type", "Data type", 4, self.data_type.as_ref()),
            Property::new("start", "Start value", 5, self.start),
            Property::new("increment", "Increment", 6, self.increment),
            Property::new("min_value", "Min value", 7, self.min_value),
            Property::new("max_value", "Max value", 8, self.max_value),
            Property::new("cache", "Cache", 9, self.cache),
            Property::new("cycle", "Cycle", 10, self.cycle),
            Property::new(
                "description",
                "Description",
                100,
                self.rel.description.as_deref(),
            ),
        ]
    }
}
