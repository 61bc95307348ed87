use crate::ident::quote_literal;
use crate::{ClassID, SchemaID};
use semistr::SemiStr;

/// Catalog queries issued by the metadata model.
///
/// Each variant is one bulk round trip. Providers either render it
/// to SQL text (`to_sql`) or answer it from memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    Database { name: SemiStr },
    Roles,
    Namespaces,
    Extensions,
    Tablespaces,
    ForeignDataWrappers,
    ForeignServers,
    Tables { namespace: SchemaID },
    Indexes { namespace: SchemaID },
    Sequences { namespace: SchemaID },
    CompositeTypes { namespace: SchemaID },
    Procedures { namespace: SchemaID },
    Aggregates { namespace: SchemaID },
    Triggers { namespace: SchemaID },
    Columns { table: ClassID },
    RelationKind { namespace: SchemaID, name: SemiStr },
    DefaultAcl { namespace: SchemaID },
    TableGrants { schema: SemiStr, table: SemiStr },
    ColumnGrants { schema: SemiStr, table: SemiStr },
    RoutineGrants { schema: SemiStr, specific_name: SemiStr },
    RoleTableGrants { role: SemiStr },
    RoleRoutineGrants { role: SemiStr },
    RoleSequenceGrants { role: SemiStr },
}

impl CatalogQuery {
    /// Short stable name used in logs and errors.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            CatalogQuery::Database { .. } => "database",
            CatalogQuery::Roles => "roles",
            CatalogQuery::Namespaces => "namespaces",
            CatalogQuery::Extensions => "extensions",
            CatalogQuery::Tablespaces => "tablespaces",
            CatalogQuery::ForeignDataWrappers => "foreign_data_wrappers",
            CatalogQuery::ForeignServers => "foreign_servers",
            CatalogQuery::Tables { .. } => "tables",
            CatalogQuery::Indexes { .. } => "indexes",
            CatalogQuery::Sequences { .. } => "sequences",
            CatalogQuery::CompositeTypes { .. } => "composite_types",
            CatalogQuery::Procedures { .. } => "procedures",
            CatalogQuery::Aggregates { .. } => "aggregates",
            CatalogQuery::Triggers { .. } => "triggers",
            CatalogQuery::Columns { .. } => "columns",
            CatalogQuery::RelationKind { .. } => "relation_kind",
            CatalogQuery::DefaultAcl { .. } => "default_acl",
            CatalogQuery::TableGrants { .. } => "table_grants",
            CatalogQuery::ColumnGrants { .. } => "column_grants",
            CatalogQuery::RoutineGrants { .. } => "routine_grants",
            CatalogQuery::RoleTableGrants { .. } => "role_table_grants",
            CatalogQuery::RoleRoutineGrants { .. } => "role_routine_grants",
            CatalogQuery::RoleSequenceGrants { .. } => "role_sequence_grants",
        }
    }

    /// Render query to SQL text.
    /// Oids are inlined as numbers, names as quoted literals.
    pub fn to_sql(&self) -> String {
        match self {
            CatalogQuery::Database { name } => format!(
                "SELECT d.oid, d.datname, d.datdba, r.rolname AS owner_name, \
                 pg_catalog.pg_encoding_to_char(d.encoding) AS encoding, d.datcollate, d.datctype, \
                 d.datallowconn, d.datconnlimit, d.dattablespace, d.datacl, \
                 pg_catalog.shobj_description(d.oid, 'pg_database') AS description \
                 FROM pg_catalog.pg_database d \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = d.datdba \
                 WHERE d.datname = {}",
                quote_literal(name.as_str())
            ),
            CatalogQuery::Roles => String::from(
                "SELECT a.oid, a.rolname, a.rolsuper, a.rolinherit, a.rolcreaterole, \
                 a.rolcreatedb, a.rolcanlogin, a.rolreplication, a.rolbypassrls, \
                 a.rolconnlimit, a.rolvaliduntil, \
                 pg_catalog.shobj_description(a.oid, 'pg_authid') AS description \
                 FROM pg_catalog.pg_roles a ORDER BY a.rolname",
            ),
            CatalogQuery::Namespaces => String::from(
                "SELECT n.oid, n.nspname, n.nspowner, r.rolname AS owner_name, n.nspacl, \
                 pg_catalog.obj_description(n.oid, 'pg_namespace') AS description \
                 FROM pg_catalog.pg_namespace n \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = n.nspowner \
                 ORDER BY n.nspname",
            ),
            CatalogQuery::Extensions => String::from(
                "SELECT e.oid, e.extname, e.extowner, e.extnamespace, n.nspname AS schema_name, \
                 e.extrelocatable, e.extversion, \
                 pg_catalog.obj_description(e.oid, 'pg_extension') AS description \
                 FROM pg_catalog.pg_extension e \
                 LEFT JOIN pg_catalog.pg_namespace n ON n.oid = e.extnamespace \
                 ORDER BY e.extname",
            ),
            CatalogQuery::Tablespaces => String::from(
                "SELECT t.oid, t.spcname, t.spcowner, r.rolname AS owner_name, t.spcacl, \
                 t.spcoptions, pg_catalog.pg_tablespace_location(t.oid) AS location, \
                 pg_catalog.shobj_description(t.oid, 'pg_tablespace') AS description \
                 FROM pg_catalog.pg_tablespace t \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = t.spcowner \
                 ORDER BY t.spcname",
            ),
            CatalogQuery::ForeignDataWrappers => String::from(
                "SELECT w.oid, w.fdwname, w.fdwowner, r.rolname AS owner_name, \
                 w.fdwhandler::regproc::text AS handler, \
                 w.fdwvalidator::regproc::text AS validator, w.fdwacl, w.fdwoptions \
                 FROM pg_catalog.pg_foreign_data_wrapper w \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = w.fdwowner \
                 ORDER BY w.fdwname",
            ),
            CatalogQuery::ForeignServers => String::from(
                "SELECT s.oid, s.srvname, s.srvowner, r.rolname AS owner_name, s.srvfdw, \
                 w.fdwname, s.srvtype, s.srvversion, s.srvacl, s.srvoptions \
                 FROM pg_catalog.pg_foreign_server s \
                 JOIN pg_catalog.pg_foreign_data_wrapper w ON w.oid = s.srvfdw \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = s.srvowner \
                 ORDER BY s.srvname",
            ),
            CatalogQuery::Tables { namespace } => format!(
                "SELECT c.oid, c.relname, c.relnamespace, n.nspname AS schema_name, c.relkind, \
                 c.relowner, r.rolname AS owner_name, c.reltablespace, c.reltuples, \
                 c.relhasindex, c.relispartition, c.relpersistence, c.relacl, c.reloptions, \
                 pg_catalog.obj_description(c.oid, 'pg_class') AS description \
                 FROM pg_catalog.pg_class c \
                 JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = c.relowner \
                 WHERE c.relnamespace = {} AND c.relkind IN ('r','v','m','p','f') \
                 ORDER BY c.relname",
                namespace
            ),
            CatalogQuery::Indexes { namespace } => format!(
                "SELECT i.indexrelid AS oid, c.relname, c.relnamespace, n.nspname AS schema_name, \
                 c.relkind, i.indrelid, i.indisunique, i.indisprimary, am.amname, \
                 pg_catalog.pg_get_indexdef(i.indexrelid) AS definition \
                 FROM pg_catalog.pg_index i \
                 JOIN pg_catalog.pg_class c ON c.oid = i.indexrelid \
                 JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                 LEFT JOIN pg_catalog.pg_am am ON am.oid = c.relam \
                 WHERE c.relnamespace = {} \
                 ORDER BY c.relname",
                namespace
            ),
            CatalogQuery::Sequences { namespace } => format!(
                "SELECT c.oid, c.relname, c.relnamespace, n.nspname AS schema_name, c.relowner, \
                 r.rolname AS owner_name, c.relacl, s.seqstart, s.seqincrement, s.seqmin, \
                 s.seqmax, s.seqcache, s.seqcycle, \
                 pg_catalog.format_type(s.seqtypid, NULL) AS data_type \
                 FROM pg_catalog.pg_class c \
                 JOIN pg_catalog.pg_sequence s ON s.seqrelid = c.oid \
                 JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = c.relowner \
                 WHERE c.relnamespace = {} AND c.relkind = 'S' \
                 ORDER BY c.relname",
                namespace
            ),
            CatalogQuery::CompositeTypes { namespace } => format!(
                "SELECT t.oid, t.typname, t.typnamespace, n.nspname AS schema_name, t.typowner, \
                 r.rolname AS owner_name, t.typrelid, t.typacl, \
                 pg_catalog.obj_description(t.oid, 'pg_type') AS description \
                 FROM pg_catalog.pg_type t \
                 JOIN pg_catalog.pg_class c ON c.oid = t.typrelid \
                 JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = t.typowner \
                 WHERE t.typnamespace = {} AND t.typtype = 'c' AND c.relkind = 'c' \
                 ORDER BY t.typname",
                namespace
            ),
            CatalogQuery::Procedures { namespace } => format!(
                "SELECT p.oid, p.proname, p.pronamespace, n.nspname AS schema_name, p.proowner, \
                 r.rolname AS owner_name, p.prokind, l.lanname, \
                 pg_catalog.pg_get_function_identity_arguments(p.oid) AS arguments, \
                 pg_catalog.pg_get_function_result(p.oid) AS result_type, \
                 p.provolatile, p.proisstrict, p.prosecdef, p.proacl, \
                 pg_catalog.obj_description(p.oid, 'pg_proc') AS description \
                 FROM pg_catalog.pg_proc p \
                 JOIN pg_catalog.pg_namespace n ON n.oid = p.pronamespace \
                 LEFT JOIN pg_catalog.pg_language l ON l.oid = p.prolang \
                 LEFT JOIN pg_catalog.pg_roles r ON r.oid = p.proowner \
                 WHERE p.pronamespace = {} \
                 ORDER BY p.proname",
                namespace
            ),
            CatalogQuery::Aggregates { namespace } => format!(
                "SELECT p.oid, p.proname, p.pronamespace, p.proowner, \
                 pg_catalog.pg_get_function_identity_arguments(p.oid) AS arguments, \
                 a.aggkind, a.aggtransfn::regproc::text AS transfn, \
                 NULLIF(a.aggfinalfn, 0)::regproc::text AS finalfn, \
                 NULLIF(a.aggcombinefn, 0)::regproc::text AS combinefn, \
                 pg_catalog.format_type(a.aggtranstype, NULL) AS state_type, a.agginitval, \
                 NULLIF(a.aggsortop, 0)::regoperator::text AS sort_operator \
                 FROM pg_catalog.pg_aggregate a \
                 JOIN pg_catalog.pg_proc p ON p.oid = a.aggfnoid \
                 WHERE p.pronamespace = {} \
                 ORDER BY p.proname",
                namespace
            ),
            CatalogQuery::Triggers { namespace } => format!(
                "SELECT t.oid, t.tgname, t.tgrelid, c.relname AS table_name, \
                 n.nspname AS schema_name, t.tgfoid, fn.nspname AS function_schema, p.proname AS function_name, t.tgtype, \
                 t.tgenabled, pg_catalog.pg_get_triggerdef(t.oid) AS definition, \
                 pg_catalog.obj_description(t.oid, 'pg_trigger') AS description \
                 FROM pg_catalog.pg_trigger t \
                 JOIN pg_catalog.pg_class c ON c.oid = t.tgrelid \
                 JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
                 LEFT JOIN pg_catalog.pg_proc p ON p.oid = t.tgfoid \
                 LEFT JOIN pg_catalog.pg_namespace fn ON fn.oid = p.pronamespace \
                 WHERE c.relnamespace = {} AND NOT t.tgisinternal \
                 ORDER BY t.tgname",
                namespace
            ),
            CatalogQuery::Columns { table } => format!(
                "SELECT a.attnum, a.attname, a.attrelid, \
                 pg_catalog.format_type(a.atttypid, a.atttypmod) AS type_name, a.attnotnull, \
                 pg_catalog.pg_get_expr(d.adbin, d.adrelid) AS default_value, a.attacl, \
                 pg_catalog.col_description(a.attrelid, a.attnum) AS description \
                 FROM pg_catalog.pg_attribute a \
                 LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum \
                 WHERE a.attrelid = {} AND a.attnum > 0 AND NOT a.attisdropped \
                 ORDER BY a.attnum",
                table
            ),
            CatalogQuery::RelationKind { namespace, name } => format!(
                "SELECT c.oid, c.relkind FROM pg_catalog.pg_class c \
                 WHERE c.relnamespace = {} AND c.relname = {}",
                namespace,
                quote_literal(name.as_str())
            ),
            CatalogQuery::DefaultAcl { namespace } => format!(
                "SELECT d.oid, r.rolname AS defaclrole, n.nspname AS defaclnamespace, \
                 d.defaclobjtype, d.defaclacl \
                 FROM pg_catalog.pg_default_acl d \
                 JOIN pg_catalog.pg_roles r ON r.oid = d.defaclrole \
                 LEFT JOIN pg_catalog.pg_namespace n ON n.oid = d.defaclnamespace \
                 WHERE d.defaclnamespace = {}",
                namespace
            ),
            CatalogQuery::TableGrants { schema, table } => format!(
                "SELECT grantor, grantee, table_catalog, table_schema, table_name, \
                 privilege_type, is_grantable, with_hierarchy \
                 FROM information_schema.table_privileges \
                 WHERE table_schema = {} AND table_name = {}",
                quote_literal(schema.as_str()),
                quote_literal(table.as_str())
            ),
            CatalogQuery::ColumnGrants { schema, table } => format!(
                "SELECT grantor, grantee, table_catalog, table_schema, table_name, column_name, \
                 privilege_type, is_grantable \
                 FROM information_schema.column_privileges \
                 WHERE table_schema = {} AND table_name = {}",
                quote_literal(schema.as_str()),
                quote_literal(table.as_str())
            ),
            CatalogQuery::RoutineGrants {
                schema,
                specific_name,
            } => format!(
                "SELECT grantor, grantee, specific_catalog, specific_schema, specific_name, \
                 routine_name, privilege_type, is_grantable \
                 FROM information_schema.routine_privileges \
                 WHERE specific_schema = {} AND specific_name = {}",
                quote_literal(schema.as_str()),
                quote_literal(specific_name.as_str())
            ),
            CatalogQuery::RoleTableGrants { role } => format!(
                "SELECT grantor, grantee, table_catalog, table_schema, table_name, \
                 privilege_type, is_grantable, with_hierarchy \
                 FROM information_schema.table_privileges \
                 WHERE grantee = {}",
                quote_literal(role.as_str())
            ),
            CatalogQuery::RoleRoutineGrants { role } => format!(
                "SELECT grantor, grantee, specific_catalog, specific_schema, specific_name, \
                 routine_name, privilege_type, is_grantable \
                 FROM information_schema.routine_privileges \
                 WHERE grantee = {}",
                quote_literal(role.as_str())
            ),
            CatalogQuery::RoleSequenceGrants { role } => format!(
                "SELECT grantor, grantee, object_catalog, object_schema, object_name, \
                 privilege_type, is_grantable \
                 FROM information_schema.usage_privileges \
                 WHERE object_type = 'SEQUENCE' AND grantee = {}",
                quote_literal(role.as_str())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_sql_inlines_params() {
        let q = CatalogQuery::Tables { namespace: 2200 };
        assert_eq!(q.name(), "tables");
        assert!(q.to_sql().contains("c.relnamespace = 2200"));

        let q = CatalogQuery::RelationKind {
            namespace: 2200,
            name: SemiStr::new("o'neil"),
        };
        assert!(q.to_sql().contains("c.relname = 'o''neil'"));
    }
}
