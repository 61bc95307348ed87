//! A small shop database answering every catalog query in memory.

use pgmeta_catalog::mem_impl::MemSource;
use pgmeta_catalog::{CatalogQuery, Oid, Row};
use semistr::SemiStr;

pub const DATABASE: &str = "shop";
pub const DATABASE_OID: Oid = 16380;

pub const ROLE_POSTGRES: Oid = 10;
pub const ROLE_ALICE: Oid = 16384;
pub const ROLE_BOB: Oid = 16385;
pub const ROLE_REPORTING: Oid = 16386;

pub const SCHEMA_PG_CATALOG: Oid = 11;
pub const SCHEMA_PUBLIC: Oid = 2200;
pub const SCHEMA_INFORMATION: Oid = 13000;
pub const SCHEMA_SALES: Oid = 16400;

pub const TABLE_ORDERS: Oid = 16410;
pub const TABLE_CUSTOMERS: Oid = 16411;
pub const VIEW_ORDER_SUMMARY: Oid = 16412;
pub const MATVIEW_ORDER_STATS: Oid = 16413;
pub const FOREIGN_REMOTE_ORDERS: Oid = 16414;
pub const INDEX_ORDERS_PKEY: Oid = 16420;
pub const INDEX_CUSTOMERS_EMAIL: Oid = 16421;
pub const SEQ_ORDERS_ID: Oid = 16430;
pub const TYPE_ADDRESS: Oid = 16440;
pub const TYPE_ADDRESS_REL: Oid = 16441;
pub const PROC_ORDER_TOTAL: Oid = 16450;
pub const PROC_ARCHIVE_ORDERS: Oid = 16451;
pub const PROC_SUM_AMOUNT: Oid = 16452;
pub const PROC_AUDIT_FN: Oid = 16453;
pub const TRIGGER_ORDERS_AUDIT: Oid = 16460;
pub const TRIGGER_DANGLING: Oid = 16461;
pub const RELATION_UNKNOWN_KIND: Oid = 16499;
pub const TABLESPACE_DEFAULT: Oid = 1663;
pub const TABLESPACE_FAST_SSD: Oid = 16610;
pub const FDW_POSTGRES: Oid = 16620;
pub const SERVER_WAREHOUSE: Oid = 16630;

/// Row from `(column, value)` pairs. Columns left out read as null.
pub fn row(cols: &[(&str, &str)]) -> Row {
    cols.iter()
        .fold(Row::new(), |row, (name, value)| row.with(name, *value))
}

#[inline]
fn name(s: &str) -> SemiStr {
    SemiStr::new(s)
}

/// In-memory source of the shop database.
pub fn demo_source() -> MemSource {
    let src = MemSource::new();
    database(&src);
    roles(&src);
    namespaces(&src);
    public_schema(&src);
    sales_schema(&src);
    grants(&src);
    cluster_objects(&src);
    src
}

fn database(src: &MemSource) {
    src.add_row(
        CatalogQuery::Database {
            name: name(DATABASE),
        },
        row(&[
            ("oid", "16380"),
            ("datname", DATABASE),
            ("datdba", "10"),
            ("owner_name", "postgres"),
            ("encoding", "UTF8"),
            ("datcollate", "en_US.UTF-8"),
            ("datctype", "en_US.UTF-8"),
            ("datallowconn", "t"),
            ("datconnlimit", "-1"),
            ("dattablespace", "1663"),
            ("datacl", "{=Tc/postgres,postgres=CTc/postgres,reporting=c/postgres}"),
            ("description", "Online shop"),
        ]),
    );
}

fn roles(src: &MemSource) {
    let role = |oid: &str, rolname: &str, superuser: &str, login: &str, connlimit: &str| {
        row(&[
            ("oid", oid),
            ("rolname", rolname),
            ("rolsuper", superuser),
            ("rolinherit", "t"),
            ("rolcreaterole", superuser),
            ("rolcreatedb", superuser),
            ("rolcanlogin", login),
            ("rolreplication", "f"),
            ("rolbypassrls", "f"),
            ("rolconnlimit", connlimit),
        ])
    };
    src.set_rows(
        CatalogQuery::Roles,
        vec![
            role("16384", "alice", "f", "t", "-1").with("rolcreatedb", "t"),
            role("16385", "bob", "f", "t", "5").with("rolvaliduntil", "2030-01-01 00:00:00+00"),
            role("10", "postgres", "t", "t", "-1"),
            role("16386", "reporting", "f", "f", "-1")
                .with("description", "Read only reporting"),
        ],
    );
}

fn namespaces(src: &MemSource) {
    let ns = |oid: &str, nspname: &str, owner: &str| {
        row(&[("oid", oid), ("nspname", nspname), ("owner_name", owner)])
    };
    src.set_rows(
        CatalogQuery::Namespaces,
        vec![
            ns("13000", "information_schema", "postgres")
                .with("nspowner", "10")
                .with("nspacl", "{postgres=UC/postgres,=U/postgres}"),
            ns("11", "pg_catalog", "postgres")
                .with("nspowner", "10")
                .with("nspacl", "{postgres=UC/postgres,=U/postgres}"),
            ns("2200", "public", "postgres").with("nspowner", "10"),
            ns("16400", "sales", "alice")
                .with("nspowner", "16384")
                .with("nspacl", "{alice=UC/alice,bob=U/alice,reporting=U*/alice}")
                .with("description", "Sales data"),
        ],
    );
}

fn relation(oid: &str, relname: &str, schema: &str, relkind: &str) -> Row {
    row(&[
        ("oid", oid),
        ("relname", relname),
        ("relnamespace", schema),
        ("schema_name", if schema == "2200" { "public" } else { "sales" }),
        ("relkind", relkind),
        ("relowner", "16384"),
        ("owner_name", "alice"),
    ])
}

fn public_schema(src: &MemSource) {
    let ns = SCHEMA_PUBLIC;
    src.set_rows(
        CatalogQuery::Tables { namespace: ns },
        vec![
            relation("16411", "customers", "2200", "r")
                .with("reltuples", "300")
                .with("relhasindex", "t")
                .with("relpersistence", "p"),
            relation("16414", "remote_orders", "2200", "f")
                .with("relacl", "{alice=arwdDxt/alice}")
                .with("reloptions", "{schema_name=public,table_name=orders}"),
            relation("16413", "order_stats", "2200", "m").with("reltuples", "-1"),
            relation("16412", "order_summary", "2200", "v").with("relacl", "{alice=arwdDxt/alice,reporting=r/alice}"),
            relation("16410", "orders", "2200", "r")
                .with("reltablespace", "16610")
                .with("reltuples", "1200")
                .with("relhasindex", "t")
                .with("relispartition", "f")
                .with("relpersistence", "p")
                .with(
                    "relacl",
                    "{alice=arwdDxt/alice,bob=r*/alice,bob=a/alice,=r/alice}",
                )
                .with("reloptions", "{fillfactor=90}")
                .with("description", "Customer orders"),
        ],
    );
    src.set_rows(
        CatalogQuery::Indexes { namespace: ns },
        vec![
            relation("16421", "customers_email_idx", "2200", "i")
                .with("indrelid", "16411")
                .with("indisunique", "t")
                .with("indisprimary", "f")
                .with("amname", "btree")
                .with(
                    "definition",
                    "CREATE UNIQUE INDEX customers_email_idx ON public.customers USING btree (email)",
                ),
            relation("16420", "orders_pkey", "2200", "i")
                .with("indrelid", "16410")
                .with("indisunique", "t")
                .with("indisprimary", "t")
                .with("amname", "btree")
                .with(
                    "definition",
                    "CREATE UNIQUE INDEX orders_pkey ON public.orders USING btree (id)",
                ),
        ],
    );
    src.set_rows(
        CatalogQuery::Sequences { namespace: ns },
        vec![
            relation("16430", "orders_id_seq", "2200", "S")
                .with("relacl", "{alice=rwU/alice,bob=U/alice}")
                .with("data_type", "bigint")
                .with("seqstart", "1")
                .with("seqincrement", "1")
                .with("seqmin", "1")
                .with("seqmax", "9223372036854775807")
                .with("seqcache", "1")
                .with("seqcycle", "f"),
        ],
    );
    src.set_rows(
        CatalogQuery::CompositeTypes { namespace: ns },
        vec![row(&[
            ("oid", "16440"),
            ("typname", "address"),
            ("typnamespace", "2200"),
            ("schema_name", "public"),
            ("typowner", "16384"),
            ("owner_name", "alice"),
            ("typrelid", "16441"),
        ])],
    );
    let proc = |oid: &str, proname: &str, prokind: &str, lang: &str, args: &str, result: &str| {
        row(&[
            ("oid", oid),
            ("proname", proname),
            ("pronamespace", "2200"),
            ("schema_name", "public"),
            ("proowner", "16384"),
            ("owner_name", "alice"),
            ("prokind", prokind),
            ("lanname", lang),
            ("arguments", args),
            ("result_type", result),
            ("provolatile", "v"),
            ("proisstrict", "f"),
            ("prosecdef", "f"),
        ])
    };
    src.set_rows(
        CatalogQuery::Procedures { namespace: ns },
        vec![
            proc("16451", "archive_orders", "p", "plpgsql", "before date", ""),
            proc("16450", "order_total", "f", "sql", "order_id integer", "numeric")
                .with("provolatile", "s")
                .with("proisstrict", "t")
                .with("proacl", "{alice=X/alice,bob=X/alice}")
                .with("description", "Total amount of one order"),
            proc("16452", "sum_amount", "a", "internal", "numeric", "numeric")
                .with("provolatile", "i"),
        ],
    );
    src.set_rows(
        CatalogQuery::Aggregates { namespace: ns },
        vec![row(&[
            ("oid", "16452"),
            ("proname", "sum_amount"),
            ("pronamespace", "2200"),
            ("proowner", "16384"),
            ("arguments", "numeric"),
            ("aggkind", "n"),
            ("transfn", "numeric_add"),
            ("state_type", "numeric"),
            ("agginitval", "0"),
        ])],
    );
    src.set_rows(
        CatalogQuery::Triggers { namespace: ns },
        vec![
            row(&[
                ("oid", "16461"),
                ("tgname", "ghost_trigger"),
                ("tgrelid", "99999"),
                ("tgfoid", "99998"),
                ("tgtype", "6"),
                ("tgenabled", "D"),
            ]),
            row(&[
                ("oid", "16460"),
                ("tgname", "orders_audit"),
                ("tgrelid", "16410"),
                ("table_name", "orders"),
                ("schema_name", "public"),
                ("tgfoid", "16453"),
                ("function_schema", "sales"),
                ("function_name", "audit_fn"),
                ("tgtype", "29"),
                ("tgenabled", "O"),
                (
                    "definition",
                    "CREATE TRIGGER orders_audit AFTER INSERT OR DELETE OR UPDATE ON public.orders \
                     FOR EACH ROW EXECUTE FUNCTION sales.audit_fn()",
                ),
                ("description", "Audit order changes"),
            ]),
        ],
    );

    let column = |relid: &str, attnum: &str, attname: &str, type_name: &str| {
        row(&[
            ("attnum", attnum),
            ("attname", attname),
            ("attrelid", relid),
            ("type_name", type_name),
            ("attnotnull", "f"),
        ])
    };
    src.set_rows(
        CatalogQuery::Columns {
            table: TABLE_ORDERS,
        },
        vec![
            column("16410", "-1", "ctid", "tid"),
            column("16410", "1", "id", "bigint")
                .with("attnotnull", "t")
                .with("default_value", "nextval('orders_id_seq'::regclass)"),
            column("16410", "2", "customer_id", "integer").with("attnotnull", "t"),
            column("16410", "3", "amount", "numeric(12,2)")
                .with("attacl", "{reporting=r/alice}")
                .with("description", "Order amount in cents"),
            column("16410", "4", "created_at", "timestamp without time zone")
                .with("default_value", "now()"),
        ],
    );
    src.set_rows(
        CatalogQuery::Columns {
            table: TYPE_ADDRESS_REL,
        },
        vec![
            column("16441", "1", "street", "text"),
            column("16441", "2", "city", "text"),
        ],
    );

    let kind = |relname: &str, oid: &str, relkind: &str| {
        (
            CatalogQuery::RelationKind {
                namespace: ns,
                name: name(relname),
            },
            row(&[("oid", oid), ("relkind", relkind)]),
        )
    };
    for (query, r) in [
        kind("orders", "16410", "r"),
        kind("customers", "16411", "r"),
        kind("order_summary", "16412", "v"),
        kind("order_stats", "16413", "m"),
        kind("remote_orders", "16414", "f"),
        kind("orders_pkey", "16420", "i"),
        kind("orders_id_seq", "16430", "S"),
        kind("address", "16441", "c"),
        kind("pg_toast_16410", "16415", "t"),
        kind("shadow", "16499", "Z"),
    ] {
        src.add_row(query, r);
    }
}

fn sales_schema(src: &MemSource) {
    let ns = SCHEMA_SALES;
    src.set_rows(
        CatalogQuery::Procedures { namespace: ns },
        vec![row(&[
            ("oid", "16453"),
            ("proname", "audit_fn"),
            ("pronamespace", "16400"),
            ("schema_name", "sales"),
            ("proowner", "16384"),
            ("owner_name", "alice"),
            ("prokind", "f"),
            ("lanname", "plpgsql"),
            ("arguments", ""),
            ("result_type", "trigger"),
            ("provolatile", "v"),
            ("prosecdef", "t"),
        ])],
    );
    let default_acl = |oid: &str, objtype: &str, acl: &str| {
        row(&[
            ("oid", oid),
            ("defaclrole", "alice"),
            ("defaclnamespace", "sales"),
            ("defaclobjtype", objtype),
            ("defaclacl", acl),
        ])
    };
    src.set_rows(
        CatalogQuery::DefaultAcl { namespace: ns },
        vec![
            default_acl("16500", "r", "{bob=r*/alice,bob=a/alice,=r/alice}"),
            default_acl("16501", "S", "{bob=rU/alice}"),
            // namespace-level defaults are left without object kind.
            default_acl("16502", "n", "{reporting=U/alice}"),
        ],
    );
}

fn grants(src: &MemSource) {
    let table_grant = |grantee: &str, table: &str, privilege: &str, grantable: &str, hierarchy: &str| {
        row(&[
            ("grantor", "alice"),
            ("grantee", grantee),
            ("table_catalog", DATABASE),
            ("table_schema", "public"),
            ("table_name", table),
            ("privilege_type", privilege),
            ("is_grantable", grantable),
            ("with_hierarchy", hierarchy),
        ])
    };
    src.set_rows(
        CatalogQuery::TableGrants {
            schema: name("public"),
            table: name("orders"),
        },
        vec![
            table_grant("bob", "orders", "SELECT", "YES", "YES"),
            table_grant("bob", "orders", "INSERT", "NO", "NO"),
            table_grant("PUBLIC", "orders", "SELECT", "NO", "YES"),
        ],
    );
    src.set_rows(
        CatalogQuery::ColumnGrants {
            schema: name("public"),
            table: name("orders"),
        },
        vec![
            table_grant("reporting", "orders", "SELECT", "NO", "NO").with("column_name", "amount"),
        ],
    );
    let routine_grant = |grantee: &str| {
        row(&[
            ("grantor", "alice"),
            ("grantee", grantee),
            ("specific_catalog", DATABASE),
            ("specific_schema", "public"),
            ("specific_name", "order_total_16450"),
            ("routine_name", "order_total"),
            ("privilege_type", "EXECUTE"),
            ("is_grantable", "NO"),
        ])
    };
    src.set_rows(
        CatalogQuery::RoutineGrants {
            schema: name("public"),
            specific_name: name("order_total_16450"),
        },
        vec![routine_grant("alice"), routine_grant("bob")],
    );
    src.set_rows(
        CatalogQuery::RoleTableGrants { role: name("bob") },
        vec![
            table_grant("bob", "orders", "SELECT", "YES", "YES"),
            table_grant("bob", "customers", "SELECT", "NO", "YES"),
            table_grant("bob", "orders", "INSERT", "NO", "NO"),
        ],
    );
    src.set_rows(
        CatalogQuery::RoleSequenceGrants { role: name("bob") },
        vec![row(&[
            ("grantor", "alice"),
            ("grantee", "bob"),
            ("object_catalog", DATABASE),
            ("object_schema", "public"),
            ("object_name", "orders_id_seq"),
            ("privilege_type", "USAGE"),
            ("is_grantable", "NO"),
        ])],
    );
    src.set_rows(
        CatalogQuery::RoleRoutineGrants { role: name("bob") },
        vec![routine_grant("bob")],
    );
}

fn cluster_objects(src: &MemSource) {
    src.set_rows(
        CatalogQuery::Extensions,
        vec![
            row(&[
                ("oid", "13500"),
                ("extname", "plpgsql"),
                ("extowner", "10"),
                ("extnamespace", "11"),
                ("schema_name", "pg_catalog"),
                ("extrelocatable", "f"),
                ("extversion", "1.0"),
                ("description", "PL/pgSQL procedural language"),
            ]),
            row(&[
                ("oid", "16600"),
                ("extname", "postgres_fdw"),
                ("extowner", "10"),
                ("extnamespace", "2200"),
                ("schema_name", "public"),
                ("extrelocatable", "t"),
                ("extversion", "1.1"),
            ]),
        ],
    );
    src.set_rows(
        CatalogQuery::Tablespaces,
        vec![
            row(&[
                ("oid", "16610"),
                ("spcname", "fast_ssd"),
                ("spcowner", "16384"),
                ("owner_name", "alice"),
                ("spcacl", "{alice=C/alice,bob=C/alice}"),
                ("spcoptions", "{seq_page_cost=0.5,random_page_cost=1.1}"),
                ("location", "/mnt/ssd/pg"),
            ]),
            row(&[
                ("oid", "1663"),
                ("spcname", "pg_default"),
                ("spcowner", "10"),
                ("owner_name", "postgres"),
                ("location", ""),
            ]),
        ],
    );
    src.set_rows(
        CatalogQuery::ForeignDataWrappers,
        vec![row(&[
            ("oid", "16620"),
            ("fdwname", "postgres_fdw"),
            ("fdwowner", "10"),
            ("owner_name", "postgres"),
            ("handler", "postgres_fdw_handler"),
            ("validator", "postgres_fdw_validator"),
            ("fdwacl", "{postgres=U/postgres,alice=U/postgres}"),
        ])],
    );
    src.set_rows(
        CatalogQuery::ForeignServers,
        vec![row(&[
            ("oid", "16630"),
            ("srvname", "warehouse"),
            ("srvowner", "16384"),
            ("owner_name", "alice"),
            ("srvfdw", "16620"),
            ("fdwname", "postgres_fdw"),
            ("srvversion", "15"),
            ("srvoptions", "{host=10.0.0.5,dbname=warehouse,port=5432}"),
        ])],
    );
}
