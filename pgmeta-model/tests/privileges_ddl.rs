mod common;

use common::TestSys;
use pgmeta_catalog::{CatalogObject, CatalogQuery, ObjectKind};
use pgmeta_fixtures::*;
use pgmeta_model::{
    DdlBuilder, DdlConfig, MetaConfig, ObjectDdl, PrivilegeOwner, PropertySource, PropertyValue,
    Table,
};
use pgmeta_privilege::{
    DefaultObjectKind, ObjectRef, Permission, PermissionBits, PermissionTarget, PrivilegeType,
};

fn with_permissions() -> TestSys {
    TestSys::with_config(
        MetaConfig::default()
            .database(DATABASE)
            .ddl(DdlConfig::default().show_permissions(true)),
    )
}

#[test]
fn test_table_acl_permissions() {
    let sys = TestSys::new();
    let public = sys.schema("public");
    let orders = public.table(&sys.ctx, TABLE_ORDERS).unwrap().unwrap();

    let perms = orders.permissions(DATABASE);
    let grantees: Vec<_> = perms.iter().map(|p| p.grantee().unwrap().name()).collect();
    assert_eq!(grantees, vec!["alice", "bob", "public"]);
    assert!(perms[0].has_all_privileges(ObjectKind::Table));

    let bob = &perms[1];
    assert_eq!(bob.get_permission(PrivilegeType::Select).bits(), 3);
    assert_eq!(bob.get_permission(PrivilegeType::Insert), PermissionBits::GRANTED);
    assert_eq!(bob.get_permission(PrivilegeType::Delete), PermissionBits::NONE);
    assert!(perms[2].grantee().unwrap().is_public());

    // null ACL: the owner holds everything.
    let customers = public.table(&sys.ctx, TABLE_CUSTOMERS).unwrap().unwrap();
    let perms = customers.permissions(DATABASE);
    assert_eq!(perms.len(), 1);
    assert_eq!(perms[0].grantee().unwrap().name(), "alice");
    assert!(perms[0].get_permission(PrivilegeType::All).is_granted());
}

#[test]
fn test_information_schema_grants() {
    let sys = TestSys::new();
    let public = sys.schema("public");
    let orders = public.table(&sys.ctx, TABLE_ORDERS).unwrap().unwrap();

    let grants = orders.fetch_grants(&sys.ctx).unwrap();
    assert_eq!(grants.len(), 3);
    let perms = Permission::group_by_grantee(&orders.object_ref(DATABASE), &grants);
    assert_eq!(perms.len(), 2);
    // grantable select granted with hierarchy.
    assert_eq!(perms[0].get_permission(PrivilegeType::Select).bits(), 7);
    assert_eq!(perms[0].get_permission(PrivilegeType::Insert).bits(), 1);
    assert!(perms[1].grantee().unwrap().is_public());

    let column_grants = orders.fetch_column_grants(&sys.ctx).unwrap();
    assert_eq!(column_grants.len(), 1);
    assert_eq!(column_grants[0].object.column.as_ref().unwrap().as_str(), "amount");

    // grants are fetched on every call.
    orders.fetch_grants(&sys.ctx).unwrap();
    assert_eq!(
        sys.src.fetch_count(&CatalogQuery::TableGrants {
            schema: semistr::SemiStr::new("public"),
            table: semistr::SemiStr::new("orders"),
        }),
        2
    );

    let total = public.procedure(&sys.ctx, PROC_ORDER_TOTAL).unwrap().unwrap();
    let grants = total.fetch_grants(&sys.ctx).unwrap();
    assert_eq!(grants.len(), 2);
    assert!(grants.iter().all(|g| g.privilege_type == PrivilegeType::Execute));
}

#[test]
fn test_role_permissions_by_object() {
    let sys = TestSys::new();
    let bob = sys.db.role(&sys.ctx, ROLE_BOB).unwrap().unwrap();
    let perms = bob.permissions(&sys.ctx).unwrap();
    assert_eq!(perms.len(), 4);
    assert_eq!(
        perms[0].target,
        PermissionTarget::Object(ObjectRef::new(DATABASE, "public", "orders"))
    );
    assert_eq!(perms[0].get_permission(PrivilegeType::Select).bits(), 7);
    assert_eq!(perms[0].get_permission(PrivilegeType::Insert).bits(), 1);
    assert_eq!(
        perms[2].target,
        PermissionTarget::Object(ObjectRef::new(DATABASE, "public", "orders_id_seq"))
    );
    assert!(perms[2].get_permission(PrivilegeType::Usage).is_granted());
    assert!(perms[3].get_permission(PrivilegeType::Execute).is_granted());
}

#[test]
fn test_default_privileges() {
    let sys = TestSys::new();
    let sales = sys.schema("sales");
    let defaults = sales.default_privileges(&sys.ctx).unwrap();
    assert_eq!(defaults.len(), 4);
    assert_eq!(defaults[0].under_kind, Some(DefaultObjectKind::Table));
    assert_eq!(defaults[0].grantee().unwrap().name(), "bob");
    assert!(defaults[1].grantee().unwrap().is_public());
    assert_eq!(defaults[2].under_kind, Some(DefaultObjectKind::Sequence));
    // namespace code has no object kind, its grants are kept.
    assert!(defaults[3].under_kind.is_none());
    assert!(
        defaults[3]
            .permission
            .get_permission(PrivilegeType::Usage)
            .is_granted()
    );

    let stmts = sales.default_privileges_sql(&sys.ctx).unwrap();
    assert_eq!(stmts.len(), 3);
    assert_eq!(
        stmts[1],
        "ALTER DEFAULT PRIVILEGES FOR ROLE alice IN SCHEMA sales GRANT SELECT ON TABLES TO PUBLIC"
    );
    assert_eq!(
        stmts[2],
        "ALTER DEFAULT PRIVILEGES FOR ROLE alice IN SCHEMA sales GRANT SELECT, USAGE ON SEQUENCES TO bob"
    );
}

#[test]
fn test_schema_ddl() {
    let sys = TestSys::new();
    let sales = sys.schema("sales");
    assert_eq!(
        sales.ddl(&sys.ctx),
        "CREATE SCHEMA sales AUTHORIZATION alice;\n\
         COMMENT ON SCHEMA sales IS 'Sales data';"
    );

    let sys = with_permissions();
    let sales = sys.schema("sales");
    assert_eq!(
        sales.ddl(&sys.ctx),
        "CREATE SCHEMA sales AUTHORIZATION alice;\n\
         COMMENT ON SCHEMA sales IS 'Sales data';\n\
         -- Permissions\n\
         ALTER SCHEMA sales OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON SCHEMA sales TO alice;\n\
         GRANT USAGE ON SCHEMA sales TO bob;\n\
         GRANT USAGE ON SCHEMA sales TO reporting WITH GRANT OPTION;"
    );
}

#[test]
fn test_sequence_ddl() {
    let sys = with_permissions();
    let public = sys.schema("public");
    let seq = public.sequence(&sys.ctx, SEQ_ORDERS_ID).unwrap().unwrap();
    assert_eq!(
        seq.ddl(&sys.ctx),
        "CREATE SEQUENCE public.orders_id_seq AS bigint INCREMENT BY 1 MINVALUE 1 \
         MAXVALUE 9223372036854775807 START 1 CACHE 1 NO CYCLE;\n\
         -- Permissions\n\
         ALTER SEQUENCE public.orders_id_seq OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON SEQUENCE public.orders_id_seq TO alice;\n\
         GRANT USAGE ON SEQUENCE public.orders_id_seq TO bob;"
    );
}

#[test]
fn test_cluster_object_ddl() {
    let sys = TestSys::with_config(
        MetaConfig::default()
            .database(DATABASE)
            .ddl(DdlConfig::default().if_not_exists(true)),
    );
    let fdw_ext = sys.db.extension(&sys.ctx, "postgres_fdw").unwrap().unwrap();
    assert_eq!(
        fdw_ext.ddl(&sys.ctx),
        "CREATE EXTENSION IF NOT EXISTS postgres_fdw SCHEMA public VERSION '1.1';"
    );
    let plpgsql = sys.db.extension(&sys.ctx, "plpgsql").unwrap().unwrap();
    assert_eq!(
        plpgsql.ddl(&sys.ctx),
        "CREATE EXTENSION IF NOT EXISTS plpgsql SCHEMA pg_catalog VERSION '1.0';\n\
         COMMENT ON EXTENSION plpgsql IS 'PL/pgSQL procedural language';"
    );

    let fast = sys
        .db
        .tablespace(&sys.ctx, TABLESPACE_FAST_SSD)
        .unwrap()
        .unwrap();
    assert_eq!(
        fast.ddl(&sys.ctx),
        "CREATE TABLESPACE fast_ssd OWNER alice LOCATION '/mnt/ssd/pg' \
         WITH (seq_page_cost=0.5, random_page_cost=1.1);"
    );

    let sys = with_permissions();
    let server = sys.db.foreign_server(&sys.ctx, "warehouse").unwrap().unwrap();
    assert_eq!(
        server.ddl(&sys.ctx),
        "CREATE SERVER warehouse VERSION '15' FOREIGN DATA WRAPPER postgres_fdw \
         OPTIONS (host '10.0.0.5', dbname 'warehouse', port '5432');\n\
         -- Permissions\n\
         ALTER SERVER warehouse OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON FOREIGN SERVER warehouse TO alice;"
    );
    let fdw = sys.db.server_wrapper(&sys.ctx, &server).unwrap().unwrap();
    assert_eq!(
        fdw.ddl(&sys.ctx),
        "CREATE FOREIGN DATA WRAPPER postgres_fdw HANDLER postgres_fdw_handler \
         VALIDATOR postgres_fdw_validator;\n\
         -- Permissions\n\
         ALTER FOREIGN DATA WRAPPER postgres_fdw OWNER TO postgres;\n\
         GRANT ALL PRIVILEGES ON FOREIGN DATA WRAPPER postgres_fdw TO postgres;\n\
         GRANT ALL PRIVILEGES ON FOREIGN DATA WRAPPER postgres_fdw TO alice;"
    );

    // cluster-level objects carry no schema in their grant target.
    let object = fast.object_ref(DATABASE);
    assert!(object.schema_name().is_none());
    assert_eq!(object.name(), Some("fast_ssd"));
    assert_eq!(object.qualified_name(), "fast_ssd");
    let object = server.object_ref(DATABASE);
    assert!(object.schema_name().is_none());
    assert_eq!(object.qualified_name(), "warehouse");
}

#[test]
fn test_relation_and_aggregate_grants() {
    let sys = with_permissions();
    let public = sys.schema("public");
    let grants_of = |oid| {
        let table = public.table(&sys.ctx, oid).unwrap().unwrap();
        DdlBuilder::new().permissions(&sys.ctx, &*table).finish()
    };
    assert_eq!(
        grants_of(VIEW_ORDER_SUMMARY),
        "-- Permissions\n\
         ALTER VIEW public.order_summary OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON TABLE public.order_summary TO alice;\n\
         GRANT SELECT ON TABLE public.order_summary TO reporting;"
    );
    assert_eq!(
        grants_of(MATVIEW_ORDER_STATS),
        "-- Permissions\n\
         ALTER MATERIALIZED VIEW public.order_stats OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON TABLE public.order_stats TO alice;"
    );
    assert_eq!(
        grants_of(FOREIGN_REMOTE_ORDERS),
        "-- Permissions\n\
         ALTER FOREIGN TABLE public.remote_orders OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON TABLE public.remote_orders TO alice;"
    );

    let sum = public.procedure(&sys.ctx, PROC_SUM_AMOUNT).unwrap().unwrap();
    assert_eq!(sum.object_kind(), ObjectKind::Aggregate);
    assert_eq!(
        DdlBuilder::new().permissions(&sys.ctx, &*sum).finish(),
        "-- Permissions\n\
         ALTER AGGREGATE public.sum_amount(numeric) OWNER TO alice;\n\
         GRANT ALL PRIVILEGES ON FUNCTION public.sum_amount(numeric) TO alice;"
    );
}

#[test]
fn test_unrecognized_acl_codes_grant_nothing() {
    let sys = with_permissions();
    // maintain is granted by newer servers.
    let table = Table::from_row(&row(&[
        ("oid", "16415"),
        ("relname", "audit_log"),
        ("relnamespace", "2200"),
        ("schema_name", "public"),
        ("relkind", "r"),
        ("relowner", "16384"),
        ("owner_name", "alice"),
        ("relacl", "{bob=m/alice,carol=mr/alice}"),
    ]))
    .unwrap();
    let perms = table.permissions(DATABASE);
    assert_eq!(perms.len(), 2);
    assert!(perms[0].get_permission(PrivilegeType::Unknown).is_granted());
    assert_eq!(
        DdlBuilder::new().permissions(&sys.ctx, &table).finish(),
        "-- Permissions\n\
         ALTER TABLE public.audit_log OWNER TO alice;\n\
         GRANT SELECT ON TABLE public.audit_log TO carol;"
    );
}

#[test]
fn test_role_ddl() {
    let sys = TestSys::new();
    let bob = sys.db.role_by_name(&sys.ctx, "bob").unwrap().unwrap();
    assert_eq!(
        bob.ddl(&sys.ctx),
        "CREATE ROLE bob WITH LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE INHERIT \
         NOREPLICATION NOBYPASSRLS CONNECTION LIMIT 5 \
         VALID UNTIL '2030-01-01 00:00:00+00';"
    );
    let reporting = sys.db.role(&sys.ctx, ROLE_REPORTING).unwrap().unwrap();
    assert!(
        reporting
            .ddl(&sys.ctx)
            .ends_with("COMMENT ON ROLE reporting IS 'Read only reporting';")
    );
}

#[test]
fn test_trigger_ddl() {
    let sys = TestSys::new();
    let public = sys.schema("public");
    let triggers = public.triggers(&sys.ctx).unwrap();
    let audit = triggers.iter().find(|t| t.oid() == TRIGGER_ORDERS_AUDIT).unwrap();
    assert_eq!(
        audit.ddl(&sys.ctx),
        "CREATE TRIGGER orders_audit AFTER INSERT OR DELETE OR UPDATE ON public.orders \
         FOR EACH ROW EXECUTE FUNCTION sales.audit_fn();\n\
         COMMENT ON TRIGGER orders_audit ON public.orders IS 'Audit order changes';"
    );
    // no server definition and nothing resolved: rebuilt from oids.
    let ghost = triggers.iter().find(|t| t.oid() == TRIGGER_DANGLING).unwrap();
    assert_eq!(
        ghost.ddl(&sys.ctx),
        "CREATE TRIGGER ghost_trigger BEFORE INSERT ON 99999 \
         FOR EACH STATEMENT EXECUTE FUNCTION 99998();"
    );
}

#[test]
fn test_properties() {
    let sys = TestSys::new();
    let public = sys.schema("public");
    let orders = public.table(&sys.ctx, TABLE_ORDERS).unwrap().unwrap();
    let props = orders.viewable_properties();
    assert_eq!(props[0].id, "name");
    assert!(props.iter().all(|p| p.id != "oid"));
    assert_eq!(
        orders.property("oid").unwrap().value,
        PropertyValue::Oid(TABLE_ORDERS)
    );
    assert_eq!(
        orders.property("row_count_estimate").unwrap().value,
        PropertyValue::Float(1200.0)
    );
    assert_eq!(orders.property("owner").unwrap().value.to_string(), "alice");

    let view = public.table(&sys.ctx, VIEW_ORDER_SUMMARY).unwrap().unwrap();
    assert!(view.property("row_count_estimate").is_none());
    assert_eq!(view.name(), "order_summary");
}
