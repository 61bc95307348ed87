use pgmeta_catalog::mem_impl::MemSource;
use pgmeta_fixtures::{DATABASE, demo_source};
use pgmeta_model::{Database, MetaConfig, MetaContext, Schema};
use std::sync::Arc;

/// Shop database loaded over an in-memory source.
pub struct TestSys {
    pub src: Arc<MemSource>,
    pub ctx: MetaContext,
    pub db: Database,
}

impl TestSys {
    pub fn new() -> Self {
        TestSys::with_config(MetaConfig::default().database(DATABASE))
    }

    pub fn with_config(config: MetaConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let src = Arc::new(demo_source());
        let ctx = MetaContext::new(src.clone(), config);
        let db = Database::load(&ctx).unwrap();
        TestSys { src, ctx, db }
    }

    pub fn schema(&self, name: &str) -> Arc<Schema> {
        self.db.schema(&self.ctx, name).unwrap().unwrap()
    }
}
