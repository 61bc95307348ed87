use crate::config::MetaConfig;
use crate::error::Result;
use pgmeta_catalog::{CatalogQuery, CatalogSource, Fetch, Monitor, Row};
use std::sync::Arc;

/// Everything an object needs to load its children: the query
/// provider, the cancel flag of the current operation and config.
#[derive(Clone)]
pub struct MetaContext {
    source: Arc<dyn CatalogSource>,
    monitor: Monitor,
    config: MetaConfig,
}

impl MetaContext {
    #[inline]
    pub fn new(source: Arc<dyn CatalogSource>, config: MetaConfig) -> Self {
        MetaContext {
            source,
            monitor: Monitor::new(),
            config,
        }
    }

    /// Same provider and config, driven by another monitor.
    #[inline]
    pub fn with_monitor(mut self, monitor: Monitor) -> Self {
        self.monitor = monitor;
        self
    }

    #[inline]
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    #[inline]
    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    #[inline]
    pub fn database_name(&self) -> &str {
        &self.config.database
    }

    /// Bulk fetch description for an object cache.
    #[inline]
    pub fn fetch<'a, T>(
        &'a self,
        query: CatalogQuery,
        map: &'a dyn Fn(&Row) -> Option<T>,
    ) -> Fetch<'a, T> {
        Fetch {
            source: &*self.source,
            monitor: &self.monitor,
            query,
            map,
        }
    }

    /// Uncached round trip.
    #[inline]
    pub fn query(&self, query: &CatalogQuery) -> Result<Vec<Row>> {
        let rows = self.source.fetch(query, &self.monitor)?;
        Ok(rows)
    }
}

impl std::fmt::Debug for MetaContext {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaContext")
            .field("config", &self.config)
            .field("cancelled", &self.monitor.is_cancelled())
            .finish()
    }
}
