use crate::error::{Error, Result};
use crate::monitor::Monitor;
use crate::query::CatalogQuery;
use crate::row::Row;
use crate::source::CatalogSource;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory catalog source.
///
/// Answers each query with the rows registered for it and counts
/// round trips, so callers can verify caching behavior.
/// Unregistered queries return no rows.
#[derive(Debug, Default)]
pub struct MemSource {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<CatalogQuery, Vec<Row>>,
    failures: HashMap<CatalogQuery, String>,
    fetches: HashMap<CatalogQuery, usize>,
}

impl Inner {
    #[inline]
    fn fetch(&mut self, query: &CatalogQuery) -> Result<Vec<Row>> {
        *self.fetches.entry(query.clone()).or_default() += 1;
        if let Some(message) = self.failures.get(query) {
            return Err(Error::query_failed(query.name(), message.clone()));
        }
        Ok(self.rows.get(query).cloned().unwrap_or_default())
    }
}

impl MemSource {
    #[inline]
    pub fn new() -> Self {
        MemSource::default()
    }

    /// Replace all rows of a query.
    #[inline]
    pub fn set_rows(&self, query: CatalogQuery, rows: Vec<Row>) {
        let mut inner = self.inner.write();
        inner.rows.insert(query, rows);
    }

    #[inline]
    pub fn add_row(&self, query: CatalogQuery, row: Row) {
        let mut inner = self.inner.write();
        inner.rows.entry(query).or_default().push(row);
    }

    /// Make every following fetch of the query fail.
    #[inline]
    pub fn fail_on(&self, query: CatalogQuery, message: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.failures.insert(query, message.into());
    }

    #[inline]
    pub fn clear_failure(&self, query: &CatalogQuery) {
        let mut inner = self.inner.write();
        inner.failures.remove(query);
    }

    /// How many round trips were issued for the query.
    #[inline]
    pub fn fetch_count(&self, query: &CatalogQuery) -> usize {
        let inner = self.inner.read();
        inner.fetches.get(query).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total_fetches(&self) -> usize {
        let inner = self.inner.read();
        inner.fetches.values().sum()
    }

    #[inline]
    pub fn reset_counters(&self) {
        let mut inner = self.inner.write();
        inner.fetches.clear();
    }
}

impl CatalogSource for MemSource {
    #[inline]
    fn fetch(&self, query: &CatalogQuery, monitor: &Monitor) -> Result<Vec<Row>> {
        monitor.check()?;
        let rows = {
            let mut inner = self.inner.write();
            inner.fetch(query)?
        };
        log::debug!("fetched {} rows for {}", rows.len(), query.name());
        // rows are discarded if cancellation arrives during the round trip.
        monitor.check()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_source_fetch() {
        let src = MemSource::new();
        let monitor = Monitor::new();
        src.add_row(CatalogQuery::Roles, Row::new().with("rolname", "alice"));
        src.add_row(CatalogQuery::Roles, Row::new().with("rolname", "bob"));

        let rows = src.fetch(&CatalogQuery::Roles, &monitor).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].str("rolname"), Some("bob"));
        assert!(
            src.fetch(&CatalogQuery::Namespaces, &monitor)
                .unwrap()
                .is_empty()
        );
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 1);
        assert_eq!(src.total_fetches(), 2);
    }

    #[test]
    fn test_mem_source_failure_and_cancel() {
        let _ = env_logger::builder().is_test(true).try_init();
        let src = MemSource::new();
        let monitor = Monitor::new();
        src.fail_on(CatalogQuery::Roles, "permission denied for table pg_authid");
        let err = src.fetch(&CatalogQuery::Roles, &monitor).unwrap_err();
        assert!(matches!(err, Error::QueryFailed { .. }));
        src.clear_failure(&CatalogQuery::Roles);
        assert!(src.fetch(&CatalogQuery::Roles, &monitor).is_ok());

        monitor.cancel();
        let err = src.fetch(&CatalogQuery::Roles, &monitor).unwrap_err();
        assert!(err.is_cancelled());
        // cancelled before the round trip.
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 2);
    }
}
