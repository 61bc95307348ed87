use crate::error::Result;
use crate::monitor::Monitor;
use crate::query::CatalogQuery;
use crate::row::Row;
use std::sync::Arc;

/// CatalogSource answers catalog queries with rows.
///
/// Implementations issue exactly one round trip per call and report
/// a failure once for the whole round trip, never per row.
/// The call may block. It must return `Error::Cancelled` once the
/// monitor is cancelled, without returning partial rows.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self, query: &CatalogQuery, monitor: &Monitor) -> Result<Vec<Row>>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    #[inline]
    fn fetch(&self, query: &CatalogQuery, monitor: &Monitor) -> Result<Vec<Row>> {
        (**self).fetch(query, monitor)
    }
}

impl<S: CatalogSource + ?Sized> CatalogSource for &S {
    #[inline]
    fn fetch(&self, query: &CatalogQuery, monitor: &Monitor) -> Result<Vec<Row>> {
        (**self).fetch(query, monitor)
    }
}
