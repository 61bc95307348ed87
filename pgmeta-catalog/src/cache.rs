use crate::error::Result;
use crate::monitor::Monitor;
use crate::query::CatalogQuery;
use crate::row::Row;
use crate::source::CatalogSource;
use crate::{CatalogObject, Oid};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Result of a lookup that never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Cache was never filled, answering requires a catalog fetch.
    NotLoaded,
    /// Cache is filled, `None` means the object does not exist
    /// or is not visible to the current role.
    Loaded(Option<T>),
}

impl<T> Lookup<T> {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Lookup::Loaded(_))
    }

    #[inline]
    pub fn loaded(self) -> Option<T> {
        match self {
            Lookup::Loaded(v) => v,
            Lookup::NotLoaded => None,
        }
    }
}

/// How a cache obtains its objects: one bulk query and
/// a row mapper. Mapper returns `None` to skip a row.
pub struct Fetch<'a, T> {
    pub source: &'a dyn CatalogSource,
    pub monitor: &'a Monitor,
    pub query: CatalogQuery,
    pub map: &'a dyn Fn(&Row) -> Option<T>,
}

/// Load-once cache of child objects of one parent, keyed by oid.
///
/// The first access issues a single bulk fetch of all children.
/// Later accesses are map lookups until `refresh` or `invalidate`.
/// Contents are replaced as a whole, so a failed or cancelled fetch
/// never exposes partial results and keeps previous contents.
pub struct ObjectCache<T> {
    name: &'static str,
    contents: RwLock<Option<Arc<IndexMap<Oid, Arc<T>>>>>,
    // serializes fetches of the same cache.
    load_lock: Mutex<()>,
}

impl<T: CatalogObject> ObjectCache<T> {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        ObjectCache {
            name,
            contents: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.contents.read().is_some()
    }

    /// Lookup by oid without I/O.
    #[inline]
    pub fn lookup(&self, oid: Oid) -> Lookup<Arc<T>> {
        match &*self.contents.read() {
            None => Lookup::NotLoaded,
            Some(map) => Lookup::Loaded(map.get(&oid).cloned()),
        }
    }

    /// Lookup by name without I/O.
    #[inline]
    pub fn lookup_by_name(&self, name: &str) -> Lookup<Arc<T>> {
        match &*self.contents.read() {
            None => Lookup::NotLoaded,
            Some(map) => Lookup::Loaded(map.values().find(|o| o.name() == name).cloned()),
        }
    }

    /// Object with given oid, fetching all children on first call.
    #[inline]
    pub fn get_by_oid(&self, fetch: Fetch<'_, T>, oid: Oid) -> Result<Option<Arc<T>>> {
        let map = self.ensure_loaded(fetch)?;
        Ok(map.get(&oid).cloned())
    }

    /// First object with given name.
    #[inline]
    pub fn get_by_name(&self, fetch: Fetch<'_, T>, name: &str) -> Result<Option<Arc<T>>> {
        let map = self.ensure_loaded(fetch)?;
        Ok(map.values().find(|o| o.name() == name).cloned())
    }

    /// All objects in fetch order.
    #[inline]
    pub fn all(&self, fetch: Fetch<'_, T>) -> Result<Vec<Arc<T>>> {
        let map = self.ensure_loaded(fetch)?;
        Ok(map.values().cloned().collect())
    }

    /// Force a new fetch. Previous contents stay visible until
    /// the fetch completes and are kept if it fails.
    #[inline]
    pub fn refresh(&self, fetch: Fetch<'_, T>) -> Result<usize> {
        let _g = self.load_lock.lock();
        let map = self.load(fetch)?;
        Ok(map.len())
    }

    /// Drop contents, next access fetches again.
    #[inline]
    pub fn invalidate(&self) {
        let _g = self.load_lock.lock();
        *self.contents.write() = None;
    }

    #[inline]
    fn ensure_loaded(&self, fetch: Fetch<'_, T>) -> Result<Arc<IndexMap<Oid, Arc<T>>>> {
        if let Some(map) = &*self.contents.read() {
            return Ok(Arc::clone(map));
        }
        let _g = self.load_lock.lock();
        // another caller may have finished loading while we waited.
        if let Some(map) = &*self.contents.read() {
            return Ok(Arc::clone(map));
        }
        self.load(fetch)
    }

    fn load(&self, fetch: Fetch<'_, T>) -> Result<Arc<IndexMap<Oid, Arc<T>>>> {
        let rows = fetch.source.fetch(&fetch.query, fetch.monitor)?;
        let mut map = IndexMap::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in &rows {
            match (fetch.map)(row) {
                Some(obj) => {
                    let oid = obj.oid();
                    if map.insert(oid, Arc::new(obj)).is_some() {
                        log::warn!("duplicate oid {} in {} cache", oid, self.name);
                    }
                }
                None => skipped += 1,
            }
        }
        // rows are complete, but the host may have cancelled meanwhile.
        fetch.monitor.check()?;
        if skipped > 0 {
            log::debug!("{} cache skipped {} of {} rows", self.name, skipped, rows.len());
        }
        let map = Arc::new(map);
        *self.contents.write() = Some(Arc::clone(&map));
        Ok(map)
    }
}

impl<T> std::fmt::Debug for ObjectCache<T> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.contents.read().as_ref().map(|m| m.len());
        f.debug_struct("ObjectCache")
            .field("name", &self.name)
            .field("loaded", &len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mem_impl::MemSource;
    use semistr::SemiStr;

    #[derive(Debug)]
    struct Item {
        oid: Oid,
        name: SemiStr,
    }

    impl CatalogObject for Item {
        fn oid(&self) -> Oid {
            self.oid
        }

        fn name(&self) -> &str {
            self.name.as_str()
        }
    }

    fn row_to_item(row: &Row) -> Option<Item> {
        let name = row.semistr("name")?;
        Some(Item {
            oid: row.oid("oid"),
            name,
        })
    }

    fn source() -> MemSource {
        let _ = env_logger::builder().is_test(true).try_init();
        let src = MemSource::new();
        src.set_rows(
            CatalogQuery::Roles,
            vec![
                Row::new().with("oid", "10").with("name", "postgres"),
                Row::new().with("oid", "16384").with("name", "alice"),
                // name is null, mapper skips it.
                Row::new().with("oid", "16385").with_null("name"),
            ],
        );
        src
    }

    fn fetch<'a>(src: &'a MemSource, monitor: &'a Monitor) -> Fetch<'a, Item> {
        Fetch {
            source: src,
            monitor,
            query: CatalogQuery::Roles,
            map: &row_to_item,
        }
    }

    #[test]
    fn test_cache_single_bulk_fetch() {
        let src = source();
        let monitor = Monitor::new();
        let cache = ObjectCache::<Item>::new("roles");
        assert!(!cache.lookup(10).is_loaded());

        let alice = cache.get_by_oid(fetch(&src, &monitor), 16384).unwrap();
        assert_eq!(alice.unwrap().name(), "alice");
        let pg = cache.get_by_oid(fetch(&src, &monitor), 10).unwrap();
        assert_eq!(pg.unwrap().name(), "postgres");
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 1);

        // unknown oid degrades to absence.
        assert!(cache.get_by_oid(fetch(&src, &monitor), 99).unwrap().is_none());
        assert!(cache.get_by_oid(fetch(&src, &monitor), 16385).unwrap().is_none());
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 1);
        assert!(cache.lookup(10).is_loaded());
        assert!(cache.lookup_by_name("alice").loaded().is_some());
    }

    #[test]
    fn test_cache_refresh_and_invalidate() {
        let src = source();
        let monitor = Monitor::new();
        let cache = ObjectCache::<Item>::new("roles");
        assert_eq!(cache.all(fetch(&src, &monitor)).unwrap().len(), 2);
        src.add_row(
            CatalogQuery::Roles,
            Row::new().with("oid", "16390").with("name", "bob"),
        );
        assert_eq!(cache.all(fetch(&src, &monitor)).unwrap().len(), 2);
        assert_eq!(cache.refresh(fetch(&src, &monitor)).unwrap(), 3);
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 2);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert!(cache.get_by_name(fetch(&src, &monitor), "bob").unwrap().is_some());
        assert_eq!(src.fetch_count(&CatalogQuery::Roles), 3);
    }

    #[test]
    fn test_cache_failed_refresh_keeps_contents() {
        let src = source();
        let monitor = Monitor::new();
        let cache = ObjectCache::<Item>::new("roles");
        cache.all(fetch(&src, &monitor)).unwrap();

        src.fail_on(CatalogQuery::Roles, "connection reset");
        let err = cache.refresh(fetch(&src, &monitor)).unwrap_err();
        assert!(matches!(err, Error::QueryFailed { .. }));
        assert!(cache.lookup(16384).loaded().is_some());

        src.clear_failure(&CatalogQuery::Roles);
        let cancelled = Monitor::new();
        cancelled.cancel();
        let err = cache.refresh(fetch(&src, &cancelled)).unwrap_err();
        assert!(err.is_cancelled());
        assert!(cache.lookup(10).loaded().is_some());
    }
}
