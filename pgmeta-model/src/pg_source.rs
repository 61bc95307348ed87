use crate::error::Result;
use pgmeta_catalog::error::{Error, Result as CatalogResult};
use pgmeta_catalog::{CatalogQuery, CatalogSource, Monitor, Row};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Catalog provider backed by a live server.
///
/// Queries run in the simple query protocol, so every value arrives
/// as text, which is what `Row` stores. The connection is driven by
/// a private current-thread runtime, each fetch blocks on it.
pub struct PgSource {
    runtime: Runtime,
    client: Client,
}

impl PgSource {
    /// Connect with a URL or key-value connection string.
    pub fn connect(conn_str: &str) -> Result<PgSource> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let config: tokio_postgres::Config = conn_str
            .parse()
            .map_err(|e: tokio_postgres::Error| Error::Connection(e.to_string()))?;
        let client = runtime
            .block_on(async {
                let (client, conn) = config.connect(NoTls).await?;
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        log::warn!("catalog connection closed: {}", e);
                    }
                });
                Ok::<_, tokio_postgres::Error>(client)
            })
            .map_err(|e| Error::Connection(e.to_string()))?;
        log::debug!("catalog connection established");
        Ok(PgSource { runtime, client })
    }

    /// Run the query, polling the monitor while waiting.
    /// Returns `None` if cancelled.
    async fn simple_query(
        &self,
        sql: &str,
        monitor: &Monitor,
    ) -> Option<std::result::Result<Vec<SimpleQueryMessage>, tokio_postgres::Error>> {
        let fut = self.client.simple_query(sql);
        tokio::pin!(fut);
        let mut tick = tokio::time::interval(CANCEL_POLL_INTERVAL);
        loop {
            tokio::select! {
                res = &mut fut => return Some(res),
                _ = tick.tick() => {
                    if monitor.is_cancelled() {
                        let token = self.client.cancel_token();
                        if let Err(e) = token.cancel_query(NoTls).await {
                            log::warn!("failed to cancel catalog query: {}", e);
                        }
                        return None;
                    }
                }
            }
        }
    }
}

impl CatalogSource for PgSource {
    fn fetch(&self, query: &CatalogQuery, monitor: &Monitor) -> CatalogResult<Vec<Row>> {
        monitor.check()?;
        let sql = query.to_sql();
        log::debug!("catalog query {}: {}", query.name(), sql);
        let msgs = match self.runtime.block_on(self.simple_query(&sql, monitor)) {
            None => return Err(Error::Cancelled),
            Some(Ok(msgs)) => msgs,
            Some(Err(e)) => {
                return Err(Error::QueryFailed {
                    query: query.name().to_string(),
                    message: e.to_string(),
                    sqlstate: e.code().map(|c| c.code().to_string()),
                });
            }
        };
        // the result is complete, but the caller may not want it anymore.
        monitor.check()?;
        let mut rows = vec![];
        for msg in msgs {
            if let SimpleQueryMessage::Row(r) = msg {
                let mut row = Row::new();
                for (idx, col) in r.columns().iter().enumerate() {
                    row.push(col.name(), r.get(idx).map(String::from));
                }
                rows.push(row);
            }
        }
        log::debug!("catalog query {} returned {} rows", query.name(), rows.len());
        Ok(rows)
    }
}
