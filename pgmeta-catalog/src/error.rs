use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A catalog round trip failed. Carries the database error text
    /// and SQLSTATE if the provider has one.
    #[error("catalog query {query} failed: {message}")]
    QueryFailed {
        query: String,
        message: String,
        sqlstate: Option<String>,
    },
    #[error("catalog fetch cancelled")]
    Cancelled,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{0} not supported")]
    NotSupported(&'static str),
}

impl Error {
    #[inline]
    pub fn query_failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        Error::QueryFailed {
            query: query.into(),
            message: message.into(),
            sqlstate: None,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
