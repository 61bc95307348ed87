use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] pgmeta_catalog::error::Error),
    #[error("database {0} not found")]
    DatabaseNotFound(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Fetch was aborted by the caller.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Catalog(e) if e.is_cancelled())
    }
}

impl From<toml::de::Error> for Error {
    #[inline]
    fn from(src: toml::de::Error) -> Self {
        Error::InvalidConfig(src.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    #[inline]
    fn from(src: toml::ser::Error) -> Self {
        Error::InvalidConfig(src.to_string())
    }
}
