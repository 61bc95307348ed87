use crate::error::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_DATABASE: &str = "postgres";

/// Configuration of metadata loading.
///
/// Loaded from TOML, every field is optional:
///
/// ```toml
/// database = "shop"
/// show_system_objects = false
///
/// [ddl]
/// show_permissions = true
/// show_comments = true
/// if_not_exists = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    pub database: String,
    pub show_system_objects: bool,
    pub ddl: DdlConfig,
}

impl Default for MetaConfig {
    #[inline]
    fn default() -> Self {
        MetaConfig {
            database: String::from(DEFAULT_DATABASE),
            show_system_objects: false,
            ddl: DdlConfig::default(),
        }
    }
}

impl MetaConfig {
    #[inline]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    #[inline]
    pub fn show_system_objects(mut self, show_system_objects: bool) -> Self {
        self.show_system_objects = show_system_objects;
        self
    }

    #[inline]
    pub fn ddl(mut self, ddl: DdlConfig) -> Self {
        self.ddl = ddl;
        self
    }

    #[inline]
    pub fn from_toml(input: &str) -> Result<Self> {
        let config = toml::from_str(input)?;
        Ok(config)
    }

    #[inline]
    pub fn to_toml(&self) -> Result<String> {
        let res = toml::to_string(self)?;
        Ok(res)
    }
}

/// Options of generated DDL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdlConfig {
    /// Append owner change and GRANT statements.
    pub show_permissions: bool,
    /// Append COMMENT ON statements.
    pub show_comments: bool,
    pub if_not_exists: bool,
}

impl Default for DdlConfig {
    #[inline]
    fn default() -> Self {
        DdlConfig {
            show_permissions: false,
            show_comments: true,
            if_not_exists: false,
        }
    }
}

impl DdlConfig {
    #[inline]
    pub fn show_permissions(mut self, show_permissions: bool) -> Self {
        self.show_permissions = show_permissions;
        self
    }

    #[inline]
    pub fn show_comments(mut self, show_comments: bool) -> Self {
        self.show_comments = show_comments;
        self
    }

    #[inline]
    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_config() {
        let config = MetaConfig::default();
        assert_eq!(config.database, "postgres");
        let config_str = config.to_toml().unwrap();
        assert_eq!(MetaConfig::from_toml(&config_str).unwrap(), config);

        let config = MetaConfig::from_toml(
            r#"
            database = "shop"

            [ddl]
            show_permissions = true
            "#,
        )
        .unwrap();
        assert_eq!(config.database, "shop");
        assert!(!config.show_system_objects);
        assert!(config.ddl.show_permissions);
        assert!(config.ddl.show_comments);
    }

    #[test]
    fn test_invalid_config() {
        let err = MetaConfig::from_toml("database = 1").unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));
    }
}
