//! Typed PostgreSQL catalog objects on top of a catalog provider.
//!
//! `Database` is the root. Every object loads its children lazily
//! through per-parent caches, using the provider and cancel monitor
//! carried by `MetaContext`.

pub mod config;
pub mod context;
pub mod ddl;
pub mod error;
pub mod object;
#[cfg(feature = "postgres")]
pub mod pg_source;
pub mod privilege_owner;
pub mod property;

pub use config::{DdlConfig, MetaConfig};
pub use context::MetaContext;
pub use ddl::{DdlBuilder, ObjectDdl};
pub use error::{Error, Result};
pub use object::*;
#[cfg(feature = "postgres")]
pub use pg_source::PgSource;
pub use privilege_owner::PrivilegeOwner;
pub use property::{Property, PropertySource, PropertyValue};
