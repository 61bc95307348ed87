pub mod column;
pub mod composite_type;
pub mod database;
pub mod extension;
pub mod foreign;
pub mod index;
pub mod procedure;
pub mod relation;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod tablespace;
pub mod trigger;

pub use column::{Column, HasColumns};
pub use composite_type::CompositeType;
pub use database::Database;
pub use extension::Extension;
pub use foreign::{ForeignDataWrapper, ForeignServer};
pub use index::Index;
pub use procedure::{Aggregate, AggregateKind, Procedure, ProcedureKind, Volatility};
pub use relation::Relation;
pub use role::Role;
pub use schema::{Schema, SchemaObject};
pub use sequence::Sequence;
pub use table::{SupportsReferentialIntegrity, Table};
pub use tablespace::Tablespace;
pub use trigger::{Trigger, TriggerEnabled, TriggerEvents, TriggerTiming};
