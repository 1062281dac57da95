// touchline-core/src/ports/mod.rs

// What the pipeline needs from the outside world, without knowing how it is done.
// Adapters live in crate::infrastructure::adapters.

pub mod codec;
pub mod lookup;
pub mod source;
pub mod storage;
pub mod warehouse;

pub use codec::{DataFormat, DatasetCodec};
pub use lookup::LookupStore;
pub use source::{Club, MarketSource, SquadPlayer, StatsSource};
pub use storage::{ObjectRef, ObjectStore};
pub use warehouse::{ColumnSchema, Warehouse};
