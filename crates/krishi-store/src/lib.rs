//! Storage adapters for farmer profiles and soil-health-card records.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryProfileStore;
pub use ports::ProfileStore;
pub use postgres::{PostgresConfig, PostgresProfileStore};
