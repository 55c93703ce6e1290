//! Store implementations: in-memory (dev/test) and Postgres.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCategoryStore, InMemoryDb, InMemoryImageStore, InMemoryProductStore};
pub use postgres::{PostgresCategoryStore, PostgresImageStore, PostgresProductStore};
