//! `shopkeeper-infra` — storage collaborator implementations.
//!
//! The domain crates define the store traits; this crate provides the
//! in-memory and Postgres-backed implementations plus the schema migrations.

pub mod stores;

pub use stores::{
    InMemoryCategoryStore, InMemoryDb, InMemoryImageStore, InMemoryProductStore,
    PostgresCategoryStore, PostgresImageStore, PostgresProductStore,
};
