//! `shopkeeper-api` — HTTP boundary for the catalog and image services.

pub mod app;
