//! `shopkeeper-media` — product image attachment subsystem.
//!
//! Uploaded files become database-stored binary rows tied to a product, each
//! addressable through a download URL minted at attach time.

pub mod image;
pub mod service;
pub mod store;

pub use image::{Image, ImageSummary, ImageUpload, NewImage};
pub use service::{DOWNLOAD_URL_PREFIX, ImageService};
pub use store::ImageStore;
