//! Storage collaborator trait for stored images.

use std::sync::Arc;

use shopkeeper_core::{ImageId, ProductId, StoreError};

use crate::image::{Image, NewImage};

/// Image persistence operations. Synchronous, like the catalog stores.
pub trait ImageStore: Send + Sync {
    fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, StoreError>;
    /// Persist a new image row, assigning its identity. The download URL is
    /// empty until the caller writes it back via `update`.
    fn insert(&self, image: NewImage) -> Result<Image, StoreError>;
    /// Persist changed fields of an existing image. `None` means the row no
    /// longer exists.
    fn update(&self, image: &Image) -> Result<Option<Image>, StoreError>;
    fn delete(&self, id: ImageId) -> Result<(), StoreError>;
    fn find_by_product(&self, product_id: ProductId) -> Result<Vec<Image>, StoreError>;
}

impl<S> ImageStore for Arc<S>
where
    S: ImageStore + ?Sized,
{
    fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, StoreError> {
        (**self).find_by_id(id)
    }

    fn insert(&self, image: NewImage) -> Result<Image, StoreError> {
        (**self).insert(image)
    }

    fn update(&self, image: &Image) -> Result<Option<Image>, StoreError> {
        (**self).update(image)
    }

    fn delete(&self, id: ImageId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn find_by_product(&self, product_id: ProductId) -> Result<Vec<Image>, StoreError> {
        (**self).find_by_product(product_id)
    }
}
