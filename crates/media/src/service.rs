//! Image attachment service.
//!
//! Associates uploaded binary assets with an existing product and hands out
//! download URLs. Storage collaborators are explicit constructor
//! dependencies, same as the catalog coordinator.

use shopkeeper_core::{DomainError, DomainResult, ImageId, ProductId};
use shopkeeper_catalog::ProductStore;

use crate::image::{Image, ImageSummary, ImageUpload, NewImage};
use crate::store::ImageStore;

/// Path prefix the download URL is built from; the HTTP layer serves the
/// matching route.
pub const DOWNLOAD_URL_PREFIX: &str = "/api/v1/images/download/";

pub struct ImageService<I, P> {
    images: I,
    products: P,
}

impl<I, P> ImageService<I, P>
where
    I: ImageStore,
    P: ProductStore,
{
    pub fn new(images: I, products: P) -> Self {
        Self { images, products }
    }

    /// Store uploaded files against an existing product.
    ///
    /// Fails `NotFound` before writing anything when the product is absent.
    /// Each file is inserted, then its download URL (which embeds the
    /// assigned id) is written back onto the row.
    pub fn attach_images(
        &self,
        uploads: Vec<ImageUpload>,
        product_id: ProductId,
    ) -> DomainResult<Vec<ImageSummary>> {
        let product = self
            .products
            .find_by_id(product_id)?
            .ok_or(DomainError::NotFound)?;

        let mut summaries = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let mut image = self.images.insert(NewImage {
                file_name: upload.file_name,
                file_type: upload.file_type,
                data: upload.data,
                product_id: product.id,
            })?;

            image.download_url = format!("{DOWNLOAD_URL_PREFIX}{}", image.id);
            let stored = self
                .images
                .update(&image)?
                .ok_or(DomainError::NotFound)?;

            summaries.push(ImageSummary {
                image_id: stored.id,
                image_name: stored.file_name,
                download_url: stored.download_url,
            });
        }
        Ok(summaries)
    }

    pub fn image(&self, id: ImageId) -> DomainResult<Image> {
        self.images.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn images_for_product(&self, product_id: ProductId) -> DomainResult<Vec<Image>> {
        Ok(self.images.find_by_product(product_id)?)
    }

    /// Overwrite an image's file name, type and bytes in place.
    ///
    /// Identity and download URL are preserved; only the content changes.
    pub fn replace_image(&self, upload: ImageUpload, id: ImageId) -> DomainResult<Image> {
        let mut existing = self.images.find_by_id(id)?.ok_or(DomainError::NotFound)?;

        existing.file_name = upload.file_name;
        existing.file_type = upload.file_type;
        existing.data = upload.data;

        self.images.update(&existing)?.ok_or(DomainError::NotFound)
    }

    pub fn delete_image(&self, id: ImageId) -> DomainResult<()> {
        let existing = self.images.find_by_id(id)?.ok_or(DomainError::NotFound)?;
        self.images.delete(existing.id)?;
        Ok(())
    }
}
