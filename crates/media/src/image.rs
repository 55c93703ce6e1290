use serde::{Deserialize, Serialize};

use shopkeeper_core::{Entity, ImageId, ProductId};

/// Binary asset attached to a product.
///
/// The bytes live in the store as a binary field. The download URL embeds the
/// store-assigned identity, so it is written back onto the record right after
/// insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub file_name: String,
    pub file_type: String,
    pub data: Vec<u8>,
    pub download_url: String,
    pub product_id: ProductId,
}

impl Entity for Image {
    type Id = ImageId;

    fn id(&self) -> &ImageId {
        &self.id
    }
}

/// An image row about to be persisted; the download URL is not known until
/// the store assigns an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub file_name: String,
    pub file_type: String,
    pub data: Vec<u8>,
    pub product_id: ProductId,
}

/// An uploaded file as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub file_type: String,
    pub data: Vec<u8>,
}

/// Per-image result returned from an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub image_id: ImageId,
    pub image_name: String,
    pub download_url: String,
}
