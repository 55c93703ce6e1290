use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use shopkeeper_core::{ImageId, ProductId};
use shopkeeper_media::ImageUpload;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/upload", post(upload_images))
        .route(
            "/:id",
            get(get_image).put(replace_image).delete(delete_image),
        )
        .route("/download/:id", get(download_image))
}

/// Pull the `file` parts out of a multipart body. Unknown fields are ignored.
async fn collect_uploads(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Vec<ImageUpload>), axum::response::Response> {
    let mut product_id = None;
    let mut uploads = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    e.to_string(),
                ));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "product_id" => match field.text().await {
                Ok(text) => product_id = Some(text),
                Err(e) => {
                    return Err(errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_multipart",
                        e.to_string(),
                    ));
                }
            },
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let file_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => uploads.push(ImageUpload {
                        file_name,
                        file_type,
                        data: bytes.to_vec(),
                    }),
                    Err(e) => {
                        return Err(errors::json_error(
                            StatusCode::BAD_REQUEST,
                            "invalid_multipart",
                            e.to_string(),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    Ok((product_id, uploads))
}

/// Attach one or more uploaded files to a product.
///
/// Multipart form: a `product_id` text field plus `file` parts.
pub async fn upload_images(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let (product_id, uploads) = match collect_uploads(&mut multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let Some(product_id) = product_id else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_product_id",
            "multipart field 'product_id' is required",
        );
    };
    let product_id: ProductId = match product_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if uploads.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_files",
            "at least one 'file' part is required",
        );
    }

    match services.images.attach_images(uploads, product_id) {
        Ok(summaries) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "items": summaries })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ImageId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.images.image(id) {
        Ok(image) => (StatusCode::OK, Json(dto::image_to_json(&image))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Serve the stored bytes with the stored content type.
pub async fn download_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ImageId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.images.image(id) {
        Ok(image) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, image.file_type.clone()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", image.file_name),
                ),
            ],
            image.data,
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Replace an image's content in place (single `file` part).
pub async fn replace_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let id: ImageId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let (_, mut uploads) = match collect_uploads(&mut multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let Some(upload) = uploads.pop() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_files",
            "a 'file' part is required",
        );
    };

    match services.images.replace_image(upload, id) {
        Ok(image) => (StatusCode::OK, Json(dto::image_to_json(&image))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_image(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ImageId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.images.delete_image(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
