use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use rextract_core::{extract_text, ExtractionError, ImageUpload};
use serde::Serialize;
use utoipa::ToSchema;

/// Multipart form field carrying the image.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExtractTextResponse {
    /// Recognized text, trimmed. Not parsed into ingredients.
    pub text: String,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ExtractTextRequest {
    /// JPEG, PNG or TIFF image
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/recipes/extract-recipe-from-image",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = ExtractTextRequest),
    responses(
        (status = 200, description = "Text found in the image", body = ExtractTextResponse),
        (status = 400, description = "Missing, invalid or unsupported image, or no text found", body = ErrorResponse),
        (status = 500, description = "OCR engine failed", body = ErrorResponse)
    )
)]
pub async fn extract_recipe_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let upload = match multipart {
        Ok(multipart) => read_image_field(multipart).await?,
        Err(rejection) => {
            tracing::info!("Request is not multipart: {}", rejection);
            None
        }
    };

    let text = extract_text(state.engine.as_ref(), &state.ocr, upload).await?;
    Ok(Json(ExtractTextResponse { text }))
}

/// Same upload under the path older clients post to, outside `/api`.
#[utoipa::path(
    post,
    path = "/recipes/extract-recipe-from-image",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = ExtractTextRequest),
    responses(
        (status = 200, description = "Text found in the image", body = ExtractTextResponse),
        (status = 400, description = "Missing, invalid or unsupported image, or no text found", body = ErrorResponse),
        (status = 500, description = "OCR engine failed", body = ErrorResponse)
    )
)]
pub async fn extract_recipe_from_image_legacy(
    state: State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    extract_recipe_from_image(state, multipart).await
}

/// Pull the `image` file out of the form. Other fields are skipped, and so is
/// an `image` part that is a plain text field rather than a file.
///
/// A file input submitted without a file arrives as an empty part with an
/// empty filename and counts as no image.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, ExtractionError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Multipart read error: {}", e);
                return Err(ExtractionError::InvalidPayload(e.body_text()));
            }
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name() else {
            tracing::info!("Ignoring non-file {} field", IMAGE_FIELD);
            continue;
        };
        let has_file_name = !file_name.is_empty();
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Field read error: {}", e);
            ExtractionError::InvalidPayload(e.body_text())
        })?;

        if data.is_empty() && !has_file_name {
            return Ok(None);
        }

        return Ok(Some(ImageUpload {
            data: data.to_vec(),
            content_type,
        }));
    }
}
