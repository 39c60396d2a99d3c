pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;
pub mod status;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use rextract_core::{ExtractionError, StoreError};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a handler, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
    Extraction(ExtractionError),
    Store(StoreError),
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        ApiError::Extraction(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Extraction(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Reference { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::InUse { .. }) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            ApiError::Extraction(e @ ExtractionError::EngineFailure(_)) => {
                tracing::error!("Extraction failed: {}", e);
                e.to_string()
            }
            ApiError::Extraction(e) => e.to_string(),
            ApiError::Store(StoreError::Backend(msg)) => {
                tracing::error!("Store backend error: {}", msg);
                "Internal server error".to_string()
            }
            ApiError::Store(e) => e.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "rextract", description = "Recipe text extraction and recipe storage"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        status::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        recipe_ingredients::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
