use super::create::IngredientRequest;
use super::get::IngredientResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use rextract_core::NewIngredient;
use uuid::Uuid;

#[utoipa::path(
    put,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    request_body = IngredientRequest,
    responses(
        (status = 200, description = "Ingredient renamed", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IngredientRequest>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let ingredient = state
        .store
        .rename_ingredient(id, NewIngredient::new(&request.name)?)?;
    Ok(Json(ingredient.into()))
}
