use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/recipe-ingredients/{id}",
    tag = "recipe-ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe-ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient line removed from its recipe"),
        (status = 404, description = "Recipe ingredient not found", body = ErrorResponse)
    )
)]
pub async fn detach_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.detach_ingredient(id)?;
    Ok(StatusCode::NO_CONTENT)
}
