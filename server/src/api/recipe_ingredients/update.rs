use crate::api::recipes::ingredients::RecipeIngredientResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use rextract_core::IngredientAmount;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeIngredientRequest {
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[utoipa::path(
    put,
    path = "/api/recipe-ingredients/{id}",
    tag = "recipe-ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe-ingredient ID")
    ),
    request_body = UpdateRecipeIngredientRequest,
    responses(
        (status = 200, description = "Quantity and unit updated", body = RecipeIngredientResponse),
        (status = 400, description = "Invalid quantity or unit", body = ErrorResponse),
        (status = 404, description = "Recipe ingredient not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeIngredientRequest>,
) -> Result<Json<RecipeIngredientResponse>, ApiError> {
    let amount = IngredientAmount::new(&request.quantity, &request.unit)?;
    let row = state.store.update_recipe_ingredient(id, amount)?;
    Ok(Json(row.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::recipe_ingredients::delete::detach_ingredient;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rextract_core::{NewIngredient, NewRecipe};

    #[tokio::test]
    async fn test_update_then_detach() {
        let state = AppState::for_tests();
        let recipe = state
            .store
            .create_recipe(NewRecipe::new("Porridge").unwrap())
            .unwrap();
        let oats = state
            .store
            .create_ingredient(NewIngredient::new("oats").unwrap())
            .unwrap();
        let row = state
            .store
            .attach_ingredient(recipe.id, oats.id, IngredientAmount::new("1", "cup").unwrap())
            .unwrap();

        let Json(updated) = update_recipe_ingredient(
            State(state.clone()),
            Path(row.id),
            Json(UpdateRecipeIngredientRequest {
                quantity: "80".to_string(),
                unit: "g".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!((updated.quantity.as_str(), updated.unit.as_str()), ("80", "g"));

        let status = detach_ingredient(State(state.clone()), Path(row.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.store.get_ingredient(oats.id).is_ok());

        let error = detach_ingredient(State(state), Path(row.id))
            .await
            .unwrap_err();
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_overlong_quantity_is_bad_request() {
        let state = AppState::for_tests();
        let error = update_recipe_ingredient(
            State(state),
            Path(Uuid::new_v4()),
            Json(UpdateRecipeIngredientRequest {
                quantity: "9".repeat(65),
                unit: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
