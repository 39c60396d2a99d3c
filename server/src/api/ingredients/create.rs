use super::get::IngredientResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use rextract_core::NewIngredient;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body for both creating and renaming an ingredient.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientRequest {
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "ingredients",
    request_body = IngredientRequest,
    responses(
        (status = 201, description = "Ingredient created successfully", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(request): Json<IngredientRequest>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let ingredient = state
        .store
        .create_ingredient(NewIngredient::new(&request.name)?)?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ingredients::{delete, get, list, update};
    use axum::extract::Path;
    use axum::response::IntoResponse;
    use rextract_core::{IngredientAmount, NewRecipe};

    async fn create(state: &AppState, name: &str) -> IngredientResponse {
        let (_, Json(created)) = create_ingredient(
            State(state.clone()),
            Json(IngredientRequest {
                name: name.to_string(),
            }),
        )
        .await
        .unwrap();
        created
    }

    #[tokio::test]
    async fn test_ingredient_crud() {
        let state = AppState::for_tests();
        let flour = create(&state, "flour").await;
        create(&state, "baking soda").await;

        let Json(renamed) = update::update_ingredient(
            State(state.clone()),
            Path(flour.id),
            Json(IngredientRequest {
                name: "bread flour".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "bread flour");

        let Json(fetched) = get::get_ingredient(State(state.clone()), Path(flour.id))
            .await
            .unwrap();
        assert_eq!(fetched.name, "bread flour");

        let Json(listed) = list::list_ingredients(State(state.clone())).await.unwrap();
        let names: Vec<&str> = listed.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["baking soda", "bread flour"]);

        let status = delete::delete_ingredient(State(state.clone()), Path(flour.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_deleting_used_ingredient_conflicts() {
        let state = AppState::for_tests();
        let salt = create(&state, "salt").await;
        let recipe = state
            .store
            .create_recipe(NewRecipe::new("Brine").unwrap())
            .unwrap();
        state
            .store
            .attach_ingredient(recipe.id, salt.id, IngredientAmount::new("2", "tbsp").unwrap())
            .unwrap();

        let error = delete::delete_ingredient(State(state.clone()), Path(salt.id))
            .await
            .unwrap_err();

        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
        assert!(state.store.get_ingredient(salt.id).is_ok());
    }
}
