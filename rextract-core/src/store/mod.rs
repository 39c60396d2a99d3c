//! Recipe storage.
//!
//! A store holds recipes, ingredients and the recipe-ingredient rows joining
//! them, and enforces the relational rules on every write:
//!
//! - a recipe-ingredient row always points at an existing recipe and ingredient
//! - deleting a recipe removes its rows atomically, never the ingredients
//! - an ingredient cannot be deleted while a row still uses it
//!
//! Missing referents are reported, never created on the fly.

mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{
    Ingredient, IngredientAmount, NewIngredient, NewRecipe, Recipe, RecipeDetail, RecipeIngredient,
};

pub trait RecipeStore: Send + Sync {
    fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    fn get_recipe(&self, id: Uuid) -> Result<Recipe, StoreError>;

    /// All recipes, ordered by name.
    fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;

    fn rename_recipe(&self, id: Uuid, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    /// Delete a recipe and its ingredient lines in one step.
    ///
    /// Returns how many ingredient lines went with it.
    fn delete_recipe(&self, id: Uuid) -> Result<usize, StoreError>;

    fn create_ingredient(&self, ingredient: NewIngredient) -> Result<Ingredient, StoreError>;

    fn get_ingredient(&self, id: Uuid) -> Result<Ingredient, StoreError>;

    /// All ingredients, ordered by name.
    fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError>;

    fn rename_ingredient(
        &self,
        id: Uuid,
        ingredient: NewIngredient,
    ) -> Result<Ingredient, StoreError>;

    /// Fails with [`StoreError::InUse`] while any recipe still uses the ingredient.
    fn delete_ingredient(&self, id: Uuid) -> Result<(), StoreError>;

    /// Add an ingredient line to a recipe.
    ///
    /// Both the recipe and the ingredient must already exist; otherwise
    /// [`StoreError::Reference`] is returned and nothing is written.
    fn attach_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError>;

    fn get_recipe_ingredient(&self, id: Uuid) -> Result<RecipeIngredient, StoreError>;

    fn update_recipe_ingredient(
        &self,
        id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError>;

    /// Remove one ingredient line. The recipe and ingredient stay.
    fn detach_ingredient(&self, id: Uuid) -> Result<(), StoreError>;

    /// Ingredient lines of a recipe in insertion order.
    fn recipe_ingredients(&self, recipe_id: Uuid) -> Result<Vec<RecipeIngredient>, StoreError>;

    /// A recipe together with its named ingredient lines.
    fn recipe_detail(&self, recipe_id: Uuid) -> Result<RecipeDetail, StoreError>;
}
