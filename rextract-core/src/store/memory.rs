//! In-process store used by tests and by servers running without a database.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use super::RecipeStore;
use crate::error::{EntityKind, StoreError};
use crate::types::{
    Ingredient, IngredientAmount, NewIngredient, NewRecipe, Recipe, RecipeDetail, RecipeIngredient,
    RecipeIngredientDetail,
};

#[derive(Debug, Default)]
struct Tables {
    recipes: HashMap<Uuid, Recipe>,
    ingredients: HashMap<Uuid, Ingredient>,
    /// Kept in insertion order.
    recipe_ingredients: Vec<RecipeIngredient>,
}

/// A [`RecipeStore`] backed by a single lock over all three tables.
///
/// Every write runs under one write guard, so readers never observe a recipe
/// half-deleted or a row pointing at a missing referent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

fn not_found(entity: EntityKind, id: Uuid) -> StoreError {
    StoreError::NotFound { entity, id }
}

impl RecipeStore for MemoryStore {
    fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: recipe.name().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.write()?.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Recipe, StoreError> {
        self.read()?
            .recipes
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Recipe, id))
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes: Vec<Recipe> = self.read()?.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(recipes)
    }

    fn rename_recipe(&self, id: Uuid, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tables = self.write()?;
        let existing = tables
            .recipes
            .get_mut(&id)
            .ok_or_else(|| not_found(EntityKind::Recipe, id))?;
        existing.name = recipe.name().to_string();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    fn delete_recipe(&self, id: Uuid) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        if tables.recipes.remove(&id).is_none() {
            return Err(not_found(EntityKind::Recipe, id));
        }
        let before = tables.recipe_ingredients.len();
        tables.recipe_ingredients.retain(|ri| ri.recipe_id != id);
        Ok(before - tables.recipe_ingredients.len())
    }

    fn create_ingredient(&self, ingredient: NewIngredient) -> Result<Ingredient, StoreError> {
        let ingredient = Ingredient {
            id: Uuid::new_v4(),
            name: ingredient.name().to_string(),
            created_at: Utc::now(),
        };
        self.write()?
            .ingredients
            .insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    fn get_ingredient(&self, id: Uuid) -> Result<Ingredient, StoreError> {
        self.read()?
            .ingredients
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Ingredient, id))
    }

    fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError> {
        let mut ingredients: Vec<Ingredient> =
            self.read()?.ingredients.values().cloned().collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(ingredients)
    }

    fn rename_ingredient(
        &self,
        id: Uuid,
        ingredient: NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        let mut tables = self.write()?;
        let existing = tables
            .ingredients
            .get_mut(&id)
            .ok_or_else(|| not_found(EntityKind::Ingredient, id))?;
        existing.name = ingredient.name().to_string();
        Ok(existing.clone())
    }

    fn delete_ingredient(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.ingredients.contains_key(&id) {
            return Err(not_found(EntityKind::Ingredient, id));
        }
        let references = tables
            .recipe_ingredients
            .iter()
            .filter(|ri| ri.ingredient_id == id)
            .count();
        if references > 0 {
            return Err(StoreError::InUse { id, references });
        }
        tables.ingredients.remove(&id);
        Ok(())
    }

    fn attach_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError> {
        let mut tables = self.write()?;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(StoreError::Reference {
                entity: EntityKind::Recipe,
                id: recipe_id,
            });
        }
        if !tables.ingredients.contains_key(&ingredient_id) {
            return Err(StoreError::Reference {
                entity: EntityKind::Ingredient,
                id: ingredient_id,
            });
        }

        let row = RecipeIngredient {
            id: Uuid::new_v4(),
            recipe_id,
            ingredient_id,
            quantity: amount.quantity().to_string(),
            unit: amount.unit().to_string(),
            created_at: Utc::now(),
        };
        tables.recipe_ingredients.push(row.clone());
        Ok(row)
    }

    fn get_recipe_ingredient(&self, id: Uuid) -> Result<RecipeIngredient, StoreError> {
        self.read()?
            .recipe_ingredients
            .iter()
            .find(|ri| ri.id == id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::RecipeIngredient, id))
    }

    fn update_recipe_ingredient(
        &self,
        id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError> {
        let mut tables = self.write()?;
        let row = tables
            .recipe_ingredients
            .iter_mut()
            .find(|ri| ri.id == id)
            .ok_or_else(|| not_found(EntityKind::RecipeIngredient, id))?;
        row.quantity = amount.quantity().to_string();
        row.unit = amount.unit().to_string();
        Ok(row.clone())
    }

    fn detach_ingredient(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let position = tables
            .recipe_ingredients
            .iter()
            .position(|ri| ri.id == id)
            .ok_or_else(|| not_found(EntityKind::RecipeIngredient, id))?;
        // remove, not swap_remove: the remaining rows keep their order
        tables.recipe_ingredients.remove(position);
        Ok(())
    }

    fn recipe_ingredients(&self, recipe_id: Uuid) -> Result<Vec<RecipeIngredient>, StoreError> {
        let tables = self.read()?;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(not_found(EntityKind::Recipe, recipe_id));
        }
        Ok(tables
            .recipe_ingredients
            .iter()
            .filter(|ri| ri.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    fn recipe_detail(&self, recipe_id: Uuid) -> Result<RecipeDetail, StoreError> {
        let tables = self.read()?;
        let recipe = tables
            .recipes
            .get(&recipe_id)
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Recipe, recipe_id))?;

        let ingredients = tables
            .recipe_ingredients
            .iter()
            .filter(|ri| ri.recipe_id == recipe_id)
            .map(|ri| {
                let ingredient = tables
                    .ingredients
                    .get(&ri.ingredient_id)
                    .ok_or_else(|| StoreError::Reference {
                        entity: EntityKind::Ingredient,
                        id: ri.ingredient_id,
                    })?;
                Ok(RecipeIngredientDetail {
                    id: ri.id,
                    ingredient_id: ri.ingredient_id,
                    ingredient_name: ingredient.name.clone(),
                    quantity: ri.quantity.clone(),
                    unit: ri.unit.clone(),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(RecipeDetail {
            recipe,
            ingredients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detach_keeps_order_of_remaining_rows() {
        let store = MemoryStore::new();
        let recipe = store.create_recipe(NewRecipe::new("Bread").unwrap()).unwrap();
        let flour = store
            .create_ingredient(NewIngredient::new("flour").unwrap())
            .unwrap();

        let rows: Vec<RecipeIngredient> = ["1", "2", "3"]
            .iter()
            .map(|q| {
                store
                    .attach_ingredient(recipe.id, flour.id, IngredientAmount::new(q, "cup").unwrap())
                    .unwrap()
            })
            .collect();

        store.detach_ingredient(rows[0].id).unwrap();

        let quantities: Vec<String> = store
            .recipe_ingredients(recipe.id)
            .unwrap()
            .into_iter()
            .map(|ri| ri.quantity)
            .collect();
        assert_eq!(quantities, vec!["2", "3"]);
    }

    #[test]
    fn test_rename_recipe_bumps_updated_at() {
        let store = MemoryStore::new();
        let recipe = store.create_recipe(NewRecipe::new("Soup").unwrap()).unwrap();
        let renamed = store
            .rename_recipe(recipe.id, NewRecipe::new("Tomato soup").unwrap())
            .unwrap();

        assert_eq!(renamed.name, "Tomato soup");
        assert_eq!(renamed.created_at, recipe.created_at);
        assert!(renamed.updated_at >= recipe.updated_at);
    }
}
