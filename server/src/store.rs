//! Postgres-backed recipe store.
//!
//! Writes that touch more than one row run in a transaction. Referents are
//! locked before a recipe-ingredient row is inserted or a recipe is deleted,
//! and foreign-key violations from the database are mapped back onto the
//! store's own errors.

use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rextract_core::{
    EntityKind, Ingredient, IngredientAmount, NewIngredient, NewRecipe, Recipe, RecipeDetail,
    RecipeIngredient, RecipeIngredientDetail, RecipeStore, StoreError,
};
use uuid::Uuid;

use crate::db::{DbConn, DbPool};
use crate::models::{
    IngredientRow, NewIngredientRow, NewRecipeIngredientRow, NewRecipeRow, RecipeIngredientRow,
    RecipeRow,
};
use crate::schema::{ingredients, recipe_ingredients, recipes};

const RECIPE_FK: &str = "recipe_ingredients_recipe_fk";
const INGREDIENT_FK: &str = "recipe_ingredients_ingredient_fk";

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Backend(format!("Database connection failed: {}", e)))
    }
}

/// Error type for transaction closures: diesel needs `From<diesel::result::Error>`.
enum TxError {
    Store(StoreError),
    Db(DieselError),
}

impl From<DieselError> for TxError {
    fn from(e: DieselError) -> Self {
        TxError::Db(e)
    }
}

impl From<StoreError> for TxError {
    fn from(e: StoreError) -> Self {
        TxError::Store(e)
    }
}

impl From<TxError> for StoreError {
    fn from(e: TxError) -> Self {
        match e {
            TxError::Store(e) => e,
            TxError::Db(e) => backend(e),
        }
    }
}

fn backend(e: DieselError) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn not_found(entity: EntityKind, id: Uuid) -> StoreError {
    StoreError::NotFound { entity, id }
}

/// Name of the violated foreign key, if `e` is a foreign-key violation.
fn violated_foreign_key(e: &DieselError) -> Option<&str> {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

/// Map a failed recipe-ingredient insert onto the referent that vanished.
fn missing_referent(e: &DieselError, recipe_id: Uuid, ingredient_id: Uuid) -> Option<StoreError> {
    let (entity, id) = match violated_foreign_key(e)? {
        RECIPE_FK => (EntityKind::Recipe, recipe_id),
        INGREDIENT_FK => (EntityKind::Ingredient, ingredient_id),
        _ => return None,
    };
    Some(StoreError::Reference { entity, id })
}

impl RecipeStore for PgStore {
    fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(recipes::table)
            .values(&NewRecipeRow {
                id: Uuid::new_v4(),
                name: recipe.name(),
            })
            .returning(RecipeRow::as_returning())
            .get_result::<RecipeRow>(&mut conn)
            .map(Recipe::from)
            .map_err(backend)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;
        recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first::<RecipeRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(Recipe::from)
            .ok_or_else(|| not_found(EntityKind::Recipe, id))
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut conn = self.conn()?;
        let rows = recipes::table
            .order((recipes::name.asc(), recipes::id.asc()))
            .select(RecipeRow::as_select())
            .load::<RecipeRow>(&mut conn)
            .map_err(backend)?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    fn rename_recipe(&self, id: Uuid, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;
        diesel::update(recipes::table.find(id))
            .set((
                recipes::name.eq(recipe.name()),
                recipes::updated_at.eq(Utc::now()),
            ))
            .returning(RecipeRow::as_returning())
            .get_result::<RecipeRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(Recipe::from)
            .ok_or_else(|| not_found(EntityKind::Recipe, id))
    }

    fn delete_recipe(&self, id: Uuid) -> Result<usize, StoreError> {
        let mut conn = self.conn()?;
        let removed = conn.transaction::<_, TxError, _>(|conn| {
            // FOR UPDATE blocks concurrent attaches until the delete commits
            let locked: Option<Uuid> = recipes::table
                .find(id)
                .select(recipes::id)
                .for_update()
                .first(conn)
                .optional()?;
            if locked.is_none() {
                return Err(not_found(EntityKind::Recipe, id).into());
            }

            let removed = diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
            )
            .execute(conn)?;
            diesel::delete(recipes::table.find(id)).execute(conn)?;
            Ok(removed)
        })?;
        Ok(removed)
    }

    fn create_ingredient(&self, ingredient: NewIngredient) -> Result<Ingredient, StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(ingredients::table)
            .values(&NewIngredientRow {
                id: Uuid::new_v4(),
                name: ingredient.name(),
            })
            .returning(IngredientRow::as_returning())
            .get_result::<IngredientRow>(&mut conn)
            .map(Ingredient::from)
            .map_err(backend)
    }

    fn get_ingredient(&self, id: Uuid) -> Result<Ingredient, StoreError> {
        let mut conn = self.conn()?;
        ingredients::table
            .find(id)
            .select(IngredientRow::as_select())
            .first::<IngredientRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(Ingredient::from)
            .ok_or_else(|| not_found(EntityKind::Ingredient, id))
    }

    fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError> {
        let mut conn = self.conn()?;
        let rows = ingredients::table
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .select(IngredientRow::as_select())
            .load::<IngredientRow>(&mut conn)
            .map_err(backend)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    fn rename_ingredient(
        &self,
        id: Uuid,
        ingredient: NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        let mut conn = self.conn()?;
        diesel::update(ingredients::table.find(id))
            .set(ingredients::name.eq(ingredient.name()))
            .returning(IngredientRow::as_returning())
            .get_result::<IngredientRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(Ingredient::from)
            .ok_or_else(|| not_found(EntityKind::Ingredient, id))
    }

    fn delete_ingredient(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        conn.transaction::<_, TxError, _>(|conn| {
            let locked: Option<Uuid> = ingredients::table
                .find(id)
                .select(ingredients::id)
                .for_update()
                .first(conn)
                .optional()?;
            if locked.is_none() {
                return Err(not_found(EntityKind::Ingredient, id).into());
            }

            let references: i64 = recipe_ingredients::table
                .filter(recipe_ingredients::ingredient_id.eq(id))
                .count()
                .get_result(conn)?;
            if references > 0 {
                return Err(StoreError::InUse {
                    id,
                    references: references as usize,
                }
                .into());
            }

            match diesel::delete(ingredients::table.find(id)).execute(conn) {
                Ok(_) => Ok(()),
                Err(e) if violated_foreign_key(&e).is_some() => Err(StoreError::InUse {
                    id,
                    references: 1,
                }
                .into()),
                Err(e) => Err(e.into()),
            }
        })?;
        Ok(())
    }

    fn attach_ingredient(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError> {
        let mut conn = self.conn()?;
        let row = conn.transaction::<_, TxError, _>(|conn| {
            // Key-share locks keep both referents alive until the insert commits
            let recipe: Option<Uuid> = recipes::table
                .find(recipe_id)
                .select(recipes::id)
                .for_key_share()
                .first(conn)
                .optional()?;
            if recipe.is_none() {
                return Err(StoreError::Reference {
                    entity: EntityKind::Recipe,
                    id: recipe_id,
                }
                .into());
            }

            let ingredient: Option<Uuid> = ingredients::table
                .find(ingredient_id)
                .select(ingredients::id)
                .for_key_share()
                .first(conn)
                .optional()?;
            if ingredient.is_none() {
                return Err(StoreError::Reference {
                    entity: EntityKind::Ingredient,
                    id: ingredient_id,
                }
                .into());
            }

            let inserted = diesel::insert_into(recipe_ingredients::table)
                .values(&NewRecipeIngredientRow {
                    id: Uuid::new_v4(),
                    recipe_id,
                    ingredient_id,
                    quantity: amount.quantity(),
                    unit: amount.unit(),
                })
                .returning(RecipeIngredientRow::as_returning())
                .get_result::<RecipeIngredientRow>(conn);

            match inserted {
                Ok(row) => Ok(row),
                Err(e) => match missing_referent(&e, recipe_id, ingredient_id) {
                    Some(missing) => Err(missing.into()),
                    None => Err(e.into()),
                },
            }
        })?;

        Ok(RecipeIngredient::from(row))
    }

    fn get_recipe_ingredient(&self, id: Uuid) -> Result<RecipeIngredient, StoreError> {
        let mut conn = self.conn()?;
        recipe_ingredients::table
            .find(id)
            .select(RecipeIngredientRow::as_select())
            .first::<RecipeIngredientRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(RecipeIngredient::from)
            .ok_or_else(|| not_found(EntityKind::RecipeIngredient, id))
    }

    fn update_recipe_ingredient(
        &self,
        id: Uuid,
        amount: IngredientAmount,
    ) -> Result<RecipeIngredient, StoreError> {
        let mut conn = self.conn()?;
        diesel::update(recipe_ingredients::table.find(id))
            .set((
                recipe_ingredients::quantity.eq(amount.quantity()),
                recipe_ingredients::unit.eq(amount.unit()),
            ))
            .returning(RecipeIngredientRow::as_returning())
            .get_result::<RecipeIngredientRow>(&mut conn)
            .optional()
            .map_err(backend)?
            .map(RecipeIngredient::from)
            .ok_or_else(|| not_found(EntityKind::RecipeIngredient, id))
    }

    fn detach_ingredient(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(recipe_ingredients::table.find(id))
            .execute(&mut conn)
            .map_err(backend)?;
        if deleted == 0 {
            return Err(not_found(EntityKind::RecipeIngredient, id));
        }
        Ok(())
    }

    fn recipe_ingredients(&self, recipe_id: Uuid) -> Result<Vec<RecipeIngredient>, StoreError> {
        let mut conn = self.conn()?;
        let rows = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                let exists: Option<Uuid> = recipes::table
                    .find(recipe_id)
                    .select(recipes::id)
                    .first(conn)
                    .optional()?;
                if exists.is_none() {
                    return Err(not_found(EntityKind::Recipe, recipe_id).into());
                }

                Ok(recipe_ingredients::table
                    .filter(recipe_ingredients::recipe_id.eq(recipe_id))
                    .order(recipe_ingredients::seq.asc())
                    .select(RecipeIngredientRow::as_select())
                    .load::<RecipeIngredientRow>(conn)?)
            })?;
        Ok(rows.into_iter().map(RecipeIngredient::from).collect())
    }

    fn recipe_detail(&self, recipe_id: Uuid) -> Result<RecipeDetail, StoreError> {
        let mut conn = self.conn()?;
        let (recipe, lines) = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, TxError, _>(|conn| {
                let recipe = recipes::table
                    .find(recipe_id)
                    .select(RecipeRow::as_select())
                    .first::<RecipeRow>(conn)
                    .optional()?
                    .ok_or_else(|| not_found(EntityKind::Recipe, recipe_id))?;

                let lines: Vec<(Uuid, Uuid, String, String, String)> = recipe_ingredients::table
                    .inner_join(ingredients::table)
                    .filter(recipe_ingredients::recipe_id.eq(recipe_id))
                    .order(recipe_ingredients::seq.asc())
                    .select((
                        recipe_ingredients::id,
                        recipe_ingredients::ingredient_id,
                        ingredients::name,
                        recipe_ingredients::quantity,
                        recipe_ingredients::unit,
                    ))
                    .load(conn)?;

                Ok((recipe, lines))
            })?;

        Ok(RecipeDetail {
            recipe: Recipe::from(recipe),
            ingredients: lines
                .into_iter()
                .map(
                    |(id, ingredient_id, ingredient_name, quantity, unit)| RecipeIngredientDetail {
                        id,
                        ingredient_id,
                        ingredient_name,
                        quantity,
                        unit,
                    },
                )
                .collect(),
        })
    }
}
