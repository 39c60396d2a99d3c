//! Recipe entities and their validated inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Longest accepted recipe or ingredient name.
pub const MAX_NAME_LEN: usize = 255;

/// Longest accepted quantity or unit string.
pub const MAX_AMOUNT_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// "This recipe uses this ingredient in this quantity/unit."
///
/// The same (recipe, ingredient) pair may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: String,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, joined with the ingredient name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity: String,
    pub unit: String,
}

/// A recipe with its ingredient lines in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientDetail>,
}

/// Validated input for creating or renaming a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    name: String,
}

impl NewRecipe {
    pub fn new(name: &str) -> Result<Self, StoreError> {
        Ok(Self {
            name: validate_name("Recipe name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Validated input for creating or renaming an ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    name: String,
}

impl NewIngredient {
    pub fn new(name: &str) -> Result<Self, StoreError> {
        Ok(Self {
            name: validate_name("Ingredient name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Quantity and unit of an ingredient line.
///
/// Both are opaque strings ("1/2", "200", "a pinch"); they are stored verbatim
/// and never parsed. An empty unit is fine ("1 egg").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    quantity: String,
    unit: String,
}

impl IngredientAmount {
    pub fn new(quantity: &str, unit: &str) -> Result<Self, StoreError> {
        check_len("Quantity", quantity, MAX_AMOUNT_LEN)?;
        check_len("Unit", unit, MAX_AMOUNT_LEN)?;
        Ok(Self {
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        })
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

fn validate_name(field: &str, name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} cannot be empty", field)));
    }
    check_len(field, trimmed, MAX_NAME_LEN)?;
    Ok(trimmed.to_string())
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::Validation(format!(
            "{} is longer than {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_name_is_trimmed() {
        let recipe = NewRecipe::new("  Pancakes \n").unwrap();
        assert_eq!(recipe.name(), "Pancakes");
    }

    #[test]
    fn test_blank_names_rejected() {
        assert!(matches!(
            NewRecipe::new("   "),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            NewIngredient::new(""),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_long_name_rejected() {
        let name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(NewIngredient::new(&name).is_err());
        assert!(NewIngredient::new(&name[..MAX_NAME_LEN]).is_ok());
    }

    #[test]
    fn test_amount_is_stored_verbatim() {
        let amount = IngredientAmount::new(" 1/2 ", "cups").unwrap();
        assert_eq!(amount.quantity(), " 1/2 ");
        assert_eq!(amount.unit(), "cups");
    }

    #[test]
    fn test_amount_allows_empty_unit() {
        let amount = IngredientAmount::new("1", "").unwrap();
        assert_eq!(amount.unit(), "");
    }

    #[test]
    fn test_amount_length_capped() {
        let long = "9".repeat(MAX_AMOUNT_LEN + 1);
        assert!(IngredientAmount::new(&long, "g").is_err());
    }
}
