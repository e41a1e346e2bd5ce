use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum::{AsRefStr, Display, EnumString};
use time::Date;
use uuid::Uuid;

/// Fine-grained tag on catalog ingredients.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FoodCategory {
    Starch,
    Nuts,
    Grains,
    Fruits,
    Legumes,
    Mushrooms,
    Vegetables,
    Eggs,
    Meat,
    Seafood,
    Seaweed,
    Beverages,
    Liquor,
    Tea,
    Etc,
    Sugars,
    Dairy,
    Processed,
    Oils,
    Seasonings,
}

/// Coarse group used by the category breakdown. Declaration order is the
/// order of the `count` array in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodGroup {
    Produce,
    Livestock,
    Marine,
    Beverage,
    Other,
}

impl FoodGroup {
    pub const ALL: [FoodGroup; 5] = [
        FoodGroup::Produce,
        FoodGroup::Livestock,
        FoodGroup::Marine,
        FoodGroup::Beverage,
        FoodGroup::Other,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl FoodCategory {
    pub fn group(self) -> FoodGroup {
        use FoodCategory::*;
        match self {
            Starch | Nuts | Grains | Fruits | Legumes | Mushrooms | Vegetables => FoodGroup::Produce,
            Eggs | Meat => FoodGroup::Livestock,
            Seafood | Seaweed => FoodGroup::Marine,
            Beverages | Liquor | Tea => FoodGroup::Beverage,
            Etc | Sugars | Dairy | Processed | Oils | Seasonings => FoodGroup::Other,
        }
    }
}

/// Physical location of an owned ingredient.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StorageKind {
    Refrigerator,
    Freezer,
    Pantry,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub food_name: String,
    pub food_category: FoodCategory,
}

#[derive(Debug, FromRow)]
pub struct IngredientRow {
    pub id: i64,
    pub food_name: String,
    pub food_category: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = anyhow::Error;

    fn try_from(r: IngredientRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            food_category: r
                .food_category
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown food category {:?}", r.food_category))?,
            food_name: r.food_name,
        })
    }
}

/// A member's owned ingredient joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedIngredient {
    pub id: i64,
    pub member_id: Uuid,
    pub ingredient: Ingredient,
    pub storage: StorageKind,
    pub in_date: Date,
    pub exp_date: Date,
}

#[derive(Debug, FromRow)]
pub struct OwnedIngredientRow {
    pub id: i64,
    pub member_id: Uuid,
    pub ingredient_id: i64,
    pub food_name: String,
    pub food_category: String,
    pub storage: String,
    pub in_date: Date,
    pub exp_date: Date,
}

impl TryFrom<OwnedIngredientRow> for OwnedIngredient {
    type Error = anyhow::Error;

    fn try_from(r: OwnedIngredientRow) -> anyhow::Result<Self> {
        let storage = r
            .storage
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown storage {:?}", r.storage))?;
        let ingredient = Ingredient::try_from(IngredientRow {
            id: r.ingredient_id,
            food_name: r.food_name,
            food_category: r.food_category,
        })?;
        Ok(Self {
            id: r.id,
            member_id: r.member_id,
            ingredient,
            storage,
            in_date: r.in_date,
            exp_date: r.exp_date,
        })
    }
}

/// Insert payload for `my_ingredients`.
#[derive(Debug, Clone)]
pub struct NewMyIngredient {
    pub member_id: Uuid,
    pub ingredient_id: i64,
    pub storage: StorageKind,
    pub in_date: Date,
    pub exp_date: Date,
}
