use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates::iso_date;
use crate::ingredients::repo_types::{FoodCategory, Ingredient, StorageKind};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub food_name: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageQuery {
    #[serde(default)]
    pub storage: String, // empty = every storage
}

/// Request body for registering an owned ingredient. Dates are `YYYY-MM-DD`.
#[derive(Debug, Deserialize)]
pub struct AddIngredientRequest {
    pub id: i64,
    pub storage: StorageKind,
    pub in_date: String,
    pub exp_date: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IngredientResponse {
    pub id: i64,
    pub food_name: String,
    pub group_name: FoodCategory,
}

impl From<Ingredient> for IngredientResponse {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            food_name: i.food_name,
            group_name: i.food_category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AutoIngredientResponse {
    pub auto_complete: Vec<IngredientResponse>,
}

#[derive(Debug, Serialize)]
pub struct TotalIngredientResponse {
    pub total_count: usize,
    pub search_list: Vec<IngredientResponse>,
}

#[derive(Debug, Serialize)]
pub struct MyIngredientResponse {
    pub id: i64,
    pub food_name: String,
    pub group_name: FoodCategory,
    #[serde(with = "iso_date")]
    pub in_date: Date,
    pub d_date: String,
}

#[derive(Debug, Serialize)]
pub struct StorageResponse {
    pub storage: Vec<MyIngredientResponse>,
}

#[derive(Debug, Serialize)]
pub struct TotalMyIngredient {
    pub id: i64,
    pub food_name: String,
    pub group_name: FoodCategory,
    #[serde(with = "iso_date")]
    pub in_date: Date,
    pub d_date: String,
    pub category: StorageKind,
}

#[derive(Debug, Serialize)]
pub struct ListTotalMyIngredients {
    pub ingredients_num: usize,
    pub storage: Vec<TotalMyIngredient>,
}

#[derive(Debug, Serialize)]
pub struct WarningResponse {
    pub out_dated_num: usize,
    pub in_hurry_num: usize,
    pub out_dated: Vec<MyIngredientResponse>,
    pub in_hurry: Vec<MyIngredientResponse>,
}

/// `count` is `[hurry, critical, fine]`.
#[derive(Debug, Serialize)]
pub struct FridgeStatusResponse {
    pub count: Vec<usize>,
    pub status_msg: String,
}

/// `count` is `[produce, livestock, marine, beverage, other]`.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub count: Vec<usize>,
    pub status_msg: String,
}
