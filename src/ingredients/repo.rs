use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::ingredients::repo_types::{
    Ingredient, IngredientRow, NewMyIngredient, OwnedIngredient, OwnedIngredientRow, StorageKind,
};

#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// Catalog entries whose name contains `fragment`, ordered by id.
    async fn search_ingredients(&self, fragment: &str) -> anyhow::Result<Vec<Ingredient>>;
    async fn find_ingredient(&self, id: i64) -> anyhow::Result<Option<Ingredient>>;
    /// Returns the new record id.
    async fn insert_my_ingredient(&self, new: NewMyIngredient) -> anyhow::Result<i64>;
    /// Owned records of one member, optionally narrowed to one storage, ordered by id.
    async fn list_my_ingredients(
        &self,
        member_id: Uuid,
        storage: Option<StorageKind>,
    ) -> anyhow::Result<Vec<OwnedIngredient>>;
    async fn find_my_ingredient(&self, id: i64) -> anyhow::Result<Option<OwnedIngredient>>;
    /// Returns false when nothing was deleted.
    async fn delete_my_ingredient(&self, id: i64) -> anyhow::Result<bool>;
}

const OWNED_SELECT: &str = r#"
    SELECT mi.id, mi.member_id, mi.ingredient_id, i.food_name, i.food_category,
           mi.storage, mi.in_date, mi.exp_date
      FROM my_ingredients mi
      JOIN ingredients i ON i.id = mi.ingredient_id
"#;

fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl IngredientStore for PgStore {
    async fn search_ingredients(&self, fragment: &str) -> anyhow::Result<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, food_name, food_category
              FROM ingredients
             WHERE food_name ILIKE $1
             ORDER BY id ASC
            "#,
        )
        .bind(like_pattern(fragment))
        .fetch_all(&self.pool)
        .await
        .context("search ingredients")?;

        rows.into_iter().map(Ingredient::try_from).collect()
    }

    async fn find_ingredient(&self, id: i64) -> anyhow::Result<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(
            r#"SELECT id, food_name, food_category FROM ingredients WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find ingredient")?;

        row.map(Ingredient::try_from).transpose()
    }

    async fn insert_my_ingredient(&self, new: NewMyIngredient) -> anyhow::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO my_ingredients (member_id, ingredient_id, storage, in_date, exp_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new.member_id)
        .bind(new.ingredient_id)
        .bind(new.storage.as_ref())
        .bind(new.in_date)
        .bind(new.exp_date)
        .fetch_one(&self.pool)
        .await
        .context("insert my ingredient")?;
        Ok(id)
    }

    async fn list_my_ingredients(
        &self,
        member_id: Uuid,
        storage: Option<StorageKind>,
    ) -> anyhow::Result<Vec<OwnedIngredient>> {
        let sql = format!(
            "{} WHERE mi.member_id = $1 AND ($2::TEXT IS NULL OR mi.storage = $2) ORDER BY mi.id ASC",
            OWNED_SELECT
        );
        let rows = sqlx::query_as::<_, OwnedIngredientRow>(&sql)
            .bind(member_id)
            .bind(storage.map(|s| s.as_ref().to_string()))
            .fetch_all(&self.pool)
            .await
            .context("list my ingredients")?;

        rows.into_iter().map(OwnedIngredient::try_from).collect()
    }

    async fn find_my_ingredient(&self, id: i64) -> anyhow::Result<Option<OwnedIngredient>> {
        let sql = format!("{} WHERE mi.id = $1", OWNED_SELECT);
        let row = sqlx::query_as::<_, OwnedIngredientRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("find my ingredient")?;

        row.map(OwnedIngredient::try_from).transpose()
    }

    async fn delete_my_ingredient(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM my_ingredients WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete my ingredient")?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("egg"), "%egg%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
