use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::repo::MemberStore;
use crate::classes::repo::ClassStore;
use crate::ingredients::repo::IngredientStore;

mod memory;

pub use memory::MemoryStore;

/// Everything the handlers need from persistence.
pub trait Store: MemberStore + IngredientStore + ClassStore {}

impl<T> Store for T where T: MemberStore + IngredientStore + ClassStore {}

/// Postgres-backed store. Query impls live next to each domain in `*/repo.rs`.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}
