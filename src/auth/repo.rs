use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::Member;
use crate::db::PgStore;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_member(&self, id: Uuid) -> anyhow::Result<Option<Member>>;
}

/// Resolves the caller's member row or fails with not-found.
pub async fn require_member<S>(store: &S, id: Uuid) -> AppResult<Member>
where
    S: MemberStore + ?Sized,
{
    store
        .find_member(id)
        .await?
        .ok_or_else(|| AppError::not_found("member not found"))
}

#[async_trait]
impl MemberStore for PgStore {
    async fn find_member(&self, id: Uuid) -> anyhow::Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, email, nickname, created_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find member")?;
        Ok(member)
    }
}
