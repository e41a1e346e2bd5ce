use anyhow::Context;
use async_trait::async_trait;

use crate::classes::repo_types::{ChatMessage, NewMessage, NewRoom, Room};
use crate::db::PgStore;

#[async_trait]
pub trait ClassStore: Send + Sync {
    /// All rooms, newest first.
    async fn list_rooms(&self) -> anyhow::Result<Vec<Room>>;
    async fn insert_room(&self, new: NewRoom) -> anyhow::Result<Room>;
    async fn find_room(&self, id: i64) -> anyhow::Result<Option<Room>>;
    /// Removes the room together with its chat history.
    async fn delete_room(&self, id: i64) -> anyhow::Result<bool>;
    /// Messages of a room, oldest first.
    async fn list_messages(&self, room_id: i64) -> anyhow::Result<Vec<ChatMessage>>;
    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<ChatMessage>;
}

const ROOM_COLUMNS: &str =
    "id, host_id, title, session_id, recipe_name, recipe_ingredients, recipe_content, created_at";

#[async_trait]
impl ClassStore for PgStore {
    async fn list_rooms(&self) -> anyhow::Result<Vec<Room>> {
        let sql = format!("SELECT {} FROM rooms ORDER BY created_at DESC, id DESC", ROOM_COLUMNS);
        let rows = sqlx::query_as::<_, Room>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("list rooms")?;
        Ok(rows)
    }

    async fn insert_room(&self, new: NewRoom) -> anyhow::Result<Room> {
        let sql = format!(
            r#"
            INSERT INTO rooms (host_id, title, session_id, recipe_name, recipe_ingredients, recipe_content)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ROOM_COLUMNS
        );
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(new.host_id)
            .bind(new.title)
            .bind(new.session_id)
            .bind(new.recipe_name)
            .bind(new.recipe_ingredients)
            .bind(new.recipe_content)
            .fetch_one(&self.pool)
            .await
            .context("insert room")?;
        Ok(room)
    }

    async fn find_room(&self, id: i64) -> anyhow::Result<Option<Room>> {
        let sql = format!("SELECT {} FROM rooms WHERE id = $1", ROOM_COLUMNS);
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("find room")?;
        Ok(room)
    }

    async fn delete_room(&self, id: i64) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await.context("begin tx")?;
        sqlx::query("DELETE FROM chat_messages WHERE room_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete room messages")?;
        let res = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete room")?;
        tx.commit().await.context("commit tx")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_messages(&self, room_id: i64) -> anyhow::Result<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, room_id, sender_id, content, created_at
              FROM chat_messages
             WHERE room_id = $1
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .context("list messages")?;
        Ok(rows)
    }

    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<ChatMessage> {
        let msg = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (room_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, room_id, sender_id, content, created_at
            "#,
        )
        .bind(new.room_id)
        .bind(new.sender_id)
        .bind(new.content)
        .fetch_one(&self.pool)
        .await
        .context("insert message")?;
        Ok(msg)
    }
}
