use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Cooking-class room.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Room {
    pub id: i64,
    pub host_id: Uuid,
    pub title: String,
    pub session_id: String,          // provider session
    pub recipe_name: String,
    pub recipe_ingredients: Vec<String>,
    pub recipe_content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub host_id: Uuid,
    pub title: String,
    pub session_id: String,
    pub recipe_name: String,
    pub recipe_ingredients: Vec<String>,
    pub recipe_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: Uuid,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub room_id: i64,
    pub sender_id: Uuid,
    pub content: String,
}
