use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Member record in the database. Rows are provisioned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,                     // same as the token subject
    pub email: String,
    pub nickname: String,
    pub created_at: OffsetDateTime,
}
