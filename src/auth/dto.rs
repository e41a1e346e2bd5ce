use serde::Serialize;
use uuid::Uuid;

use super::repo_types::Member;

/// Public part of the member returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicMember {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
}

impl From<Member> for PublicMember {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            email: m.email,
            nickname: m.nickname,
        }
    }
}
