use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::repo::{require_member, MemberStore};
use crate::classes::dto::{
    ClassList, EnterResponse, MessageRequest, RoomRecipeResponse, RoomRequest, RoomResponse,
    SessionRoomResponse,
};
use crate::classes::repo::ClassStore;
use crate::classes::repo_types::{ChatMessage, NewMessage, NewRoom, Room};
use crate::error::{AppError, AppResult};
use crate::rtc::RtcProvider;

async fn require_room<S>(store: &S, id: i64) -> AppResult<Room>
where
    S: ClassStore + ?Sized,
{
    store
        .find_room(id)
        .await?
        .ok_or_else(|| AppError::not_found("class not found"))
}

/// Closes a provider session; a refusal is logged, not returned.
async fn discard_session<R>(rtc: &R, session_id: &str)
where
    R: RtcProvider + ?Sized,
{
    if let Err(e) = rtc.close_session(session_id).await {
        warn!(error = %e, %session_id, "orphaned rtc session");
    }
}

pub async fn list_rooms<S>(store: &S) -> AppResult<ClassList>
where
    S: ClassStore + ?Sized,
{
    let rooms: Vec<RoomResponse> = store
        .list_rooms()
        .await?
        .into_iter()
        .map(RoomResponse::from)
        .collect();
    Ok(ClassList {
        empty: rooms.is_empty(),
        rooms,
    })
}

pub async fn create_room<S, R>(
    store: &S,
    rtc: &R,
    host_id: Uuid,
    req: RoomRequest,
) -> AppResult<SessionRoomResponse>
where
    S: MemberStore + ClassStore + ?Sized,
    R: RtcProvider + ?Sized,
{
    if req.class_name.trim().is_empty() {
        return Err(AppError::bad_request("class_name is required"));
    }
    let host = require_member(store, host_id).await?;

    let session_id = rtc.create_session().await.map_err(AppError::Upstream)?;
    let room = match store
        .insert_room(NewRoom {
            host_id: host.id,
            title: req.class_name.trim().to_string(),
            session_id: session_id.clone(),
            recipe_name: req.recipe_name,
            recipe_ingredients: req.recipe_ingredients,
            recipe_content: req.recipe_content,
        })
        .await
    {
        Ok(room) => room,
        Err(e) => {
            discard_session(rtc, &session_id).await;
            return Err(e.into());
        }
    };

    let token = match rtc.create_connection(&room.session_id).await {
        Ok(token) => token,
        Err(e) => {
            if let Err(del_err) = store.delete_room(room.id).await {
                error!(error = %del_err, class_id = room.id, "class row left behind");
            }
            discard_session(rtc, &session_id).await;
            return Err(AppError::Upstream(e));
        }
    };
    info!(class_id = room.id, host_id = %host.id, session_id = %room.session_id, "class opened");
    Ok(SessionRoomResponse {
        class_id: room.id,
        session_id: room.session_id,
        token,
    })
}

pub async fn enter_room<S, R>(
    store: &S,
    rtc: &R,
    member_id: Uuid,
    class_id: i64,
) -> AppResult<EnterResponse>
where
    S: MemberStore + ClassStore + ?Sized,
    R: RtcProvider + ?Sized,
{
    let member = require_member(store, member_id).await?;
    let room = require_room(store, class_id).await?;
    let token = rtc
        .create_connection(&room.session_id)
        .await
        .map_err(AppError::Upstream)?;
    let messages = store.list_messages(room.id).await?;
    info!(class_id = room.id, member_id = %member.id, "class entered");
    Ok(EnterResponse {
        class_id: room.id,
        session_id: room.session_id,
        token,
        messages,
    })
}

pub async fn room_recipe<S>(store: &S, class_id: i64) -> AppResult<RoomRecipeResponse>
where
    S: ClassStore + ?Sized,
{
    Ok(require_room(store, class_id).await?.into())
}

pub async fn close_room<S, R>(store: &S, rtc: &R, member_id: Uuid, class_id: i64) -> AppResult<()>
where
    S: MemberStore + ClassStore + ?Sized,
    R: RtcProvider + ?Sized,
{
    let member = require_member(store, member_id).await?;
    let room = require_room(store, class_id).await?;
    if room.host_id != member.id {
        warn!(class_id, member_id = %member.id, "close by non-host refused");
        return Err(AppError::forbidden("only the host can close the class"));
    }

    store.delete_room(room.id).await?;
    discard_session(rtc, &room.session_id).await;
    info!(class_id, "class closed");
    Ok(())
}

pub async fn post_message<S>(
    store: &S,
    member_id: Uuid,
    class_id: i64,
    req: MessageRequest,
) -> AppResult<ChatMessage>
where
    S: MemberStore + ClassStore + ?Sized,
{
    if req.content.trim().is_empty() {
        return Err(AppError::bad_request("message content is empty"));
    }
    let member = require_member(store, member_id).await?;
    let room = require_room(store, class_id).await?;
    let msg = store
        .insert_message(NewMessage {
            room_id: room.id,
            sender_id: member.id,
            content: req.content,
        })
        .await?;
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::state::FakeRtc;
    use async_trait::async_trait;

    /// Wraps `FakeRtc` and refuses selected calls.
    #[derive(Default)]
    struct FlakyRtc {
        inner: FakeRtc,
        refuse_connections: bool,
        refuse_close: bool,
    }

    #[async_trait]
    impl RtcProvider for FlakyRtc {
        async fn create_session(&self) -> anyhow::Result<String> {
            self.inner.create_session().await
        }
        async fn create_connection(&self, session_id: &str) -> anyhow::Result<String> {
            if self.refuse_connections {
                anyhow::bail!("connection refused for {}", session_id);
            }
            self.inner.create_connection(session_id).await
        }
        async fn close_session(&self, session_id: &str) -> anyhow::Result<()> {
            if self.refuse_close {
                anyhow::bail!("close refused for {}", session_id);
            }
            self.inner.close_session(session_id).await
        }
    }

    fn room_req(name: &str) -> RoomRequest {
        RoomRequest {
            class_name: name.into(),
            recipe_name: "kimchi stew".into(),
            recipe_ingredients: vec!["kimchi".into(), "pork".into()],
            recipe_content: "boil everything".into(),
        }
    }

    #[tokio::test]
    async fn create_then_list_and_read_recipe() {
        let store = MemoryStore::default();
        let rtc = FakeRtc::default();
        let host = store.seed_member("host@example.com", "host");

        assert!(list_rooms(&store).await.unwrap().empty);

        let created = create_room(&store, &rtc, host, room_req("stew night")).await.unwrap();
        assert!(!created.token.is_empty());
        assert_eq!(rtc.open_sessions(), vec![created.session_id.clone()]);

        let list = list_rooms(&store).await.unwrap();
        assert!(!list.empty);
        assert_eq!(list.rooms[0].class_name, "stew night");

        let recipe = room_recipe(&store, created.class_id).await.unwrap();
        assert_eq!(recipe.recipe_ingredients, vec!["kimchi", "pork"]);
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let store = MemoryStore::default();
        let rtc = FakeRtc::default();
        let host = store.seed_member("host@example.com", "host");
        let err = create_room(&store, &rtc, host, room_req("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(rtc.open_sessions().is_empty());
    }

    #[tokio::test]
    async fn enter_returns_prior_messages_in_order() {
        let store = MemoryStore::default();
        let rtc = FakeRtc::default();
        let host = store.seed_member("host@example.com", "host");
        let guest = store.seed_member("guest@example.com", "guest");
        let created = create_room(&store, &rtc, host, room_req("bread")).await.unwrap();

        for text in ["hello", "flour ready"] {
            post_message(&store, host, created.class_id, MessageRequest { content: text.into() })
                .await
                .unwrap();
        }

        let entered = enter_room(&store, &rtc, guest, created.class_id).await.unwrap();
        let texts: Vec<_> = entered.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, ["hello", "flour ready"]);
        assert_eq!(entered.session_id, created.session_id);
    }

    #[tokio::test]
    async fn enter_unknown_room_is_not_found() {
        let store = MemoryStore::default();
        let rtc = FakeRtc::default();
        let guest = store.seed_member("guest@example.com", "guest");
        let err = enter_room(&store, &rtc, guest, 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_host_can_close() {
        let store = MemoryStore::default();
        let rtc = FakeRtc::default();
        let host = store.seed_member("host@example.com", "host");
        let guest = store.seed_member("guest@example.com", "guest");
        let created = create_room(&store, &rtc, host, room_req("pasta")).await.unwrap();
        post_message(&store, guest, created.class_id, MessageRequest { content: "hi".into() })
            .await
            .unwrap();

        let err = close_room(&store, &rtc, guest, created.class_id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        close_room(&store, &rtc, host, created.class_id).await.unwrap();
        assert!(rtc.open_sessions().is_empty());
        assert!(store.find_room(created.class_id).await.unwrap().is_none());
        assert!(store.list_messages(created.class_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_host_token_rolls_back_the_class() {
        let store = MemoryStore::default();
        let rtc = FlakyRtc {
            refuse_connections: true,
            ..Default::default()
        };
        let host = store.seed_member("host@example.com", "host");

        let err = create_room(&store, &rtc, host, room_req("ramen")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(list_rooms(&store).await.unwrap().empty);
        assert!(rtc.inner.open_sessions().is_empty());
    }

    #[tokio::test]
    async fn close_removes_the_class_even_if_the_provider_refuses() {
        let store = MemoryStore::default();
        let rtc = FlakyRtc {
            refuse_close: true,
            ..Default::default()
        };
        let host = store.seed_member("host@example.com", "host");
        let created = create_room(&store, &rtc, host, room_req("tteok")).await.unwrap();

        close_room(&store, &rtc, host, created.class_id).await.unwrap();
        assert!(store.find_room(created.class_id).await.unwrap().is_none());
        assert_eq!(rtc.inner.open_sessions(), vec![created.session_id]);
    }
}
