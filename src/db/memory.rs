use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::MemberStore;
use crate::auth::repo_types::Member;
use crate::classes::repo::ClassStore;
use crate::classes::repo_types::{ChatMessage, NewMessage, NewRoom, Room};
use crate::ingredients::repo::IngredientStore;
use crate::ingredients::repo_types::{
    FoodCategory, Ingredient, NewMyIngredient, OwnedIngredient, StorageKind,
};

#[derive(Default)]
struct Tables {
    members: Vec<Member>,
    ingredients: Vec<Ingredient>,
    my_ingredients: Vec<MyIngredientRow>,
    rooms: Vec<Room>,
    messages: Vec<ChatMessage>,
    next_id: i64,
}

struct MyIngredientRow {
    id: i64,
    data: NewMyIngredient,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owned(&self, row: &MyIngredientRow) -> anyhow::Result<OwnedIngredient> {
        let ingredient = self
            .ingredients
            .iter()
            .find(|i| i.id == row.data.ingredient_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("dangling ingredient {}", row.data.ingredient_id))?;
        Ok(OwnedIngredient {
            id: row.id,
            member_id: row.data.member_id,
            ingredient,
            storage: row.data.storage,
            in_date: row.data.in_date,
            exp_date: row.data.exp_date,
        })
    }
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Create a member row on first sight of a token subject.
    provision_members: bool,
}

const DEMO_CATALOG: &[(&str, FoodCategory)] = &[
    ("rice", FoodCategory::Grains),
    ("potato", FoodCategory::Starch),
    ("cabbage", FoodCategory::Vegetables),
    ("green onion", FoodCategory::Vegetables),
    ("shiitake", FoodCategory::Mushrooms),
    ("apple", FoodCategory::Fruits),
    ("tofu", FoodCategory::Legumes),
    ("egg", FoodCategory::Eggs),
    ("pork belly", FoodCategory::Meat),
    ("mackerel", FoodCategory::Seafood),
    ("laver", FoodCategory::Seaweed),
    ("milk", FoodCategory::Dairy),
    ("soy sauce", FoodCategory::Seasonings),
    ("green tea", FoodCategory::Tea),
];

impl MemoryStore {
    /// Store for running without Postgres: demo catalog, members provisioned on demand.
    pub fn dev() -> Self {
        let store = Self {
            tables: Mutex::default(),
            provision_members: true,
        };
        for (name, category) in DEMO_CATALOG {
            store.seed_ingredient(name, *category);
        }
        store
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn seed_ingredient(&self, food_name: &str, food_category: FoodCategory) -> i64 {
        let mut t = self.tables();
        let id = t.next_id();
        t.ingredients.push(Ingredient {
            id,
            food_name: food_name.to_string(),
            food_category,
        });
        id
    }

    #[cfg(test)]
    pub fn seed_member(&self, email: &str, nickname: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables().members.push(Member {
            id,
            email: email.to_string(),
            nickname: nickname.to_string(),
            created_at: OffsetDateTime::now_utc(),
        });
        id
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn find_member(&self, id: Uuid) -> anyhow::Result<Option<Member>> {
        let mut t = self.tables();
        if let Some(m) = t.members.iter().find(|m| m.id == id) {
            return Ok(Some(m.clone()));
        }
        if !self.provision_members {
            return Ok(None);
        }
        let member = Member {
            id,
            email: format!("{}@dev.local", id.simple()),
            nickname: "dev".to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.members.push(member.clone());
        Ok(Some(member))
    }
}

#[async_trait]
impl IngredientStore for MemoryStore {
    async fn search_ingredients(&self, fragment: &str) -> anyhow::Result<Vec<Ingredient>> {
        let needle = fragment.to_lowercase();
        let t = self.tables();
        Ok(t.ingredients
            .iter()
            .filter(|i| i.food_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_ingredient(&self, id: i64) -> anyhow::Result<Option<Ingredient>> {
        Ok(self.tables().ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn insert_my_ingredient(&self, new: NewMyIngredient) -> anyhow::Result<i64> {
        let mut t = self.tables();
        let id = t.next_id();
        t.my_ingredients.push(MyIngredientRow { id, data: new });
        Ok(id)
    }

    async fn list_my_ingredients(
        &self,
        member_id: Uuid,
        storage: Option<StorageKind>,
    ) -> anyhow::Result<Vec<OwnedIngredient>> {
        let t = self.tables();
        t.my_ingredients
            .iter()
            .filter(|r| r.data.member_id == member_id)
            .filter(|r| storage.map_or(true, |s| r.data.storage == s))
            .map(|r| t.owned(r))
            .collect()
    }

    async fn find_my_ingredient(&self, id: i64) -> anyhow::Result<Option<OwnedIngredient>> {
        let t = self.tables();
        t.my_ingredients
            .iter()
            .find(|r| r.id == id)
            .map(|r| t.owned(r))
            .transpose()
    }

    async fn delete_my_ingredient(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.tables();
        let before = t.my_ingredients.len();
        t.my_ingredients.retain(|r| r.id != id);
        Ok(t.my_ingredients.len() != before)
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn list_rooms(&self) -> anyhow::Result<Vec<Room>> {
        let mut rooms = self.tables().rooms.clone();
        rooms.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rooms)
    }

    async fn insert_room(&self, new: NewRoom) -> anyhow::Result<Room> {
        let mut t = self.tables();
        let room = Room {
            id: t.next_id(),
            host_id: new.host_id,
            title: new.title,
            session_id: new.session_id,
            recipe_name: new.recipe_name,
            recipe_ingredients: new.recipe_ingredients,
            recipe_content: new.recipe_content,
            created_at: OffsetDateTime::now_utc(),
        };
        t.rooms.push(room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: i64) -> anyhow::Result<Option<Room>> {
        Ok(self.tables().rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_room(&self, id: i64) -> anyhow::Result<bool> {
        let mut t = self.tables();
        t.messages.retain(|m| m.room_id != id);
        let before = t.rooms.len();
        t.rooms.retain(|r| r.id != id);
        Ok(t.rooms.len() != before)
    }

    async fn list_messages(&self, room_id: i64) -> anyhow::Result<Vec<ChatMessage>> {
        // insertion order is id order
        Ok(self
            .tables()
            .messages
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn insert_message(&self, new: NewMessage) -> anyhow::Result<ChatMessage> {
        let mut t = self.tables();
        let msg = ChatMessage {
            id: t.next_id(),
            room_id: new.room_id,
            sender_id: new.sender_id,
            content: new.content,
            created_at: OffsetDateTime::now_utc(),
        };
        t.messages.push(msg.clone());
        Ok(msg)
    }
}
