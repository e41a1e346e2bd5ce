use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::repo::{require_member, MemberStore};
use crate::dates::{days_between, parse_iso};
use crate::error::{AppError, AppResult};
use crate::ingredients::dto::{
    AddIngredientRequest, AutoIngredientResponse, CategoryResponse, FridgeStatusResponse,
    IngredientResponse, ListTotalMyIngredients, MyIngredientResponse, StorageResponse,
    TotalIngredientResponse, TotalMyIngredient, WarningResponse,
};
use crate::ingredients::repo::IngredientStore;
use crate::ingredients::repo_types::{NewMyIngredient, OwnedIngredient, StorageKind};
use crate::ingredients::summary;

pub const AUTOCOMPLETE_LIMIT: usize = 5;
/// Records expiring in fewer days than this land in the hurry list.
pub const HURRY_DAYS: i64 = 5;

/// Days from `today` until `exp_date`; negative once expired.
pub fn d_day(exp_date: Date, today: Date) -> i64 {
    days_between(today, exp_date)
}

/// `D-n` while n days remain, `D+n` when expired n days ago.
pub fn d_day_label(diff: i64) -> String {
    if diff < 0 {
        format!("D+{}", -diff)
    } else {
        format!("D-{}", diff)
    }
}

fn to_response(r: &OwnedIngredient, diff: i64) -> MyIngredientResponse {
    MyIngredientResponse {
        id: r.id,
        food_name: r.ingredient.food_name.clone(),
        group_name: r.ingredient.food_category,
        in_date: r.in_date,
        d_date: d_day_label(diff),
    }
}

pub fn storage_view(records: &[OwnedIngredient], today: Date) -> StorageResponse {
    StorageResponse {
        storage: records
            .iter()
            .map(|r| to_response(r, d_day(r.exp_date, today)))
            .collect(),
    }
}

pub fn total_view(records: &[OwnedIngredient], today: Date) -> ListTotalMyIngredients {
    let storage: Vec<TotalMyIngredient> = records
        .iter()
        .map(|r| TotalMyIngredient {
            id: r.id,
            food_name: r.ingredient.food_name.clone(),
            group_name: r.ingredient.food_category,
            in_date: r.in_date,
            d_date: d_day_label(d_day(r.exp_date, today)),
            category: r.storage,
        })
        .collect();
    ListTotalMyIngredients {
        ingredients_num: storage.len(),
        storage,
    }
}

/// Splits records into expired and expiring-soon lists; the rest are dropped.
pub fn warning_view(records: &[OwnedIngredient], today: Date) -> WarningResponse {
    let mut out_dated = Vec::new();
    let mut in_hurry = Vec::new();
    for r in records {
        let diff = d_day(r.exp_date, today);
        if diff < 0 {
            out_dated.push(to_response(r, diff));
        } else if diff < HURRY_DAYS {
            in_hurry.push(to_response(r, diff));
        }
    }
    WarningResponse {
        out_dated_num: out_dated.len(),
        in_hurry_num: in_hurry.len(),
        out_dated,
        in_hurry,
    }
}

pub fn parse_storage_filter(raw: &str) -> AppResult<Option<StorageKind>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.to_ascii_lowercase()
        .parse()
        .map(Some)
        .map_err(|_| AppError::bad_request(format!("unknown storage: {}", raw)))
}

// ---- store-backed operations ----

pub async fn autocomplete<S>(store: &S, food_name: &str) -> AppResult<AutoIngredientResponse>
where
    S: IngredientStore + ?Sized,
{
    let matches = store.search_ingredients(food_name).await?;
    Ok(AutoIngredientResponse {
        auto_complete: matches
            .into_iter()
            .take(AUTOCOMPLETE_LIMIT)
            .map(IngredientResponse::from)
            .collect(),
    })
}

pub async fn search<S>(store: &S, food_name: &str) -> AppResult<TotalIngredientResponse>
where
    S: IngredientStore + ?Sized,
{
    let search_list: Vec<IngredientResponse> = store
        .search_ingredients(food_name)
        .await?
        .into_iter()
        .map(IngredientResponse::from)
        .collect();
    Ok(TotalIngredientResponse {
        total_count: search_list.len(),
        search_list,
    })
}

pub async fn add_my_ingredient<S>(
    store: &S,
    member_id: Uuid,
    req: AddIngredientRequest,
) -> AppResult<i64>
where
    S: MemberStore + IngredientStore + ?Sized,
{
    let member = require_member(store, member_id).await?;
    let ingredient = store
        .find_ingredient(req.id)
        .await?
        .ok_or_else(|| AppError::not_found("ingredient not found"))?;

    let in_date = parse_iso(&req.in_date)
        .map_err(|_| AppError::bad_request(format!("invalid in_date: {}", req.in_date)))?;
    let exp_date = parse_iso(&req.exp_date)
        .map_err(|_| AppError::bad_request(format!("invalid exp_date: {}", req.exp_date)))?;

    let id = store
        .insert_my_ingredient(NewMyIngredient {
            member_id: member.id,
            ingredient_id: ingredient.id,
            storage: req.storage,
            in_date,
            exp_date,
        })
        .await?;
    info!(member_id = %member.id, ingredient_id = ingredient.id, my_ingredient_id = id, "ingredient stored");
    Ok(id)
}

pub async fn owned_records<S>(
    store: &S,
    member_id: Uuid,
    storage: Option<StorageKind>,
) -> AppResult<Vec<OwnedIngredient>>
where
    S: MemberStore + IngredientStore + ?Sized,
{
    let member = require_member(store, member_id).await?;
    Ok(store.list_my_ingredients(member.id, storage).await?)
}

pub async fn fridge_status<S>(store: &S, member_id: Uuid) -> AppResult<FridgeStatusResponse>
where
    S: MemberStore + IngredientStore + ?Sized,
{
    let records = owned_records(store, member_id, None).await?;
    summary::fridge_status(&records)
}

pub async fn category_breakdown<S>(store: &S, member_id: Uuid) -> AppResult<CategoryResponse>
where
    S: MemberStore + IngredientStore + ?Sized,
{
    let records = owned_records(store, member_id, None).await?;
    summary::category_breakdown(&records)
}

pub async fn delete_my_ingredient<S>(store: &S, member_id: Uuid, id: i64) -> AppResult<()>
where
    S: MemberStore + IngredientStore + ?Sized,
{
    let member = require_member(store, member_id).await?;
    let record = store
        .find_my_ingredient(id)
        .await?
        .ok_or_else(|| AppError::not_found("ingredient already deleted"))?;

    if record.member_id != member.id {
        warn!(member_id = %member.id, owner_id = %record.member_id, my_ingredient_id = id, "delete of foreign ingredient refused");
        return Err(AppError::forbidden("cannot delete another member's ingredient"));
    }

    if !store.delete_my_ingredient(id).await? {
        return Err(AppError::not_found("ingredient already deleted"));
    }
    info!(member_id = %member.id, my_ingredient_id = id, "ingredient deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::ingredients::repo_types::{FoodCategory, Ingredient};
    use time::macros::date;

    fn record(id: i64, exp_date: Date) -> OwnedIngredient {
        OwnedIngredient {
            id,
            member_id: Uuid::nil(),
            ingredient: Ingredient {
                id,
                food_name: format!("item-{id}"),
                food_category: FoodCategory::Vegetables,
            },
            storage: StorageKind::Refrigerator,
            in_date: date!(2023 - 12 - 20),
            exp_date,
        }
    }

    fn seeded() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::default();
        let alice = store.seed_member("alice@example.com", "alice");
        let bob = store.seed_member("bob@example.com", "bob");
        for (name, cat) in [
            ("egg", FoodCategory::Eggs),
            ("egg yolk", FoodCategory::Eggs),
            ("eggplant", FoodCategory::Vegetables),
            ("quail egg", FoodCategory::Eggs),
            ("duck egg", FoodCategory::Eggs),
            ("egg noodle", FoodCategory::Processed),
            ("milk", FoodCategory::Dairy),
        ] {
            store.seed_ingredient(name, cat);
        }
        (store, alice, bob)
    }

    fn add_req(id: i64, storage: StorageKind, exp: &str) -> AddIngredientRequest {
        AddIngredientRequest {
            id,
            storage,
            in_date: "2024-01-01".into(),
            exp_date: exp.into(),
        }
    }

    #[test]
    fn label_sign_convention() {
        assert_eq!(d_day_label(0), "D-0");
        assert_eq!(d_day_label(7), "D-7");
        assert_eq!(d_day_label(-4), "D+4");
    }

    #[test]
    fn diff_five_is_excluded_from_both_lists() {
        let view = warning_view(&[record(1, date!(2024 - 01 - 10))], date!(2024 - 01 - 05));
        assert_eq!(view.out_dated_num, 0);
        assert_eq!(view.in_hurry_num, 0);
    }

    #[test]
    fn diff_two_is_in_hurry() {
        let view = warning_view(&[record(1, date!(2024 - 01 - 10))], date!(2024 - 01 - 08));
        assert_eq!(view.in_hurry_num, 1);
        assert_eq!(view.in_hurry[0].d_date, "D-2");
        assert!(view.out_dated.is_empty());
    }

    #[test]
    fn expired_record_is_overdue() {
        let view = warning_view(&[record(1, date!(2024 - 01 - 01))], date!(2024 - 01 - 05));
        assert_eq!(view.out_dated_num, 1);
        assert_eq!(view.out_dated[0].d_date, "D+4");
        assert!(view.in_hurry.is_empty());
    }

    #[test]
    fn warning_partition_matches_diff_ranges() {
        let today = date!(2024 - 03 - 10);
        let records: Vec<_> = (-3..=8)
            .map(|d| record(d + 100, today + time::Duration::days(d)))
            .collect();
        let view = warning_view(&records, today);
        assert_eq!(view.out_dated_num, 3);
        assert_eq!(view.in_hurry_num, 5);
        let labels: Vec<_> = view.in_hurry.iter().map(|r| r.d_date.as_str()).collect();
        assert_eq!(labels, ["D-0", "D-1", "D-2", "D-3", "D-4"]);
    }

    #[test]
    fn storage_view_labels_every_record() {
        let today = date!(2024 - 01 - 05);
        let view = storage_view(
            &[record(1, date!(2024 - 01 - 01)), record(2, date!(2024 - 01 - 30))],
            today,
        );
        let labels: Vec<_> = view.storage.iter().map(|r| r.d_date.as_str()).collect();
        assert_eq!(labels, ["D+4", "D-25"]);
    }

    #[test]
    fn storage_filter_parsing() {
        assert_eq!(parse_storage_filter("").unwrap(), None);
        assert_eq!(parse_storage_filter("Freezer").unwrap(), Some(StorageKind::Freezer));
        assert!(matches!(parse_storage_filter("garage"), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn autocomplete_is_capped_at_five() {
        let (store, _, _) = seeded();
        let auto = autocomplete(&store, "egg").await.unwrap();
        assert_eq!(auto.auto_complete.len(), AUTOCOMPLETE_LIMIT);
        let full = search(&store, "egg").await.unwrap();
        assert_eq!(full.total_count, 6);
    }

    #[tokio::test]
    async fn autocomplete_with_few_matches_does_not_fail() {
        let (store, _, _) = seeded();
        let auto = autocomplete(&store, "milk").await.unwrap();
        assert_eq!(auto.auto_complete.len(), 1);
        let none = autocomplete(&store, "durian").await.unwrap();
        assert!(none.auto_complete.is_empty());
    }

    #[tokio::test]
    async fn add_rejects_unknown_ingredient() {
        let (store, alice, _) = seeded();
        let err = add_my_ingredient(&store, alice, add_req(999, StorageKind::Pantry, "2024-02-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_rejects_bad_dates() {
        let (store, alice, _) = seeded();
        let err = add_my_ingredient(&store, alice, add_req(1, StorageKind::Pantry, "2024/02/01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn add_rejects_unknown_member() {
        let (store, _, _) = seeded();
        let err = add_my_ingredient(&store, Uuid::new_v4(), add_req(1, StorageKind::Pantry, "2024-02-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_storage() {
        let (store, alice, bob) = seeded();
        add_my_ingredient(&store, alice, add_req(1, StorageKind::Refrigerator, "2024-02-01")).await.unwrap();
        add_my_ingredient(&store, alice, add_req(7, StorageKind::Freezer, "2024-02-01")).await.unwrap();
        add_my_ingredient(&store, bob, add_req(7, StorageKind::Freezer, "2024-02-01")).await.unwrap();

        let all = owned_records(&store, alice, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let frozen = owned_records(&store, alice, Some(StorageKind::Freezer)).await.unwrap();
        assert_eq!(frozen.len(), 1);
        assert_eq!(frozen[0].ingredient.food_name, "milk");
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let (store, alice, bob) = seeded();
        let id = add_my_ingredient(&store, alice, add_req(1, StorageKind::Pantry, "2024-02-01"))
            .await
            .unwrap();

        let err = delete_my_ingredient(&store, bob, id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(store.find_my_ingredient(id).await.unwrap().is_some());

        delete_my_ingredient(&store, alice, id).await.unwrap();
        assert!(store.find_my_ingredient(id).await.unwrap().is_none());

        let again = delete_my_ingredient(&store, alice, id).await.unwrap_err();
        assert!(matches!(again, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_breakdown_requires_records() {
        let (store, alice, _) = seeded();
        let err = category_breakdown(&store, alice).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        add_my_ingredient(&store, alice, add_req(1, StorageKind::Refrigerator, "2024-02-01")).await.unwrap();
        let breakdown = category_breakdown(&store, alice).await.unwrap();
        assert_eq!(breakdown.count, vec![0, 1, 0, 0, 0]);
    }
}
