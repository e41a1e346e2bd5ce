//! Aggregate views over a member's fridge: shelf-life status and category mix.

use crate::dates::days_between;
use crate::error::{AppError, AppResult};
use crate::ingredients::dto::{CategoryResponse, FridgeStatusResponse};
use crate::ingredients::repo_types::{FoodGroup, OwnedIngredient};

pub const MSG_GREAT: &str = "Your fridge is in great shape!";
pub const MSG_GOOD: &str = "Your fridge is in good condition.";
pub const MSG_ATTENTION: &str = "Your fridge could use a little more attention.";
pub const MSG_CARE: &str = "Your fridge needs some care!";
pub const MSG_EMPTY: &str = "Your fridge is empty.";
pub const MSG_DOMINANT: &str = "One kind of ingredient dominates your fridge.";

/// Shelf-life bucket of one record, from intake to expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfBucket {
    /// 0..=3 days
    Critical,
    /// 4..=5 days
    Hurry,
    /// more than 5 days
    Fine,
}

pub fn shelf_bucket(shelf_days: i64) -> Option<ShelfBucket> {
    match shelf_days {
        d if d < 0 => None,
        0..=3 => Some(ShelfBucket::Critical),
        4..=5 => Some(ShelfBucket::Hurry),
        _ => Some(ShelfBucket::Fine),
    }
}

pub fn fridge_status(records: &[OwnedIngredient]) -> AppResult<FridgeStatusResponse> {
    let (mut critical, mut hurry, mut fine) = (0usize, 0usize, 0usize);
    for r in records {
        let shelf = days_between(r.in_date, r.exp_date);
        match shelf_bucket(shelf) {
            Some(ShelfBucket::Critical) => critical += 1,
            Some(ShelfBucket::Hurry) => hurry += 1,
            Some(ShelfBucket::Fine) => fine += 1,
            None => {
                return Err(AppError::Invariant(format!(
                    "ingredient {} expires before it was stored",
                    r.id
                )))
            }
        }
    }

    Ok(FridgeStatusResponse {
        count: vec![hurry, critical, fine],
        status_msg: status_message(critical, hurry, fine).to_string(),
    })
}

fn status_message(critical: usize, hurry: usize, fine: usize) -> &'static str {
    let total = critical + hurry + fine;
    if total == 0 {
        return MSG_EMPTY;
    }
    let total = total as f64;
    let critical = critical as f64 / total;
    let hurry = hurry as f64 / total;
    let fine = fine as f64 / total;

    if fine >= 0.7 {
        MSG_GREAT
    } else if fine >= 0.4 && critical < 0.3 {
        MSG_GOOD
    } else if fine < 0.4 && hurry >= 0.7 {
        MSG_ATTENTION
    } else if critical >= fine {
        MSG_CARE
    } else {
        ""
    }
}

pub fn category_breakdown(records: &[OwnedIngredient]) -> AppResult<CategoryResponse> {
    if records.is_empty() {
        return Err(AppError::not_found("no ingredients registered"));
    }

    let mut count = vec![0usize; FoodGroup::ALL.len()];
    for r in records {
        count[r.ingredient.food_category.group().index()] += 1;
    }

    let total = records.len() as f64;
    let dominant = count.iter().any(|&n| n as f64 / total >= 0.7);

    Ok(CategoryResponse {
        count,
        status_msg: if dominant { MSG_DOMINANT } else { "" }.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredients::repo_types::{FoodCategory, Ingredient, StorageKind};
    use time::{macros::date, Date, Duration};
    use uuid::Uuid;

    fn owned(id: i64, category: FoodCategory, in_date: Date, shelf: i64) -> OwnedIngredient {
        OwnedIngredient {
            id,
            member_id: Uuid::nil(),
            ingredient: Ingredient {
                id,
                food_name: format!("item-{id}"),
                food_category: category,
            },
            storage: StorageKind::Refrigerator,
            in_date,
            exp_date: in_date + Duration::days(shelf),
        }
    }

    fn shelves(days: &[i64]) -> Vec<OwnedIngredient> {
        days.iter()
            .enumerate()
            .map(|(i, &d)| owned(i as i64, FoodCategory::Vegetables, date!(2024 - 01 - 01), d))
            .collect()
    }

    #[test]
    fn buckets_follow_day_thresholds() {
        assert_eq!(shelf_bucket(-1), None);
        assert_eq!(shelf_bucket(0), Some(ShelfBucket::Critical));
        assert_eq!(shelf_bucket(3), Some(ShelfBucket::Critical));
        assert_eq!(shelf_bucket(4), Some(ShelfBucket::Hurry));
        assert_eq!(shelf_bucket(5), Some(ShelfBucket::Hurry));
        assert_eq!(shelf_bucket(6), Some(ShelfBucket::Fine));
    }

    #[test]
    fn shelf_life_uses_calendar_days_across_months() {
        // 2024-01-30 -> 2024-02-02 is 3 days, not 20240202 - 20240130.
        let r = owned(1, FoodCategory::Meat, date!(2024 - 01 - 30), 3);
        let status = fridge_status(&[r]).unwrap();
        assert_eq!(status.count, vec![0, 1, 0]);
    }

    #[test]
    fn mostly_fine_fridge_is_great() {
        let status = fridge_status(&shelves(&[10, 10, 10, 10, 10, 10, 10, 1, 1, 4])).unwrap();
        assert_eq!(status.count, vec![1, 2, 7]);
        assert_eq!(status.status_msg, MSG_GREAT);
    }

    #[test]
    fn half_fine_with_few_critical_is_good() {
        let status = fridge_status(&shelves(&[10, 10, 4, 4, 1])).unwrap();
        assert_eq!(status.status_msg, MSG_GOOD);
    }

    #[test]
    fn hurry_heavy_fridge_needs_attention() {
        let status = fridge_status(&shelves(&[4, 4, 4, 5, 5, 5, 5, 10, 1, 1])).unwrap();
        assert_eq!(status.status_msg, MSG_ATTENTION);
    }

    #[test]
    fn critical_heavy_fridge_needs_care() {
        let status = fridge_status(&shelves(&[1, 2, 10])).unwrap();
        assert_eq!(status.status_msg, MSG_CARE);
    }

    #[test]
    fn empty_fridge_does_not_divide_by_zero() {
        let status = fridge_status(&[]).unwrap();
        assert_eq!(status.count, vec![0, 0, 0]);
        assert_eq!(status.status_msg, MSG_EMPTY);
    }

    #[test]
    fn negative_shelf_life_is_rejected() {
        let err = fridge_status(&shelves(&[10, -2])).unwrap_err();
        assert!(matches!(err, AppError::Invariant(_)));
    }

    #[test]
    fn category_counts_sum_to_total() {
        let day = date!(2024 - 01 - 01);
        let records = vec![
            owned(1, FoodCategory::Grains, day, 7),
            owned(2, FoodCategory::Meat, day, 7),
            owned(3, FoodCategory::Seafood, day, 7),
            owned(4, FoodCategory::Tea, day, 7),
            owned(5, FoodCategory::Oils, day, 7),
            owned(6, FoodCategory::Fruits, day, 7),
        ];
        let breakdown = category_breakdown(&records).unwrap();
        assert_eq!(breakdown.count, vec![2, 1, 1, 1, 1]);
        assert_eq!(breakdown.count.iter().sum::<usize>(), records.len());
        assert_eq!(breakdown.status_msg, "");
    }

    #[test]
    fn dominant_group_is_flagged() {
        let day = date!(2024 - 01 - 01);
        let records = vec![
            owned(1, FoodCategory::Grains, day, 7),
            owned(2, FoodCategory::Vegetables, day, 7),
            owned(3, FoodCategory::Mushrooms, day, 7),
            owned(4, FoodCategory::Dairy, day, 7),
        ];
        let breakdown = category_breakdown(&records).unwrap();
        assert_eq!(breakdown.count, vec![3, 0, 0, 0, 1]);
        assert_eq!(breakdown.status_msg, MSG_DOMINANT);
    }

    #[test]
    fn empty_category_set_is_not_found() {
        let err = category_breakdown(&[]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
