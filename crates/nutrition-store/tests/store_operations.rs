use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use nutrition_store::{
    estimate_for_user, ActivityLevel, FixedClock, Food, FoodLogStatus, FoodLogUpdate, Goal,
    Macros, Micro, NewFoodLog, NewMessage, NewUser, ProfileUpdate, Sex, StoreError,
    UserRepository, UserStore, MessageContent, recent_messages,
};

const PHONE: &str = "5491187654321";

fn full_profile() -> ProfileUpdate {
    ProfileUpdate {
        age: Some(28),
        name: Some("Lucía".to_string()),
        goal: Some(vec![Goal::LoseWeight]),
        sex: Some(Sex::Female),
        height: Some(165.0),
        weight: Some(60.0),
        physical_activity_level: Some(ActivityLevel::Sedentary),
        dietary_restrictions: Some(vec![]),
        diseases: Some(vec!["celiaquía".to_string()]),
    }
}

#[tokio::test]
async fn update_user_is_idempotent() {
    let store = UserStore::new();
    store.create_user_from_number(PHONE).await.unwrap();

    let once = store.update_user(PHONE, full_profile()).await.unwrap();
    let twice = store.update_user(PHONE, full_profile()).await.unwrap();

    assert_eq!(once, twice);
    assert!(twice.is_complete());
}

#[tokio::test]
async fn create_user_reports_every_invalid_field() {
    let store = UserStore::new();
    let new_user = NewUser {
        phone_number: "12".to_string(),
        profile: ProfileUpdate {
            age: Some(0),
            height: Some(-1.0),
            dietary_restrictions: Some(vec!["".to_string()]),
            ..Default::default()
        },
    };

    match store.create_user(new_user).await {
        Err(StoreError::Validation(err)) => {
            assert_eq!(
                err.paths(),
                vec!["phoneNumber", "age", "height", "dietaryRestrictions.0"]
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn create_user_overwrites_existing_phone() {
    let store = UserStore::new();
    store.create_user_from_number(PHONE).await.unwrap();
    store
        .add_food_log(PHONE, NewFoodLog::pending("arroz", Macros::new(4.0, 45.0, 0.5)))
        .await
        .unwrap();

    let replaced = store
        .create_user(NewUser {
            phone_number: PHONE.to_string(),
            profile: full_profile(),
        })
        .await
        .unwrap();

    assert!(replaced.food_logs.is_empty());
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn adding_foods_recomputes_totals() {
    let store = UserStore::new();
    store.create_user_from_number(PHONE).await.unwrap();
    let log = store
        .add_food_log(PHONE, NewFoodLog::pending("desayuno", Macros::default()))
        .await
        .unwrap();

    store
        .add_food_to_food_log(
            PHONE,
            &log.id,
            Food {
                description: "yogur".to_string(),
                macros: Macros::new(5.0, 8.0, 3.0),
                micros: vec![Micro::new("Calcium", 100.0)],
            },
        )
        .await
        .unwrap();
    let updated = store
        .add_food_to_food_log(
            PHONE,
            &log.id,
            Food {
                description: "naranja".to_string(),
                macros: Macros::new(1.0, 12.0, 0.0),
                micros: vec![Micro::new("Calcium", 50.0), Micro::new("VitaminC", 20.0)],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.foods.len(), 2);
    assert_eq!(updated.total_macros, Macros::new(6.0, 20.0, 3.0));
    assert_eq!(
        updated.total_micros,
        vec![Micro::new("Calcium", 150.0), Micro::new("VitaminC", 20.0)]
    );

    let bad = Food {
        description: " ".to_string(),
        macros: Macros::default(),
        micros: vec![],
    };
    assert!(matches!(
        store.add_food_to_food_log(PHONE, &log.id, bad).await,
        Err(StoreError::Validation(_))
    ));
}

#[tokio::test]
async fn confirming_one_entry_leaves_the_rest_pending() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
    ));
    let store = UserStore::with_clock(clock.clone());
    store.create_user_from_number(PHONE).await.unwrap();

    let older = store
        .add_food_log(PHONE, NewFoodLog::pending("tostadas", Macros::new(6.0, 30.0, 2.0)))
        .await
        .unwrap();
    clock.advance(Duration::minutes(3));
    let newer = store
        .add_food_log(PHONE, NewFoodLog::pending("café con leche", Macros::new(4.0, 6.0, 4.0)))
        .await
        .unwrap();

    let pending = store.last_pending_food_log(PHONE).await.unwrap();
    let validated = store
        .update_food_log(PHONE, &pending.id, FoodLogUpdate::validate_entry())
        .await
        .unwrap();

    assert_eq!(validated.id, newer.id);
    assert_eq!(validated.status, FoodLogStatus::Validated);
    let logs = store.food_logs(PHONE).await;
    assert_eq!(logs[0].id, older.id);
    assert_eq!(logs[0].status, FoodLogStatus::Pending);

    store.delete_food_log(PHONE, &older.id).await.unwrap();
    assert!(store.last_pending_food_log(PHONE).await.is_none());
}

#[tokio::test]
async fn window_follows_store_clock() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
    ));
    let store = UserStore::with_clock(clock.clone());
    store.create_user_from_number(PHONE).await.unwrap();

    for (text, gap) in [("hace rato", 0), ("hace poco", 6), ("recién", 3)] {
        clock.advance(Duration::minutes(gap));
        store
            .add_message(PHONE, NewMessage::from_user(MessageContent::text(text)))
            .await
            .unwrap();
    }

    let user = store.get_user(PHONE).await.unwrap();
    let texts: Vec<_> = recent_messages(&user, store.now())
        .into_iter()
        .filter_map(|m| m.content.text)
        .collect();
    assert_eq!(texts, vec!["hace poco", "recién"]);
}

#[tokio::test]
async fn estimate_from_completed_profile() {
    let store = UserStore::new();
    store.create_user_from_number(PHONE).await.unwrap();
    let user = store.update_user(PHONE, full_profile()).await.unwrap();

    let estimate = estimate_for_user(&user, false).unwrap();
    let target = estimate.target_for(user.goals());
    assert_eq!(target, 1659 - 500);

    store.set_daily_target(PHONE, target).await;
    assert_eq!(store.daily_target(PHONE).await.unwrap().daily_calories, 1159);
}
