//! Check-in acceptance tests: streaks, point awards, milestone bonuses and
//! the one-completed-check-in-per-day guard.

use chrono::NaiveDate;
use habithero::db;
use habithero::domain::DomainError;
use habithero::domain::progression::title_for_points;
use habithero::models::{check_in, habit, user};
use habithero::services::checkin_service::{self, record_check_in};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_user(db: &DatabaseConnection, username: &str, points: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set("$argon2id$dummy".to_string()),
        points: Set(points),
        title: Set(title_for_points(points).to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = user::Entity::insert(user)
        .exec(db)
        .await
        .expect("Failed to create user");
    res.last_insert_id
}

async fn create_test_habit(db: &DatabaseConnection, user_id: i32, name: &str, streak: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let habit = habit::ActiveModel {
        name: Set(name.to_string()),
        habit_type: Set("physical".to_string()),
        user_id: Set(user_id),
        streak: Set(streak),
        total_days: Set(streak),
        frequency: Set("daily".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = habit::Entity::insert(habit)
        .exec(db)
        .await
        .expect("Failed to create habit");
    res.last_insert_id
}

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, n).expect("valid date")
}

fn dto(habit_id: i32, user_id: i32, completed: bool) -> check_in::CheckInDto {
    check_in::CheckInDto {
        habit_id,
        user_id,
        completed,
    }
}

#[tokio::test]
async fn first_check_in_awards_completion_points() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "fresh", 0).await;
    let habit_id = create_test_habit(&db, user_id, "Morning run", 0).await;

    let outcome = record_check_in(&db, dto(habit_id, user_id, true), day(1))
        .await
        .expect("check-in should be accepted");

    assert_eq!(outcome.user.points, 10);
    assert_eq!(outcome.user.title, "New Explorer");
    assert_eq!(outcome.next_title, Some("Habit Scout"));
    assert_eq!(outcome.points_to_next_title, 40);
    assert_eq!(outcome.habit.streak, 1);
    assert_eq!(outcome.habit.total_days, 1);
    assert!(outcome.check_in.completed);
    assert_eq!(outcome.check_in.date, "2026-01-01");
}

#[tokio::test]
async fn duplicate_same_day_check_in_is_rejected() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "dupe", 0).await;
    let habit_id = create_test_habit(&db, user_id, "Meditate", 0).await;

    record_check_in(&db, dto(habit_id, user_id, true), day(1))
        .await
        .expect("first check-in should succeed");

    let err = record_check_in(&db, dto(habit_id, user_id, true), day(1))
        .await
        .expect_err("second check-in on the same day must fail");
    assert!(matches!(err, DomainError::AlreadyCheckedIn));

    // No double-counting: one record, points unchanged
    let count = check_in::Entity::find()
        .filter(check_in::Column::HabitId.eq(habit_id))
        .count(&db)
        .await
        .expect("count check-ins");
    assert_eq!(count, 1);

    let user = user::Entity::find_by_id(user_id)
        .one(&db)
        .await
        .expect("query user")
        .expect("user exists");
    assert_eq!(user.points, 10);

    let habit = habit::Entity::find_by_id(habit_id)
        .one(&db)
        .await
        .expect("query habit")
        .expect("habit exists");
    assert_eq!(habit.streak, 1);
}

#[tokio::test]
async fn five_check_ins_earn_the_streak_bonus() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "streaker", 0).await;
    let habit_id = create_test_habit(&db, user_id, "Read", 0).await;

    let mut last = None;
    for d in 1..=5 {
        last = Some(
            record_check_in(&db, dto(habit_id, user_id, true), day(d))
                .await
                .expect("check-in should be accepted"),
        );
    }

    // 5 completions x 10 + 1 milestone bonus = 55
    let outcome = last.expect("at least one outcome");
    assert_eq!(outcome.user.points, 55);
    assert_eq!(outcome.user.title, "Habit Scout");
    assert_eq!(outcome.habit.streak, 5);
    assert_eq!(outcome.habit.total_days, 5);
    assert_eq!(outcome.next_title, Some("Consistency Captain"));
    assert_eq!(outcome.points_to_next_title, 45);
}

#[tokio::test]
async fn milestone_check_in_can_reach_the_max_title() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "almost_zen", 695).await;
    let habit_id = create_test_habit(&db, user_id, "Yoga", 4).await;

    let outcome = record_check_in(&db, dto(habit_id, user_id, true), day(1))
        .await
        .expect("check-in should be accepted");

    // 695 + 10 completion + 5 bonus (streak hits 5) = 710
    assert_eq!(outcome.user.points, 710);
    assert_eq!(outcome.user.title, "Zen Legend");
    assert_eq!(outcome.next_title, None);
    assert_eq!(outcome.points_to_next_title, 0);
}

#[tokio::test]
async fn incomplete_check_in_has_no_side_effects() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "skipper", 0).await;
    let habit_id = create_test_habit(&db, user_id, "Journal", 2).await;

    let outcome = record_check_in(&db, dto(habit_id, user_id, false), day(1))
        .await
        .expect("incomplete check-in is still recorded");

    assert!(!outcome.check_in.completed);
    assert_eq!(outcome.user.points, 0);
    assert_eq!(outcome.habit.streak, 2);
    assert_eq!(outcome.habit.total_days, 2);

    // An incomplete record does not block completing the habit later the same day
    let outcome = record_check_in(&db, dto(habit_id, user_id, true), day(1))
        .await
        .expect("completed check-in after an incomplete one should succeed");
    assert_eq!(outcome.user.points, 10);
    assert_eq!(outcome.habit.streak, 3);
}

#[tokio::test]
async fn unknown_habit_or_user_is_rejected() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "lonely", 0).await;
    let habit_id = create_test_habit(&db, user_id, "Draw", 0).await;

    let err = record_check_in(&db, dto(9999, user_id, true), day(1))
        .await
        .expect_err("missing habit must fail");
    assert!(matches!(err, DomainError::HabitNotFound));

    let err = record_check_in(&db, dto(habit_id, 9999, true), day(1))
        .await
        .expect_err("missing user must fail");
    assert!(matches!(err, DomainError::UserNotFound));
}

#[tokio::test]
async fn habits_accumulate_points_independently() {
    let db = setup_test_db().await;
    let user_id = create_test_user(&db, "busy", 0).await;
    let run = create_test_habit(&db, user_id, "Run", 0).await;
    let read = create_test_habit(&db, user_id, "Read", 0).await;

    record_check_in(&db, dto(run, user_id, true), day(1))
        .await
        .expect("first habit check-in");
    let outcome = record_check_in(&db, dto(read, user_id, true), day(1))
        .await
        .expect("second habit same day should succeed");

    assert_eq!(outcome.user.points, 20);

    let run_habit = habit::Entity::find_by_id(run)
        .one(&db)
        .await
        .expect("query habit")
        .expect("habit exists");
    assert_eq!(run_habit.streak, 1);
    assert_eq!(outcome.habit.streak, 1);
}

#[tokio::test]
async fn listings_filter_by_user_and_habit() {
    let db = setup_test_db().await;
    let alice = create_test_user(&db, "alice", 0).await;
    let bob = create_test_user(&db, "bob", 0).await;
    let alice_habit = create_test_habit(&db, alice, "Swim", 0).await;
    let bob_habit = create_test_habit(&db, bob, "Box", 0).await;

    record_check_in(&db, dto(alice_habit, alice, true), day(1))
        .await
        .expect("check-in");
    record_check_in(&db, dto(alice_habit, alice, true), day(2))
        .await
        .expect("check-in");
    record_check_in(&db, dto(bob_habit, bob, true), day(1))
        .await
        .expect("check-in");

    let alice_check_ins = checkin_service::list_by_user(&db, alice)
        .await
        .expect("list by user");
    assert_eq!(alice_check_ins.len(), 2);
    assert!(alice_check_ins.iter().all(|c| c.user_id == alice));

    let bob_check_ins = checkin_service::list_by_habit(&db, bob_habit)
        .await
        .expect("list by habit");
    assert_eq!(bob_check_ins.len(), 1);
    assert_eq!(bob_check_ins[0].habit_id, bob_habit);
}
