use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use super::StreakQueries;
use crate::application::test_support::{FixedClock, MockUserStreakRepository};
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{StreakEngine, UserStreak, UserStreakRepository};

/// Registers `user_id` and credits one post per day for `days` days ending 2024-03-14
async fn seed(repo: &MockUserStreakRepository, user_id: &str, days: i64, word_count: u64) {
    let first = Utc.with_ymd_and_hms(2024, 3, 14, 8, 0, 0).unwrap() - Duration::days(days - 1);
    let mut record = repo
        .create(&UserStreak::new(UserId::from_string(user_id), 3, first))
        .await
        .unwrap();
    for offset in 0..days {
        let (next, _) = StreakEngine::record_post(&record, first + Duration::days(offset), word_count);
        record = repo.save(&next).await.unwrap();
    }
}

fn queries(repo: Arc<MockUserStreakRepository>) -> StreakQueries {
    StreakQueries::new(repo, Arc::new(FixedClock::at(2024, 3, 14, 18)))
}

#[tokio::test]
async fn test_summary_projects_stored_record() {
    let repo = Arc::new(MockUserStreakRepository::new());
    seed(&repo, "writer", 5, 300).await;

    let summary = queries(repo).summary("writer").await.unwrap();

    assert_eq!(summary.current_streak, 5);
    assert_eq!(summary.longest_streak, 5);
    assert_eq!(summary.experience, 75);
    assert_eq!(summary.level, 1);
    assert_eq!(summary.next_level_xp, 100);
    assert!((summary.current_level_progress - 75.0).abs() < f64::EPSILON);
    // 2024-03-14 is a Thursday: Sunday the 10th through today
    assert_eq!(summary.weekly_progress, 5);
    assert_eq!(summary.streak_status, "getting-started");
    assert_eq!(summary.last_post_date.as_deref(), Some("2024-03-14"));
    assert_eq!(summary.streak_start_date.as_deref(), Some("2024-03-10"));
    assert_eq!(summary.freezes_remaining, 3);
}

#[tokio::test]
async fn test_summary_for_unknown_user_fails() {
    let repo = Arc::new(MockUserStreakRepository::new());

    let result = queries(repo).summary("ghost").await;

    assert!(matches!(result, Err(DomainError::UserNotFound(_))));
}

#[tokio::test]
async fn test_calendar_defaults_to_today() {
    let repo = Arc::new(MockUserStreakRepository::new());
    seed(&repo, "writer", 3, 0).await;

    let calendar = queries(repo).calendar("writer", None).await.unwrap();

    assert_eq!(calendar.days.len(), 365);
    assert_eq!(calendar.total_days, 365);
    assert_eq!(calendar.active_days, 3);
    assert_eq!(calendar.days.last().unwrap().date, "2024-03-14");
    assert_eq!(calendar.days.last().unwrap().streak_day, 3);
    assert_eq!(calendar.days.last().unwrap().level, 1);
}

#[tokio::test]
async fn test_calendar_with_reference_date() {
    let repo = Arc::new(MockUserStreakRepository::new());
    seed(&repo, "writer", 3, 0).await;

    let calendar = queries(repo)
        .calendar("writer", Some("2024-03-12"))
        .await
        .unwrap();

    assert_eq!(calendar.days.len(), 365);
    assert_eq!(calendar.days.last().unwrap().date, "2024-03-12");
    assert_eq!(calendar.active_days, 1);
}

#[tokio::test]
async fn test_calendar_rejects_bad_reference_date() {
    let repo = Arc::new(MockUserStreakRepository::new());
    seed(&repo, "writer", 1, 0).await;

    let result = queries(repo).calendar("writer", Some("14/03/2024")).await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[tokio::test]
async fn test_leaderboard_ordering_and_limit() {
    let repo = Arc::new(MockUserStreakRepository::new());
    seed(&repo, "carol", 2, 0).await;
    seed(&repo, "alice", 4, 0).await;
    seed(&repo, "bob", 2, 0).await;
    seed(&repo, "dave", 1, 0).await;

    let queries = queries(repo);

    let all = queries.leaderboard(None).await.unwrap();
    let order: Vec<&str> = all.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(order, vec!["alice", "bob", "carol", "dave"]);
    assert_eq!(all[0].rank, 1);
    assert_eq!(all[3].rank, 4);

    let top = queries.leaderboard(Some(2)).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[1].user_id, "bob");

    let invalid = queries.leaderboard(Some(0)).await;
    assert!(matches!(invalid, Err(DomainError::InvalidInput(_))));
}
