//! In-memory doubles shared by handler and query tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::RwLock;

use crate::application::services::Clock;
use inkstreak_domain::events::{DomainEvent, EventBus};
use inkstreak_domain::shared::{DomainError, UserId};
use inkstreak_domain::streak::{UserStreak, UserStreakRepository};

pub struct MockUserStreakRepository {
    records: RwLock<HashMap<UserId, UserStreak>>,
}

impl MockUserStreakRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, user_id: &str) -> Option<UserStreak> {
        self.records
            .read()
            .await
            .get(&UserId::from_string(user_id))
            .cloned()
    }
}

#[async_trait]
impl UserStreakRepository for MockUserStreakRepository {
    async fn create(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(record.user_id()) {
            return Err(DomainError::Validation(format!(
                "Streak record already exists for user {}",
                record.user_id()
            )));
        }
        let mut stored = record.clone();
        stored.mark_persisted(1);
        records.insert(stored.user_id().clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserStreak>, DomainError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save(&self, record: &UserStreak) -> Result<UserStreak, DomainError> {
        let mut records = self.records.write().await;
        let current = records
            .get(record.user_id())
            .ok_or_else(|| DomainError::UserNotFound(record.user_id().to_string()))?;
        if current.version() != record.version() {
            return Err(DomainError::Conflict(format!(
                "expected version {}, found {}",
                record.version(),
                current.version()
            )));
        }
        let mut stored = record.clone();
        stored.mark_persisted(record.version() + 1);
        records.insert(stored.user_id().clone(), stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<UserStreak>, DomainError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn delete(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.records.write().await.remove(user_id);
        Ok(())
    }
}

/// Records the short type name of every published event
pub struct MockEventBus {
    published: RwLock<Vec<String>>,
}

impl MockEventBus {
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
        }
    }

    pub async fn published(&self) -> Vec<String> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl EventBus for MockEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let name = event
            .event_type_name()
            .rsplit("::")
            .next()
            .unwrap_or_default()
            .to_string();
        self.published.write().await.push(name);
        Ok(())
    }
}

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(y: i32, m: u32, d: u32, h: u32) -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()),
        }
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
