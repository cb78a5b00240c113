use async_trait::async_trait;

use super::aggregate::UserStreak;
use crate::shared::{DomainError, UserId};

#[async_trait]
pub trait UserStreakRepository: Send + Sync {
    /// Insert a fresh record. Fails with `Validation` if the user already has one.
    async fn create(&self, record: &UserStreak) -> Result<UserStreak, DomainError>;

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<UserStreak>, DomainError>;

    /// Persist the whole record atomically.
    ///
    /// The write only succeeds if the stored version still equals
    /// `record.version()`; otherwise `DomainError::Conflict` is returned and
    /// nothing is written. The returned record carries the new version.
    async fn save(&self, record: &UserStreak) -> Result<UserStreak, DomainError>;

    async fn find_all(&self) -> Result<Vec<UserStreak>, DomainError>;

    async fn delete(&self, user_id: &UserId) -> Result<(), DomainError>;
}
