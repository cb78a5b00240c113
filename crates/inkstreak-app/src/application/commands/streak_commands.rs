use serde::Serialize;

use crate::application::commands::command_handler::Command;

/// Create a streak record for a user
#[derive(Debug, Clone, Default)]
pub struct RegisterUserCommand {
    /// Generated when absent
    pub user_id: Option<String>,
    /// Falls back to the configured default allowance
    pub max_streak_freezes: Option<u32>,
}

impl Command for RegisterUserCommand {}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserResult {
    pub user_id: String,
}

/// Credit a published post to the author's streak
#[derive(Debug, Clone, Default)]
pub struct RecordPostCommand {
    pub user_id: String,
    /// Takes precedence over counting `content`
    pub word_count: Option<i64>,
    pub content: Option<String>,
    /// RFC 3339 timestamp, defaults to now
    pub posted_at: Option<String>,
}

impl Command for RecordPostCommand {}

/// Spend one streak freeze credit
#[derive(Debug, Clone)]
pub struct UseStreakFreezeCommand {
    pub user_id: String,
}

impl Command for UseStreakFreezeCommand {}
