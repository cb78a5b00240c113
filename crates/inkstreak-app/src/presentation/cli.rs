use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::streak_commands::*;
use crate::application::ResultExt;
use crate::presentation::bootstrap::build_app_state;
use crate::presentation::error::CommandError;
use crate::presentation::state::AppState;
use inkstreak_domain::shared::DomainError;
use inkstreak_infrastructure::config::{AppConfig, ConfigOverrides};

#[derive(Debug, Parser)]
#[command(name = "inkstreak")]
#[command(about = "Blogging streaks, experience levels and badges")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a streak record for a user
    Register {
        /// User id to register (generated when omitted)
        #[arg(long)]
        user_id: Option<String>,

        /// Streak freeze allowance for this user
        #[arg(long)]
        max_freezes: Option<u32>,
    },

    /// Record a published post
    Post {
        #[arg(short, long)]
        user: String,

        /// Word count of the post
        #[arg(short, long, allow_negative_numbers = true)]
        words: Option<i64>,

        /// Post content; words are counted when --words is absent
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read post content from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Publication time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Spend a streak freeze for today
    Freeze {
        #[arg(short, long)]
        user: String,
    },

    /// Show the streak dashboard for a user
    Summary {
        #[arg(short, long)]
        user: String,
    },

    /// Show the 365-day activity calendar
    Calendar {
        #[arg(short, long)]
        user: String,

        /// Last day of the calendar as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Rank users by current streak
    Leaderboard {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            database_path: self.db.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.overrides()) {
        Ok(config) => config,
        Err(e) => return report(e),
    };

    if let Err(e) = init_logging(&config.log_dir) {
        eprintln!("Failed to initialize file logging: {:#}", e);
        eprintln!("Falling back to console logging only");
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    let state = match build_app_state(config).await {
        Ok(state) => state,
        Err(e) => return report(e),
    };

    let result = dispatch(&state, cli.command).await;
    state.db.pool().close().await;

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => report(e),
    }
}

fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    inkstreak_infrastructure::logging::init_logger(log_dir)
        .with_context(|| format!("log directory {}", log_dir.display()))?;
    info!("inkstreak {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn report(err: DomainError) -> ExitCode {
    let command_error = CommandError::from(err);
    error!("Command failed: {}", command_error);
    match serde_json::to_string_pretty(&command_error) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", command_error),
    }
    ExitCode::FAILURE
}

/// Execute one subcommand and render its result as pretty JSON
pub async fn dispatch(state: &AppState, command: Commands) -> Result<String, DomainError> {
    let handlers = &state.command_handlers;
    let queries = &state.queries;

    match command {
        Commands::Register {
            user_id,
            max_freezes,
        } => render(
            &handlers
                .register_user
                .handle(RegisterUserCommand {
                    user_id,
                    max_streak_freezes: max_freezes,
                })
                .await?,
        ),
        Commands::Post {
            user,
            words,
            content,
            file,
            at,
        } => {
            let content = match file {
                Some(path) => Some(std::fs::read_to_string(&path).to_infra_err()?),
                None => content,
            };
            render(
                &handlers
                    .record_post
                    .handle(RecordPostCommand {
                        user_id: user,
                        word_count: words,
                        content,
                        posted_at: at,
                    })
                    .await?,
            )
        }
        Commands::Freeze { user } => render(
            &handlers
                .use_streak_freeze
                .handle(UseStreakFreezeCommand { user_id: user })
                .await?,
        ),
        Commands::Summary { user } => render(&queries.streak.summary(&user).await?),
        Commands::Calendar { user, date } => {
            render(&queries.streak.calendar(&user, date.as_deref()).await?)
        }
        Commands::Leaderboard { limit } => render(&queries.streak.leaderboard(limit).await?),
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string_pretty(value).to_serialization_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::Clock;
    use crate::presentation::bootstrap::build_app_state_with_clock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;

    struct Fixed(DateTime<Utc>);

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    async fn state_in(dir: &Path) -> AppState {
        let config = AppConfig::defaults_in(dir);
        let clock = Arc::new(Fixed(Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap()));
        build_app_state_with_clock(config, clock).await.unwrap()
    }

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "inkstreak",
            "summary",
            "--user",
            "writer",
            "--db",
            "/tmp/streaks.db",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.database_path, Some(PathBuf::from("/tmp/streaks.db")));
        assert!(overrides.log_dir.is_none());
        assert!(overrides.config_path.is_none());
    }

    #[test]
    fn test_content_and_file_conflict() {
        let result = Cli::try_parse_from([
            "inkstreak", "post", "-u", "writer", "--content", "hi", "--file", "post.md",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_register_post_and_summary_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;

        let registered = dispatch(&state, parse(&["inkstreak", "register", "--user-id", "writer"]))
            .await
            .unwrap();
        let registered: serde_json::Value = serde_json::from_str(&registered).unwrap();
        assert_eq!(registered["user_id"], "writer");

        let posted = dispatch(
            &state,
            parse(&["inkstreak", "post", "-u", "writer", "--words", "1000"]),
        )
        .await
        .unwrap();
        let posted: serde_json::Value = serde_json::from_str(&posted).unwrap();
        assert_eq!(posted["current_streak"], 1);
        assert_eq!(posted["experience_gained"], 50);

        let summary = dispatch(&state, parse(&["inkstreak", "summary", "-u", "writer"]))
            .await
            .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(summary["stats"]["total_words"], 1000);
        assert_eq!(summary["last_post_date"], "2024-03-14");

        let calendar = dispatch(&state, parse(&["inkstreak", "calendar", "-u", "writer"]))
            .await
            .unwrap();
        let calendar: serde_json::Value = serde_json::from_str(&calendar).unwrap();
        assert_eq!(calendar["days"].as_array().unwrap().len(), 365);
        assert_eq!(calendar["active_days"], 1);
    }

    #[tokio::test]
    async fn test_post_reads_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;
        let post = dir.path().join("post.md");
        std::fs::write(&post, "# Title\n\nThree more words").unwrap();

        dispatch(&state, parse(&["inkstreak", "register", "--user-id", "writer"]))
            .await
            .unwrap();
        dispatch(
            &state,
            parse(&["inkstreak", "post", "-u", "writer", "--file", post.to_str().unwrap()]),
        )
        .await
        .unwrap();

        let summary = state.queries.streak.summary("writer").await.unwrap();
        assert_eq!(summary.stats.total_words, 5);
    }

    #[tokio::test]
    async fn test_errors_map_to_command_errors() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;

        let missing = dispatch(&state, parse(&["inkstreak", "freeze", "-u", "ghost"]))
            .await
            .unwrap_err();
        assert_eq!(CommandError::from(missing).code, 2001);

        dispatch(&state, parse(&["inkstreak", "register", "--user-id", "writer"]))
            .await
            .unwrap();
        let negative = dispatch(
            &state,
            parse(&["inkstreak", "post", "-u", "writer", "--words", "-3"]),
        )
        .await
        .unwrap_err();
        assert_eq!(CommandError::from(negative).code, 6002);
    }

    #[tokio::test]
    async fn test_leaderboard_lists_registered_users() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;

        for user in ["alice", "bob"] {
            dispatch(&state, parse(&["inkstreak", "register", "--user-id", user]))
                .await
                .unwrap();
        }
        dispatch(&state, parse(&["inkstreak", "post", "-u", "bob"]))
            .await
            .unwrap();

        let board = dispatch(&state, parse(&["inkstreak", "leaderboard", "--limit", "5"]))
            .await
            .unwrap();
        let board: serde_json::Value = serde_json::from_str(&board).unwrap();
        assert_eq!(board[0]["user_id"], "bob");
        assert_eq!(board[0]["rank"], 1);
        assert_eq!(board[1]["user_id"], "alice");
    }
}
