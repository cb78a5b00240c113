mod milestone_log_handler;

pub use milestone_log_handler::MilestoneLogEventHandler;
