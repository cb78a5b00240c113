mod clock;
mod user_locks;

pub use clock::{Clock, SystemClock};
pub use user_locks::UserLockRegistry;
