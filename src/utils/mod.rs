pub mod clock;
pub mod locks;
pub mod retry;
pub mod score;

pub use clock::{Clock, fixed_clock};
pub use locks::{KeyedLocks, LockKey};
pub use retry::retry_on_conflict;
