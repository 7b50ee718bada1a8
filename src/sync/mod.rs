//! Offline-first save path.
//!
//! - [`SaveService`]: validates, writes with retry, and falls back to the queue
//! - [`SyncQueue`]: durable pending saves in local storage
//! - [`BackoffPolicy`]: retry delays for remote writes
//! - [`Connectivity`]: online/offline flag driving reconnect replay

mod connectivity;
mod queue;
mod retry;
mod service;

pub use connectivity::Connectivity;
pub use queue::{OFFLINE_SAVES_KEY, OFFLINE_UPDATES_KEY, QueueEntry, SyncQueue};
pub use retry::{BackoffPolicy, with_retry};
pub use service::{ReplayReport, SaveOutcome, SaveService};
