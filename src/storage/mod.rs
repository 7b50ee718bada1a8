//! Local persistence.
//!
//! - [`LocalStorage`]: key/value store with a byte quota ([`FileStorage`], [`MemoryStorage`])
//! - [`BackupStore`]: time-limited snapshot of the board, rewritten on every change

mod backup;
mod local;

pub use backup::{BackupSnapshot, BackupStatus, BackupStore};
pub use local::{FileStorage, LocalStorage, MemoryStorage};
