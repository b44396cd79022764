//! Foundational low-level utilities shared across stackdoc crates.
//!
//! Provides atomic report writes and backup rotation of previously written
//! reports.

pub mod atomic_io;
pub mod backup_rotation;

pub use atomic_io::write_text_atomic;
pub use backup_rotation::{
    backup_existing_file, backup_path_for, list_backups, prune_backups, BackupPolicy,
};
