//! Append-only persistence of per-evaluation indicator snapshots.

pub mod journal;

pub use journal::{SnapshotJournal, SnapshotStore};
