//! Domain records shared by the task controller and the remote viewer.
//!
//! # Invariants
//! - Task ids are unique within one collection.
//! - Remote items are read-only snapshots of the external payload.

pub mod remote_item;
pub mod task;
