//! Core logic for Taskdeck.
//!
//! Owns the persisted task collection, the storage capability it is written
//! against, and the search/pagination state of the remote post viewer.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod service;
pub mod storage;
pub mod viewer;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::remote_item::RemoteItem;
pub use model::task::{ParseTaskFilterError, Task, TaskCounts, TaskFilter, TaskId};
pub use remote::{FetchError, FetchResult, HttpPostSource, PostSource, DEFAULT_POSTS_URL};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::task_service::{TaskService, TASKS_KEY};
pub use storage::{
    MemoryStorage, PersistedStore, SqliteStorage, StorageError, StorageProvider, StorageResult,
};
pub use viewer::paging::PAGE_SIZE;
pub use viewer::{LoadState, RemoteListViewer};

/// Minimal health-check API for shell wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
