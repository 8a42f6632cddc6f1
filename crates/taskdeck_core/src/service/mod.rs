//! Use-case services over persisted state.
//!
//! # Responsibility
//! - Turn UI events into collection mutations.
//! - Keep UI layers decoupled from storage details.

pub mod clock;
pub mod task_service;
