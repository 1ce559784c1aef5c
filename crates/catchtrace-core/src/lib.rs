//! Core contracts for catchtrace.
//!
//! This crate defines the canonical event model, the path configuration with
//! its validation rules, and the error types shared across the generator and
//! the CLI.

pub mod config;
pub mod error;
pub mod event;
pub mod role;

pub use config::PathConfig;
pub use error::{ConfigError, Result};
pub use event::{BranchId, Event, EventBody, EventKind, LineageKey, Measure, ParticipantId};
pub use role::Role;
