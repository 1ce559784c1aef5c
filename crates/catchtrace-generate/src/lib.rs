//! Path-driven synthesis of supply-chain traceability datasets.
//!
//! This crate walks a configured sequence of participant roles and emits one
//! linked event batch per stage, handling merge, product-split, and
//! path-split transformations, then writes each batch to CSV.

pub mod dataset;
pub mod engine;
pub mod errors;
pub mod factory;
pub mod fields;
pub mod model;
pub mod output;
pub mod participants;
pub mod path;

pub use dataset::Dataset;
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{BatchReport, GenerateOptions, RunReport};
pub use participants::{Participant, ParticipantPools};
pub use path::{Batch, PathGenerator, PathState};
