use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run directories are created.
    pub out_dir: PathBuf,
    /// Number of independent sample paths.
    pub samples: u32,
    /// Master seed; every path derives its own stream from it.
    pub seed: u64,
    /// Calendar date of the origin catch events.
    pub base_date: NaiveDate,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data"),
            samples: 20,
            seed: 42,
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

/// Summary of one written batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub file: String,
    pub position: usize,
    pub role: String,
    pub event_type: u8,
    pub rows: usize,
    pub bytes: u64,
}

/// Report for a generation run, written as `run_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub seed: u64,
    pub paths_generated: usize,
    pub total_events: usize,
    pub duration_ms: u128,
    pub batches: Vec<BatchReport>,
}
