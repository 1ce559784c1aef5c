//! Run orchestration: seeding, the sample-path loop, CSV output, report.

use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use catchtrace_core::PathConfig;

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::model::{BatchReport, GenerateOptions, RunReport};
use crate::output::batch_file_name;
use crate::output::csv::write_batch_csv;
use crate::participants::ParticipantPools;
use crate::path::PathGenerator;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: RunReport,
}

/// Entry point for generating a dataset from a path configuration.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, config: &PathConfig) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;

        let base_time = self
            .options
            .base_date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_default();

        // Pools come from their own stream so adding samples never shifts
        // the participant identities.
        let mut pool_rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        let pools = ParticipantPools::generate(&mut pool_rng);
        let generator = PathGenerator::new(config, &pools);

        info!(
            run_id = %run_id,
            pis = %config.pis_string(),
            samples = self.options.samples,
            seed = self.options.seed,
            "generation started"
        );

        let mut dataset = Dataset::new();
        for sample in 0..self.options.samples {
            let path_seed = hash_seed(self.options.seed, &format!("path.{sample}"));
            let mut rng = ChaCha8Rng::seed_from_u64(path_seed);
            let state = generator.generate(&mut rng, base_time)?;
            dataset.absorb(state)?;
        }

        let mut bytes_written = 0_u64;
        let mut batches = Vec::new();
        for (position, _, batch) in dataset.cells() {
            let file = batch_file_name(config, position, batch);
            let bytes = write_batch_csv(&run_dir.join(&file), batch)?;
            bytes_written += bytes;
            info!(file = %file, rows = batch.events.len(), "batch written");
            batches.push(BatchReport {
                file,
                position,
                role: config
                    .role_at(position)
                    .map(|role| role.label().to_string())
                    .unwrap_or_default(),
                event_type: batch.kind.code(),
                rows: batch.events.len(),
                bytes,
            });
        }

        let report = RunReport {
            run_id: run_id.clone(),
            seed: self.options.seed,
            paths_generated: dataset.paths(),
            total_events: dataset.total_events(),
            duration_ms: start.elapsed().as_millis(),
            batches,
        };
        std::fs::write(
            run_dir.join("run_report.json"),
            serde_json::to_vec_pretty(&report)?,
        )?;

        info!(
            run_id = %run_id,
            events = report.total_events,
            bytes = bytes_written,
            "generation finished"
        );

        Ok(GenerationResult { run_dir, report })
    }
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
