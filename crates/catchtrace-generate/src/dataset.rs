//! Run-wide dataset assembly.
//!
//! Each sample path produces per-position sub-batches; the dataset
//! concatenates them across paths into cells keyed by (position, sub-batch
//! index). A path whose sub-batch kind disagrees with the cell it lands in
//! is a caller bug and surfaces as an error instead of being corrected.

use crate::errors::GenerationError;
use crate::path::{Batch, PathState};

#[derive(Debug, Default)]
pub struct Dataset {
    cells: Vec<Vec<Batch>>,
    paths: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sample paths absorbed so far.
    pub fn paths(&self) -> usize {
        self.paths
    }

    pub fn positions(&self) -> usize {
        self.cells.len()
    }

    /// Fold one finished path into the run-wide cells.
    pub fn absorb(&mut self, state: PathState) -> Result<(), GenerationError> {
        let positions = state.into_positions();
        if self.cells.len() < positions.len() {
            self.cells.resize_with(positions.len(), Vec::new);
        }
        for (position, batches) in positions.into_iter().enumerate() {
            let cell = &mut self.cells[position];
            for (index, batch) in batches.into_iter().enumerate() {
                match cell.get_mut(index) {
                    Some(existing) => {
                        if existing.kind != batch.kind {
                            return Err(GenerationError::BatchMismatch {
                                position,
                                index,
                                expected: existing.kind,
                                got: batch.kind,
                            });
                        }
                        existing.events.extend(batch.events);
                    }
                    None => cell.push(batch),
                }
            }
        }
        self.paths += 1;
        Ok(())
    }

    /// Iterate every cell with its (position, sub-batch index) key.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Batch)> {
        self.cells.iter().enumerate().flat_map(|(position, batches)| {
            batches
                .iter()
                .enumerate()
                .map(move |(index, batch)| (position, index, batch))
        })
    }

    pub fn total_events(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .map(|batch| batch.events.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::ParticipantPools;
    use crate::path::PathGenerator;
    use catchtrace_core::{EventKind, PathConfig};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(config: &PathConfig, seed: u64) -> PathState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pools = ParticipantPools::generate(&mut rng);
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        PathGenerator::new(config, &pools)
            .generate(&mut rng, base)
            .unwrap()
    }

    #[test]
    fn absorbing_paths_concatenates_per_cell() {
        let config =
            PathConfig::parse("123456", "000000", "000000", "000000", false).unwrap();
        let mut dataset = Dataset::new();
        dataset.absorb(generate(&config, 1)).unwrap();
        dataset.absorb(generate(&config, 2)).unwrap();

        assert_eq!(dataset.paths(), 2);
        assert_eq!(dataset.positions(), 6);
        let catches = dataset
            .cells()
            .find(|(position, index, _)| *position == 0 && *index == 0)
            .map(|(_, _, batch)| batch.events.len());
        assert_eq!(catches, Some(2));
    }

    #[test]
    fn kind_disagreement_is_an_error() {
        let plain =
            PathConfig::parse("123456", "000000", "000000", "000000", false).unwrap();
        // A product split at the distributor turns its first sub-batch into
        // a repack, clashing with the plain path's shipment-only cell.
        let repack =
            PathConfig::parse("123456", "000000", "000010", "000000", false).unwrap();

        let mut dataset = Dataset::new();
        dataset.absorb(generate(&plain, 3)).unwrap();
        let err = dataset.absorb(generate(&repack, 4)).unwrap_err();
        match err {
            GenerationError::BatchMismatch {
                position,
                index,
                expected,
                got,
            } => {
                assert_eq!((position, index), (4, 0));
                assert_eq!(expected, EventKind::Shipment);
                assert_eq!(got, EventKind::Packing);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
