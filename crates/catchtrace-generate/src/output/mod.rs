//! CSV serialization of dataset cells.

pub mod csv;

use catchtrace_core::PathConfig;

use crate::path::Batch;

/// Deterministic file name for one dataset cell, encoding the full path
/// configuration, the position, its role, and the batch's event-type code.
pub fn batch_file_name(config: &PathConfig, position: usize, batch: &Batch) -> String {
    let role = config
        .role_at(position)
        .map(|role| role.code())
        .unwrap_or('0');
    format!(
        "pis-{}-merge_gtin-{}-split_gtin-{}-split_pi-{}-same_pis-{}-pi_index-{}-pi_role-{}-cte-{}.csv",
        config.pis_string(),
        config.merge_string(),
        config.split_product_string(),
        config.split_path_string(),
        config.reuse_participants(),
        position,
        role,
        batch.kind.code(),
    )
}
