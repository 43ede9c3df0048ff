//! Per-partition build flag artifacts

use crate::release_config::ResolvedReleaseConfig;
use crate::Result;
use rc_fs::{ConfigStore, NormalizedPath};

/// File name of a partition's artifact. Read by downstream packaging, so it
/// must not change.
pub fn partition_file_name(partition: &str) -> String {
    format!("build_flags_{partition}.json")
}

/// Write `build_flags_<partition>.json` into `out_dir` for every partition
/// with at least one unredacted flag. Returns the written paths in
/// partition order.
pub fn write_partition_build_flags(
    resolved: &ResolvedReleaseConfig,
    out_dir: &NormalizedPath,
) -> Result<Vec<NormalizedPath>> {
    let store = ConfigStore::new();
    let mut written = Vec::new();
    for (partition, flags) in &resolved.partition_build_flags {
        let mut flags = flags.clone();
        flags.sort_by_name();
        let path = out_dir.join(&partition_file_name(partition));
        store.save(&path, &flags)?;
        tracing::info!(
            path = %path,
            flags = flags.flag_artifacts.len(),
            "Wrote partition build flags"
        );
        written.push(path);
    }
    Ok(written)
}
