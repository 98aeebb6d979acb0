use anyhow::Context;
use lin_core::entities::AssociationChain;
use lin_trail::JsonlStore;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::output::output;

/// Handle `lineage history`.
pub fn handle(args: &HistoryArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let prefix: AssociationChain = args.scope.iter().cloned().collect();
    tracing::debug!(scope = %prefix, "querying history");

    let store = JsonlStore::open(&flags.trail_dir)
        .with_context(|| format!("failed to open trail at {}", flags.trail_dir.display()))?;
    let records = store
        .query(&prefix)
        .with_context(|| format!("failed to read trail for {prefix}"))?;

    output(&records, flags.format)
}
