use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use lin_config::TrackerConfig;
use lin_core::entities::{HistoryRecord, MutationEvent};
use lin_core::enums::Action;
use lin_track::HistoryTracker;
use lin_track::lookup::SnapshotIndex;
use lin_trail::{JsonlStore, MemoryStore};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::output::output;

#[derive(Debug, Default, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<HistoryRecord>,
}

/// Handle `lineage replay`.
pub fn handle(args: &ReplayArgs, config: &TrackerConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let events = read_events(&args.events)?;
    let index = Arc::new(SnapshotIndex::new());

    let summary = if args.dry_run {
        let store = Arc::new(MemoryStore::new());
        let tracker = HistoryTracker::new(config, Arc::clone(&index), Arc::clone(&store))?;
        let mut summary = replay(&tracker, &index, &events, args.keep_going)?;
        summary.records = store.records();
        summary
    } else {
        let store = JsonlStore::open(&flags.trail_dir)
            .with_context(|| format!("failed to open trail at {}", flags.trail_dir.display()))?
            .with_validation()
            .context("failed to compile trail schemas")?;
        let tracker = HistoryTracker::new(config, Arc::clone(&index), store)?;
        let mut summary = replay(&tracker, &index, &events, args.keep_going)?;
        summary.trail_dir = Some(flags.trail_dir.clone());
        summary
    };

    output(&summary, flags.format)
}

pub fn read_events(path: &Path) -> anyhow::Result<Vec<MutationEvent>> {
    serde_jsonlines::json_lines::<MutationEvent, _>(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .enumerate()
        .map(|(index, event)| {
            event.with_context(|| {
                format!("{}:{}: invalid mutation event", path.display(), index + 1)
            })
        })
        .collect()
}

/// Run `events` through `tracker` in order.
///
/// `index` stands in for the host's entity store: created and updated
/// entities are upserted before tracking so their children can resolve
/// them; destroyed entities are removed after.
pub fn replay(
    tracker: &HistoryTracker,
    index: &SnapshotIndex,
    events: &[MutationEvent],
    keep_going: bool,
) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary {
        events: events.len(),
        ..ReplaySummary::default()
    };

    for (position, event) in events.iter().enumerate() {
        let entity = &event.entity;
        if event.action != Action::Destroy {
            index.upsert(entity.clone());
        }

        let outcome = tracker.on_mutation(event);

        if event.action == Action::Destroy {
            index.remove(&entity.type_name, &entity.id);
        }

        match outcome {
            Ok(Some(_)) => summary.recorded += 1,
            Ok(None) => summary.skipped += 1,
            Err(error) if keep_going => {
                tracing::warn!(event = position + 1, %error, "skipping failed event");
                summary.failed += 1;
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!(
                        "event {} ({} {} {})",
                        position + 1,
                        event.action,
                        entity.type_name,
                        entity.id
                    )
                });
            }
        }
    }

    Ok(summary)
}
