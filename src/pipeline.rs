//! Batch stages: clean index, snapshot dataset, labeled dataset
//!
//! Each stage reads the previous stage's artifact from the data layout.
//! Per-match problems are logged and skipped; only missing global inputs abort.

use std::path::Path;

use crate::data::riot::{MatchRecord, Timeline};
use crate::data::store::{ensure_parent, read_json, write_json_pretty, DataLayout};
use crate::features::filter::{CleanMatchEntry, MatchFilter, Verdict};
use crate::features::label::{BehaviorLabeler, LabelCounts, LabeledSnapshot};
use crate::features::lane_pair;
use crate::features::snapshot::{build_snapshots, Snapshot};
use crate::features::window::lane_end_time;
use crate::{LaneError, Result, Role};

/// Outcome of the clean stage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub scanned: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Outcome of the snapshot stage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub matches: usize,
    pub processed: usize,
    pub skipped: usize,
    pub rows: usize,
}

/// Filter raw matches into the clean index and write it.
pub fn clean_matches(
    layout: &DataLayout,
    puuid: &str,
    filter: &MatchFilter,
) -> Result<(Vec<CleanMatchEntry>, CleanReport)> {
    let files = layout.list_match_files()?;
    log::info!("Found {} raw match files", files.len());

    let mut report = CleanReport {
        scanned: files.len(),
        ..Default::default()
    };
    let mut entries = Vec::new();

    for path in &files {
        let record: MatchRecord = match read_json(path) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable match {}: {}", path.display(), e);
                report.skipped += 1;
                continue;
            }
        };
        let match_id = &record.metadata.match_id;

        if !layout.timeline_path(match_id).exists() {
            log::info!("No timeline for match {}, skipping", match_id);
            report.skipped += 1;
            continue;
        }

        match filter.check(&record, puuid) {
            Verdict::Keep(me) => entries.push(CleanMatchEntry::from_match(&record, me)),
            Verdict::Skip(reason) => {
                log::info!("Match {} skipped: {}", match_id, reason);
                report.skipped += 1;
            }
        }
    }

    report.kept = entries.len();
    write_json_pretty(&layout.index_path, &entries)?;
    log::info!(
        "Saved {} clean {} match entries to {}",
        entries.len(),
        filter.role(),
        layout.index_path.display()
    );

    Ok((entries, report))
}

pub fn load_index(layout: &DataLayout) -> Result<Vec<CleanMatchEntry>> {
    if !layout.index_path.exists() {
        return Err(LaneError::MissingInput {
            path: layout.index_path.clone(),
            hint: "run `lanephase clean` first".to_string(),
        });
    }
    read_json(&layout.index_path)
}

/// Snapshots for one match; any error means the match is skipped
pub fn process_match(
    layout: &DataLayout,
    match_id: &str,
    puuid: &str,
    role: Role,
    ceiling_s: f64,
) -> Result<Vec<Snapshot>> {
    let match_path = layout.match_path(match_id);
    let timeline_path = layout.timeline_path(match_id);

    for path in [&match_path, &timeline_path] {
        if !path.exists() {
            return Err(LaneError::MissingInput {
                path: path.clone(),
                hint: format!("payload for {} not downloaded", match_id),
            });
        }
    }

    let record: MatchRecord = read_json(&match_path)?;
    let timeline: Timeline = read_json(&timeline_path)?;

    let pair = lane_pair::resolve(&record, puuid, role)?;
    let cutoff = lane_end_time(&timeline, role.structure_lane(), ceiling_s);
    log::debug!(
        "{}: self={} opponent={} side={} lane end={}s",
        match_id,
        pair.self_id,
        pair.opponent_id,
        pair.side,
        cutoff
    );

    build_snapshots(match_id, &timeline, &pair, cutoff)
}

/// Build snapshots for every indexed match and write the snapshot CSV.
pub fn build_dataset(
    layout: &DataLayout,
    puuid: &str,
    role: Role,
    ceiling_s: f64,
) -> Result<(Vec<Snapshot>, BuildReport)> {
    let index = load_index(layout)?;
    let mut report = BuildReport {
        matches: index.len(),
        ..Default::default()
    };

    let mut rows = Vec::new();
    for entry in &index {
        match process_match(layout, &entry.match_id, puuid, role, ceiling_s) {
            Ok(snapshots) => {
                log::info!("{}: {} snapshots", entry.match_id, snapshots.len());
                report.processed += 1;
                rows.extend(snapshots);
            }
            Err(e) => {
                log::warn!("Skipping match {}: {}", entry.match_id, e);
                report.skipped += 1;
            }
        }
    }

    report.rows = rows.len();
    if rows.is_empty() {
        log::warn!("No snapshots generated. Check paths, index and puuid.");
        if layout.snapshots_path.exists() {
            std::fs::remove_file(&layout.snapshots_path)?;
            log::info!(
                "Removed stale snapshots at {}",
                layout.snapshots_path.display()
            );
        }
        return Ok((rows, report));
    }

    write_snapshots(&layout.snapshots_path, &rows)?;
    log::info!(
        "Wrote {} snapshots to {}",
        rows.len(),
        layout.snapshots_path.display()
    );
    Ok((rows, report))
}

pub fn write_snapshots(path: &Path, rows: &[Snapshot]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    if !path.exists() {
        return Err(LaneError::MissingInput {
            path: path.to_path_buf(),
            hint: "run `lanephase build` first".to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write labeled rows: the snapshot columns followed by `label`
pub fn write_labeled(path: &Path, rows: &[LabeledSnapshot]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut header: Vec<&str> = Snapshot::HEADER.to_vec();
    header.push("label");
    writer.write_record(&header)?;

    for row in rows {
        writer.serialize((&row.snapshot, row.label))?;
    }
    writer.flush()?;
    Ok(())
}

/// Label the snapshot CSV and write the labeled CSV.
pub fn label_dataset(layout: &DataLayout, labeler: &BehaviorLabeler) -> Result<LabelCounts> {
    let rows = read_snapshots(&layout.snapshots_path)?;
    log::info!(
        "Loaded {} snapshots from {}",
        rows.len(),
        layout.snapshots_path.display()
    );

    let labeled = labeler.label_snapshots(rows);
    write_labeled(&layout.labeled_path, &labeled)?;
    log::info!("Saved labeled dataset to {}", layout.labeled_path.display());

    Ok(LabelCounts::tally(&labeled))
}
