//! Behavior labeling
//!
//! Labels each snapshot from how the reference player moved until the next
//! snapshot of the same match: pushing away from base while closing on the
//! opponent is aggressive, the mirror movement is safe.

use std::collections::BTreeMap;

use super::snapshot::Snapshot;
use crate::{BehaviorLabel, LabelingConfig};

/// A snapshot with its behavior label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSnapshot {
    pub snapshot: Snapshot,
    pub label: BehaviorLabel,
}

/// Label totals for a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabelCounts {
    pub aggressive: usize,
    pub safe: usize,
    pub neutral: usize,
}

impl LabelCounts {
    pub fn tally(rows: &[LabeledSnapshot]) -> Self {
        let mut counts = LabelCounts::default();
        for row in rows {
            match row.label {
                BehaviorLabel::Aggressive => counts.aggressive += 1,
                BehaviorLabel::Safe => counts.safe += 1,
                BehaviorLabel::Neutral => counts.neutral += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.aggressive + self.safe + self.neutral
    }
}

pub struct BehaviorLabeler {
    config: LabelingConfig,
}

impl Default for BehaviorLabeler {
    fn default() -> Self {
        Self::new(LabelingConfig::default())
    }
}

impl BehaviorLabeler {
    pub fn new(config: LabelingConfig) -> Self {
        BehaviorLabeler { config }
    }

    /// Label one snapshot given its successor in the same match, if any.
    ///
    /// The distance bounds apply to the current snapshot, not the successor.
    pub fn classify(&self, current: &Snapshot, next: Option<&Snapshot>) -> BehaviorLabel {
        let Some(next) = next else {
            return BehaviorLabel::Neutral;
        };

        let delta_base = next.self_base_distance - current.self_base_distance;
        let delta_champ = next.champ_distance - current.champ_distance;
        let midfield = current.champ_distance < self.config.max_champ_distance
            && current.self_base_distance > self.config.min_base_distance;

        if !midfield {
            BehaviorLabel::Neutral
        } else if delta_base > self.config.move_threshold && delta_champ < 0.0 {
            BehaviorLabel::Aggressive
        } else if delta_base < -self.config.move_threshold && delta_champ >= 0.0 {
            BehaviorLabel::Safe
        } else {
            BehaviorLabel::Neutral
        }
    }

    /// Label every snapshot, output ordered by match id then time
    pub fn label_snapshots(&self, rows: Vec<Snapshot>) -> Vec<LabeledSnapshot> {
        let mut labeled = Vec::with_capacity(rows.len());

        for (_, group) in group_by_match(rows) {
            let labels: Vec<BehaviorLabel> = (0..group.len())
                .map(|i| self.classify(&group[i], group.get(i + 1)))
                .collect();

            labeled.extend(
                group
                    .into_iter()
                    .zip(labels)
                    .map(|(snapshot, label)| LabeledSnapshot { snapshot, label }),
            );
        }

        labeled
    }
}

/// Group snapshots per match, each group sorted by time (stable for equal times)
pub fn group_by_match(rows: Vec<Snapshot>) -> BTreeMap<String, Vec<Snapshot>> {
    let mut groups: BTreeMap<String, Vec<Snapshot>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.match_id.clone()).or_default().push(row);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));
    }
    groups
}
