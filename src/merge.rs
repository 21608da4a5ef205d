//! Proximate-pair merging.
//!
//! Camera firmware writes the jpg and the video of one event under
//! timestamps up to a few seconds apart, so after grouping they show up as
//! two single-media snapshots. A single sweep over the sorted log pairs such
//! neighbours when they are closer than the merge window:
//!
//! ```text
//! 09:00:00 {jpg}  ┐
//! 09:00:03 {mp4}  ┘ → Pair      (3 s < 10 s)
//! 09:10:00 {jpg,mp4} → Single   (already complete)
//! 09:20:00 {jpg}     → dropped in compatible mode, Single in corrected mode
//! 09:20:15 {mp4}     → Single   (trailing candidate)
//! ```
//!
//! The window is measured forward only; the input must be sorted ascending
//! and is not checked.

use crate::config::{MergeConfig, MergeMode};
use crate::types::{MediaTypes, Snapshot};
use serde::Serialize;
use tracing::{debug, info};

/// One logical capture after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotGroup {
    Single(Snapshot),
    /// Two single-media snapshots published as one. The first is the
    /// defining snapshot.
    Pair(Snapshot, Snapshot),
}

impl SnapshotGroup {
    /// The snapshot whose timestamp names the published files.
    pub fn defining(&self) -> &Snapshot {
        match self {
            SnapshotGroup::Single(s) | SnapshotGroup::Pair(s, _) => s,
        }
    }

    /// All member snapshots, defining snapshot first.
    pub fn members(&self) -> Vec<&Snapshot> {
        match self {
            SnapshotGroup::Single(s) => vec![s],
            SnapshotGroup::Pair(a, b) => vec![a, b],
        }
    }

    /// Union of the media types of all members, in member order.
    pub fn media_types(&self) -> MediaTypes {
        self.members()
            .into_iter()
            .flat_map(|s| s.media_types.iter())
            .collect()
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, SnapshotGroup::Pair(..))
    }
}

/// Result of a merge sweep.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    pub groups: Vec<SnapshotGroup>,
    /// Candidates discarded without being emitted. Always zero in
    /// [`MergeMode::Corrected`].
    pub dropped: usize,
}

/// Counters reported per camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub input: usize,
    pub groups: usize,
    pub pairs: usize,
    pub dropped: usize,
}

impl Merged {
    pub fn stats(&self, input: usize) -> MergeStats {
        MergeStats {
            input,
            groups: self.groups.len(),
            pairs: self.groups.iter().filter(|g| g.is_pair()).count(),
            dropped: self.dropped,
        }
    }
}

/// Sweep an ascending snapshot sequence and pair proximate single-media
/// snapshots.
///
/// A complete snapshot is always its own group. A single-media snapshot
/// waits in a one-slot `pending` buffer for a partner less than
/// `window_seconds` later. When the next snapshot is too far away, or is
/// complete, the pending candidate is released: dropped in
/// [`MergeMode::Compatible`], emitted as a `Single` in
/// [`MergeMode::Corrected`]. A candidate left over at the end is emitted.
pub fn merge_proximate<I>(snapshots: I, config: &MergeConfig) -> Merged
where
    I: IntoIterator<Item = Snapshot>,
{
    let window = i64::from(config.window_seconds);
    let mut merged = Merged::default();
    let mut pending: Option<Snapshot> = None;

    for snapshot in snapshots {
        if snapshot.is_complete() {
            if let Some(candidate) = pending.take() {
                release(&mut merged, candidate, config.mode);
            }
            merged.groups.push(SnapshotGroup::Single(snapshot));
            continue;
        }

        match pending.take() {
            None => pending = Some(snapshot),
            Some(candidate) => {
                let delta = (snapshot.timestamp - candidate.timestamp).num_seconds();
                if delta < window {
                    merged.groups.push(SnapshotGroup::Pair(candidate, snapshot));
                } else {
                    release(&mut merged, candidate, config.mode);
                    pending = Some(snapshot);
                }
            }
        }
    }

    if let Some(candidate) = pending {
        merged.groups.push(SnapshotGroup::Single(candidate));
    }

    if merged.dropped > 0 {
        info!(dropped = merged.dropped, "unpaired snapshots dropped");
    }
    merged
}

fn release(merged: &mut Merged, candidate: Snapshot, mode: MergeMode) {
    match mode {
        MergeMode::Compatible => {
            debug!(timestamp = %candidate.timestamp, "dropping unpaired snapshot");
            merged.dropped += 1;
        }
        MergeMode::Corrected => merged.groups.push(SnapshotGroup::Single(candidate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::at;
    use crate::types::MediaType::{self, Image, Video};
    use chrono::{Duration, NaiveDateTime};

    fn t0() -> NaiveDateTime {
        at(2021, 3, 13, 9, 0, 0)
    }

    fn jpg(offset: i64) -> Snapshot {
        Snapshot::with_types(t0() + Duration::seconds(offset), &[Image])
    }

    fn mp4(offset: i64) -> Snapshot {
        Snapshot::with_types(t0() + Duration::seconds(offset), &[Video])
    }

    fn both(offset: i64) -> Snapshot {
        Snapshot::with_types(t0() + Duration::seconds(offset), &[Image, Video])
    }

    /// Media types per group. Snapshot equality ignores them.
    fn kinds(merged: &Merged) -> Vec<Vec<MediaType>> {
        merged
            .groups
            .iter()
            .map(|g| g.media_types().iter().collect())
            .collect()
    }

    fn compatible() -> MergeConfig {
        MergeConfig::default()
    }

    fn corrected() -> MergeConfig {
        MergeConfig {
            mode: MergeMode::Corrected,
            ..MergeConfig::default()
        }
    }

    #[test]
    fn close_pair_is_merged() {
        let merged = merge_proximate(vec![jpg(0), mp4(3)], &compatible());
        assert_eq!(merged.groups, vec![SnapshotGroup::Pair(jpg(0), mp4(3))]);
        assert_eq!(kinds(&merged), vec![vec![Image, Video]]);
        assert_eq!(merged.dropped, 0);
    }

    #[test]
    fn distant_candidate_is_dropped() {
        let merged = merge_proximate(vec![jpg(0), mp4(15)], &compatible());
        assert_eq!(merged.groups, vec![SnapshotGroup::Single(mp4(15))]);
        assert_eq!(kinds(&merged), vec![vec![Video]]);
        assert_eq!(merged.dropped, 1);
    }

    #[test]
    fn dropped_candidate_leaves_room_for_next_pair() {
        let merged = merge_proximate(vec![jpg(0), mp4(15), jpg(18)], &compatible());
        assert_eq!(merged.groups, vec![SnapshotGroup::Pair(mp4(15), jpg(18))]);
        assert_eq!(kinds(&merged), vec![vec![Video, Image]]);
        assert_eq!(merged.groups[0].defining().timestamp, t0() + Duration::seconds(15));
        assert_eq!(merged.dropped, 1);
    }

    #[test]
    fn complete_snapshot_is_unchanged() {
        let merged = merge_proximate(vec![both(0)], &compatible());
        assert_eq!(merged.groups, vec![SnapshotGroup::Single(both(0))]);
        assert_eq!(kinds(&merged), vec![vec![Image, Video]]);
    }

    #[test]
    fn window_is_exclusive() {
        let merged = merge_proximate(vec![jpg(0), mp4(9)], &compatible());
        assert!(merged.groups[0].is_pair());
        assert_eq!(kinds(&merged), vec![vec![Image, Video]]);

        let merged = merge_proximate(vec![jpg(0), mp4(10)], &compatible());
        assert_eq!(merged.groups, vec![SnapshotGroup::Single(mp4(10))]);
        assert_eq!(kinds(&merged), vec![vec![Video]]);
    }

    #[test]
    fn custom_window() {
        let config = MergeConfig {
            window_seconds: 30,
            ..MergeConfig::default()
        };
        let merged = merge_proximate(vec![jpg(0), mp4(15)], &config);
        assert!(merged.groups[0].is_pair());
    }

    #[test]
    fn complete_snapshot_discards_pending_candidate() {
        let merged = merge_proximate(vec![jpg(0), both(2), mp4(4)], &compatible());
        assert_eq!(
            merged.groups,
            vec![SnapshotGroup::Single(both(2)), SnapshotGroup::Single(mp4(4))]
        );
        assert_eq!(kinds(&merged), vec![vec![Image, Video], vec![Video]]);
        assert_eq!(merged.dropped, 1);
    }

    #[test]
    fn trailing_candidate_is_flushed() {
        let merged = merge_proximate(vec![both(0), jpg(60)], &compatible());
        assert_eq!(
            merged.groups,
            vec![SnapshotGroup::Single(both(0)), SnapshotGroup::Single(jpg(60))]
        );
        assert_eq!(kinds(&merged), vec![vec![Image, Video], vec![Image]]);
    }

    #[test]
    fn each_snapshot_pairs_at_most_once() {
        let merged = merge_proximate(vec![jpg(0), mp4(2), jpg(4)], &compatible());
        assert_eq!(
            merged.groups,
            vec![
                SnapshotGroup::Pair(jpg(0), mp4(2)),
                SnapshotGroup::Single(jpg(4)),
            ]
        );
        assert_eq!(kinds(&merged), vec![vec![Image, Video], vec![Image]]);
    }

    #[test]
    fn empty_input() {
        let merged = merge_proximate(Vec::new(), &compatible());
        assert!(merged.groups.is_empty());
        assert_eq!(merged.dropped, 0);
    }

    #[test]
    fn corrected_mode_emits_unpaired_candidates() {
        let merged = merge_proximate(vec![jpg(0), mp4(15)], &corrected());
        assert_eq!(
            merged.groups,
            vec![SnapshotGroup::Single(jpg(0)), SnapshotGroup::Single(mp4(15))]
        );
        assert_eq!(kinds(&merged), vec![vec![Image], vec![Video]]);
        assert_eq!(merged.dropped, 0);

        let merged = merge_proximate(vec![jpg(0), both(2)], &corrected());
        assert_eq!(
            merged.groups,
            vec![SnapshotGroup::Single(jpg(0)), SnapshotGroup::Single(both(2))]
        );
    }

    #[test]
    fn corrected_mode_keeps_every_snapshot_once() {
        let input = vec![
            jpg(0),
            mp4(3),
            jpg(20),
            both(25),
            mp4(40),
            jpg(100),
            mp4(105),
            jpg(200),
        ];
        let merged = merge_proximate(input.clone(), &corrected());

        let mut seen: Vec<NaiveDateTime> = merged
            .groups
            .iter()
            .flat_map(|g| g.members().into_iter().map(|s| s.timestamp))
            .collect();
        seen.sort();
        let expected: Vec<NaiveDateTime> = input.iter().map(|s| s.timestamp).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn defining_snapshot_is_first_member() {
        let group = SnapshotGroup::Pair(mp4(0), jpg(5));
        assert_eq!(group.defining().timestamp, t0());
        assert_eq!(
            group.media_types().iter().collect::<Vec<_>>(),
            vec![Video, Image]
        );
    }

    #[test]
    fn stats_count_pairs_and_drops() {
        let input = vec![jpg(0), mp4(3), jpg(30), mp4(60)];
        let merged = merge_proximate(input, &compatible());
        let stats = merged.stats(4);
        assert_eq!(
            stats,
            MergeStats {
                input: 4,
                groups: 2,
                pairs: 1,
                dropped: 1,
            }
        );
    }
}
