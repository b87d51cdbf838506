//! Schedule analyzers that propose edits to a planned day.
//!
//! Each detector is a pure function over one day's blocks and returns zero or
//! more [`SuggestionCandidate`]s. Detectors don't interact, so any subset can be
//! run in any order. [`analyze_day`] runs all five.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::{self, from_minutes, hm, minutes_of};
use crate::geo::{self, Coordinates};
use crate::model::{Block, BlockKind, Day, Pace};

/// Idle time between two timed blocks that warrants an insert, in minutes.
pub const LONG_GAP_MINUTES: u32 = 180;

/// A day needs more substantive blocks than this before a missing meal matters.
pub const MEAL_CHECK_MIN_BLOCKS: usize = 3;

/// Relaxed days with more pace-counted blocks than this get a removal.
pub const RELAXED_MAX_ACTIVITIES: usize = 4;

/// Packed days with fewer pace-counted blocks than this get an insert.
pub const PACKED_MIN_ACTIVITIES: usize = 3;

/// A reorder must bring the route below this fraction of its current length.
pub const REORDER_DISTANCE_RATIO: f64 = 0.8;

const LUNCH_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Reorder,
    Swap,
    Insert,
    Remove,
    TimeShift,
}

impl SuggestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Reorder => "reorder",
            SuggestionKind::Swap => "swap",
            SuggestionKind::Insert => "insert",
            SuggestionKind::Remove => "remove",
            SuggestionKind::TimeShift => "time_shift",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block's target position in a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMove {
    pub block_id: String,
    pub new_order_index: u32,
}

/// Shape of a block a suggestion wants to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub title: String,
    #[serde(default, with = "clock::serde_opt_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub duration_min: Option<u32>,
}

/// Kind-specific body of a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SuggestionPayload {
    Reorder {
        moves: Vec<BlockMove>,
    },
    Swap {
        block_id: String,
        other_block_id: String,
    },
    Insert {
        after_block_id: Option<String>,
        block: BlockSpec,
    },
    TimeShift {
        block_id: String,
        #[serde(with = "clock::serde_time")]
        new_start_time: NaiveTime,
    },
    Remove {
        block_id: String,
        reason: String,
    },
}

impl SuggestionPayload {
    pub fn kind(&self) -> SuggestionKind {
        match self {
            SuggestionPayload::Reorder { .. } => SuggestionKind::Reorder,
            SuggestionPayload::Swap { .. } => SuggestionKind::Swap,
            SuggestionPayload::Insert { .. } => SuggestionKind::Insert,
            SuggestionPayload::TimeShift { .. } => SuggestionKind::TimeShift,
            SuggestionPayload::Remove { .. } => SuggestionKind::Remove,
        }
    }
}

/// Identity of a suggestion for deduplication: its kind plus target block.
///
/// Reason text and payload are deliberately not part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuggestionKey<'a> {
    pub kind: SuggestionKind,
    pub block_id: Option<&'a str>,
}

/// A freshly computed, not yet persisted suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionCandidate {
    pub day_id: String,
    /// Block the suggestion targets; `None` for day-level inserts and reorders.
    pub block_id: Option<String>,
    pub reason: String,
    pub payload: SuggestionPayload,
}

impl SuggestionCandidate {
    pub fn kind(&self) -> SuggestionKind {
        self.payload.kind()
    }

    pub fn key(&self) -> SuggestionKey<'_> {
        SuggestionKey {
            kind: self.kind(),
            block_id: self.block_id.as_deref(),
        }
    }
}

/// Blocks with a start time, ordered by start. Ties keep their day order.
fn by_start_time<'a>(blocks: impl Iterator<Item = &'a Block>) -> Vec<(&'a Block, u32)> {
    let mut timed: Vec<(&Block, u32)> = blocks
        .filter_map(|b| b.start_minutes().map(|start| (b, start)))
        .collect();
    timed.sort_by_key(|&(_, start)| start);
    timed
}

/// Flag consecutive timed blocks that overlap and propose shifting the later one.
///
/// Only blocks with a start time and either an end time or a duration take part.
/// Blocks that touch (one ends as the next starts) are not conflicts.
/// A proposed start at or past midnight is clamped to 23:59.
pub fn detect_time_conflicts(day_id: &str, blocks: &[Block]) -> Vec<SuggestionCandidate> {
    let timed = by_start_time(blocks.iter().filter(|b| b.end_minutes().is_some()));

    timed
        .windows(2)
        .filter_map(|pair| {
            let (earlier, _) = pair[0];
            let (later, later_start) = pair[1];
            let earlier_end = earlier.end_minutes()?;
            if earlier_end <= later_start {
                return None;
            }
            let new_start = from_minutes(earlier_end);
            Some(SuggestionCandidate {
                day_id: day_id.to_string(),
                block_id: Some(later.id.clone()),
                reason: format!(
                    "{} overlaps with {}, shift to {}?",
                    later.display_title(),
                    earlier.display_title(),
                    new_start.format("%H:%M"),
                ),
                payload: SuggestionPayload::TimeShift {
                    block_id: later.id.clone(),
                    new_start_time: new_start,
                },
            })
        })
        .collect()
}

/// Propose free time between timed blocks separated by more than three hours.
pub fn detect_long_gaps(day_id: &str, blocks: &[Block]) -> Vec<SuggestionCandidate> {
    let timed = by_start_time(blocks.iter());

    timed
        .windows(2)
        .filter_map(|pair| {
            let (earlier, _) = pair[0];
            let (later, later_start) = pair[1];
            let earlier_end = earlier.end_minutes()?;
            let gap = later_start.checked_sub(earlier_end)?;
            if gap <= LONG_GAP_MINUTES {
                return None;
            }
            let hours = (f64::from(gap) / 60.0).round();
            Some(SuggestionCandidate {
                day_id: day_id.to_string(),
                block_id: None,
                reason: format!(
                    "{hours} hour gap between {} and {}, add a stop?",
                    earlier.display_title(),
                    later.display_title(),
                ),
                payload: SuggestionPayload::Insert {
                    after_block_id: Some(earlier.id.clone()),
                    block: BlockSpec {
                        kind: BlockKind::FreeTime,
                        title: "Free time".to_string(),
                        start_time: None,
                        duration_min: None,
                    },
                },
            })
        })
        .collect()
}

/// Propose a lunch break on a full day that spans midday without any meal.
///
/// Fires when the day has more than three substantive blocks, none of them a
/// meal, and timed blocks both before 11:00 and after 14:00. The lunch goes
/// after the latest block starting before noon, or after the first block.
pub fn detect_missing_meals(day_id: &str, blocks: &[Block]) -> Vec<SuggestionCandidate> {
    let substantive = blocks.iter().filter(|b| b.kind.is_substantive()).count();
    if substantive <= MEAL_CHECK_MIN_BLOCKS {
        return Vec::new();
    }
    if blocks.iter().any(|b| b.kind == BlockKind::Meal) {
        return Vec::new();
    }

    let morning_cutoff = minutes_of(hm(11, 0));
    let afternoon_cutoff = minutes_of(hm(14, 0));
    let noon = minutes_of(hm(12, 0));

    let starts: Vec<(&Block, u32)> = blocks
        .iter()
        .filter_map(|b| b.start_minutes().map(|start| (b, start)))
        .collect();
    let spans_lunch = starts.iter().any(|&(_, s)| s < morning_cutoff)
        && starts.iter().any(|&(_, s)| s > afternoon_cutoff);
    if !spans_lunch {
        return Vec::new();
    }

    // Latest start before noon; the first block seen wins a tie.
    let mut anchor: Option<(&Block, u32)> = None;
    for &(block, start) in starts.iter().filter(|&&(_, s)| s < noon) {
        if anchor.is_none_or(|(_, best)| start > best) {
            anchor = Some((block, start));
        }
    }
    let after_block_id = anchor
        .map(|(b, _)| b.id.clone())
        .or_else(|| blocks.first().map(|b| b.id.clone()));

    vec![SuggestionCandidate {
        day_id: day_id.to_string(),
        block_id: None,
        reason: "Full day with no meal planned, add lunch around noon?".to_string(),
        payload: SuggestionPayload::Insert {
            after_block_id,
            block: BlockSpec {
                kind: BlockKind::Meal,
                title: "Lunch break".to_string(),
                start_time: Some(hm(12, 0)),
                duration_min: Some(LUNCH_DURATION_MINUTES),
            },
        },
    }]
}

/// Compare the number of pace-counted blocks with the trip pace.
///
/// Relaxed days with more than four get a removal of the last one; packed days
/// with fewer than three get an insert after the last block. Balanced or unset
/// pace never produces anything. Callers should skip packed-day inserts for
/// days without a calendar date; [`analyze_day`] does.
pub fn detect_pace_mismatch(
    day_id: &str,
    blocks: &[Block],
    pace: Option<Pace>,
) -> Vec<SuggestionCandidate> {
    let activities: Vec<&Block> = blocks
        .iter()
        .filter(|b| b.kind.counts_toward_pace())
        .collect();
    let count = activities.len();

    match pace {
        Some(Pace::Relaxed) if count > RELAXED_MAX_ACTIVITIES => {
            let Some(last) = activities.last() else {
                return Vec::new();
            };
            vec![SuggestionCandidate {
                day_id: day_id.to_string(),
                block_id: Some(last.id.clone()),
                reason: format!(
                    "{count} stops planned for a relaxed pace, consider moving one to another day"
                ),
                payload: SuggestionPayload::Remove {
                    block_id: last.id.clone(),
                    reason: "Relaxed pace exceeded".to_string(),
                },
            }]
        }
        Some(Pace::Packed) if count < PACKED_MIN_ACTIVITIES => {
            vec![SuggestionCandidate {
                day_id: day_id.to_string(),
                block_id: None,
                reason: format!("Only {count} stops, this day has room for more"),
                payload: SuggestionPayload::Insert {
                    after_block_id: blocks.last().map(|b| b.id.clone()),
                    block: BlockSpec {
                        kind: BlockKind::Activity,
                        title: "Add an activity".to_string(),
                        start_time: None,
                        duration_min: None,
                    },
                },
            }]
        }
        _ => Vec::new(),
    }
}

/// Visit order produced by the nearest-neighbor heuristic.
///
/// Starts at the first point and repeatedly takes the closest unvisited one;
/// on equal distances the earlier point wins. Returns indices into `points`.
pub fn nearest_neighbor_order(points: &[Coordinates]) -> Vec<usize> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut order = Vec::with_capacity(points.len());
    let mut remaining: Vec<usize> = (1..points.len()).collect();
    order.push(0);
    let mut current = *first;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let dist = geo::haversine_km(current, points[idx]);
            if dist < best_dist {
                best_dist = dist;
                best = pos;
            }
        }
        let next = remaining.remove(best);
        current = points[next];
        order.push(next);
    }

    order
}

/// Propose reordering geo-tagged blocks when nearest-neighbor order is more
/// than 20% shorter than the current route.
///
/// Only blocks with coordinates are involved. Each gets its position in the
/// proposed visiting order as its new order index; blocks without coordinates
/// are not listed.
pub fn detect_proximity_reorder(day_id: &str, blocks: &[Block]) -> Vec<SuggestionCandidate> {
    let geo_blocks: Vec<(&Block, Coordinates)> = blocks
        .iter()
        .filter_map(|b| b.location.map(|loc| (b, loc)))
        .collect();
    if geo_blocks.len() < 3 {
        return Vec::new();
    }

    let points: Vec<Coordinates> = geo_blocks.iter().map(|&(_, loc)| loc).collect();
    let current_km = geo::route_km(&points);

    let order = nearest_neighbor_order(&points);
    let reordered: Vec<Coordinates> = order.iter().map(|&i| points[i]).collect();
    let proposed_km = geo::route_km(&reordered);

    if proposed_km >= current_km * REORDER_DISTANCE_RATIO {
        return Vec::new();
    }

    let moves = order
        .iter()
        .zip(0u32..)
        .map(|(&i, position)| BlockMove {
            block_id: geo_blocks[i].0.id.clone(),
            new_order_index: position,
        })
        .collect();

    vec![SuggestionCandidate {
        day_id: day_id.to_string(),
        block_id: None,
        reason: format!(
            "Reordering stops could save ~{}km of travel",
            (current_km - proposed_km).round()
        ),
        payload: SuggestionPayload::Reorder { moves },
    }]
}

/// Run every detector over a day and concatenate their candidates.
///
/// An empty day yields nothing. Packed-pace inserts are skipped for days with
/// no calendar date so placeholder days aren't nagged to add activities.
pub fn analyze_day(day: &Day, pace: Option<Pace>) -> Vec<SuggestionCandidate> {
    let blocks = &day.blocks;
    if blocks.is_empty() {
        return Vec::new();
    }

    let pace_candidates = if pace == Some(Pace::Packed) && day.date.is_none() {
        Vec::new()
    } else {
        detect_pace_mismatch(&day.id, blocks, pace)
    };

    let mut candidates = detect_time_conflicts(&day.id, blocks);
    candidates.extend(detect_long_gaps(&day.id, blocks));
    candidates.extend(detect_missing_meals(&day.id, blocks));
    candidates.extend(pace_candidates);
    candidates.extend(detect_proximity_reorder(&day.id, blocks));

    tracing::debug!(
        day_id = %day.id,
        blocks = blocks.len(),
        suggestions = candidates.len(),
        "analyzed day"
    );

    candidates
}
