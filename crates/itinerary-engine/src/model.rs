//! Core itinerary records: pace, candidates, blocks and days.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{self, minutes_of};
use crate::error::PlannerError;
use crate::geo::Coordinates;

/// Target density of blocks per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Relaxed,
    #[default]
    Balanced,
    Packed,
}

/// Inclusive range of blocks per day for a [`Pace`].
///
/// Only `max` is enforced by auto-fill; `min` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceTarget {
    pub min: usize,
    pub max: usize,
}

impl Pace {
    pub fn target(self) -> PaceTarget {
        match self {
            Pace::Relaxed => PaceTarget { min: 2, max: 3 },
            Pace::Balanced => PaceTarget { min: 3, max: 5 },
            Pace::Packed => PaceTarget { min: 5, max: 7 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pace::Relaxed => "relaxed",
            Pace::Balanced => "balanced",
            Pace::Packed => "packed",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(Pace::Relaxed),
            "balanced" => Ok(Pace::Balanced),
            "packed" => Ok(Pace::Packed),
            _ => Err(PlannerError::InvalidPace(s.to_string())),
        }
    }
}

/// Structural kind of a scheduled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Place,
    Accommodation,
    Activity,
    Transport,
    Meal,
    FreeTime,
    Note,
    SafetyCheck,
}

impl BlockKind {
    /// Everything except notes and safety checks occupies real time in the day.
    pub fn is_substantive(self) -> bool {
        !matches!(self, BlockKind::Note | BlockKind::SafetyCheck)
    }

    /// Substantive blocks that are not free time count toward the pace.
    pub fn counts_toward_pace(self) -> bool {
        self.is_substantive() && self != BlockKind::FreeTime
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    #[default]
    Planned,
    Booked,
    Done,
    Skipped,
}

/// An unscheduled saved place eligible for auto-fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Open-ended place category, e.g. `"cafe"` or `"museum"`.
    pub category: String,
    /// Neighborhood or district grouping key.
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
}

/// A single scheduled item within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub day_id: String,
    pub kind: BlockKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "clock::serde_opt_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "clock::serde_opt_time")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub duration_min: Option<u32>,
    pub order_index: u32,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub status: BlockStatus,
}

impl Block {
    /// Title shown to travelers; falls back to `"Untitled"`.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn start_minutes(&self) -> Option<u32> {
        self.start_time.map(minutes_of)
    }

    /// End of the block in minutes since midnight.
    ///
    /// An explicit end time wins over a duration; a duration needs a start time.
    pub fn end_minutes(&self) -> Option<u32> {
        match (self.end_time, self.start_time, self.duration_min) {
            (Some(end), _, _) => Some(minutes_of(end)),
            (None, Some(start), Some(duration)) => {
                Some(minutes_of(start).saturating_add(duration))
            }
            _ => None,
        }
    }
}

/// One day of a trip with its blocks in order-index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: String,
    pub day_index: u32,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A block-creation request produced by auto-fill.
///
/// Ids are assigned by persistence; the owning day is the slot the request sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    pub kind: BlockKind,
    pub title: Option<String>,
    #[serde(default, with = "clock::serde_opt_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "clock::serde_opt_time")]
    pub end_time: Option<NaiveTime>,
    pub order_index: u32,
    pub place_id: Option<String>,
    pub location: Option<Coordinates>,
    pub cost_estimate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::hm;

    fn block(start: Option<NaiveTime>, end: Option<NaiveTime>, duration: Option<u32>) -> Block {
        Block {
            id: "b1".into(),
            day_id: "d1".into(),
            kind: BlockKind::Place,
            title: None,
            start_time: start,
            end_time: end,
            duration_min: duration,
            order_index: 0,
            place_id: None,
            location: None,
            cost_estimate: None,
            status: BlockStatus::Planned,
        }
    }

    #[test]
    fn end_time_wins_over_duration() {
        let b = block(Some(hm(9, 0)), Some(hm(10, 0)), Some(240));
        assert_eq!(b.end_minutes(), Some(600));
    }

    #[test]
    fn duration_needs_a_start() {
        assert_eq!(block(Some(hm(9, 0)), None, Some(45)).end_minutes(), Some(585));
        assert_eq!(block(None, None, Some(45)).end_minutes(), None);
    }

    #[test]
    fn huge_duration_saturates() {
        let long = block(Some(hm(9, 0)), None, Some(u32::MAX));
        assert_eq!(long.end_minutes(), Some(u32::MAX));

        let mut next = block(Some(hm(10, 0)), Some(hm(11, 0)), None);
        next.id = "b2".into();

        let found = crate::suggest::detect_time_conflicts("d1", &[long, next]);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].payload,
            crate::suggest::SuggestionPayload::TimeShift {
                block_id: "b2".into(),
                new_start_time: hm(23, 59),
            }
        );
    }

    #[test]
    fn pace_parses_case_insensitively() {
        assert_eq!("Packed".parse::<Pace>().unwrap(), Pace::Packed);
        assert!(matches!(
            "frantic".parse::<Pace>(),
            Err(PlannerError::InvalidPace(_))
        ));
        assert_eq!(Pace::default().target().max, 5);
    }

    #[test]
    fn kind_groups() {
        assert!(!BlockKind::Note.is_substantive());
        assert!(BlockKind::FreeTime.is_substantive());
        assert!(!BlockKind::FreeTime.counts_toward_pace());
        assert!(BlockKind::Transport.counts_toward_pace());
    }
}
