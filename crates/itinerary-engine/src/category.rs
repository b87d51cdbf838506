//! Place category policy.
//!
//! Static lookups from a place category (`"cafe"`, `"museum"`, ...) to the time of
//! day it is usually visited, the block kind it becomes on a schedule, and its
//! position in the morning-to-night ordering used by auto-fill. Unknown
//! categories fall back to a midday slot and a plain place block.

use chrono::NaiveTime;

use crate::clock::{hm, minutes_of};
use crate::model::BlockKind;

/// Canonical visiting window for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    fn new(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Self {
        Self {
            start: hm(start_hour, start_min),
            end: hm(end_hour, end_min),
        }
    }

    /// Slot length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        minutes_of(self.end).saturating_sub(minutes_of(self.start))
    }
}

/// Hour used to order categories with no canonical slot.
pub const DEFAULT_SORT_HOUR: u32 = 12;

/// Window for a category, if it has one.
pub fn time_slot(category: &str) -> Option<TimeSlot> {
    let slot = match category {
        "cafe" => TimeSlot::new(8, 0, 9, 30),
        "landmark" | "temple" => TimeSlot::new(9, 30, 11, 30),
        "museum" | "gallery" | "activity" => TimeSlot::new(10, 0, 12, 0),
        "tour" => TimeSlot::new(9, 0, 12, 0),
        "market" | "wellness" | "spa" => TimeSlot::new(14, 0, 16, 0),
        "neighborhood" => TimeSlot::new(14, 0, 17, 0),
        "restaurant" => TimeSlot::new(19, 0, 21, 0),
        "bar" => TimeSlot::new(20, 0, 22, 0),
        "rooftop" => TimeSlot::new(17, 0, 19, 0),
        "club" => TimeSlot::new(21, 0, 23, 0),
        "beach" => TimeSlot::new(10, 0, 15, 0),
        _ => return None,
    };
    Some(slot)
}

/// Window for a category, falling back to 12:00–14:00.
pub fn time_slot_or_default(category: &str) -> TimeSlot {
    time_slot(category).unwrap_or_else(|| TimeSlot::new(12, 0, 14, 0))
}

/// Sort priority: the starting hour of the category's window.
pub fn time_order(category: &str) -> u32 {
    time_slot(category)
        .map(|slot| minutes_of(slot.start) / 60)
        .unwrap_or(DEFAULT_SORT_HOUR)
}

/// Block kind a place of this category becomes on a schedule.
pub fn block_kind(category: &str) -> BlockKind {
    match category {
        "restaurant" | "cafe" | "bar" | "rooftop" => BlockKind::Meal,
        "hotel" | "hostel" | "homestay" | "guesthouse" | "resort" | "villa" | "airbnb" => {
            BlockKind::Accommodation
        }
        "activity" | "tour" | "wellness" | "spa" => BlockKind::Activity,
        _ => BlockKind::Place,
    }
}
