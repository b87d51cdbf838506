//! Day ordering, trip day generation and trip totals.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::model::{Block, Day};

/// Sort a day's blocks for display: timed blocks by start time, then untimed
/// blocks by order index. Equal start times keep their relative order.
pub fn sort_blocks(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| match (a.start_time, b.start_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.order_index.cmp(&b.order_index),
    });
}

/// Rewrite order indices to `0..n` following the slice order.
///
/// Adjacency-based analysis assumes contiguous indices; call this after
/// reordering, inserting or removing blocks.
pub fn renumber(blocks: &mut [Block]) {
    for (idx, block) in blocks.iter_mut().enumerate() {
        block.order_index = idx as u32;
    }
}

/// A calendar day of a trip before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDate {
    /// 1-based position within the trip.
    pub day_index: u32,
    pub date: NaiveDate,
}

/// One entry per calendar date from `arriving` to `leaving`, both inclusive.
///
/// # Errors
/// Returns `PlannerError::InvalidDateRange` when `leaving` is before `arriving`.
pub fn generate_trip_days(arriving: NaiveDate, leaving: NaiveDate) -> Result<Vec<TripDate>> {
    if leaving < arriving {
        return Err(PlannerError::InvalidDateRange(format!(
            "leaving {leaving} is before arriving {arriving}"
        )));
    }

    Ok(arriving
        .iter_days()
        .take_while(|date| *date <= leaving)
        .zip(1u32..)
        .map(|(date, day_index)| TripDate { day_index, date })
        .collect())
}

/// Totals across a whole itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripTotals {
    /// Blocks linked to a saved place.
    pub total_places: usize,
    /// Sum of all block cost estimates; missing estimates count as zero.
    pub total_cost: f64,
}

pub fn summarize(days: &[Day]) -> TripTotals {
    days.iter()
        .flat_map(|day| day.blocks.iter())
        .fold(TripTotals::default(), |mut totals, block| {
            if block.place_id.is_some() {
                totals.total_places += 1;
            }
            totals.total_cost += block.cost_estimate.unwrap_or(0.0);
            totals
        })
}
