//! Distribute saved places across the days of a trip.
//!
//! A single deterministic pass, no backtracking:
//!
//! 1. Sort candidates by the start hour of their category's time slot
//!    (morning first, night last). The sort is stable.
//! 2. Pull candidates sharing an area id together, clusters in first-seen order,
//!    then the candidates with no area id.
//! 3. Give each candidate to the first day that is below the pace maximum and
//!    holds fewer than [`MAX_PER_CATEGORY`] places of its category. Candidates no
//!    day accepts go to the overflow list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category;
use crate::model::{Candidate, NewBlock, Pace};

/// Most places of one category a single day may receive.
pub const MAX_PER_CATEGORY: usize = 2;

/// Result of an auto-fill pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillPlan {
    /// One slot per trip day, indexed by day position.
    pub days: Vec<Vec<NewBlock>>,
    /// Candidates that fit no day under the pace and diversity caps.
    pub overflow: Vec<Candidate>,
}

impl AutoFillPlan {
    fn empty(day_count: usize) -> Self {
        Self {
            days: vec![Vec::new(); day_count],
            overflow: Vec::new(),
        }
    }

    /// Number of candidates placed on some day.
    pub fn assigned_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}

/// Running state for one day while assigning.
#[derive(Default)]
struct DayFill<'a> {
    blocks: Vec<NewBlock>,
    per_category: HashMap<&'a str, usize>,
}

impl<'a> DayFill<'a> {
    fn accepts(&self, candidate: &Candidate, max_blocks: usize) -> bool {
        self.blocks.len() < max_blocks
            && self
                .per_category
                .get(candidate.category.as_str())
                .copied()
                .unwrap_or(0)
                < MAX_PER_CATEGORY
    }

    fn push(&mut self, candidate: &'a Candidate) {
        let slot = category::time_slot_or_default(&candidate.category);
        self.blocks.push(NewBlock {
            kind: category::block_kind(&candidate.category),
            title: Some(candidate.name.clone()),
            start_time: Some(slot.start),
            end_time: Some(slot.end),
            order_index: self.blocks.len() as u32,
            place_id: Some(candidate.id.clone()),
            location: candidate.location,
            cost_estimate: candidate.cost_estimate,
        });
        *self
            .per_category
            .entry(candidate.category.as_str())
            .or_insert(0) += 1;
    }
}

/// Order candidates by time of day, then pull same-area candidates together.
///
/// Clusters keep the time-of-day order of their members and appear in the order
/// their first member was seen; candidates without an area id trail behind.
pub fn order_candidates(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by_key(|c| category::time_order(&c.category));

    let mut clusters: Vec<Vec<&Candidate>> = Vec::new();
    let mut cluster_of: HashMap<&str, usize> = HashMap::new();
    let mut unclustered: Vec<&Candidate> = Vec::new();

    for candidate in sorted {
        match candidate.area_id.as_deref() {
            Some(area) if !area.is_empty() => {
                let idx = *cluster_of.entry(area).or_insert_with(|| {
                    clusters.push(Vec::new());
                    clusters.len() - 1
                });
                clusters[idx].push(candidate);
            }
            _ => unclustered.push(candidate),
        }
    }

    clusters.into_iter().flatten().chain(unclustered).collect()
}

/// Distribute `candidates` over `day_count` days at the given pace.
///
/// Zero candidates or zero days yields `day_count` empty days and no overflow.
/// The result depends only on the input order, `day_count` and `pace`.
pub fn build_itinerary(candidates: &[Candidate], day_count: usize, pace: Pace) -> AutoFillPlan {
    let mut plan = AutoFillPlan::empty(day_count);
    if candidates.is_empty() || day_count == 0 {
        return plan;
    }

    let max_blocks = pace.target().max;
    let mut fills: Vec<DayFill<'_>> = (0..day_count).map(|_| DayFill::default()).collect();

    for candidate in order_candidates(candidates) {
        match fills.iter_mut().find(|day| day.accepts(candidate, max_blocks)) {
            Some(day) => day.push(candidate),
            None => {
                tracing::debug!(
                    candidate_id = %candidate.id,
                    category = %candidate.category,
                    "no day accepts candidate, moving to overflow"
                );
                plan.overflow.push(candidate.clone());
            }
        }
    }

    plan.days = fills.into_iter().map(|day| day.blocks).collect();

    tracing::debug!(
        days = day_count,
        %pace,
        assigned = plan.assigned_count(),
        overflow = plan.overflow.len(),
        "auto-fill complete"
    );

    plan
}
