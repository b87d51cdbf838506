//! Reconcile freshly computed suggestions with the ones already persisted.
//!
//! Suggestions are keyed by `(kind, target block)`. A sync dismisses every
//! pending suggestion whose key no fresh candidate shares and creates every
//! candidate whose key no pending suggestion shares. Afterwards the pending set
//! covers exactly the fresh key space, so running the same sync again issues no
//! further writes.
//!
//! A pending suggestion whose key still matches is left as it is, even when the
//! fresh candidate carries a different reason or payload.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{PlannerError, Result};
use crate::suggest::{SuggestionCandidate, SuggestionKey, SuggestionKind, SuggestionPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Applied,
    Dismissed,
}

/// A persisted suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub trip_id: String,
    pub day_id: String,
    #[serde(default)]
    pub block_id: Option<String>,
    pub reason: String,
    pub payload: SuggestionPayload,
    #[serde(default)]
    pub status: SuggestionStatus,
}

impl Suggestion {
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

/// A suggestion ready to be written; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestion {
    pub trip_id: String,
    pub day_id: String,
    pub block_id: Option<String>,
    pub reason: String,
    pub payload: SuggestionPayload,
}

/// Writes needed to bring a day's pending suggestions in line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    /// Ids of pending suggestions to dismiss.
    pub dismiss: Vec<String>,
    pub create: Vec<NewSuggestion>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.dismiss.is_empty() && self.create.is_empty()
    }
}

/// Counts of writes a sync issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub created: usize,
    pub dismissed: usize,
}

/// Compute the dismissals and creations for one day without touching storage.
///
/// Entries of `pending` that are not in the pending state are ignored. Fresh
/// candidates sharing a key with each other are all created when no pending
/// suggestion has that key.
pub fn plan_sync(
    trip_id: &str,
    day_id: &str,
    pending: &[Suggestion],
    fresh: &[SuggestionCandidate],
) -> SyncPlan {
    let pending: Vec<&Suggestion> = pending
        .iter()
        .filter(|s| s.status == SuggestionStatus::Pending)
        .collect();

    let fresh_keys: HashSet<SuggestionKey<'_>> = fresh.iter().map(|c| c.key()).collect();
    let pending_keys: HashSet<SuggestionKey<'_>> = pending.iter().map(|s| s.key()).collect();

    let dismiss = pending
        .iter()
        .filter(|s| !fresh_keys.contains(&s.key()))
        .map(|s| s.id.clone())
        .collect();

    let create = fresh
        .iter()
        .filter(|c| !pending_keys.contains(&c.key()))
        .map(|c| NewSuggestion {
            trip_id: trip_id.to_string(),
            day_id: day_id.to_string(),
            block_id: c.block_id.clone(),
            reason: c.reason.clone(),
            payload: c.payload.clone(),
        })
        .collect();

    SyncPlan { dismiss, create }
}

/// Persistence for itinerary suggestions.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Pending suggestions for a day.
    async fn pending_for_day(&self, day_id: &str) -> Result<Vec<Suggestion>>;

    async fn create(&self, suggestion: NewSuggestion) -> Result<Suggestion>;

    /// Move a suggestion to the dismissed state.
    async fn dismiss(&self, suggestion_id: &str) -> Result<()>;

    /// Apply a whole plan.
    ///
    /// The default issues dismissals then creations one at a time and stops at
    /// the first failure, leaving earlier writes in place. Backends with
    /// transactions can override this to apply the plan atomically.
    async fn apply_plan(&self, plan: SyncPlan) -> Result<SyncOutcome> {
        let mut outcome = SyncOutcome::default();

        for id in &plan.dismiss {
            self.dismiss(id).await.inspect_err(|err| {
                tracing::warn!(suggestion_id = %id, error = %err, "dismiss failed");
            })?;
            outcome.dismissed += 1;
        }

        for suggestion in plan.create {
            let kind = suggestion.payload.kind();
            self.create(suggestion).await.inspect_err(|err| {
                tracing::warn!(%kind, error = %err, "create failed");
            })?;
            outcome.created += 1;
        }

        Ok(outcome)
    }
}

/// Bring the persisted pending suggestions of a day in line with `fresh`.
///
/// Store errors are returned unchanged with no retry. A failed sync can simply be
/// run again; already-applied writes are not repeated.
pub async fn sync_suggestions<S>(
    store: &S,
    trip_id: &str,
    day_id: &str,
    fresh: &[SuggestionCandidate],
) -> Result<SyncOutcome>
where
    S: SuggestionStore + ?Sized,
{
    let pending = store.pending_for_day(day_id).await?;
    let plan = plan_sync(trip_id, day_id, &pending, fresh);
    if plan.is_empty() {
        tracing::debug!(trip_id, day_id, "suggestions already in sync");
        return Ok(SyncOutcome::default());
    }

    let outcome = store.apply_plan(plan).await?;
    tracing::info!(
        trip_id,
        day_id,
        created = outcome.created,
        dismissed = outcome.dismissed,
        "synced suggestions"
    );
    Ok(outcome)
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    suggestions: Vec<Suggestion>,
}

impl MemoryState {
    fn fresh_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("sugg-{}", self.next_id);
            if !self.suggestions.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }
}

/// In-process [`SuggestionStore`] with sequential ids.
#[derive(Debug, Default)]
pub struct MemorySuggestionStore {
    state: Mutex<MemoryState>,
}

impl MemorySuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing suggestions, keeping their ids.
    pub fn with_suggestions(suggestions: Vec<Suggestion>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 0,
                suggestions,
            }),
        }
    }

    /// Every stored suggestion in insertion order, whatever its status.
    pub async fn all(&self) -> Vec<Suggestion> {
        self.state.lock().await.suggestions.clone()
    }

    /// Mark a suggestion as accepted by the traveler.
    pub async fn mark_applied(&self, suggestion_id: &str) -> Result<()> {
        self.set_status(suggestion_id, SuggestionStatus::Applied).await
    }

    async fn set_status(&self, suggestion_id: &str, status: SuggestionStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        let suggestion = state
            .suggestions
            .iter_mut()
            .find(|s| s.id == suggestion_id)
            .ok_or_else(|| PlannerError::store(format!("unknown suggestion {suggestion_id}")))?;
        suggestion.status = status;
        Ok(())
    }
}

#[async_trait]
impl SuggestionStore for MemorySuggestionStore {
    async fn pending_for_day(&self, day_id: &str) -> Result<Vec<Suggestion>> {
        let state = self.state.lock().await;
        Ok(state
            .suggestions
            .iter()
            .filter(|s| s.day_id == day_id && s.status == SuggestionStatus::Pending)
            .cloned()
            .collect())
    }

    async fn create(&self, suggestion: NewSuggestion) -> Result<Suggestion> {
        let mut state = self.state.lock().await;
        let id = state.fresh_id();
        let stored = Suggestion {
            id,
            trip_id: suggestion.trip_id,
            day_id: suggestion.day_id,
            block_id: suggestion.block_id,
            reason: suggestion.reason,
            payload: suggestion.payload,
            status: SuggestionStatus::Pending,
        };
        state.suggestions.push(stored.clone());
        Ok(stored)
    }

    async fn dismiss(&self, suggestion_id: &str) -> Result<()> {
        self.set_status(suggestion_id, SuggestionStatus::Dismissed).await
    }
}
