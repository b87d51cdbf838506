//! # itinerary-engine
//!
//! Deterministic trip itinerary planning for travel apps.
//!
//! The engine distributes a traveler's saved places across the days of a trip
//! and inspects planned days for fixable problems: overlapping blocks, long
//! idle gaps, skipped meals, days that don't match the trip pace, and visiting
//! orders that zig-zag across town. Proposed edits are reconciled against the
//! suggestions already persisted for a day so repeated analysis never piles up
//! duplicates.
//!
//! ## Modules
//!
//! - [`clock`] — clock-time parsing, formatting and minute arithmetic
//! - [`geo`] — haversine distance and route length
//! - [`category`] — place category → time slot, block kind, sort priority
//! - [`model`] — candidates, blocks, days and pace
//! - [`autofill`] — distribute candidates across trip days
//! - [`suggest`] — the five day analyzers and their orchestration
//! - [`reconcile`] — sync fresh suggestions against a persisted store
//! - [`timeline`] — day ordering, trip day generation and totals
//! - [`error`] — Error types

pub mod autofill;
pub mod category;
pub mod clock;
pub mod error;
pub mod geo;
pub mod model;
pub mod reconcile;
pub mod suggest;
pub mod timeline;

pub use autofill::{build_itinerary, AutoFillPlan};
pub use error::PlannerError;
pub use model::{Block, BlockKind, BlockStatus, Candidate, Day, NewBlock, Pace, PaceTarget};
pub use reconcile::{plan_sync, sync_suggestions, MemorySuggestionStore, SuggestionStore, SyncPlan};
pub use suggest::{analyze_day, SuggestionCandidate, SuggestionKind, SuggestionPayload};
