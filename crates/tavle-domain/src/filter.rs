//! Card visibility filtering.
//!
//! Filters decide presentation only: a hidden card keeps its lane and
//! position. Each predicate defaults to `All` and the set combines them
//! with AND logic.

use crate::card::Card;
use crate::status::{matches_filter_family, Lane};

/// A single visibility predicate over a card's tags.
pub trait CardFilter {
    fn matches(&self, card: &Card) -> bool;
}

/// Match the raw status text against a lane's synonym family rather than the
/// resolved lane tag, keeping nuance the 3-way bucketing loses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Family(Lane),
}

impl CardFilter for StatusFilter {
    fn matches(&self, card: &Card) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Family(lane) => matches_filter_family(card.issue.status_text(), *lane),
        }
    }
}

/// Exact match on the sprint bucket; a card without a bucket never matches a
/// concrete sprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SprintFilter {
    #[default]
    All,
    Bucket(String),
}

impl CardFilter for SprintFilter {
    fn matches(&self, card: &Card) -> bool {
        match self {
            SprintFilter::All => true,
            SprintFilter::Bucket(bucket) => card.sprint.as_deref() == Some(bucket.as_str()),
        }
    }
}

/// Case-insensitive substring match against the card's priority bucket text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Contains(String),
}

impl CardFilter for PriorityFilter {
    fn matches(&self, card: &Card) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Contains(needle) => card
                .priority_bucket_text()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// The active filter selection. All three predicates must pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub status: StatusFilter,
    pub sprint: SprintFilter,
    pub priority: PriorityFilter,
}

impl FilterSet {
    pub fn is_visible(&self, card: &Card) -> bool {
        self.matches(card)
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

impl CardFilter for FilterSet {
    fn matches(&self, card: &Card) -> bool {
        self.status.matches(card) && self.sprint.matches(card) && self.priority.matches(card)
    }
}
