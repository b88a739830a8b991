use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::status::Lane;

/// Lane membership by card key. This is both the board's working order and
/// the wire shape of the persisted layout (`inprog` is the historical field
/// name in stored snapshots).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLayout {
    #[serde(default)]
    pub todo: Vec<String>,
    #[serde(rename = "inprog", default)]
    pub in_progress: Vec<String>,
    #[serde(default)]
    pub done: Vec<String>,
}

impl LaneLayout {
    pub fn lane(&self, lane: Lane) -> &[String] {
        match lane {
            Lane::Todo => &self.todo,
            Lane::InProgress => &self.in_progress,
            Lane::Done => &self.done,
        }
    }
}

/// Aggregate counters over the current lane membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCounts {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

/// Current assignment and order of cards across the three lanes.
///
/// Invariant: every card key appears in exactly one lane; moves and layout
/// restores reassign keys but never drop them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    lanes: LaneLayout,
}

impl BoardState {
    /// Place each card into the lane of its status tag, preserving input
    /// order within lanes.
    pub fn assemble(cards: &[Card]) -> Self {
        let mut lanes = LaneLayout::default();
        for card in cards {
            lane_mut(&mut lanes, card.lane).push(card.key().to_string());
        }
        Self { lanes }
    }

    pub fn lane(&self, lane: Lane) -> &[String] {
        self.lanes.lane(lane)
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.lanes
    }

    pub fn counts(&self) -> BoardCounts {
        let todo = self.lanes.todo.len();
        let in_progress = self.lanes.in_progress.len();
        let done = self.lanes.done.len();
        BoardCounts {
            total: todo + in_progress + done,
            todo,
            in_progress,
            done,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position_of(key).is_some()
    }

    pub fn position_of(&self, key: &str) -> Option<(Lane, usize)> {
        for lane in Lane::ALL {
            if let Some(index) = self.lane(lane).iter().position(|k| k == key) {
                return Some((lane, index));
            }
        }
        None
    }

    /// Move a card to `target` at `position` (clamped; end of lane when
    /// `None`). Unknown keys are ignored. Returns whether a move happened.
    pub fn move_card(&mut self, key: &str, target: Lane, position: Option<usize>) -> bool {
        let Some(removed) = self.remove(key) else {
            return false;
        };
        let lane = lane_mut(&mut self.lanes, target);
        let index = position.unwrap_or(lane.len()).min(lane.len());
        lane.insert(index, removed);
        true
    }

    /// Overlay a saved layout onto the status-derived placement: every saved
    /// key still on the board moves to its saved lane in saved order, stale
    /// keys are dropped silently, and cards absent from the snapshot stay
    /// where assembly put them.
    pub fn apply_layout(&mut self, saved: &LaneLayout) {
        for lane in Lane::ALL {
            for key in saved.lane(lane) {
                if let Some(removed) = self.remove(key) {
                    lane_mut(&mut self.lanes, lane).push(removed);
                }
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        let (lane, index) = self.position_of(key)?;
        Some(lane_mut(&mut self.lanes, lane).remove(index))
    }
}

fn lane_mut(lanes: &mut LaneLayout, lane: Lane) -> &mut Vec<String> {
    match lane {
        Lane::Todo => &mut lanes.todo,
        Lane::InProgress => &mut lanes.in_progress,
        Lane::Done => &mut lanes.done,
    }
}
