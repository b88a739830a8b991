use serde::{Deserialize, Serialize};

/// The three canonical board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Todo,
    InProgress,
    Done,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Todo, Lane::InProgress, Lane::Done];

    pub fn title(self) -> &'static str {
        match self {
            Lane::Todo => "To do",
            Lane::InProgress => "In progress",
            Lane::Done => "Done",
        }
    }
}

// Classifier keyword families. Status names arrive free-text and partly in
// Norwegian; matching is case-insensitive substring over these sets.
const DONE_KEYWORDS: &[&str] = &["done", "closed", "resolved", "finished", "ferdig"];
const IN_PROGRESS_KEYWORDS: &[&str] = &["in progress", "in-progress", "doing", "pågår"];

// Filter synonym families are wider than the classifier: filtering matches
// the raw status text, so synonyms that the 3-way bucketing collapses
// ("open", "completed", ...) are kept here.
const FILTER_TODO: &[&str] = &["to do", "todo", "ikke", "open"];
const FILTER_IN_PROGRESS: &[&str] = &["in progress", "pågår", "doing"];
const FILTER_DONE: &[&str] = &["done", "ferdig", "completed"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Map a free-text status name to its lane. Total over arbitrary text;
/// anything unrecognized (including empty) lands in `Todo`.
pub fn classify(status: &str) -> Lane {
    let status = status.to_lowercase();
    if contains_any(&status, DONE_KEYWORDS) {
        Lane::Done
    } else if contains_any(&status, IN_PROGRESS_KEYWORDS) {
        Lane::InProgress
    } else {
        Lane::Todo
    }
}

/// Whether a raw status text belongs to a lane's filter synonym family.
pub fn matches_filter_family(status: &str, lane: Lane) -> bool {
    let status = status.to_lowercase();
    let family = match lane {
        Lane::Todo => FILTER_TODO,
        Lane::InProgress => FILTER_IN_PROGRESS,
        Lane::Done => FILTER_DONE,
    };
    contains_any(&status, family)
}
