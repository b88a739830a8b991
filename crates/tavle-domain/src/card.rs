use serde::{Deserialize, Serialize};
use tavle_core::SprintPlan;

use crate::issue::IssueRecord;
use crate::status::{classify, Lane};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityBucket {
    High,
    Medium,
    Low,
}

impl PriorityBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityBucket::High => "high",
            PriorityBucket::Medium => "medium",
            PriorityBucket::Low => "low",
        }
    }

    /// Bucket a free-text priority by substring. First match wins in the
    /// order high, medium, low; unrecognized text has no bucket.
    pub fn from_text(priority: &str) -> Option<Self> {
        let priority = priority.to_lowercase();
        if priority.contains("high") {
            Some(PriorityBucket::High)
        } else if priority.contains("medium") {
            Some(PriorityBucket::Medium)
        } else if priority.contains("low") {
            Some(PriorityBucket::Low)
        } else {
            None
        }
    }
}

/// Renderable projection of one issue, carrying its derived tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub issue: IssueRecord,
    pub lane: Lane,
    pub priority: Option<PriorityBucket>,
    pub sprint: Option<String>,
}

impl Card {
    /// Pure projection; missing fields degrade to empty tags, never errors.
    pub fn from_issue(issue: IssueRecord, plan: &SprintPlan) -> Self {
        let lane = classify(issue.status_text());
        let priority = PriorityBucket::from_text(issue.priority_text());
        let sprint = key_number(&issue.key)
            .and_then(|n| plan.bucket_for(n))
            .map(str::to_string);
        Self {
            issue,
            lane,
            priority,
            sprint,
        }
    }

    pub fn key(&self) -> &str {
        &self.issue.key
    }

    pub fn labels(&self) -> &[String] {
        &self.issue.labels
    }

    pub fn priority_bucket_text(&self) -> &str {
        self.priority.map(PriorityBucket::as_str).unwrap_or("")
    }
}

/// Numeric suffix of an issue key (`WEB-22` → 22). Absent or non-numeric
/// suffixes have no number.
fn key_number(key: &str) -> Option<u32> {
    let (_, suffix) = key.rsplit_once('-')?;
    suffix.parse().ok()
}

/// Project issue records into cards, dropping duplicate keys after the first
/// so card identity stays unique within a render cycle.
pub fn build_cards(issues: Vec<IssueRecord>, plan: &SprintPlan) -> Vec<Card> {
    let mut seen = std::collections::HashSet::new();
    issues
        .into_iter()
        .filter(|issue| seen.insert(issue.key.clone()))
        .map(|issue| Card::from_issue(issue, plan))
        .collect()
}
