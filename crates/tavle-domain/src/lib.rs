pub mod board;
pub mod card;
pub mod describe;
pub mod filter;
pub mod issue;
pub mod status;

pub use board::{BoardCounts, BoardState, LaneLayout};
pub use card::{build_cards, Card, PriorityBucket};
pub use describe::{render, render_html, Description, DocNode};
pub use filter::{CardFilter, FilterSet, PriorityFilter, SprintFilter, StatusFilter};
pub use issue::{IssueRecord, Snapshot};
pub use status::{classify, Lane};
