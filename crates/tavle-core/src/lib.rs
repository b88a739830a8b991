pub mod config;
pub mod error;
pub mod result;

pub use config::{AppConfig, SprintPlan, SprintWindow};
pub use error::TavleError;
pub use result::TavleResult;
