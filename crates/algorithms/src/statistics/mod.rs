//! Statistical summaries
//!
//! - Land cover summary: per-category counts, fractions and areas

mod summary;

pub use summary::{summarize, CategoryStat, LandCoverSummary};
