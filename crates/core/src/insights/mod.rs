//! Read-only summaries over collections: statistics and user affinity.

mod affinity;
mod stats;

pub use affinity::{affinity_score, suggest, AffinityLevel, Suggestion};
pub use stats::{GenreCount, LibraryStats, TOP_GENRES};
