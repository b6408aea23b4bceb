//! Award use cases.

mod award_stars;

pub use award_stars::{AwardOutcome, AwardStars, AwardSummary, SkipReason};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum AwardError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
