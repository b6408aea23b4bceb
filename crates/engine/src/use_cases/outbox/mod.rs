//! Outbox use cases.

mod drain_outbox;

pub use drain_outbox::{DrainOutbox, DrainReport};

use crate::infrastructure::ports::RepoError;
use crate::use_cases::guilds::GuildError;

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("Guild error: {0}")]
    Guild(#[from] GuildError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
