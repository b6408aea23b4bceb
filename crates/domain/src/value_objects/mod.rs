//! Value objects - immutable, identity-less domain vocabulary.

mod guild_id;
mod month;
mod reason;

pub use guild_id::{GuildId, GUILD_DECLARATION_ORDER};
pub use month::MonthKey;
pub use reason::Reason;
