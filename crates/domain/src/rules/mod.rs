//! Award rules - what one award is worth to its earner and to everyone else.

mod bonus;
mod outward;

pub use bonus::{resolve_direct_bonus, DirectBonus};
pub use outward::enumerate_outward_effects;
