//! ClassQuest Engine library.
//!
//! Server-side orchestration of classroom progression.
//!
//! ## Structure
//!
//! - `use_cases/` - Awards, skills, guilds, and outbox draining
//! - `infrastructure/` - Ports plus their SQLite and system adapters
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
