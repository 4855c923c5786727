pub mod actors;
pub mod add;
pub mod analyze;
pub mod card;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod export;
pub mod list;
pub mod stats;
pub mod sync;
pub mod watch;
