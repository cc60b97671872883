//! Gateway commands

pub mod config;
pub mod query;
pub mod serve;

pub use config::ConfigArgs;
pub use query::{DutiesArgs, RewardArgs};
pub use serve::ServeArgs;
