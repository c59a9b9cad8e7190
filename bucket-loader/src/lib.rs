pub mod catalog;
pub mod cli;
pub mod load;
pub mod load_config;
pub mod rows;

pub use cli::{run, Cli, Commands};
