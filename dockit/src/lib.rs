pub mod cli;
pub mod load_config;
pub mod progress;
pub mod prompt;
pub mod s3;
pub mod session;

pub use cli::{run, Cli, Commands};
