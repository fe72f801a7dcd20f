//! Stream Fund command-line front end

pub mod cli;
pub mod commands;
pub mod report;
pub mod status;

pub use cli::{Cli, OutputFormat};
pub use commands::run;
