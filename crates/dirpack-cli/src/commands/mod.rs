//! Subcommand implementations.

pub mod archive;
pub mod completion;
pub mod extract;
pub mod list;
pub mod name;
