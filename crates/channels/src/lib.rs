//! Interactive input for groundrag.
//!
//! - [`CliChannel`]: reads terminal lines (stdin) and Ctrl+C into a channel
//! - [`SessionCommand`]: the parsed meaning of one input line

pub mod cli;
pub mod command;

pub use cli::{CliChannel, InputLine};
pub use command::SessionCommand;
