//! REPL Module
//!
//! Read-eval loop and command table of the pokedex.

mod commands;
mod input;

pub use commands::{catch_succeeds, CommandInfo, Flow, Repl, COMMANDS, PROMPT};
pub use input::{spawn_stdin_reader, LineSource};
