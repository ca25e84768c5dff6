//! Terrorist - run registered commands by name
//!
//! CLI shell over `terrorist-core`: argument parsing, config loading, logging
//! setup and the `list` / `help` builtins.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod builtins;
pub mod cli;

pub use terrorist_core::{Command, Registry, Signature};
